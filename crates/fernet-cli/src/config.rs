//! TOML-based configuration for the `fernet` tool.
//!
//! ```toml
//! [key]
//! secret_file = "/etc/fernet/key"
//!
//! [decode]
//! ttl = 3600
//!
//! [logging]
//! level = "warn"
//! format = "json"
//! ```

use std::path::{Path, PathBuf};

use fernet_core::FernetKey;
use serde::Deserialize;

use crate::error::CliError;
use crate::logging::LogFormat;

/// Top-level configuration loaded from a TOML file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CliConfig {
    #[serde(default)]
    pub key: KeySection,
    #[serde(default)]
    pub decode: DecodeSection,
    #[serde(default)]
    pub logging: LoggingSection,
}

impl CliConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, CliError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| CliError::Config(format!("failed to read config file: {e}")))?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self, CliError> {
        toml::from_str(s).map_err(|e| CliError::Config(format!("failed to parse config: {e}")))
    }

    /// Pick the key to use.
    ///
    /// `explicit` is the value clap resolved from `--key` or `FERNET_KEY`;
    /// it wins over the `[key]` section.
    pub fn resolve_key(&self, explicit: Option<&str>) -> Result<FernetKey, CliError> {
        if let Some(secret) = explicit {
            return Ok(FernetKey::from_base64(secret)?);
        }

        match (&self.key.secret, &self.key.secret_file) {
            (Some(_), Some(_)) => Err(CliError::Config(
                "[key] sets both secret and secret_file".to_string(),
            )),
            (Some(secret), None) => Ok(FernetKey::from_base64(secret)?),
            (None, Some(path)) => {
                let content = std::fs::read_to_string(path).map_err(|e| {
                    CliError::Config(format!("failed to read {}: {e}", path.display()))
                })?;
                Ok(FernetKey::from_base64(content.trim())?)
            }
            (None, None) => Err(CliError::MissingKey),
        }
    }
}

/// The `[key]` section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KeySection {
    /// Base64URL-encoded 32-byte key.
    pub secret: Option<String>,
    /// File whose contents are the Base64URL-encoded key.
    pub secret_file: Option<PathBuf>,
}

/// The `[decode]` section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DecodeSection {
    /// Maximum token age in seconds. Unset means tokens never expire.
    pub ttl: Option<u64>,
}

/// The `[logging]` section.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingSection {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}
