use std::io::{Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use fernet_cli::logging::{self, LogFormat};
use fernet_cli::{CliConfig, CliError, commands};
use fernet_core::Fernet;

#[derive(Parser)]
#[command(name = "fernet", version, about = "Create and verify Fernet tokens")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true, env = "FERNET_CONFIG")]
    config: Option<PathBuf>,

    /// Base64URL-encoded 32-byte key
    #[arg(short, long, global = true, env = "FERNET_KEY", hide_env_values = true)]
    key: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print a new random key
    Genkey,
    /// Encrypt a message (argument or stdin) into a token
    Encode {
        /// Treat the input as JSON and carry it as a MessagePack payload
        #[arg(long)]
        msgpack: bool,
        message: Option<String>,
    },
    /// Verify a token (argument or stdin) and print its message
    Decode {
        /// Reject tokens older than this many seconds
        #[arg(long)]
        ttl: Option<u64>,
        /// Print the MessagePack payload as JSON
        #[arg(long)]
        msgpack: bool,
        token: Option<String>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => match CliConfig::load(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("failed to load config from {}: {e}", path.display());
                return ExitCode::FAILURE;
            }
        },
        None => CliConfig::default(),
    };

    match LogFormat::from_env_or(config.logging.format) {
        LogFormat::Json => logging::init_json(&config.logging.level),
        LogFormat::Text => logging::init(&config.logging.level),
    }

    match run(cli, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli, config: &CliConfig) -> Result<(), CliError> {
    let output = match cli.command {
        Command::Genkey => commands::genkey().into_bytes(),
        Command::Encode { msgpack, message } => {
            let fernet = Fernet::from_key(config.resolve_key(cli.key.as_deref())?);
            let input = match message {
                Some(message) => message.into_bytes(),
                None => read_stdin()?,
            };
            commands::encode(&fernet, &input, msgpack)?.into_bytes()
        }
        Command::Decode {
            ttl,
            msgpack,
            token,
        } => {
            let fernet = Fernet::from_key(config.resolve_key(cli.key.as_deref())?);
            let token = match token {
                Some(token) => token,
                None => String::from_utf8_lossy(&read_stdin()?).into_owned(),
            };
            let ttl = ttl.or(config.decode.ttl);
            tracing::debug!(?ttl, msgpack, "decoding token");
            commands::decode(&fernet, &token, ttl, msgpack)?
        }
    };

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(&output)?;
    stdout.flush()?;
    Ok(())
}

fn read_stdin() -> Result<Vec<u8>, CliError> {
    let mut buf = Vec::new();
    std::io::stdin().read_to_end(&mut buf)?;
    Ok(buf)
}
