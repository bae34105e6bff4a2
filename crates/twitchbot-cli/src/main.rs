//! twitchbot - single-channel Twitch chat bot.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use twitchbot_cli::config::Config;
use twitchbot_cli::logging::{self, LogConfig, LogFormat};
use twitchbot_core::{Bot, ChatSession, FileCredentialProvider, TcpConnector};

/// twitchbot - joins one Twitch channel and stays connected until the owner sends !tbdown.
#[derive(Parser, Debug)]
#[command(name = "twitchbot")]
#[command(version)]
struct Cli {
    /// Path to config file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override channel from config
    #[arg(long)]
    channel: Option<String>,

    /// Override bot name from config
    #[arg(short, long)]
    name: Option<String>,

    /// Override credentials file from config
    #[arg(long, value_name = "FILE")]
    credentials: Option<PathBuf>,

    /// Enable verbose logging (outbound protocol lines)
    #[arg(short, long)]
    verbose: bool,

    /// Enable debug logging (excludes keep-alive traffic)
    #[arg(short, long)]
    debug: bool,

    /// Enable trace logging (everything)
    #[arg(long)]
    trace: bool,

    /// Quiet mode (WARN and ERROR only)
    #[arg(short, long)]
    quiet: bool,

    /// Set log level for specific targets (e.g., "irc=debug" or "irc::ping=trace").
    /// Can be specified multiple times. Targets are prefixed with "twitchbot::" automatically.
    #[arg(long = "log", value_name = "TARGET=LEVEL")]
    log_overrides: Vec<String>,

    /// Log output format
    #[arg(long = "log-format", value_name = "FORMAT", default_value = "text")]
    log_format: LogFormat,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_config = LogConfig::from_cli(
        cli.verbose,
        cli.debug,
        cli.trace,
        cli.quiet,
        cli.log_overrides,
        cli.log_format,
    );
    logging::init(&log_config);

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    if let Some(channel) = cli.channel {
        config.channel = channel;
    }
    if let Some(name) = cli.name {
        config.bot_name = name;
    }
    if let Some(path) = cli.credentials {
        config.credentials_path = path;
    }
    config.validate()?;

    tracing::info!(
        target: "twitchbot::startup",
        "Loaded configuration (channel: #{}, server: {}:{})",
        config.channel,
        config.host,
        config.port
    );

    let provider = FileCredentialProvider::new(&config.credentials_path);
    let session = ChatSession::new(config.session_config(), TcpConnector);
    let mut bot = Bot::new(session, config.reconnect_policy());

    tokio::select! {
        result = bot.start(&provider) => result?,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!(target: "twitchbot::startup", "Interrupted, shutting down");
        }
    }

    Ok(())
}
