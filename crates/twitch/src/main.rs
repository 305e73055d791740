// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::error;

use relics_twitch::{Twitch, TwitchConfig};

/// Diagnostic client for the relics Twitch integration.
#[derive(Parser)]
#[command(name = "relics-twitch", version, about)]
struct Cli {
    #[command(flatten)]
    config: TwitchConfig,

    /// Log format (json or text).
    #[arg(long, env = "RELICS_LOG_FORMAT", default_value = "text")]
    log_format: String,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, env = "RELICS_LOG_LEVEL", default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Look up a user by login.
    User { login: String },
    /// Check a streamer's chat secret and resolve their account.
    Verify {
        login: String,
        #[arg(long, env = "TWITCH_STREAMER_SECRET", hide_env_values = true)]
        secret: String,
    },
    /// Broadcast a message to a channel's extension viewers.
    Publish { broadcaster_id: String, message: String },
    /// Resolve a user access token to its account.
    Validate { token: String },
    /// Exchange an authorization code for a token pair.
    Exchange { code: String },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = cli.config.validate() {
        eprintln!("error: {e}");
        std::process::exit(2);
    }

    init_tracing(&cli.log_format, &cli.log_level);

    if let Err(e) = run(cli.config, cli.command).await {
        error!("fatal: {e:#}");
        std::process::exit(1);
    }
}

fn init_tracing(format: &str, level: &str) {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));

    match format {
        "json" => {
            fmt::fmt().with_env_filter(filter).with_writer(std::io::stderr).json().init();
        }
        _ => {
            fmt::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
        }
    }
}

async fn run(config: TwitchConfig, command: Command) -> anyhow::Result<()> {
    let twitch = Twitch::connect(config).await.context("twitch client setup")?;

    let output = match command {
        Command::User { login } => serde_json::to_value(twitch.get_user(&login).await?)?,
        Command::Verify { login, secret } => {
            let user = twitch.authenticate_streamer(&login, &secret).await?;
            serde_json::to_value(user)?
        }
        Command::Publish { broadcaster_id, message } => {
            twitch.publish(&broadcaster_id, &message).await?;
            serde_json::json!({ "published": true, "broadcaster_id": broadcaster_id })
        }
        Command::Validate { token } => serde_json::to_value(twitch.validate_token(&token).await?)?,
        Command::Exchange { code } => serde_json::to_value(twitch.exchange_code(&code).await?)?,
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
