use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "max-bot-echo")]
#[command(about = "Echo bot for the MAX bot API: long polling or webhook ingestion.")]
pub(crate) struct Cli {
    /// YAML settings file; MAX_BOT_* environment variables take precedence.
    #[arg(long, global = true, default_value = "max-bot.yaml")]
    pub(crate) settings: PathBuf,

    /// Debug logging unless RUST_LOG is set.
    #[arg(long, short, global = true)]
    pub(crate) verbose: bool,

    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Subcommand)]
pub(crate) enum Command {
    /// Receive updates with GET /updates long polling.
    Poll,
    /// Serve a webhook endpoint and receive pushed updates.
    Webhook {
        /// Listen address (default from settings, else 0.0.0.0:8080)
        #[arg(long)]
        bind: Option<String>,

        /// Route path (default from settings, else /max/webhook)
        #[arg(long)]
        path: Option<String>,

        /// Expected X-Max-Bot-Api-Secret header value
        #[arg(long)]
        secret: Option<String>,

        /// Public URL to register with POST /subscriptions on start and
        /// remove on exit.
        #[arg(long)]
        subscribe_url: Option<String>,
    },
}
