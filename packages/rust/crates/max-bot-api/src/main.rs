//! max-bot-echo: echo bot over long polling or a webhook.
//!
//! Token and tuning come from `MAX_BOT_*` environment variables over the
//! `--settings` YAML file.
//!
//! Logging: set `RUST_LOG=max_bot_api=debug` (or `info`, `warn`) to see client logs on stderr.

mod cli;
mod echo;

use anyhow::Context;
use clap::Parser;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use max_bot_api::schemes::Update;
use max_bot_api::{
    BotApi, BotSettings, ClientConfig, WebhookConfig, build_webhook_app, run_webhook_server,
};

use crate::cli::{Cli, Command};

const DEFAULT_WEBHOOK_BIND: &str = "0.0.0.0:8080";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // RUST_LOG overrides; --verbose => debug; else info
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if cli.verbose {
            "max_bot_api=debug,max_bot_echo=debug"
        } else {
            "max_bot_api=info,max_bot_echo=info"
        })
    });
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let settings = BotSettings::load(&cli.settings);
    let config = ClientConfig::from_env_with_settings(&settings)
        .context("invalid MAX bot configuration")?;
    let api = BotApi::new(config).context("failed to build MAX bot client")?;

    let me = api.bots().get_bot().await.context("GET /me failed")?;
    tracing::info!(
        bot_id = me.user.user_id,
        name = %me.user.display_name(),
        "MAX bot authenticated"
    );

    let signal_api = api.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            signal_api.shutdown();
        }
    });

    match cli.command {
        Command::Poll => run_polling_mode(&api).await,
        Command::Webhook {
            bind,
            path,
            secret,
            subscribe_url,
        } => {
            let bind = bind
                .or_else(|| settings.webhook.bind.clone())
                .unwrap_or_else(|| DEFAULT_WEBHOOK_BIND.to_string());
            let webhook = WebhookConfig {
                path: path
                    .or_else(|| settings.webhook.path.clone())
                    .unwrap_or_default(),
                secret: secret.or_else(|| settings.webhook.secret.clone()),
            };
            run_webhook_mode(&api, &bind, webhook, subscribe_url.as_deref()).await
        }
    }
}

async fn run_polling_mode(api: &BotApi) -> anyhow::Result<()> {
    let mut updates = api.start_polling();
    while let Some(update) = updates.recv().await {
        dispatch(api, update);
    }
    updates.stop().await;
    Ok(())
}

async fn run_webhook_mode(
    api: &BotApi,
    bind: &str,
    webhook: WebhookConfig,
    subscribe_url: Option<&str>,
) -> anyhow::Result<()> {
    let (tx, mut rx) = mpsc::channel::<Update>(api.config().polling.capacity.max(1));
    let secret = webhook.secret.clone();
    let app = build_webhook_app(webhook, tx);
    tracing::info!(path = %app.path, "MAX webhook route ready");

    let cancel = api.cancellation_token().clone();
    let mut server = tokio::spawn({
        let bind = bind.to_string();
        let cancel = cancel.clone();
        async move { run_webhook_server(&bind, app.app, cancel).await }
    });

    if let Some(url) = subscribe_url {
        api.subscriptions()
            .subscribe(url, &api.config().polling.types, secret.as_deref())
            .await
            .context("POST /subscriptions failed")?;
    }

    let finished = loop {
        tokio::select! {
            () = cancel.cancelled() => break None,
            joined = &mut server => break Some(joined),
            update = rx.recv() => match update {
                Some(update) => dispatch(api, update),
                None => break None,
            },
        }
    };

    if let Some(url) = subscribe_url
        && let Err(error) = api.subscriptions().unsubscribe(url).await
    {
        tracing::warn!(url, error = %error, "failed to remove MAX webhook subscription");
    }
    let joined = match finished {
        Some(joined) => joined,
        None => server.await,
    };
    joined
        .context("webhook server task panicked")?
        .context("webhook server failed")?;
    Ok(())
}

fn dispatch(api: &BotApi, update: Update) {
    let api = api.clone();
    tokio::spawn(async move {
        if let Err(error) = echo::handle_update(&api, update).await {
            tracing::warn!(error = %error, "failed to handle MAX update");
        }
    });
}
