//! Push ingestion: an `axum` router that accepts webhook deliveries and feeds
//! decoded updates into the same channel type polling uses.

mod app;
mod handler;
mod server;
mod state;

pub use app::{WebhookApp, WebhookConfig, build_webhook_app};
pub use server::run_webhook_server;
