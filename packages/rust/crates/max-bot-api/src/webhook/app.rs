use axum::{Router, routing::post};
use max_bot_schemes::Update;
use tokio::sync::mpsc;

use super::handler::webhook_handler;
use super::state::WebhookState;
use crate::constants::DEFAULT_WEBHOOK_PATH;

/// Route and shared secret of the webhook endpoint.
#[derive(Debug, Clone, Default)]
pub struct WebhookConfig {
    /// Empty means `/max/webhook`; a missing leading slash is added.
    pub path: String,
    /// Expected value of the `X-Max-Bot-Api-Secret` header. `None` or empty
    /// disables the check.
    pub secret: Option<String>,
}

impl WebhookConfig {
    /// Path the router is mounted on.
    #[must_use]
    pub fn route_path(&self) -> String {
        match self.path.trim() {
            "" => DEFAULT_WEBHOOK_PATH.to_string(),
            path if path.starts_with('/') => path.to_string(),
            path => format!("/{path}"),
        }
    }
}

/// Built webhook components for handler testing and runtime wiring.
pub struct WebhookApp {
    /// Axum router serving the webhook endpoint.
    pub app: Router,
    /// Route path, as returned by [`WebhookConfig::route_path`].
    pub path: String,
}

/// Builds the router that decodes deliveries and pushes them into `tx`.
#[must_use]
pub fn build_webhook_app(config: WebhookConfig, tx: mpsc::Sender<Update>) -> WebhookApp {
    let path = config.route_path();
    let app = Router::new()
        .route(&path, post(webhook_handler))
        .with_state(WebhookState::new(tx, config.secret));
    WebhookApp { app, path }
}

#[cfg(test)]
mod tests {
    use super::WebhookConfig;

    fn route_for(path: &str) -> String {
        WebhookConfig {
            path: path.to_string(),
            secret: None,
        }
        .route_path()
    }

    #[test]
    fn route_path_defaults_and_gains_a_leading_slash() {
        assert_eq!(route_for(""), "/max/webhook");
        assert_eq!(route_for("  "), "/max/webhook");
        assert_eq!(route_for("hooks/max"), "/hooks/max");
        assert_eq!(route_for("/hooks/max "), "/hooks/max");
    }
}
