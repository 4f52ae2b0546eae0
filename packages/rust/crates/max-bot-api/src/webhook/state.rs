use axum::http::HeaderMap;
use max_bot_schemes::Update;
use tokio::sync::mpsc;

use crate::constants::WEBHOOK_SECRET_HEADER;

#[derive(Clone)]
pub(super) struct WebhookState {
    pub(super) tx: mpsc::Sender<Update>,
    /// Never empty; an empty configured secret is stored as `None`.
    secret: Option<String>,
}

impl WebhookState {
    pub(super) fn new(tx: mpsc::Sender<Update>, secret: Option<String>) -> Self {
        Self {
            tx,
            secret: secret.filter(|secret| !secret.is_empty()),
        }
    }

    /// Whether the delivery carries the subscription secret. Always true when
    /// the subscription was created without one.
    pub(super) fn is_authorized(&self, headers: &HeaderMap) -> bool {
        let Some(expected) = self.secret.as_deref() else {
            return true;
        };
        headers
            .get(WEBHOOK_SECRET_HEADER)
            .is_some_and(|provided| provided.as_bytes() == expected.as_bytes())
    }
}
