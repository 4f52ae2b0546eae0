use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use max_bot_schemes::{UpdateEvent, decode_update};

use super::state::WebhookState;

/// Why a delivery was refused. Anything else is acknowledged with 200.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum WebhookRejection {
    SecretMismatch,
    QueueClosed,
}

impl IntoResponse for WebhookRejection {
    fn into_response(self) -> Response {
        match self {
            Self::SecretMismatch => {
                (StatusCode::UNAUTHORIZED, "invalid MAX webhook secret").into_response()
            }
            Self::QueueClosed => {
                (StatusCode::SERVICE_UNAVAILABLE, "update queue unavailable").into_response()
            }
        }
    }
}

pub(super) async fn webhook_handler(
    State(state): State<WebhookState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<StatusCode, WebhookRejection> {
    if !state.is_authorized(&headers) {
        tracing::warn!(size = body.len(), "MAX webhook delivery with a wrong secret");
        return Err(WebhookRejection::SecretMismatch);
    }

    let update = match decode_update(&body) {
        Ok(update) => update,
        Err(error) => {
            // Acknowledged so the platform does not redeliver it forever.
            tracing::warn!(
                error = %error,
                size = body.len(),
                "Undecodable MAX webhook payload; acknowledging without forwarding"
            );
            return Ok(StatusCode::OK);
        }
    };

    tracing::debug!(
        update_type = %update.update_type(),
        timestamp = update.timestamp(),
        chat_id = ?update.chat_id(),
        "Webhook received MAX update"
    );
    state.tx.send(update).await.map_err(|_| {
        tracing::error!("MAX update queue unavailable");
        WebhookRejection::QueueClosed
    })?;
    Ok(StatusCode::OK)
}
