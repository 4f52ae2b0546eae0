use std::time::Duration;

use max_bot_schemes::{Update, UpdateList, UpdateType, decode_update};

use crate::api::BotApi;
use crate::constants::{
    DEFAULT_POLL_LIMIT, DEFAULT_POLL_TIMEOUT_SECS, MAX_POLL_LIMIT, MIN_POLL_LIMIT, PATH_UPDATES,
    POLL_TIMEOUT_GRACE_SECS,
};
use crate::error::ClassifiedError;
use crate::transport::{ApiRequest, decode_body};

/// Parameters of one `GET /updates` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdatesQuery {
    /// 0 means "from the oldest unread update" and is not sent.
    pub marker: i64,
    pub limit: u32,
    /// Long-poll window.
    pub timeout: Duration,
    pub types: Vec<UpdateType>,
}

impl Default for UpdatesQuery {
    fn default() -> Self {
        Self {
            marker: 0,
            limit: DEFAULT_POLL_LIMIT,
            timeout: Duration::from_secs(DEFAULT_POLL_TIMEOUT_SECS),
            types: Vec::new(),
        }
    }
}

impl UpdatesQuery {
    /// The HTTP request for this query.
    ///
    /// The request timeout is the long-poll window plus a grace period so
    /// that an empty long poll completes normally instead of timing out.
    #[must_use]
    pub fn to_request(&self) -> ApiRequest {
        let mut request = ApiRequest::get(PATH_UPDATES)
            .query("limit", self.limit.clamp(MIN_POLL_LIMIT, MAX_POLL_LIMIT))
            .query("timeout", self.timeout.as_secs())
            .timeout(self.timeout + Duration::from_secs(POLL_TIMEOUT_GRACE_SECS));
        if self.marker != 0 {
            request = request.query("marker", self.marker);
        }
        if !self.types.is_empty() {
            let types = self
                .types
                .iter()
                .map(|kind| kind.as_str())
                .collect::<Vec<_>>()
                .join(",");
            request = request.query("types", types);
        }
        request
    }
}

/// Decoded long-poll page.
#[derive(Debug, Clone, Default)]
pub struct UpdatesPage {
    /// Updates in server order; undecodable entries are left out.
    pub updates: Vec<Update>,
    pub marker: Option<i64>,
    /// Number of raw updates that failed to decode.
    pub skipped: usize,
}

impl BotApi {
    /// Fetches one page of updates.
    ///
    /// # Errors
    ///
    /// Any [`ClassifiedError`] from the transport, or
    /// [`ClassifiedError::Serialization`] when the page envelope is invalid.
    /// Individual updates that fail to decode are logged and skipped.
    pub async fn get_updates_page(
        &self,
        query: &UpdatesQuery,
    ) -> Result<UpdatesPage, ClassifiedError> {
        let body = self.transport().execute(query.to_request()).await?;
        let list: UpdateList = decode_body(&body, "updates page")?;

        let mut page = UpdatesPage {
            updates: Vec::with_capacity(list.updates.len()),
            marker: list.marker,
            skipped: 0,
        };
        for raw in &list.updates {
            match decode_update(raw.get().as_bytes()) {
                Ok(update) => page.updates.push(update),
                Err(error) => {
                    page.skipped += 1;
                    tracing::warn!(
                        error = %error,
                        raw_preview = %raw.get().chars().take(200).collect::<String>(),
                        "skipping undecodable MAX update"
                    );
                }
            }
        }
        Ok(page)
    }
}
