use max_bot_schemes::Update;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use super::PollingOptions;
use crate::api::BotApi;

/// Polls until cancelled or until the receiver goes away.
///
/// Returning drops `tx`, which closes the channel for the consumer.
pub(crate) async fn run_polling_loop(
    api: BotApi,
    options: PollingOptions,
    tx: mpsc::Sender<Update>,
    cancel: CancellationToken,
) {
    tracing::info!(
        limit = options.limit,
        long_poll_secs = options.long_poll_timeout.as_secs(),
        types = ?options.types,
        "MAX polling started"
    );
    poll_until_stopped(&api, &options, &tx, &cancel).await;
    tracing::info!(cancelled = cancel.is_cancelled(), "MAX polling stopped");
}

async fn poll_until_stopped(
    api: &BotApi,
    options: &PollingOptions,
    tx: &mpsc::Sender<Update>,
    cancel: &CancellationToken,
) {
    let mut marker: i64 = 0;
    loop {
        let query = options.query(marker);
        let result = tokio::select! {
            biased;
            () = cancel.cancelled() => return,
            result = api.get_updates_page(&query) => result,
        };

        match result {
            Ok(page) => {
                if let Some(next) = page.marker {
                    marker = marker.max(next);
                }
                tracing::debug!(
                    received = page.updates.len(),
                    skipped = page.skipped,
                    marker,
                    "MAX updates page"
                );
                if page.updates.is_empty() && !yield_unless_cancelled(cancel).await {
                    return;
                }
                for update in page.updates {
                    let sent = tokio::select! {
                        biased;
                        () = cancel.cancelled() => return,
                        sent = tx.send(update) => sent,
                    };
                    if sent.is_err() {
                        tracing::info!("MAX update receiver dropped; stopping polling");
                        return;
                    }
                }
            }
            Err(error) if error.is_timeout() => {
                tracing::debug!(error = %error, marker, "MAX long poll timed out; polling again");
                if !yield_unless_cancelled(cancel).await {
                    return;
                }
            }
            Err(error) => {
                tracing::warn!(
                    error = %error,
                    marker,
                    pause_ms = options.pause.as_millis(),
                    "MAX poll failed; pausing before retry"
                );
                tokio::select! {
                    biased;
                    () = cancel.cancelled() => return,
                    () = tokio::time::sleep(options.pause) => {}
                }
            }
        }
    }
}

/// Gives other tasks a turn before an immediate re-poll. A transport that
/// answers instantly would otherwise keep this task on the worker forever.
/// Returns `false` once `cancel` has fired.
async fn yield_unless_cancelled(cancel: &CancellationToken) -> bool {
    tokio::task::yield_now().await;
    !cancel.is_cancelled()
}
