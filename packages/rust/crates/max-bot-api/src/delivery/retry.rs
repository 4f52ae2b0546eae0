use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::constants::{SEND_MAX_RETRIES, SEND_RETRY_INITIAL_MS, SEND_RETRY_MAX_MS};
use crate::error::ClassifiedError;

/// Backoff for sends that hit the attachment-not-ready race.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub initial_delay: Duration,
    pub max_delay: Duration,
    /// Retries after the first attempt; total calls are `max_retries + 1`.
    pub max_retries: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_millis(SEND_RETRY_INITIAL_MS),
            max_delay: Duration::from_millis(SEND_RETRY_MAX_MS),
            max_retries: SEND_MAX_RETRIES,
        }
    }
}

impl RetryPolicy {
    /// Wait after `current`: doubled, capped at the max.
    #[must_use]
    pub fn next_delay(&self, current: Duration) -> Duration {
        current.saturating_mul(2).min(self.max_delay)
    }
}

/// Root client token plus an optional per-call token; either one cancels.
#[derive(Clone, Copy)]
pub(crate) struct CancelScope<'a> {
    pub(crate) root: &'a CancellationToken,
    pub(crate) call: Option<&'a CancellationToken>,
}

impl CancelScope<'_> {
    async fn cancelled(&self) {
        match self.call {
            Some(call) => tokio::select! {
                () = self.root.cancelled() => {}
                () = call.cancelled() => {}
            },
            None => self.root.cancelled().await,
        }
    }
}

/// In-flight state of one logical send or edit.
#[derive(Debug)]
pub(crate) struct PendingSend {
    operation: &'static str,
    target: String,
    attempt: u32,
    delay: Duration,
}

impl PendingSend {
    pub(crate) fn new(operation: &'static str, target: String, policy: &RetryPolicy) -> Self {
        Self {
            operation,
            target,
            attempt: 0,
            delay: policy.initial_delay,
        }
    }
}

/// Runs `call` until it succeeds, fails with something other than
/// attachment-not-ready, exhausts the policy, or is cancelled.
pub(crate) async fn deliver_with_retry<T, F, Fut>(
    policy: &RetryPolicy,
    cancel: CancelScope<'_>,
    mut pending: PendingSend,
    mut call: F,
) -> Result<T, ClassifiedError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ClassifiedError>>,
{
    loop {
        let outcome = tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(ClassifiedError::cancelled(pending.operation)),
            outcome = call() => outcome,
        };

        let error = match outcome {
            Ok(value) => return Ok(value),
            Err(error) if error.is_attachment_not_ready() => error,
            Err(error) => return Err(error),
        };

        if pending.attempt >= policy.max_retries {
            tracing::warn!(
                operation = pending.operation,
                target = %pending.target,
                attempts = pending.attempt + 1,
                error = %error,
                "MAX attachment still not ready; giving up"
            );
            return Err(ClassifiedError::AttachmentNotReady {
                attempts: pending.attempt + 1,
                source: Box::new(error),
            });
        }

        tracing::warn!(
            attempt = pending.attempt,
            max_retries = policy.max_retries,
            delay_ms = pending.delay.as_millis(),
            operation = pending.operation,
            target = %pending.target,
            error = %error,
            "MAX attachment not ready; retrying"
        );
        tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(ClassifiedError::cancelled(pending.operation)),
            () = tokio::time::sleep(pending.delay) => {}
        }
        pending.delay = policy.next_delay(pending.delay);
        pending.attempt += 1;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;
    use crate::error::ApiError;

    fn not_ready() -> ClassifiedError {
        ClassifiedError::Api(ApiError::from_response(
            "POST",
            "messages",
            400,
            "Bad Request",
            r#"{"code":"attachment.not.ready","message":"not ready"}"#.to_string(),
        ))
    }

    #[test]
    fn delays_double_then_cap() {
        let policy = RetryPolicy::default();
        let delays: Vec<u128> =
            std::iter::successors(Some(policy.initial_delay), |delay| {
                Some(policy.next_delay(*delay))
            })
            .take(7)
            .map(|delay| delay.as_millis())
            .collect();
        assert_eq!(delays, vec![300, 600, 1200, 2400, 3000, 3000, 3000]);
    }

    #[tokio::test(start_paused = true)]
    async fn exhausts_after_max_retries() {
        let policy = RetryPolicy::default();
        let root = CancellationToken::new();
        let calls = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&calls);

        let result: Result<(), _> = deliver_with_retry(
            &policy,
            CancelScope {
                root: &root,
                call: None,
            },
            PendingSend::new("send", "chat 1".to_string(), &policy),
            || {
                counter.fetch_add(1, Ordering::SeqCst);
                async { Err(not_ready()) }
            },
        )
        .await;

        assert_eq!(calls.load(Ordering::SeqCst), policy.max_retries + 1);
        match result {
            Err(ClassifiedError::AttachmentNotReady { attempts, .. }) => assert_eq!(attempts, 6),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn call_token_cancels_backoff() {
        let policy = RetryPolicy::default();
        let root = CancellationToken::new();
        let call_token = CancellationToken::new();
        let calls = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&calls);

        let trigger = call_token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            trigger.cancel();
        });

        let started = tokio::time::Instant::now();
        let result: Result<(), _> = deliver_with_retry(
            &policy,
            CancelScope {
                root: &root,
                call: Some(&call_token),
            },
            PendingSend::new("edit", "mid.1".to_string(), &policy),
            || {
                counter.fetch_add(1, Ordering::SeqCst);
                async { Err(not_ready()) }
            },
        )
        .await;

        assert!(matches!(result, Err(ClassifiedError::Cancelled { .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(started.elapsed() < policy.initial_delay);
    }

    #[tokio::test]
    async fn call_token_cancelled_before_first_call() {
        let policy = RetryPolicy::default();
        let root = CancellationToken::new();
        let call_token = CancellationToken::new();
        call_token.cancel();

        let result: Result<(), _> = deliver_with_retry(
            &policy,
            CancelScope {
                root: &root,
                call: Some(&call_token),
            },
            PendingSend::new("send", "chat 1".to_string(), &policy),
            || async { Err(not_ready()) },
        )
        .await;

        assert!(matches!(result, Err(ClassifiedError::Cancelled { .. })));
    }
}
