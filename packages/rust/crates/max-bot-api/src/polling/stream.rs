use max_bot_schemes::Update;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::{PollingOptions, run_polling_loop};
use crate::api::BotApi;

/// Handle on a running polling loop.
///
/// Updates arrive in server order. The channel closes once the loop stops,
/// whether through [`UpdateStream::cancel`], [`BotApi::shutdown`], or the
/// receiver being dropped.
#[derive(Debug)]
pub struct UpdateStream {
    receiver: mpsc::Receiver<Update>,
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl UpdateStream {
    /// Next update, or `None` once polling has stopped and the buffer is drained.
    pub async fn recv(&mut self) -> Option<Update> {
        self.receiver.recv().await
    }

    /// Stops this stream only.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Token that stops this stream when cancelled.
    #[must_use]
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Cancels and waits for the loop task to finish.
    pub async fn stop(self) {
        self.cancel.cancel();
        if let Err(error) = self.task.await {
            tracing::warn!(error = %error, "MAX polling task join error");
        }
    }

    /// Splits into receiver, cancellation token and task handle.
    #[must_use]
    pub fn into_parts(self) -> (mpsc::Receiver<Update>, CancellationToken, JoinHandle<()>) {
        (self.receiver, self.cancel, self.task)
    }
}

impl BotApi {
    /// Starts polling with the configured options.
    ///
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn start_polling(&self) -> UpdateStream {
        self.start_polling_with(self.config().polling.clone())
    }

    /// Starts polling with explicit options.
    ///
    /// The stream's token is a child of this client's token, so
    /// [`BotApi::shutdown`] stops it as well.
    #[must_use]
    pub fn start_polling_with(&self, options: PollingOptions) -> UpdateStream {
        let (tx, receiver) = mpsc::channel(options.capacity.max(1));
        let cancel = self.cancellation_token().child_token();
        let task = tokio::spawn(run_polling_loop(self.clone(), options, tx, cancel.clone()));
        UpdateStream {
            receiver,
            cancel,
            task,
        }
    }
}
