//! Outgoing messages and the attachment-not-ready retry engine.

mod outgoing;
mod retry;

pub use outgoing::{MessageTarget, OutgoingMessage};
pub(crate) use retry::{CancelScope, PendingSend, deliver_with_retry};
pub use retry::RetryPolicy;
