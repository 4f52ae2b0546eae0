//! Per-resource operations borrowed from a [`BotApi`](crate::BotApi).

mod bots;
mod chats;
mod messages;
mod subscriptions;
mod uploads;

pub use bots::Bots;
pub use chats::Chats;
pub use messages::{Messages, MessagesQuery};
pub use subscriptions::Subscriptions;
pub use uploads::Uploads;

use max_bot_schemes::SimpleQueryResult;
use reqwest::Method;

use crate::api::BotApi;
use crate::error::{ApiError, ClassifiedError};
use crate::transport::{ApiRequest, decode_body};

/// Executes a mutating request whose reply is `{success, message}`, turning
/// `success: false` into [`ClassifiedError::Api`].
pub(crate) async fn execute_simple(
    api: &BotApi,
    request: ApiRequest,
) -> Result<SimpleQueryResult, ClassifiedError> {
    let method: Method = request.method.clone();
    let path = request.path.clone();
    let body = api.transport().execute(request).await?;
    let result: SimpleQueryResult = decode_body(&body, "simple query result")?;
    if result.success {
        return Ok(result);
    }
    Err(ApiError::rejected(method.as_str(), path, result.message, body).into())
}
