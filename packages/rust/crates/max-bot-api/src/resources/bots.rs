use max_bot_schemes::BotInfo;

use crate::api::BotApi;
use crate::constants::PATH_ME;
use crate::error::ClassifiedError;
use crate::transport::ApiRequest;

/// Information about the bot itself.
#[derive(Debug, Clone, Copy)]
pub struct Bots<'a> {
    api: &'a BotApi,
}

impl<'a> Bots<'a> {
    pub(crate) fn new(api: &'a BotApi) -> Self {
        Self { api }
    }

    /// `GET /me`.
    ///
    /// # Errors
    ///
    /// Any [`ClassifiedError`] from the call.
    pub async fn get_bot(&self) -> Result<BotInfo, ClassifiedError> {
        self.api.call(ApiRequest::get(PATH_ME), "bot info").await
    }
}
