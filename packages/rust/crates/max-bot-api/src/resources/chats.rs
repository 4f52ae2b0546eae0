use max_bot_schemes::{Chat, ChatList};

use crate::api::BotApi;
use crate::constants::PATH_CHATS;
use crate::error::ClassifiedError;
use crate::transport::ApiRequest;

/// Chats the bot participates in.
#[derive(Debug, Clone, Copy)]
pub struct Chats<'a> {
    api: &'a BotApi,
}

impl<'a> Chats<'a> {
    pub(crate) fn new(api: &'a BotApi) -> Self {
        Self { api }
    }

    /// `GET /chats`, one page. Pass the returned marker to fetch the next.
    ///
    /// # Errors
    ///
    /// Any [`ClassifiedError`] from the call.
    pub async fn get_chats(
        &self,
        count: Option<u32>,
        marker: Option<i64>,
    ) -> Result<ChatList, ClassifiedError> {
        let mut request = ApiRequest::get(PATH_CHATS);
        if let Some(count) = count.filter(|count| *count > 0) {
            request = request.query("count", count);
        }
        if let Some(marker) = marker {
            request = request.query("marker", marker);
        }
        self.api.call(request, "chat list").await
    }

    /// `GET /chats/{chat_id}`.
    ///
    /// # Errors
    ///
    /// Any [`ClassifiedError`] from the call.
    pub async fn get_chat(&self, chat_id: i64) -> Result<Chat, ClassifiedError> {
        self.api
            .call(ApiRequest::get(format!("{PATH_CHATS}/{chat_id}")), "chat")
            .await
    }
}
