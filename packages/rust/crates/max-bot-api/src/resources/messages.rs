use max_bot_schemes::{
    CallbackAnswer, ExistingNumbers, Message, MessageList, NewMessageBody, SendMessageResult,
    SimpleQueryResult,
};
use tokio_util::sync::CancellationToken;

use super::execute_simple;
use crate::api::BotApi;
use crate::constants::{PATH_ANSWERS, PATH_MESSAGES, PATH_NOTIFY_EXISTS};
use crate::delivery::{CancelScope, OutgoingMessage, PendingSend, deliver_with_retry};
use crate::error::ClassifiedError;
use crate::transport::{ApiRequest, AuthMode};

/// Filter for `GET /messages`. Either `chat_id` or `message_ids` must be set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessagesQuery {
    pub chat_id: Option<i64>,
    pub message_ids: Vec<String>,
    /// Unix millis; newest boundary.
    pub from: Option<i64>,
    /// Unix millis; oldest boundary.
    pub to: Option<i64>,
    pub count: Option<u32>,
}

impl MessagesQuery {
    fn to_request(&self) -> ApiRequest {
        let mut request = ApiRequest::get(PATH_MESSAGES);
        if let Some(chat_id) = self.chat_id {
            request = request.query("chat_id", chat_id);
        }
        for mid in &self.message_ids {
            request = request.query("message_ids", mid);
        }
        if let Some(from) = self.from {
            request = request.query("from", from);
        }
        if let Some(to) = self.to {
            request = request.query("to", to);
        }
        if let Some(count) = self.count.filter(|count| *count > 0) {
            request = request.query("count", count);
        }
        request
    }
}

/// Reading, sending, editing and deleting messages.
#[derive(Debug, Clone, Copy)]
pub struct Messages<'a> {
    api: &'a BotApi,
}

impl<'a> Messages<'a> {
    pub(crate) fn new(api: &'a BotApi) -> Self {
        Self { api }
    }

    /// `GET /messages`.
    ///
    /// # Errors
    ///
    /// Any [`ClassifiedError`] from the call.
    pub async fn get_messages(&self, query: &MessagesQuery) -> Result<MessageList, ClassifiedError> {
        self.api.call(query.to_request(), "message list").await
    }

    /// `GET /messages/{message_id}`.
    ///
    /// # Errors
    ///
    /// Any [`ClassifiedError`] from the call.
    pub async fn get_message(&self, message_id: &str) -> Result<Message, ClassifiedError> {
        let path = format!("{PATH_MESSAGES}/{}", escape_path_segment(message_id));
        self.api.call(ApiRequest::get(path), "message").await
    }

    /// Sends a message, discarding the created message.
    ///
    /// # Errors
    ///
    /// See [`Messages::send_with_result`].
    pub async fn send(&self, message: &OutgoingMessage) -> Result<(), ClassifiedError> {
        self.send_scoped(message, None).await.map(|_| ())
    }

    /// `POST /messages`, retrying while attached media is still processing.
    ///
    /// # Errors
    ///
    /// [`ClassifiedError::AttachmentNotReady`] once the retry policy is
    /// exhausted, [`ClassifiedError::Cancelled`] on shutdown, and any other
    /// failure as returned by the first call that produced it.
    pub async fn send_with_result(
        &self,
        message: &OutgoingMessage,
    ) -> Result<Message, ClassifiedError> {
        self.send_scoped(message, None).await
    }

    /// Like [`Messages::send_with_result`], also stopping when `cancel` fires.
    ///
    /// # Errors
    ///
    /// See [`Messages::send_with_result`].
    pub async fn send_with_cancellation(
        &self,
        message: &OutgoingMessage,
        cancel: &CancellationToken,
    ) -> Result<Message, ClassifiedError> {
        self.send_scoped(message, Some(cancel)).await
    }

    /// `PUT /messages?message_id=`. A `success: false` reply is an error and
    /// goes through the same retry classification as transport errors.
    ///
    /// # Errors
    ///
    /// See [`Messages::send_with_result`].
    pub async fn edit_message(
        &self,
        message_id: &str,
        body: &NewMessageBody,
    ) -> Result<(), ClassifiedError> {
        self.edit_scoped(message_id, body, None).await
    }

    /// Like [`Messages::edit_message`], also stopping when `cancel` fires.
    ///
    /// # Errors
    ///
    /// See [`Messages::send_with_result`].
    pub async fn edit_message_with_cancellation(
        &self,
        message_id: &str,
        body: &NewMessageBody,
        cancel: &CancellationToken,
    ) -> Result<(), ClassifiedError> {
        self.edit_scoped(message_id, body, Some(cancel)).await
    }

    /// `DELETE /messages?message_id=`.
    ///
    /// # Errors
    ///
    /// Any [`ClassifiedError`]; `success: false` becomes [`ClassifiedError::Api`].
    pub async fn delete_message(
        &self,
        message_id: &str,
    ) -> Result<SimpleQueryResult, ClassifiedError> {
        execute_simple(
            self.api,
            ApiRequest::delete(PATH_MESSAGES).query("message_id", message_id),
        )
        .await
    }

    /// `POST /answers?callback_id=`.
    ///
    /// # Errors
    ///
    /// Any [`ClassifiedError`]; `success: false` becomes [`ClassifiedError::Api`].
    pub async fn answer_on_callback(
        &self,
        callback_id: &str,
        answer: &CallbackAnswer,
    ) -> Result<SimpleQueryResult, ClassifiedError> {
        let request = ApiRequest::post(PATH_ANSWERS)
            .query("callback_id", callback_id)
            .json(answer)?;
        execute_simple(self.api, request).await
    }

    /// `GET /notify/exists`: which of `phone_numbers` belong to platform
    /// users.
    ///
    /// With an `access_token` the call is made anonymously with the token in
    /// the query; without one the bot credentials are used.
    ///
    /// # Errors
    ///
    /// Any [`ClassifiedError`] from the call.
    pub async fn check_phone_numbers(
        &self,
        phone_numbers: &[String],
        access_token: Option<&str>,
    ) -> Result<Vec<String>, ClassifiedError> {
        let mut request = ApiRequest::get(PATH_NOTIFY_EXISTS);
        if let Some(token) = access_token.filter(|token| !token.is_empty()) {
            request = request.auth(AuthMode::Anonymous).query("access_token", token);
        }
        if !phone_numbers.is_empty() {
            request = request.query("phone_numbers", phone_numbers.join(","));
        }
        let existing: ExistingNumbers = self.api.call(request, "existing phone numbers").await?;
        Ok(existing.existing_phone_numbers)
    }

    async fn send_scoped(
        &self,
        message: &OutgoingMessage,
        cancel: Option<&CancellationToken>,
    ) -> Result<Message, ClassifiedError> {
        let (target_key, target_id) = message.target().query_pair();
        let request = ApiRequest::post(PATH_MESSAGES)
            .query(target_key, target_id)
            .auth(message.auth_mode())
            .json(message.body())?;

        let policy = *self.api.retry_policy();
        let pending = PendingSend::new("send message", message.target().to_string(), &policy);
        let scope = CancelScope {
            root: self.api.cancellation_token(),
            call: cancel,
        };
        let sent: SendMessageResult = deliver_with_retry(&policy, scope, pending, || {
            self.api.call(request.clone(), "sent message")
        })
        .await?;
        tracing::debug!(target = %message.target(), mid = %sent.message.body.mid, "MAX message sent");
        Ok(sent.message)
    }

    async fn edit_scoped(
        &self,
        message_id: &str,
        body: &NewMessageBody,
        cancel: Option<&CancellationToken>,
    ) -> Result<(), ClassifiedError> {
        let request = ApiRequest::put(PATH_MESSAGES)
            .query("message_id", message_id)
            .json(body)?;

        let policy = *self.api.retry_policy();
        let pending = PendingSend::new("edit message", message_id.to_string(), &policy);
        let scope = CancelScope {
            root: self.api.cancellation_token(),
            call: cancel,
        };
        deliver_with_retry(&policy, scope, pending, || {
            execute_simple(self.api, request.clone())
        })
        .await?;
        Ok(())
    }
}

fn escape_path_segment(segment: &str) -> String {
    let mut escaped = String::with_capacity(segment.len());
    for byte in segment.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'.' | b'_' | b'~') {
            escaped.push(char::from(byte));
        } else {
            escaped.push_str(&format!("%{byte:02X}"));
        }
    }
    escaped
}
