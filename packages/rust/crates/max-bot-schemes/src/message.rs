//! Messages, outgoing message bodies and callbacks.

use serde::{Deserialize, Serialize};

use crate::attachment::{Attachment, AttachmentRequest};
use crate::chat::{Recipient, User};

/// Message as delivered in updates and returned by the messages endpoints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Absent for channel posts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<User>,
    #[serde(default)]
    pub recipient: Recipient,
    /// Unix millis.
    #[serde(default)]
    pub timestamp: i64,
    /// Forwarded or replied-to message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<LinkedMessage>,
    #[serde(default)]
    pub body: MessageBody,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stat: Option<MessageStat>,
    /// Public link, only for channel posts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Message {
    /// Chat the message was delivered to, if it was a group or channel.
    #[must_use]
    pub fn chat_id(&self) -> Option<i64> {
        self.recipient.chat_id
    }

    /// Identifier of the sending user, if any.
    #[must_use]
    pub fn sender_id(&self) -> Option<i64> {
        self.sender.as_ref().map(|user| user.user_id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageBody {
    /// Message id (`mid`), used for edits, deletes and replies.
    #[serde(default)]
    pub mid: String,
    #[serde(default)]
    pub seq: i64,
    #[serde(default)]
    pub text: String,
    /// Decoded through the attachment envelope decoder.
    #[serde(default, deserialize_with = "nullable_vec")]
    pub attachments: Vec<Attachment>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageLinkType {
    Forward,
    Reply,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkedMessage {
    #[serde(rename = "type")]
    pub link_type: MessageLinkType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<User>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chat_id: Option<i64>,
    pub message: MessageBody,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageStat {
    #[serde(default)]
    pub views: i64,
}

/// Page of `GET /messages`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageList {
    #[serde(default)]
    pub messages: Vec<Message>,
}

/// Response of `POST /messages`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendMessageResult {
    pub message: Message,
}

/// Button press on an inline keyboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Callback {
    #[serde(default)]
    pub timestamp: i64,
    pub callback_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<String>,
    pub user: User,
}

/// Text markup dialect for outgoing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextFormat {
    Markdown,
    Html,
}

/// Reference to an existing message for replies and forwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMessageLink {
    #[serde(rename = "type")]
    pub link_type: MessageLinkType,
    pub mid: String,
}

/// Body of `POST /messages` and `PUT /messages`.
///
/// `attachments: None` leaves the attachments of an edited message untouched,
/// while `Some(vec![])` removes them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewMessageBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachments: Option<Vec<AttachmentRequest>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<NewMessageLink>,
    /// Server default is `true`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notify: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<TextFormat>,
}

impl NewMessageBody {
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    /// Appends one attachment request.
    pub fn push_attachment(&mut self, attachment: AttachmentRequest) {
        self.attachments.get_or_insert_with(Vec::new).push(attachment);
    }
}

/// Body of `POST /answers`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CallbackAnswer {
    /// Replaces the message the keyboard was attached to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<NewMessageBody>,
    /// One-off toast shown to the user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notification: Option<String>,
}

fn nullable_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_attachments_decode_as_empty() {
        let body: MessageBody =
            serde_json::from_str(r#"{"mid":"m1","seq":3,"text":"hi","attachments":null}"#)
                .expect("body with null attachments");
        assert!(body.attachments.is_empty());
        assert_eq!(body.mid, "m1");
    }

    #[test]
    fn new_message_body_omits_unset_fields() {
        let body = NewMessageBody::text("hello");
        let value = serde_json::to_value(&body).expect("encode body");
        assert_eq!(value, serde_json::json!({"text": "hello"}));
    }
}
