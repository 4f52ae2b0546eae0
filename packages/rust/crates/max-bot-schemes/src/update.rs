//! Update envelope and per-variant payloads.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::chat::{Chat, User};
use crate::error::DecodeError;
use crate::message::{Callback, Message};

/// Fields every update carries.
pub trait UpdateEvent {
    /// Discriminator of the concrete update.
    fn update_type(&self) -> UpdateType;

    /// Unix millis when the event happened.
    fn timestamp(&self) -> i64;
}

/// Declares the discriminator table once and derives `UpdateType`, `Update`,
/// the `UpdateEvent` impls and the per-kind decode dispatch from it.
macro_rules! update_variants {
    ($($variant:ident($payload:ident) => $wire:literal,)+) => {
        /// Wire value of the `update_type` discriminator.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum UpdateType {
            $(
                #[serde(rename = $wire)]
                $variant,
            )+
        }

        impl UpdateType {
            /// Every update kind this crate decodes.
            pub const ALL: &'static [UpdateType] = &[$(UpdateType::$variant,)+];

            #[must_use]
            pub fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $wire,)+
                }
            }

            /// Maps a wire discriminator to its kind, `None` when unknown.
            #[must_use]
            pub fn from_wire(value: &str) -> Option<Self> {
                match value {
                    $($wire => Some(Self::$variant),)+
                    _ => None,
                }
            }
        }

        /// Inbound event, tagged by `update_type` on the wire.
        ///
        /// The discriminator is not stored in the payloads; it follows from the
        /// variant and is written back on serialisation.
        #[derive(Debug, Clone, PartialEq, Serialize)]
        #[serde(tag = "update_type")]
        pub enum Update {
            $(
                #[serde(rename = $wire)]
                $variant($payload),
            )+
        }

        impl UpdateEvent for Update {
            fn update_type(&self) -> UpdateType {
                match self {
                    $(Self::$variant(_) => UpdateType::$variant,)+
                }
            }

            fn timestamp(&self) -> i64 {
                match self {
                    $(Self::$variant(inner) => inner.timestamp,)+
                }
            }
        }

        $(
            impl UpdateEvent for $payload {
                fn update_type(&self) -> UpdateType {
                    UpdateType::$variant
                }

                fn timestamp(&self) -> i64 {
                    self.timestamp
                }
            }

            impl From<$payload> for Update {
                fn from(inner: $payload) -> Self {
                    Self::$variant(inner)
                }
            }
        )+

        pub(crate) fn decode_update_as<'de, D>(
            kind: UpdateType,
            deserializer: D,
        ) -> Result<Update, D::Error>
        where
            D: Deserializer<'de>,
        {
            match kind {
                $(
                    UpdateType::$variant => {
                        $payload::deserialize(deserializer).map(Update::$variant)
                    }
                )+
            }
        }
    };
}

update_variants! {
    MessageCreated(MessageCreatedUpdate) => "message_created",
    MessageEdited(MessageEditedUpdate) => "message_edited",
    MessageRemoved(MessageRemovedUpdate) => "message_removed",
    MessageCallback(MessageCallbackUpdate) => "message_callback",
    MessageChatCreated(MessageChatCreatedUpdate) => "message_chat_created",
    BotAdded(BotAddedUpdate) => "bot_added",
    BotRemoved(BotRemovedUpdate) => "bot_removed",
    BotStarted(BotStartedUpdate) => "bot_started",
    BotStopped(BotStoppedUpdate) => "bot_stopped",
    UserAdded(UserAddedUpdate) => "user_added",
    UserRemoved(UserRemovedUpdate) => "user_removed",
    ChatTitleChanged(ChatTitleChangedUpdate) => "chat_title_changed",
    ChatMemberUpdated(ChatMemberUpdatedUpdate) => "chat_member_updated",
    DialogMuted(DialogMutedUpdate) => "dialog_muted",
    DialogUnmuted(DialogUnmutedUpdate) => "dialog_unmuted",
    DialogCleared(DialogClearedUpdate) => "dialog_cleared",
    DialogRemoved(DialogRemovedUpdate) => "dialog_removed",
}

impl fmt::Display for UpdateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UpdateType {
    type Err = DecodeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::from_wire(value.trim())
            .ok_or_else(|| DecodeError::UnknownUpdateType(value.to_string()))
    }
}

impl Update {
    /// Chat the event belongs to, when the payload names one.
    #[must_use]
    pub fn chat_id(&self) -> Option<i64> {
        match self {
            Self::MessageCreated(update) => update.message.chat_id(),
            Self::MessageEdited(update) => update.message.chat_id(),
            Self::MessageCallback(update) => update.message.as_ref().and_then(Message::chat_id),
            Self::MessageRemoved(update) => Some(update.chat_id),
            Self::MessageChatCreated(update) => Some(update.chat.chat_id),
            Self::BotAdded(update) => Some(update.chat_id),
            Self::BotRemoved(update) => Some(update.chat_id),
            Self::BotStarted(update) => Some(update.chat_id),
            Self::BotStopped(update) => Some(update.chat_id),
            Self::UserAdded(update) => Some(update.chat_id),
            Self::UserRemoved(update) => Some(update.chat_id),
            Self::ChatTitleChanged(update) => Some(update.chat_id),
            Self::ChatMemberUpdated(update) => Some(update.chat_id),
            Self::DialogMuted(update) => Some(update.chat_id),
            Self::DialogUnmuted(update) => Some(update.chat_id),
            Self::DialogCleared(update) => Some(update.chat_id),
            Self::DialogRemoved(update) => Some(update.chat_id),
        }
    }
}

impl<'de> Deserialize<'de> for Update {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        crate::decode::decode_update_value(value).map_err(serde::de::Error::custom)
    }
}

/// New message in a chat or dialog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageCreatedUpdate {
    pub timestamp: i64,
    pub message: Message,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_locale: Option<String>,
}

impl MessageCreatedUpdate {
    /// Leading slash command of the message text.
    ///
    /// The command runs up to the first `:` or whitespace, so `/start:ref`
    /// yields `/start` and a bare `/` yields `/`. Text that does not begin
    /// with `/` has no command.
    #[must_use]
    pub fn command(&self) -> Option<&str> {
        let text = self.message.body.text.as_str();
        if !text.starts_with('/') {
            return None;
        }
        let end = text
            .find(|ch: char| ch == ':' || ch.is_whitespace())
            .unwrap_or(text.len());
        Some(&text[..end])
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageEditedUpdate {
    pub timestamp: i64,
    pub message: Message,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRemovedUpdate {
    pub timestamp: i64,
    pub message_id: String,
    pub chat_id: i64,
    /// User who deleted the message.
    pub user_id: i64,
}

/// Inline keyboard button press.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageCallbackUpdate {
    pub timestamp: i64,
    pub callback: Callback,
    /// The message carrying the keyboard; absent when it has been deleted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<Message>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_locale: Option<String>,
}

/// Chat created through a `chat` button.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageChatCreatedUpdate {
    pub timestamp: i64,
    pub chat: Chat,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_payload: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotAddedUpdate {
    pub timestamp: i64,
    pub chat_id: i64,
    /// User who added the bot.
    pub user: User,
    #[serde(default)]
    pub is_channel: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotRemovedUpdate {
    pub timestamp: i64,
    pub chat_id: i64,
    /// User who removed the bot.
    pub user: User,
    #[serde(default)]
    pub is_channel: bool,
}

/// User pressed "Start" in a dialog with the bot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotStartedUpdate {
    pub timestamp: i64,
    pub chat_id: i64,
    pub user: User,
    /// Deep-link payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_locale: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotStoppedUpdate {
    pub timestamp: i64,
    pub chat_id: i64,
    pub user: User,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_locale: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAddedUpdate {
    pub timestamp: i64,
    pub chat_id: i64,
    /// User added to the chat.
    pub user: User,
    /// Absent when the user joined by link.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inviter_id: Option<i64>,
    #[serde(default)]
    pub is_channel: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRemovedUpdate {
    pub timestamp: i64,
    pub chat_id: i64,
    /// User removed from the chat.
    pub user: User,
    /// Absent when the user left on their own.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_id: Option<i64>,
    #[serde(default)]
    pub is_channel: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTitleChangedUpdate {
    pub timestamp: i64,
    pub chat_id: i64,
    pub user: User,
    pub title: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMemberUpdatedUpdate {
    pub timestamp: i64,
    pub chat_id: i64,
    pub user: User,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogMutedUpdate {
    pub timestamp: i64,
    pub chat_id: i64,
    pub user: User,
    /// Unix millis; absent when muted forever.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub muted_until: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_locale: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogUnmutedUpdate {
    pub timestamp: i64,
    pub chat_id: i64,
    pub user: User,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_locale: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogClearedUpdate {
    pub timestamp: i64,
    pub chat_id: i64,
    pub user: User,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_locale: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogRemovedUpdate {
    pub timestamp: i64,
    pub chat_id: i64,
    pub user: User,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_locale: Option<String>,
}
