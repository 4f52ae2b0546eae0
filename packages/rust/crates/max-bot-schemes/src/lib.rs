//! max-bot-schemes - Wire types for the MAX bot API
//!
//! Typed shapes for everything the bot API sends and receives, plus the
//! envelope decoder that turns a raw JSON update or attachment into the
//! concrete variant named by its discriminator field.
//!
//! # Architecture
//!
//! ```text
//! max-bot-schemes/src/
//! ├── lib.rs          # Re-exports (this file)
//! ├── error.rs        # DecodeError
//! ├── decode.rs       # Two-phase discriminator decoding
//! ├── update.rs       # Update enum + per-variant payloads
//! ├── attachment.rs   # Incoming attachments, outgoing attachment requests, keyboards
//! ├── message.rs      # Message, NewMessageBody, callbacks
//! ├── chat.rs         # User, BotInfo, Chat
//! ├── result.rs       # SimpleQueryResult, error bodies, raw update pages
//! ├── subscription.rs # Webhook subscriptions
//! └── upload.rs       # Upload endpoint and token shapes
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use max_bot_schemes::{Update, UpdateEvent, decode_update};
//!
//! let update = decode_update(br#"{"update_type":"bot_started","timestamp":1,"chat_id":7,"user":{"user_id":1}}"#)?;
//! assert_eq!(update.update_type().as_str(), "bot_started");
//! ```

#![allow(missing_docs)]

mod attachment;
mod chat;
mod decode;
mod error;
mod message;
mod result;
mod subscription;
mod update;
mod upload;

pub use attachment::{
    Attachment, AttachmentRequest, AudioAttachment, Button, ContactAttachment,
    ContactAttachmentRequestPayload, ContactPayload, FileAttachment, FileAttachmentPayload,
    InlineKeyboardAttachment, Intent, Keyboard, LocationAttachment, MediaPayload,
    PhotoAttachment, PhotoAttachmentPayload, PhotoAttachmentRequestPayload, ShareAttachment,
    ShareAttachmentPayload, StickerAttachment, StickerAttachmentRequestPayload, StickerPayload,
    UnknownAttachment, VideoAttachment, VideoThumbnail,
};
pub use chat::{BotCommand, BotInfo, Chat, ChatIcon, ChatList, ChatType, Recipient, User};
pub use decode::{decode_attachment, decode_attachment_value, decode_update, decode_update_value};
pub use error::DecodeError;
pub use message::{
    Callback, CallbackAnswer, LinkedMessage, Message, MessageBody, MessageLinkType, MessageList,
    MessageStat, NewMessageBody, NewMessageLink, SendMessageResult, TextFormat,
};
pub use result::{ErrorBody, ExistingNumbers, SimpleQueryResult, UpdateList};
pub use subscription::{Subscription, SubscriptionList, SubscriptionRequestBody};
pub use update::{
    BotAddedUpdate, BotRemovedUpdate, BotStartedUpdate, BotStoppedUpdate,
    ChatMemberUpdatedUpdate, ChatTitleChangedUpdate, DialogClearedUpdate, DialogMutedUpdate,
    DialogRemovedUpdate, DialogUnmutedUpdate, MessageCallbackUpdate, MessageChatCreatedUpdate,
    MessageCreatedUpdate, MessageEditedUpdate, MessageRemovedUpdate, Update, UpdateEvent,
    UpdateType, UserAddedUpdate, UserRemovedUpdate,
};
pub use upload::{PhotoToken, PhotoTokens, UploadEndpoint, UploadType, UploadedInfo};
