//! Incoming attachments, outgoing attachment requests and inline keyboards.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::chat::User;
use crate::upload::{PhotoToken, PhotoTokens, UploadType, UploadedInfo};

/// Attachment of an incoming message, discriminated by its `type` field.
///
/// Discriminators this crate does not know decode to [`Attachment::Unknown`]
/// so that newer server payloads never break message decoding.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Attachment {
    Image(PhotoAttachment),
    Video(VideoAttachment),
    Audio(AudioAttachment),
    File(FileAttachment),
    Sticker(StickerAttachment),
    Contact(ContactAttachment),
    Share(ShareAttachment),
    Location(LocationAttachment),
    InlineKeyboard(InlineKeyboardAttachment),
    #[serde(untagged)]
    Unknown(UnknownAttachment),
}

impl Attachment {
    /// Wire discriminator of this attachment.
    #[must_use]
    pub fn kind(&self) -> &str {
        match self {
            Self::Image(_) => "image",
            Self::Video(_) => "video",
            Self::Audio(_) => "audio",
            Self::File(_) => "file",
            Self::Sticker(_) => "sticker",
            Self::Contact(_) => "contact",
            Self::Share(_) => "share",
            Self::Location(_) => "location",
            Self::InlineKeyboard(_) => "inline_keyboard",
            Self::Unknown(unknown) => &unknown.kind,
        }
    }
}

impl<'de> Deserialize<'de> for Attachment {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        crate::decode::decode_attachment_value(value).map_err(serde::de::Error::custom)
    }
}

/// Missing and `null` payloads both decode to the empty payload.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Base shape kept for attachment types this crate cannot decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnknownAttachment {
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoAttachmentPayload {
    #[serde(default)]
    pub photo_id: i64,
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoAttachment {
    #[serde(default, deserialize_with = "null_as_default")]
    pub payload: PhotoAttachmentPayload,
}

/// Payload shared by video and audio attachments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaPayload {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoThumbnail {
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoAttachment {
    #[serde(default, deserialize_with = "null_as_default")]
    pub payload: MediaPayload,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<VideoThumbnail>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<i64>,
    /// Seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioAttachment {
    #[serde(default, deserialize_with = "null_as_default")]
    pub payload: MediaPayload,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcription: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileAttachmentPayload {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub token: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileAttachment {
    #[serde(default, deserialize_with = "null_as_default")]
    pub payload: FileAttachmentPayload,
    #[serde(default)]
    pub filename: String,
    /// Bytes.
    #[serde(default)]
    pub size: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StickerPayload {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub code: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StickerAttachment {
    #[serde(default, deserialize_with = "null_as_default")]
    pub payload: StickerPayload,
    #[serde(default)]
    pub width: i64,
    #[serde(default)]
    pub height: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vcf_info: Option<String>,
    /// Set when the contact is a platform user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_info: Option<User>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactAttachment {
    #[serde(default, deserialize_with = "null_as_default")]
    pub payload: ContactPayload,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareAttachmentPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareAttachment {
    #[serde(default, deserialize_with = "null_as_default")]
    pub payload: ShareAttachmentPayload,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationAttachment {
    #[serde(default)]
    pub latitude: f64,
    #[serde(default)]
    pub longitude: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineKeyboardAttachment {
    #[serde(default, deserialize_with = "null_as_default")]
    pub payload: Keyboard,
}

/// Rows of inline keyboard buttons.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keyboard {
    #[serde(default)]
    pub buttons: Vec<Vec<Button>>,
}

/// Visual hint for a button.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Positive,
    Negative,
    #[default]
    #[serde(other)]
    Default,
}

/// Inline keyboard button.
///
/// Kept as one flat struct keyed by `type` so that button kinds added on the
/// server side still round-trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Button {
    /// `callback`, `link`, `request_contact`, `request_geo_location`, `message`...
    #[serde(rename = "type")]
    pub kind: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent: Option<Intent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quick: Option<bool>,
}

impl Button {
    fn new(kind: &str, text: impl Into<String>) -> Self {
        Self {
            kind: kind.to_string(),
            text: text.into(),
            payload: None,
            url: None,
            intent: None,
            quick: None,
        }
    }

    /// Button that produces a `message_callback` update carrying `payload`.
    #[must_use]
    pub fn callback(text: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            payload: Some(payload.into()),
            ..Self::new("callback", text)
        }
    }

    #[must_use]
    pub fn link(text: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Self::new("link", text)
        }
    }

    #[must_use]
    pub fn request_contact(text: impl Into<String>) -> Self {
        Self::new("request_contact", text)
    }

    #[must_use]
    pub fn request_geo_location(text: impl Into<String>) -> Self {
        Self::new("request_geo_location", text)
    }

    /// Button that sends its own text as a message from the user.
    #[must_use]
    pub fn message(text: impl Into<String>) -> Self {
        Self::new("message", text)
    }

    #[must_use]
    pub fn with_intent(mut self, intent: Intent) -> Self {
        self.intent = Some(intent);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoAttachmentRequestPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photos: Option<BTreeMap<String, PhotoToken>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StickerAttachmentRequestPayload {
    pub code: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactAttachmentRequestPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vcf_info: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vcf_phone: Option<String>,
}

/// Attachment of an outgoing message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AttachmentRequest {
    Image {
        payload: PhotoAttachmentRequestPayload,
    },
    Video {
        payload: UploadedInfo,
    },
    Audio {
        payload: UploadedInfo,
    },
    File {
        payload: UploadedInfo,
    },
    Sticker {
        payload: StickerAttachmentRequestPayload,
    },
    Contact {
        payload: ContactAttachmentRequestPayload,
    },
    InlineKeyboard {
        payload: Keyboard,
    },
    Location {
        latitude: f64,
        longitude: f64,
    },
    Share {
        payload: ShareAttachmentPayload,
    },
}

impl AttachmentRequest {
    /// Image from the tokens returned by a photo upload.
    #[must_use]
    pub fn photo_tokens(tokens: PhotoTokens) -> Self {
        Self::Image {
            payload: PhotoAttachmentRequestPayload {
                photos: Some(tokens.photos),
                ..PhotoAttachmentRequestPayload::default()
            },
        }
    }

    /// Image hosted elsewhere.
    #[must_use]
    pub fn photo_url(url: impl Into<String>) -> Self {
        Self::Image {
            payload: PhotoAttachmentRequestPayload {
                url: Some(url.into()),
                ..PhotoAttachmentRequestPayload::default()
            },
        }
    }

    /// Attachment for a finished media upload of the given kind.
    #[must_use]
    pub fn uploaded(kind: UploadType, info: UploadedInfo) -> Self {
        match kind {
            UploadType::Image => Self::Image {
                payload: PhotoAttachmentRequestPayload {
                    token: Some(info.token),
                    ..PhotoAttachmentRequestPayload::default()
                },
            },
            UploadType::Video => Self::Video { payload: info },
            UploadType::Audio => Self::Audio { payload: info },
            UploadType::File => Self::File { payload: info },
        }
    }

    #[must_use]
    pub fn inline_keyboard(rows: Vec<Vec<Button>>) -> Self {
        Self::InlineKeyboard {
            payload: Keyboard { buttons: rows },
        }
    }

    #[must_use]
    pub fn sticker(code: impl Into<String>) -> Self {
        Self::Sticker {
            payload: StickerAttachmentRequestPayload { code: code.into() },
        }
    }

    #[must_use]
    pub fn location(latitude: f64, longitude: f64) -> Self {
        Self::Location {
            latitude,
            longitude,
        }
    }
}
