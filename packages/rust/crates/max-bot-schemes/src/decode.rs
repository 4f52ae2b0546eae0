//! Two-phase envelope decoding.
//!
//! A probe reads only the discriminator; the discriminator then selects the
//! concrete payload type for the full decode. Both entry points are pure and
//! hold no state.

use serde::Deserialize;
use serde_json::Value;

use crate::attachment::{
    Attachment, AudioAttachment, ContactAttachment, FileAttachment, InlineKeyboardAttachment,
    LocationAttachment, PhotoAttachment, ShareAttachment, StickerAttachment, UnknownAttachment,
    VideoAttachment,
};
use crate::error::DecodeError;
use crate::update::{Update, UpdateType, decode_update_as};

#[derive(Deserialize)]
struct UpdateProbe {
    update_type: String,
}

#[derive(Deserialize)]
struct AttachmentProbe {
    #[serde(rename = "type", default)]
    kind: String,
}

fn update_kind(probe: UpdateProbe) -> Result<UpdateType, DecodeError> {
    UpdateType::from_wire(&probe.update_type)
        .ok_or(DecodeError::UnknownUpdateType(probe.update_type))
}

/// Decodes one raw update object.
///
/// # Errors
///
/// [`DecodeError::UnknownUpdateType`] when `update_type` names no known
/// variant; [`DecodeError::Malformed`] for invalid JSON, a missing
/// discriminator, or a payload that does not match its variant.
pub fn decode_update(raw: &[u8]) -> Result<Update, DecodeError> {
    let kind = update_kind(serde_json::from_slice(raw)?)?;
    let mut deserializer = serde_json::Deserializer::from_slice(raw);
    let update = decode_update_as(kind, &mut deserializer)?;
    deserializer.end()?;
    Ok(update)
}

/// Same as [`decode_update`] for an already parsed JSON value.
///
/// # Errors
///
/// See [`decode_update`].
pub fn decode_update_value(value: Value) -> Result<Update, DecodeError> {
    let kind = update_kind(UpdateProbe::deserialize(&value)?)?;
    Ok(decode_update_as(kind, value)?)
}

/// Decodes one raw attachment object.
///
/// Unknown `type` values decode to [`Attachment::Unknown`].
///
/// # Errors
///
/// [`DecodeError::Malformed`] when the input is not JSON or a known
/// attachment's payload does not match its type.
pub fn decode_attachment(raw: &[u8]) -> Result<Attachment, DecodeError> {
    let value: Value = serde_json::from_slice(raw)?;
    decode_attachment_value(value)
}

/// Same as [`decode_attachment`] for an already parsed JSON value.
///
/// # Errors
///
/// See [`decode_attachment`].
pub fn decode_attachment_value(value: Value) -> Result<Attachment, DecodeError> {
    let AttachmentProbe { kind } = AttachmentProbe::deserialize(&value)?;
    let attachment = match kind.as_str() {
        "image" => Attachment::Image(PhotoAttachment::deserialize(value)?),
        "video" => Attachment::Video(VideoAttachment::deserialize(value)?),
        "audio" => Attachment::Audio(AudioAttachment::deserialize(value)?),
        "file" => Attachment::File(FileAttachment::deserialize(value)?),
        "sticker" => Attachment::Sticker(StickerAttachment::deserialize(value)?),
        "contact" => Attachment::Contact(ContactAttachment::deserialize(value)?),
        "share" => Attachment::Share(ShareAttachment::deserialize(value)?),
        "location" => Attachment::Location(LocationAttachment::deserialize(value)?),
        "inline_keyboard" => {
            Attachment::InlineKeyboard(InlineKeyboardAttachment::deserialize(value)?)
        }
        _ => Attachment::Unknown(UnknownAttachment { kind }),
    };
    Ok(attachment)
}
