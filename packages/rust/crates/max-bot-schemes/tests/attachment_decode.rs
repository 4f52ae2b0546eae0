//! Tests for attachment envelope decoding.

#![allow(missing_docs)]

use max_bot_schemes::{Attachment, DecodeError, Intent, decode_attachment};

#[test]
fn decodes_each_known_attachment() {
    let fixtures = [
        (r#"{"type":"image","payload":{"photo_id":1,"token":"t","url":"u"}}"#, "image"),
        (r#"{"type":"video","payload":{"url":"u","token":"t"},"width":640,"height":480,"duration":12}"#, "video"),
        (r#"{"type":"audio","payload":{"url":"u","token":"t"},"transcription":"hi"}"#, "audio"),
        (r#"{"type":"file","payload":{"url":"u","token":"t"},"filename":"a.pdf","size":100}"#, "file"),
        (r#"{"type":"sticker","payload":{"url":"u","code":"c"},"width":1,"height":1}"#, "sticker"),
        (r#"{"type":"contact","payload":{"vcf_info":"BEGIN:VCARD"}}"#, "contact"),
        (r#"{"type":"share","payload":{"url":"https://x"},"title":"X"}"#, "share"),
        (r#"{"type":"location","latitude":55.75,"longitude":37.61}"#, "location"),
        (r#"{"type":"inline_keyboard","payload":{"buttons":[[{"type":"callback","text":"Go","payload":"go"}]]}}"#, "inline_keyboard"),
    ];

    for (raw, kind) in fixtures {
        let attachment = decode_attachment(raw.as_bytes())
            .unwrap_or_else(|error| panic!("{kind} should decode: {error}"));
        assert_eq!(attachment.kind(), kind);
        assert!(!matches!(attachment, Attachment::Unknown(_)), "{kind} decoded as unknown");
    }
}

#[test]
fn unknown_type_keeps_its_discriminator() {
    let attachment =
        decode_attachment(br#"{"type":"hologram","payload":{"x":1}}"#).expect("decode unknown");
    let Attachment::Unknown(unknown) = &attachment else {
        panic!("expected unknown attachment, got {attachment:?}");
    };
    assert_eq!(unknown.kind, "hologram");
    assert_eq!(attachment.kind(), "hologram");

    let encoded = serde_json::to_value(&attachment).expect("encode unknown");
    assert_eq!(encoded, serde_json::json!({"type": "hologram"}));
}

#[test]
fn only_malformed_json_fails() {
    assert!(matches!(
        decode_attachment(b"[broken"),
        Err(DecodeError::Malformed(_))
    ));
}

#[test]
fn location_fields_are_read() {
    let attachment = decode_attachment(br#"{"type":"location","latitude":1.5,"longitude":-2.25}"#)
        .expect("decode location");
    let Attachment::Location(location) = attachment else {
        panic!("expected location");
    };
    assert!((location.latitude - 1.5).abs() < f64::EPSILON);
    assert!((location.longitude + 2.25).abs() < f64::EPSILON);
}

#[test]
fn keyboard_buttons_keep_unknown_kinds() {
    let raw = br#"{"type":"inline_keyboard","payload":{"buttons":[[{"type":"open_app","text":"App","intent":"negative"}]]}}"#;
    let Attachment::InlineKeyboard(keyboard) = decode_attachment(raw).expect("decode keyboard")
    else {
        panic!("expected inline keyboard");
    };
    let button = &keyboard.payload.buttons[0][0];
    assert_eq!(button.kind, "open_app");
    assert_eq!(button.intent, Some(Intent::Negative));
}

#[test]
fn null_or_missing_payload_decodes_to_empty_payload() {
    let sticker = decode_attachment(br#"{"type":"sticker","payload":null,"width":64}"#)
        .expect("decode sticker with null payload");
    let Attachment::Sticker(sticker) = sticker else {
        panic!("expected sticker, got {sticker:?}");
    };
    assert!(sticker.payload.url.is_empty());
    assert_eq!(sticker.width, 64);

    let image = decode_attachment(br#"{"type":"image"}"#).expect("decode image without payload");
    let Attachment::Image(image) = image else {
        panic!("expected image, got {image:?}");
    };
    assert_eq!(image.payload.photo_id, 0);

    for kind in ["video", "audio", "file", "contact", "share", "inline_keyboard"] {
        let raw = format!(r#"{{"type":"{kind}","payload":null}}"#);
        let attachment = decode_attachment(raw.as_bytes())
            .unwrap_or_else(|error| panic!("{kind} with null payload: {error}"));
        assert_eq!(attachment.kind(), kind);
    }
}

#[test]
fn payload_of_wrong_shape_is_still_malformed() {
    assert!(matches!(
        decode_attachment(br#"{"type":"sticker","payload":"oops"}"#),
        Err(DecodeError::Malformed(_))
    ));
}
