//! Error classification shared by the transport, polling and delivery paths.

use std::fmt;

use max_bot_schemes::{DecodeError, ErrorBody};
use thiserror::Error;

use crate::constants::ERROR_BODY_DISPLAY_LIMIT;

/// Error codes the platform uses while an uploaded attachment is still being
/// processed.
pub const ATTACHMENT_NOT_READY_CODES: [&str; 3] = [
    "attachment.not.ready",
    "attachment.file.not.processed",
    "errors.process.attachment.file.not.processed",
];

/// Every failure a bot API call can end with.
#[derive(Error, Debug)]
pub enum ClassifiedError {
    /// The request did not complete within its timeout.
    #[error("timeout error during {op}: {reason}")]
    Timeout { op: String, reason: String },

    /// Connection, TLS or protocol failure before a response was read.
    #[error("network error during {op}: {source}")]
    Network {
        op: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The server answered with an error.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// A request or response body could not be (de)serialised.
    #[error("serialization error during {op} of {what}: {source}")]
    Serialization {
        op: String,
        what: String,
        #[source]
        source: serde_json::Error,
    },

    /// An update envelope could not be decoded.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// A local file backing an upload could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Inline media content was not valid base64.
    #[error("invalid base64 in {what}: {source}")]
    Base64 {
        what: String,
        #[source]
        source: base64::DecodeError,
    },

    /// The operation was cancelled before it completed.
    #[error("{op} cancelled")]
    Cancelled { op: String },

    /// The attachment stayed unavailable for every allowed attempt.
    #[error("attachment not ready after {attempts} attempts: {source}")]
    AttachmentNotReady {
        attempts: u32,
        #[source]
        source: Box<ClassifiedError>,
    },
}

impl ClassifiedError {
    pub(crate) fn timeout(op: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Timeout {
            op: op.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn network(
        op: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Network {
            op: op.into(),
            source: Box::new(source),
        }
    }

    pub(crate) fn serialization(
        op: impl Into<String>,
        what: impl Into<String>,
        source: serde_json::Error,
    ) -> Self {
        Self::Serialization {
            op: op.into(),
            what: what.into(),
            source,
        }
    }

    pub(crate) fn cancelled(op: impl Into<String>) -> Self {
        Self::Cancelled { op: op.into() }
    }

    /// True for the transient "uploaded attachment is not usable yet" class.
    #[must_use]
    pub fn is_attachment_not_ready(&self) -> bool {
        match self {
            Self::Api(api) => api.is_attachment_not_ready(),
            Self::AttachmentNotReady { .. } => true,
            _ => false,
        }
    }

    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }

    /// The server error behind this failure, looking through retry exhaustion.
    #[must_use]
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Api(api) => Some(api),
            Self::AttachmentNotReady { source, .. } => source.api_error(),
            _ => None,
        }
    }

    /// HTTP status of the server error, if there was one.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        self.api_error().map(|api| api.status)
    }
}

/// Error response of the bot API.
///
/// The raw body is always kept; `code`, `message` and `details` are filled
/// from it when it decodes as `{code, message}` or `{success, message}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: u16,
    pub status_text: String,
    pub code: Option<String>,
    pub message: String,
    pub details: Option<String>,
    pub method: String,
    pub path: String,
    pub raw_body: String,
}

impl ApiError {
    /// Builds the error for a non-2xx response.
    #[must_use]
    pub fn from_response(
        method: impl Into<String>,
        path: impl Into<String>,
        status: u16,
        status_text: impl Into<String>,
        raw_body: String,
    ) -> Self {
        let parsed = serde_json::from_str::<ErrorBody>(&raw_body)
            .ok()
            .filter(|body| !body.is_empty())
            .unwrap_or_default();
        Self {
            status,
            status_text: status_text.into(),
            code: parsed.code.filter(|code| !code.is_empty()),
            message: parsed
                .message
                .filter(|message| !message.is_empty())
                .unwrap_or_default(),
            details: parsed.details.filter(|details| !details.is_empty()),
            method: method.into(),
            path: path.into(),
            raw_body,
        }
    }

    /// Builds the error for a 2xx `{success: false}` reply.
    #[must_use]
    pub fn rejected(
        method: impl Into<String>,
        path: impl Into<String>,
        message: Option<String>,
        raw_body: String,
    ) -> Self {
        Self {
            status: 200,
            status_text: "OK".to_string(),
            code: None,
            message: message.unwrap_or_default(),
            details: None,
            method: method.into(),
            path: path.into(),
            raw_body,
        }
    }

    /// Structured code match first, then a substring scan of the free text.
    #[must_use]
    pub fn is_attachment_not_ready(&self) -> bool {
        if let Some(code) = self.code.as_deref()
            && ATTACHMENT_NOT_READY_CODES.contains(&code)
        {
            return true;
        }
        mentions_attachment_not_ready(&self.message)
            || self
                .details
                .as_deref()
                .is_some_and(mentions_attachment_not_ready)
            || mentions_attachment_not_ready(&self.raw_body)
    }
}

fn mentions_attachment_not_ready(text: &str) -> bool {
    ATTACHMENT_NOT_READY_CODES
        .iter()
        .any(|code| text.contains(code))
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.status_text.is_empty() {
            write!(f, "HTTP {}", self.status)?;
        } else {
            write!(f, "HTTP {}: {}", self.status, self.status_text)?;
        }
        match (self.code.as_deref(), self.message.as_str()) {
            (Some(code), "") => write!(f, " {code}")?,
            (Some(code), message) => write!(f, " {code}: {message}")?,
            (None, "") => f.write_str(" request failed")?,
            (None, message) => write!(f, " {message}")?,
        }
        if let Some(details) = &self.details {
            write!(f, " ({details})")?;
        }
        if !self.method.is_empty() || !self.path.is_empty() {
            write!(f, " [{} {}]", self.method, self.path)?;
        }
        let raw = self.raw_body.trim();
        if !raw.is_empty() {
            let flat = raw.replace(['\n', '\r'], " ");
            if flat.chars().count() > ERROR_BODY_DISPLAY_LIMIT {
                let truncated: String = flat.chars().take(ERROR_BODY_DISPLAY_LIMIT).collect();
                write!(f, " body={truncated}…")?;
            } else {
                write!(f, " body={flat}")?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}

/// Invalid client configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("bot token is empty")]
    EmptyToken,

    #[error("invalid API URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(code: Option<&str>, message: &str, raw_body: &str) -> ApiError {
        ApiError {
            status: 400,
            status_text: "Bad Request".to_string(),
            code: code.map(str::to_string),
            message: message.to_string(),
            details: None,
            method: "POST".to_string(),
            path: "messages".to_string(),
            raw_body: raw_body.to_string(),
        }
    }

    #[test]
    fn structured_code_is_recognised() {
        for code in ATTACHMENT_NOT_READY_CODES {
            assert!(api(Some(code), "", "").is_attachment_not_ready(), "{code}");
        }
        assert!(!api(Some("chat.not.found"), "Chat not found", "").is_attachment_not_ready());
    }

    #[test]
    fn substring_fallback_covers_message_details_and_body() {
        assert!(api(None, "errors.process.attachment.file.not.processed", "").is_attachment_not_ready());
        assert!(api(None, "", r#"{"error":"attachment.not.ready"}"#).is_attachment_not_ready());

        let mut with_details = api(None, "bad request", "");
        with_details.details = Some("attachment.file.not.processed: retry later".to_string());
        assert!(with_details.is_attachment_not_ready());
    }

    #[test]
    fn from_response_reads_both_error_shapes() {
        let coded = ApiError::from_response(
            "POST",
            "messages",
            400,
            "Bad Request",
            r#"{"code":"attachment.not.ready","message":"Key: errors.process.attachment.file.not.processed"}"#
                .to_string(),
        );
        assert_eq!(coded.code.as_deref(), Some("attachment.not.ready"));
        assert!(coded.is_attachment_not_ready());

        let simple = ApiError::from_response(
            "PUT",
            "messages",
            404,
            "Not Found",
            r#"{"success":false,"message":"message not found"}"#.to_string(),
        );
        assert_eq!(simple.code, None);
        assert_eq!(simple.message, "message not found");

        let opaque = ApiError::from_response("GET", "me", 502, "Bad Gateway", "<html>".to_string());
        assert_eq!(opaque.message, "");
        assert_eq!(opaque.raw_body, "<html>");
    }

    #[test]
    fn display_truncates_long_bodies() {
        let long_body = "x".repeat(900);
        let rendered = api(Some("too.long"), "oops", &long_body).to_string();
        assert!(rendered.starts_with("HTTP 400: Bad Request too.long: oops [POST messages] body="));
        assert!(rendered.ends_with('…'));
        assert!(rendered.len() < 700);
    }

    #[test]
    fn exhaustion_reports_attempts_and_keeps_status() {
        let error = ClassifiedError::AttachmentNotReady {
            attempts: 6,
            source: Box::new(ClassifiedError::Api(api(Some("attachment.not.ready"), "", ""))),
        };
        assert!(error.to_string().contains("after 6 attempts"));
        assert_eq!(error.status(), Some(400));
        assert!(error.is_attachment_not_ready());
    }
}
