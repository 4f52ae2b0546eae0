//! Generic result, error and page shapes.

use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

/// `{success, message}` reply of mutating endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimpleQueryResult {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Best-effort view of an error response body.
///
/// The platform answers failures either as `{code, message}` or as
/// `{success: false, message}`; every field is optional so both fit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
}

impl ErrorBody {
    /// True when no field carried anything useful.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.code.is_none() && self.message.is_none() && self.details.is_none()
    }
}

/// Reply of `GET /notify/exists`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExistingNumbers {
    #[serde(default)]
    pub existing_phone_numbers: Vec<String>,
}

/// One long-poll page with updates left undecoded.
///
/// Updates stay raw so one bad entry can be skipped without losing the page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateList {
    #[serde(default)]
    pub updates: Vec<Box<RawValue>>,
    #[serde(default)]
    pub marker: Option<i64>,
}
