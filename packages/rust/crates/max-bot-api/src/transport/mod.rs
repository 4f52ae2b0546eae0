//! Transport boundary: one HTTP exchange per call, failures already classified.

mod client;
mod http;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::ClassifiedError;

pub use http::HttpTransport;

/// Whether a request carries the bot token.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AuthMode {
    /// `Authorization: <token>`.
    #[default]
    Bot,
    /// No credentials; used for token-in-query endpoints.
    Anonymous,
}

/// One bot API call, independent of the HTTP stack executing it.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    /// Relative to the API base URL, without a leading slash.
    pub path: String,
    pub query: Vec<(String, String)>,
    pub auth: AuthMode,
    pub body: Option<serde_json::Value>,
    /// Overrides the transport's default timeout for this call.
    pub timeout: Option<Duration>,
}

impl ApiRequest {
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            auth: AuthMode::Bot,
            body: None,
            timeout: None,
        }
    }

    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    #[must_use]
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    #[must_use]
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    #[must_use]
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    #[must_use]
    pub fn query(mut self, name: &str, value: impl ToString) -> Self {
        self.query.push((name.to_string(), value.to_string()));
        self
    }

    #[must_use]
    pub fn auth(mut self, auth: AuthMode) -> Self {
        self.auth = auth;
        self
    }

    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Attaches a JSON body.
    ///
    /// # Errors
    ///
    /// [`ClassifiedError::Serialization`] when `body` cannot be encoded.
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, ClassifiedError> {
        let value = serde_json::to_value(body).map_err(|error| {
            ClassifiedError::serialization("marshal", "request body", error)
        })?;
        self.body = Some(value);
        Ok(self)
    }

    /// First value of a query parameter.
    #[must_use]
    pub fn query_value(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// `METHOD path`, used as the operation name in errors and logs.
    #[must_use]
    pub fn operation(&self) -> String {
        format!("{} {}", self.method, self.path)
    }
}

/// File posted as `multipart/form-data` to an upload URL.
#[derive(Debug, Clone)]
pub struct MultipartUpload {
    /// Absolute URL issued by `POST /uploads`.
    pub url: String,
    pub field_name: String,
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Remote file fetched for re-upload.
#[derive(Debug, Clone, Default)]
pub struct DownloadedFile {
    /// From the `Content-Disposition` header, when the server sent one.
    pub file_name: Option<String>,
    pub bytes: Vec<u8>,
}

/// Executes bot API calls.
///
/// Implementations return the response body on 2xx and classify every other
/// outcome into [`ClassifiedError`].
#[async_trait]
pub trait Transport: Send + Sync {
    /// Performs one API request.
    async fn execute(&self, request: ApiRequest) -> Result<String, ClassifiedError>;

    /// Posts a file to an upload URL. No bot credentials are attached.
    async fn upload(&self, upload: MultipartUpload) -> Result<String, ClassifiedError>;

    /// Fetches an arbitrary URL without bot credentials.
    async fn download(&self, url: &str) -> Result<DownloadedFile, ClassifiedError>;
}

/// `filename` parameter of a `Content-Disposition` header value.
///
/// The RFC 5987 `filename*` form wins over the plain one. Blank names are
/// treated as absent.
pub(crate) fn content_disposition_file_name(header: &str) -> Option<String> {
    let mut plain = None;
    let mut extended = None;
    for param in header.split(';').skip(1) {
        let Some((name, value)) = param.split_once('=') else {
            continue;
        };
        let value = value.trim();
        match name.trim().to_ascii_lowercase().as_str() {
            "filename" => plain = Some(value.trim_matches('"').to_string()),
            "filename*" => {
                extended = value
                    .splitn(3, '\'')
                    .nth(2)
                    .and_then(percent_decode);
            }
            _ => {}
        }
    }
    extended.or(plain).filter(|name| !name.trim().is_empty())
}

fn percent_decode(value: &str) -> Option<String> {
    let bytes = value.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut index = 0;
    while index < bytes.len() {
        if bytes[index] == b'%' {
            let hex = value.get(index + 1..index + 3)?;
            decoded.push(u8::from_str_radix(hex, 16).ok()?);
            index += 3;
        } else {
            decoded.push(bytes[index]);
            index += 1;
        }
    }
    String::from_utf8(decoded).ok()
}

pub(crate) fn decode_body<T: DeserializeOwned>(
    body: &str,
    what: &str,
) -> Result<T, ClassifiedError> {
    serde_json::from_str(body).map_err(|error| ClassifiedError::serialization("decode", what, error))
}
