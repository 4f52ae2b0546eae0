//! In-process `Transport` that replays scripted replies and records calls.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use max_bot_api::{
    ApiError, ApiRequest, BotApi, ClassifiedError, ClientConfig, DownloadedFile, MultipartUpload,
    Transport,
};
use tokio::time::Instant;

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub request: ApiRequest,
    pub at: Instant,
}

/// Replies are consumed in order. Once the script runs dry the call never
/// completes, which parks a polling loop until it is cancelled.
#[derive(Default)]
pub struct ScriptedTransport {
    replies: Mutex<VecDeque<Result<String, ClassifiedError>>>,
    upload_replies: Mutex<VecDeque<Result<String, ClassifiedError>>>,
    requests: Mutex<Vec<RecordedRequest>>,
    uploads: Mutex<Vec<MultipartUpload>>,
    downloads: Mutex<VecDeque<Result<DownloadedFile, ClassifiedError>>>,
    downloaded_urls: Mutex<Vec<String>>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn reply(&self, body: impl Into<String>) -> &Self {
        self.push(Ok(body.into()))
    }

    pub fn reply_json(&self, body: serde_json::Value) -> &Self {
        self.push(Ok(body.to_string()))
    }

    pub fn fail(&self, error: ClassifiedError) -> &Self {
        self.push(Err(error))
    }

    pub fn reply_upload(&self, body: impl Into<String>) -> &Self {
        self.upload_replies
            .lock()
            .expect("upload replies lock")
            .push_back(Ok(body.into()));
        self
    }

    pub fn reply_download(&self, file_name: Option<&str>, bytes: &[u8]) -> &Self {
        self.downloads
            .lock()
            .expect("downloads lock")
            .push_back(Ok(DownloadedFile {
                file_name: file_name.map(str::to_string),
                bytes: bytes.to_vec(),
            }));
        self
    }

    pub fn fail_download(&self, error: ClassifiedError) -> &Self {
        self.downloads
            .lock()
            .expect("downloads lock")
            .push_back(Err(error));
        self
    }

    pub fn downloaded_urls(&self) -> Vec<String> {
        self.downloaded_urls.lock().expect("downloaded urls lock").clone()
    }

    fn push(&self, reply: Result<String, ClassifiedError>) -> &Self {
        self.replies.lock().expect("replies lock").push_back(reply);
        self
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().expect("requests lock").clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().expect("requests lock").len()
    }

    pub fn uploads(&self) -> Vec<MultipartUpload> {
        self.uploads.lock().expect("uploads lock").clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn execute(&self, request: ApiRequest) -> Result<String, ClassifiedError> {
        self.requests
            .lock()
            .expect("requests lock")
            .push(RecordedRequest {
                request,
                at: Instant::now(),
            });
        let next = self.replies.lock().expect("replies lock").pop_front();
        match next {
            Some(reply) => reply,
            None => std::future::pending().await,
        }
    }

    async fn upload(&self, upload: MultipartUpload) -> Result<String, ClassifiedError> {
        self.uploads.lock().expect("uploads lock").push(upload);
        let next = self
            .upload_replies
            .lock()
            .expect("upload replies lock")
            .pop_front();
        next.unwrap_or_else(|| Ok(String::new()))
    }

    async fn download(&self, url: &str) -> Result<DownloadedFile, ClassifiedError> {
        self.downloaded_urls
            .lock()
            .expect("downloaded urls lock")
            .push(url.to_string());
        let next = self.downloads.lock().expect("downloads lock").pop_front();
        next.unwrap_or_else(|| Ok(DownloadedFile::default()))
    }
}

pub fn api_over(transport: &Arc<ScriptedTransport>) -> BotApi {
    BotApi::with_transport(
        ClientConfig::new("test-token"),
        Arc::clone(transport) as Arc<dyn Transport>,
    )
}

pub fn not_ready() -> ClassifiedError {
    ClassifiedError::Api(ApiError::from_response(
        "POST",
        "messages",
        400,
        "Bad Request",
        r#"{"code":"attachment.not.ready","message":"Key: errors.process.attachment.file.not.processed"}"#
            .to_string(),
    ))
}

pub fn bad_request(message: &str) -> ClassifiedError {
    ClassifiedError::Api(ApiError::from_response(
        "POST",
        "messages",
        400,
        "Bad Request",
        serde_json::json!({"code": "proto.payload", "message": message}).to_string(),
    ))
}

pub async fn wait_for_requests(transport: &ScriptedTransport, count: usize) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while transport.request_count() < count {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("expected requests were not made in time");
}

pub fn long_poll_timeout() -> ClassifiedError {
    ClassifiedError::Timeout {
        op: "GET updates".to_string(),
        reason: "request timeout exceeded".to_string(),
    }
}

pub fn server_error() -> ClassifiedError {
    ClassifiedError::Api(ApiError::from_response(
        "GET",
        "updates",
        502,
        "Bad Gateway",
        "upstream unavailable".to_string(),
    ))
}

pub fn message_created(mid: &str, chat_id: i64, text: &str) -> serde_json::Value {
    serde_json::json!({
        "update_type": "message_created",
        "timestamp": 1_700_000_000_000_i64,
        "message": {
            "sender": {"user_id": 42, "first_name": "Alice", "is_bot": false},
            "recipient": {"chat_id": chat_id, "chat_type": "dialog"},
            "timestamp": 1_700_000_000_000_i64,
            "body": {"mid": mid, "seq": 1, "text": text}
        }
    })
}

pub fn updates_page(updates: Vec<serde_json::Value>, marker: Option<i64>) -> serde_json::Value {
    serde_json::json!({ "updates": updates, "marker": marker })
}

pub fn sent_message(mid: &str, chat_id: i64) -> serde_json::Value {
    serde_json::json!({
        "message": {
            "recipient": {"chat_id": chat_id, "chat_type": "chat"},
            "timestamp": 1_700_000_000_000_i64,
            "body": {"mid": mid, "seq": 2, "text": "hi"}
        }
    })
}
