use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_DISPOSITION, USER_AGENT};
use reqwest::multipart::{Form, Part};
use reqwest::{Response, Url};

use super::client::build_http_client;
use super::{
    ApiRequest, AuthMode, DownloadedFile, MultipartUpload, Transport, content_disposition_file_name,
};
use crate::config::ClientConfig;
use crate::constants::USER_AGENT as CLIENT_USER_AGENT;
use crate::error::{ApiError, ClassifiedError, ConfigError};

/// [`Transport`] over a shared `reqwest` connection pool.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: Url,
    token: String,
    version: String,
    default_timeout: Duration,
}

impl HttpTransport {
    /// Builds a transport for the configured base URL and token.
    ///
    /// # Errors
    ///
    /// [`ConfigError`] when the token is empty or the URL does not parse.
    pub fn new(config: &ClientConfig) -> Result<Self, ConfigError> {
        let base_url = config.base_url()?;
        if config.token.trim().is_empty() {
            return Err(ConfigError::EmptyToken);
        }
        Ok(Self {
            client: build_http_client(config.http_timeout),
            base_url,
            token: config.token.trim().to_string(),
            version: config.api_version.clone(),
            default_timeout: config.http_timeout,
        })
    }

    fn endpoint(&self, request: &ApiRequest) -> Result<Url, ClassifiedError> {
        let mut url = self
            .base_url
            .join(request.path.trim_start_matches('/'))
            .map_err(|error| ClassifiedError::network(request.operation(), error))?;
        url.query_pairs_mut()
            .extend_pairs(request.query.iter())
            .append_pair("v", &self.version);
        Ok(url)
    }

    fn classify_reqwest_error(
        op: String,
        error: reqwest::Error,
        timeout: Duration,
    ) -> ClassifiedError {
        if error.is_timeout() {
            ClassifiedError::timeout(op, format!("request timeout exceeded ({timeout:?})"))
        } else {
            ClassifiedError::network(op, error)
        }
    }

    async fn read_response(
        op: &str,
        method: &str,
        path: &str,
        response: Response,
        timeout: Duration,
    ) -> Result<String, ClassifiedError> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|error| Self::classify_reqwest_error(op.to_string(), error, timeout))?;
        if status.is_success() {
            return Ok(body);
        }
        Err(ApiError::from_response(
            method,
            path,
            status.as_u16(),
            status.canonical_reason().unwrap_or_default(),
            body,
        )
        .into())
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: ApiRequest) -> Result<String, ClassifiedError> {
        let op = request.operation();
        let url = self.endpoint(&request)?;
        let timeout = request.timeout.unwrap_or(self.default_timeout);

        let mut builder = self
            .client
            .request(request.method.clone(), url)
            .header(USER_AGENT, CLIENT_USER_AGENT)
            .timeout(timeout);
        if request.auth == AuthMode::Bot {
            builder = builder.header(AUTHORIZATION, &self.token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        tracing::debug!(operation = %op, "MAX API request");
        let response = builder
            .send()
            .await
            .map_err(|error| Self::classify_reqwest_error(op.clone(), error, timeout))?;
        Self::read_response(
            &op,
            request.method.as_str(),
            &request.path,
            response,
            timeout,
        )
        .await
    }

    async fn upload(&self, upload: MultipartUpload) -> Result<String, ClassifiedError> {
        let op = format!("POST {}", upload.url);
        let url = Url::parse(&upload.url).map_err(|error| ClassifiedError::network(&op, error))?;
        let form = Form::new().part(
            upload.field_name,
            Part::bytes(upload.bytes).file_name(upload.file_name),
        );

        let response = self
            .client
            .post(url)
            .header(USER_AGENT, CLIENT_USER_AGENT)
            .multipart(form)
            .send()
            .await
            .map_err(|error| Self::classify_reqwest_error(op.clone(), error, self.default_timeout))?;
        Self::read_response(&op, "POST", &upload.url, response, self.default_timeout).await
    }

    async fn download(&self, url: &str) -> Result<DownloadedFile, ClassifiedError> {
        let op = format!("GET {url}");
        let parsed = Url::parse(url).map_err(|error| ClassifiedError::network(&op, error))?;
        let response = self
            .client
            .get(parsed)
            .header(USER_AGENT, CLIENT_USER_AGENT)
            .send()
            .await
            .map_err(|error| Self::classify_reqwest_error(op.clone(), error, self.default_timeout))?;

        let status = response.status();
        let file_name = response
            .headers()
            .get(CONTENT_DISPOSITION)
            .and_then(|value| value.to_str().ok())
            .and_then(content_disposition_file_name);
        let bytes = response
            .bytes()
            .await
            .map_err(|error| Self::classify_reqwest_error(op.clone(), error, self.default_timeout))?;
        if !status.is_success() {
            return Err(ApiError::from_response(
                "GET",
                url,
                status.as_u16(),
                status.canonical_reason().unwrap_or_default(),
                String::from_utf8_lossy(&bytes).into_owned(),
            )
            .into());
        }
        tracing::debug!(url, size = bytes.len(), file_name = ?file_name, "remote media fetched");
        Ok(DownloadedFile {
            file_name,
            bytes: bytes.to_vec(),
        })
    }
}
