use std::path::Path;

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use max_bot_schemes::{PhotoTokens, UploadEndpoint, UploadType, UploadedInfo};

use crate::api::BotApi;
use crate::constants::{PATH_UPLOADS, UPLOAD_FALLBACK_FILE_NAME, UPLOAD_FIELD_NAME};
use crate::error::ClassifiedError;
use crate::transport::{ApiRequest, MultipartUpload, decode_body};

/// Two-step media upload: obtain an upload URL, then post the file to it.
///
/// The returned tokens go into
/// [`AttachmentRequest`](max_bot_schemes::AttachmentRequest)s. Freshly
/// uploaded media may be rejected as not ready for a short while; message
/// sends retry that case on their own.
#[derive(Debug, Clone, Copy)]
pub struct Uploads<'a> {
    api: &'a BotApi,
}

impl<'a> Uploads<'a> {
    pub(crate) fn new(api: &'a BotApi) -> Self {
        Self { api }
    }

    /// `POST /uploads?type=`.
    ///
    /// # Errors
    ///
    /// Any [`ClassifiedError`] from the call.
    pub async fn upload_endpoint(&self, kind: UploadType) -> Result<UploadEndpoint, ClassifiedError> {
        self.api
            .call(
                ApiRequest::post(PATH_UPLOADS).query("type", kind),
                "upload endpoint",
            )
            .await
    }

    /// Uploads video, audio or file content.
    ///
    /// Video and audio tokens come with the upload URL; for the other kinds
    /// the upload reply carries them.
    ///
    /// # Errors
    ///
    /// Any [`ClassifiedError`] from either step.
    pub async fn upload_media(
        &self,
        kind: UploadType,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<UploadedInfo, ClassifiedError> {
        let (endpoint, reply) = self.post_file(kind, file_name, bytes).await?;
        if kind.token_issued_upfront()
            && let Some(token) = endpoint.token
        {
            return Ok(UploadedInfo {
                file_id: None,
                token,
            });
        }
        decode_body(&reply, "uploaded info")
    }

    /// Uploads an image and returns its photo tokens.
    ///
    /// # Errors
    ///
    /// Any [`ClassifiedError`] from either step.
    pub async fn upload_photo(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<PhotoTokens, ClassifiedError> {
        let (_, reply) = self.post_file(UploadType::Image, file_name, bytes).await?;
        decode_body(&reply, "photo tokens")
    }

    /// Reads `path` and uploads it with [`Uploads::upload_media`].
    ///
    /// # Errors
    ///
    /// [`ClassifiedError::Io`] when the file cannot be read, otherwise as
    /// [`Uploads::upload_media`].
    pub async fn upload_media_from_path(
        &self,
        kind: UploadType,
        path: impl AsRef<Path>,
    ) -> Result<UploadedInfo, ClassifiedError> {
        let (file_name, bytes) = read_local_file(path.as_ref()).await?;
        self.upload_media(kind, &file_name, bytes).await
    }

    /// Fetches `url` and re-uploads its content. The file name comes from the
    /// remote `Content-Disposition` header when present.
    ///
    /// # Errors
    ///
    /// Any [`ClassifiedError`] from the fetch, otherwise as
    /// [`Uploads::upload_media`].
    pub async fn upload_media_from_url(
        &self,
        kind: UploadType,
        url: &str,
    ) -> Result<UploadedInfo, ClassifiedError> {
        let remote = self.api.transport().download(url).await?;
        let file_name = remote.file_name.unwrap_or_default();
        self.upload_media(kind, &file_name, remote.bytes).await
    }

    /// Reads `path` and uploads it with [`Uploads::upload_photo`].
    ///
    /// # Errors
    ///
    /// [`ClassifiedError::Io`] when the file cannot be read, otherwise as
    /// [`Uploads::upload_photo`].
    pub async fn upload_photo_from_path(
        &self,
        path: impl AsRef<Path>,
    ) -> Result<PhotoTokens, ClassifiedError> {
        let (file_name, bytes) = read_local_file(path.as_ref()).await?;
        self.upload_photo(&file_name, bytes).await
    }

    /// Fetches an image from `url` and uploads it as a photo.
    ///
    /// # Errors
    ///
    /// Any [`ClassifiedError`] from the fetch, otherwise as
    /// [`Uploads::upload_photo`].
    pub async fn upload_photo_from_url(&self, url: &str) -> Result<PhotoTokens, ClassifiedError> {
        let remote = self.api.transport().download(url).await?;
        let file_name = remote.file_name.unwrap_or_default();
        self.upload_photo(&file_name, remote.bytes).await
    }

    /// Uploads a standard-alphabet base64 image.
    ///
    /// # Errors
    ///
    /// [`ClassifiedError::Base64`] before any request when `encoded` does not
    /// decode, otherwise as [`Uploads::upload_photo`].
    pub async fn upload_photo_from_base64(
        &self,
        encoded: &str,
    ) -> Result<PhotoTokens, ClassifiedError> {
        let bytes = BASE64
            .decode(encoded.trim())
            .map_err(|source| ClassifiedError::Base64 {
                what: "photo".to_string(),
                source,
            })?;
        self.upload_photo("", bytes).await
    }

    async fn post_file(
        &self,
        kind: UploadType,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<(UploadEndpoint, String), ClassifiedError> {
        let endpoint = self.upload_endpoint(kind).await?;
        let size = bytes.len();
        let upload = MultipartUpload {
            url: endpoint.url.clone(),
            field_name: UPLOAD_FIELD_NAME.to_string(),
            file_name: upload_file_name(file_name),
            bytes,
        };
        let reply = self.api.transport().upload(upload).await?;
        tracing::debug!(kind = %kind, size, "MAX media uploaded");
        Ok((endpoint, reply))
    }
}

async fn read_local_file(path: &Path) -> Result<(String, Vec<u8>), ClassifiedError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| ClassifiedError::Io {
            path: path.display().to_string(),
            source,
        })?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok((file_name, bytes))
}

/// Base name of `file_name`, or a fixed fallback when there is none.
fn upload_file_name(file_name: &str) -> String {
    Path::new(file_name)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| UPLOAD_FALLBACK_FILE_NAME.to_string())
}

#[cfg(test)]
mod tests {
    use super::upload_file_name;

    #[test]
    fn upload_file_name_uses_base_name() {
        assert_eq!(upload_file_name("/tmp/media/cat.png"), "cat.png");
        assert_eq!(upload_file_name("report.pdf"), "report.pdf");
    }

    #[test]
    fn upload_file_name_falls_back_when_empty() {
        assert_eq!(upload_file_name(""), "file");
        assert_eq!(upload_file_name("/"), "file");
    }
}
