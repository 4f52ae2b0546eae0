use std::sync::Arc;

use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;

use crate::config::ClientConfig;
use crate::delivery::RetryPolicy;
use crate::error::{ClassifiedError, ConfigError};
use crate::resources::{Bots, Chats, Messages, Subscriptions, Uploads};
use crate::transport::{ApiRequest, HttpTransport, Transport, decode_body};

/// Entry point of the client.
///
/// Cheap to clone; clones share the transport, configuration and
/// cancellation token.
#[derive(Clone)]
pub struct BotApi {
    transport: Arc<dyn Transport>,
    config: Arc<ClientConfig>,
    cancel: CancellationToken,
    retry_policy: RetryPolicy,
}

impl std::fmt::Debug for BotApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BotApi")
            .field("api_url", &self.config.api_url)
            .field("api_version", &self.config.api_version)
            .field("retry_policy", &self.retry_policy)
            .field("cancelled", &self.cancel.is_cancelled())
            .finish_non_exhaustive()
    }
}

impl BotApi {
    /// Client over the HTTP transport.
    ///
    /// # Errors
    ///
    /// [`ConfigError`] when the token is empty or the URL is invalid.
    pub fn new(config: ClientConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let transport = HttpTransport::new(&config)?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Client configured from `MAX_BOT_*` environment variables.
    ///
    /// # Errors
    ///
    /// [`ConfigError`] when the token is missing or the URL is invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::new(ClientConfig::from_env()?)
    }

    /// Client over a caller-supplied transport. The configuration is used as
    /// given, without validation.
    #[must_use]
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            config: Arc::new(config),
            cancel: CancellationToken::new(),
            retry_policy: RetryPolicy::default(),
        }
    }

    /// Uses `cancel` as the root token for polling and backoff waits.
    #[must_use]
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    #[must_use]
    pub fn with_retry_policy(mut self, retry_policy: RetryPolicy) -> Self {
        self.retry_policy = retry_policy;
        self
    }

    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    #[must_use]
    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry_policy
    }

    #[must_use]
    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Stops every polling stream and interrupts every retry backoff started
    /// from this client or its clones.
    pub fn shutdown(&self) {
        tracing::info!("MAX bot client shutting down");
        self.cancel.cancel();
    }

    #[must_use]
    pub fn bots(&self) -> Bots<'_> {
        Bots::new(self)
    }

    #[must_use]
    pub fn chats(&self) -> Chats<'_> {
        Chats::new(self)
    }

    #[must_use]
    pub fn messages(&self) -> Messages<'_> {
        Messages::new(self)
    }

    #[must_use]
    pub fn subscriptions(&self) -> Subscriptions<'_> {
        Subscriptions::new(self)
    }

    #[must_use]
    pub fn uploads(&self) -> Uploads<'_> {
        Uploads::new(self)
    }

    pub(crate) fn transport(&self) -> &dyn Transport {
        self.transport.as_ref()
    }

    /// Executes `request` and decodes the 2xx body as `T`.
    pub(crate) async fn call<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
        what: &str,
    ) -> Result<T, ClassifiedError> {
        let body = self.transport.execute(request).await?;
        decode_body(&body, what)
    }
}
