use max_bot_schemes::{
    SimpleQueryResult, SubscriptionList, SubscriptionRequestBody, UpdateType,
};

use super::execute_simple;
use crate::api::BotApi;
use crate::constants::PATH_SUBSCRIPTIONS;
use crate::error::ClassifiedError;
use crate::transport::ApiRequest;

/// Webhook subscriptions. While one is active the platform stops serving
/// `GET /updates`.
#[derive(Debug, Clone, Copy)]
pub struct Subscriptions<'a> {
    api: &'a BotApi,
}

impl<'a> Subscriptions<'a> {
    pub(crate) fn new(api: &'a BotApi) -> Self {
        Self { api }
    }

    /// `GET /subscriptions`.
    ///
    /// # Errors
    ///
    /// Any [`ClassifiedError`] from the call.
    pub async fn get_subscriptions(&self) -> Result<SubscriptionList, ClassifiedError> {
        self.api
            .call(ApiRequest::get(PATH_SUBSCRIPTIONS), "subscription list")
            .await
    }

    /// `POST /subscriptions`. An empty `update_types` subscribes to every
    /// type; `secret` is echoed back in the webhook secret header.
    ///
    /// # Errors
    ///
    /// Any [`ClassifiedError`]; `success: false` becomes [`ClassifiedError::Api`].
    pub async fn subscribe(
        &self,
        url: &str,
        update_types: &[UpdateType],
        secret: Option<&str>,
    ) -> Result<SimpleQueryResult, ClassifiedError> {
        let body = SubscriptionRequestBody {
            url: url.to_string(),
            update_types: update_types
                .iter()
                .map(|kind| kind.as_str().to_string())
                .collect(),
            version: Some(self.api.config().api_version.clone()),
            secret: secret.filter(|secret| !secret.is_empty()).map(str::to_string),
        };
        let result =
            execute_simple(self.api, ApiRequest::post(PATH_SUBSCRIPTIONS).json(&body)?).await?;
        tracing::info!(url, types = update_types.len(), "MAX webhook subscription created");
        Ok(result)
    }

    /// `DELETE /subscriptions?url=`.
    ///
    /// # Errors
    ///
    /// Any [`ClassifiedError`]; `success: false` becomes [`ClassifiedError::Api`].
    pub async fn unsubscribe(&self, url: &str) -> Result<SimpleQueryResult, ClassifiedError> {
        let result = execute_simple(
            self.api,
            ApiRequest::delete(PATH_SUBSCRIPTIONS).query("url", url),
        )
        .await?;
        tracing::info!(url, "MAX webhook subscription removed");
        Ok(result)
    }
}
