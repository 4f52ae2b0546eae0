//! Webhook subscriptions.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    pub url: String,
    /// Unix millis when the subscription was created.
    #[serde(default)]
    pub time: i64,
    /// Empty means every update type.
    #[serde(default)]
    pub update_types: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionList {
    #[serde(default)]
    pub subscriptions: Vec<Subscription>,
}

/// Body of `POST /subscriptions`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionRequestBody {
    pub url: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub update_types: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Echoed back in the `X-Max-Bot-Api-Secret` header of every delivery.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,
}
