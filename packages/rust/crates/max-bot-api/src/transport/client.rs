use std::time::Duration;

use crate::constants::DEFAULT_HTTP_CONNECT_TIMEOUT_SECS;

pub(super) fn build_http_client(request_timeout: Duration) -> reqwest::Client {
    match reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(DEFAULT_HTTP_CONNECT_TIMEOUT_SECS))
        .timeout(request_timeout)
        .build()
    {
        Ok(client) => client,
        Err(error) => {
            tracing::warn!(
                error = %error,
                "failed to build MAX HTTP client with timeouts; falling back to default client"
            );
            reqwest::Client::new()
        }
    }
}
