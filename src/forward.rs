//! Result forwarding - best-effort POST of each published result

use std::time::Duration;

use crate::models::ResultBody;

#[derive(Debug, thiserror::Error)]
pub enum ForwardError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("server returned {0}")]
    Status(u16),
}

#[derive(Debug, Clone)]
pub struct ResultForwarder {
    client: reqwest::Client,
    url: String,
}

impl ResultForwarder {
    /// `None` when no URL is configured.
    pub fn new(url: Option<String>, timeout: Duration) -> Option<Self> {
        let url = url?;
        let client = match reqwest::Client::builder().timeout(timeout).build() {
            Ok(client) => client,
            Err(e) => {
                tracing::warn!("Result forwarding disabled, HTTP client failed: {}", e);
                return None;
            }
        };

        tracing::info!("Forwarding results to {}", url);
        Some(Self { client, url })
    }

    /// Post once; no retries.
    pub async fn send(&self, body: &ResultBody) -> Result<(), ForwardError> {
        let response = self.client.post(&self.url).json(body).send().await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(ForwardError::Status(response.status().as_u16()))
        }
    }

    /// Fire-and-forget. Failures are logged and dropped.
    pub fn spawn(&self, body: ResultBody) {
        let forwarder = self.clone();
        tokio::spawn(async move {
            match forwarder.send(&body).await {
                Ok(()) => tracing::debug!("Forwarded result {}", body.filename),
                Err(e) => tracing::warn!("Failed to forward result {}: {}", body.filename, e),
            }
        });
    }
}
