//! HTTP delivery of a single webhook attempt

use crate::{DeliveryError, Result, WebhookConfig, WebhookError, WebhookPayload};
use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use tracing::debug;
use url::Url;

/// Performs one delivery attempt.
///
/// `Ok(())` means the subscriber answered with a 2xx status. Implementations
/// make exactly one request and never retry on their own.
#[async_trait]
pub trait WebhookTransport: Send + Sync {
    async fn send(
        &self,
        url: &str,
        payload: &WebhookPayload,
    ) -> std::result::Result<(), DeliveryError>;
}

/// `reqwest`-backed transport
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http_client: Client,
}

impl HttpTransport {
    /// Build a transport with the configured timeouts and User-Agent
    pub fn new(config: &WebhookConfig) -> Result<Self> {
        let http_client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .read_timeout(config.read_timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| WebhookError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { http_client })
    }
}

#[async_trait]
impl WebhookTransport for HttpTransport {
    async fn send(
        &self,
        url: &str,
        payload: &WebhookPayload,
    ) -> std::result::Result<(), DeliveryError> {
        let target = parse_target(url)?;

        let response = self
            .http_client
            .post(target)
            .header(CONTENT_TYPE, "application/json")
            .body(payload.body().clone())
            .send()
            .await?;

        // The body is never read; dropping the response closes the connection
        let status = response.status();
        drop(response);
        debug!(url = %url, status = status.as_u16(), "Webhook endpoint responded");

        if status.is_success() {
            Ok(())
        } else {
            Err(DeliveryError::Status(status.as_u16()))
        }
    }
}

fn parse_target(url: &str) -> std::result::Result<Url, DeliveryError> {
    let parsed = Url::parse(url)?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(DeliveryError::InvalidUrl(format!(
            "unsupported scheme: {}",
            other
        ))),
    }
}
