//! Error types for webhook operations

use paywire_validation::ValidationErrors;
use thiserror::Error;

/// Why a single delivery attempt failed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeliveryError {
    /// The subscriber URL could not be parsed or is not http(s)
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The subscriber answered outside 200..300
    #[error("Webhook returned status code: {0}")]
    Status(u16),

    /// Connect or read timeout elapsed
    #[error("Request timed out")]
    Timeout,

    /// The connection could not be established
    #[error("Connection failed: {0}")]
    Connect(String),

    /// Any other transport failure
    #[error("HTTP request failed: {0}")]
    Transport(String),
}

impl DeliveryError {
    /// Log-ready description of the failure
    pub fn reason(&self) -> String {
        self.to_string()
    }

    /// Whether another attempt may follow this failure.
    ///
    /// Every failure is retried, client errors included. A 4xx other than 408
    /// or 429 will usually fail the same way again, so making those final is an
    /// open improvement.
    pub fn is_retryable(&self) -> bool {
        true
    }

    /// HTTP status of the response, if one was received
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status(code) => Some(*code),
            _ => None,
        }
    }
}

impl From<url::ParseError> for DeliveryError {
    fn from(err: url::ParseError) -> Self {
        DeliveryError::InvalidUrl(err.to_string())
    }
}

impl From<reqwest::Error> for DeliveryError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            DeliveryError::Timeout
        } else if err.is_connect() {
            DeliveryError::Connect(err.to_string())
        } else {
            DeliveryError::Transport(err.to_string())
        }
    }
}

/// Errors that can occur during webhook operations
#[derive(Error, Debug)]
pub enum WebhookError {
    /// Payload serialization failed
    #[error("Payload error: {0}")]
    Payload(String),

    /// No subscriber with this id
    #[error("Webhook not found with ID: {0}")]
    SubscriberNotFound(i64),

    /// Subscriber input was rejected
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    /// The subscriber store failed
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for WebhookError {
    fn from(err: serde_json::Error) -> Self {
        WebhookError::Payload(err.to_string())
    }
}
