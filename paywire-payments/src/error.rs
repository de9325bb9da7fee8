//! Error types for payment processing

use paywire_validation::ValidationErrors;
use thiserror::Error;

/// Card encryption failures.
///
/// Encryption itself cannot fail once a key is derived; only key setup and
/// decryption report errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// The secret could not be turned into a cipher key
    #[error("Key derivation failed: {0}")]
    KeyDerivation(String),

    /// Bad base64, bad block length, bad padding or non-UTF-8 plaintext
    #[error("Decryption failed: {0}")]
    Decryption(String),
}

/// Payment error types
#[derive(Error, Debug)]
pub enum PaymentError {
    /// One or more request fields were rejected
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    /// Card protection failed
    #[error("Card protection failed: {0}")]
    Crypto(#[from] CryptoError),

    /// The payment store failed
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for PaymentError {
    fn from(err: serde_json::Error) -> Self {
        PaymentError::Serialization(err.to_string())
    }
}

/// Result type for payment operations
pub type PaymentResult<T> = Result<T, PaymentError>;
