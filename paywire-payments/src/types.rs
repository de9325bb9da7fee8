//! Payment types and data structures

use crate::card::{ProtectedCard, mask_card_number};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Inbound payment data.
///
/// `Debug` shows only the masked card number.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentRequest {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub zip_code: String,
    /// Plaintext card number; never stored or logged as-is
    #[serde(default)]
    pub card_number: String,
}

impl CreatePaymentRequest {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        zip_code: impl Into<String>,
        card_number: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            zip_code: zip_code.into(),
            card_number: card_number.into(),
        }
    }
}

impl fmt::Debug for CreatePaymentRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreatePaymentRequest")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("zip_code", &self.zip_code)
            .field("card_number", &mask_card_number(&self.card_number))
            .finish()
    }
}

/// A validated payment with its card already protected
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPayment {
    pub first_name: String,
    pub last_name: String,
    pub zip_code: String,
    pub card: ProtectedCard,
}

impl NewPayment {
    /// Take the personal fields from `request`; its plaintext card number is dropped
    pub fn new(request: CreatePaymentRequest, card: ProtectedCard) -> Self {
        Self {
            first_name: request.first_name,
            last_name: request.last_name,
            zip_code: request.zip_code,
            card,
        }
    }
}

/// A stored payment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentRecord {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub zip_code: String,
    pub card_number_encrypted: String,
    pub card_number_masked: String,
    pub created_at: NaiveDateTime,
}

impl PaymentRecord {
    /// The outward-facing view, without ciphertext
    pub fn view(&self) -> PaymentView {
        PaymentView {
            id: self.id,
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            zip_code: self.zip_code.clone(),
            card_number_masked: self.card_number_masked.clone(),
            created_at: self.created_at,
        }
    }
}

/// Payment as returned to callers and sent to subscribers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentView {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub zip_code: String,
    pub card_number_masked: String,
    #[serde(with = "paywire_webhooks::timestamp")]
    pub created_at: NaiveDateTime,
}

impl From<&PaymentRecord> for PaymentView {
    fn from(record: &PaymentRecord) -> Self {
        record.view()
    }
}
