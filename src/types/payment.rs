//! Payment callback types

use serde::{Deserialize, Serialize};

/// Payment status as reported by the gateway
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    TimedOut,
    Pending,
    Paid,
    Canceled,
    Failed,
    Settled,
}

impl PaymentStatus {
    /// Whether the payment reached a state that cannot change any more
    pub fn is_final(&self) -> bool {
        !matches!(self, PaymentStatus::Pending)
    }
}

/// Signed callback envelope received from the gateway
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyPayload {
    /// Id of the gateway key that signed `content`
    #[serde(rename = "keyId")]
    pub key_id: String,
    /// Compact ES512 token; absent when the gateway sent no body
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl VerifyPayload {
    /// Create a new verify payload
    pub fn new(key_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            key_id: key_id.into(),
            content: Some(content.into()),
        }
    }
}

/// Body of a verified payment callback token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifiedPayment {
    /// Gateway reference of the payment
    #[serde(rename = "referenceCode")]
    pub reference_code: String,
    /// Current payment status
    pub status: PaymentStatus,
    /// Amount paid out to the merchant, if settled
    #[serde(rename = "payoutAmount", default, skip_serializing_if = "Option::is_none")]
    pub payout_amount: Option<String>,
}
