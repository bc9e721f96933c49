//! Signed payload verification
//!
//! Ties the key cache and token verification together: resolve the key the
//! gateway names, check the ES512 signature and hand back the decoded body.

use crate::crypto::{jwt, keys};
use crate::key_cache::{PublicKeyCache, PublicKeySource};
use crate::{MiroPayError, Result};
use serde::de::DeserializeOwned;

/// Verify a signed gateway payload and decode its body
///
/// `None` means no payload was received and fails with [`MiroPayError::MissingContent`];
/// a blank payload fails with [`MiroPayError::InvalidPayload`]. Both are checked before
/// any key lookup.
pub async fn verify<T: DeserializeOwned>(
    signed_payload: Option<&str>,
    key_id: &str,
    cache: &PublicKeyCache,
    source: &dyn PublicKeySource,
) -> Result<T> {
    let token = signed_payload.ok_or(MiroPayError::MissingContent)?;
    if token.trim().is_empty() {
        return Err(MiroPayError::invalid_payload("signed payload is blank"));
    }

    let record = cache.resolve(key_id, source).await?;
    let public_key = keys::load_public_key(&record.pem)?;

    jwt::verify_token(token, &public_key).map_err(|e| {
        tracing::warn!(key_id, error = %e, "Rejected signed payload");
        e
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::test_keys;
    use crate::error::TokenError;
    use crate::types::{PaymentStatus, PublicKeyRecord, VerifiedPayment};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn registry(calls: Arc<AtomicUsize>) -> impl Fn() -> Result<Vec<PublicKeyRecord>> + Send + Sync {
        move || {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![PublicKeyRecord::new("kid1", test_keys::P521_PUBLIC_PEM)])
        }
    }

    #[tokio::test]
    async fn test_verify_payment() {
        let calls = Arc::new(AtomicUsize::new(0));
        let source = registry(calls.clone());
        let cache = PublicKeyCache::new();

        let payment: VerifiedPayment =
            verify(Some(test_keys::ES512_TOKEN), "kid1", &cache, &source)
                .await
                .unwrap();

        assert_eq!(payment.reference_code, "REF123");
        assert_eq!(payment.status, PaymentStatus::Paid);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_missing_and_blank_payloads_skip_key_lookup() {
        let calls = Arc::new(AtomicUsize::new(0));
        let source = registry(calls.clone());
        let cache = PublicKeyCache::new();

        let missing = verify::<VerifiedPayment>(None, "kid1", &cache, &source).await;
        assert!(matches!(missing, Err(MiroPayError::MissingContent)));

        let blank = verify::<VerifiedPayment>(Some("  \n"), "kid1", &cache, &source).await;
        assert!(matches!(blank, Err(MiroPayError::InvalidPayload(_))));

        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unknown_key_id() {
        let calls = Arc::new(AtomicUsize::new(0));
        let source = registry(calls.clone());
        let cache = PublicKeyCache::new();

        let result =
            verify::<VerifiedPayment>(Some(test_keys::ES512_TOKEN), "kid2", &cache, &source).await;

        assert!(matches!(result, Err(MiroPayError::PublicKeyNotFound { .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_registry_key_that_is_not_pem() {
        let source = || -> Result<Vec<PublicKeyRecord>> {
            Ok(vec![PublicKeyRecord::new("kid1", "not a pem")])
        };
        let cache = PublicKeyCache::new();

        let result =
            verify::<VerifiedPayment>(Some(test_keys::ES512_TOKEN), "kid1", &cache, &source).await;

        assert!(matches!(result, Err(MiroPayError::MalformedPem(_))));
    }

    #[tokio::test]
    async fn test_token_signed_by_other_key() {
        let other = p521::ecdsa::SigningKey::random(&mut rand::rngs::OsRng);
        let token = test_keys::es512_token_with(
            &other,
            &json!({ "referenceCode": "REF123", "status": "PAID" }),
        );
        let source = registry(Arc::new(AtomicUsize::new(0)));
        let cache = PublicKeyCache::new();

        let result = verify::<VerifiedPayment>(Some(&token), "kid1", &cache, &source).await;

        assert!(matches!(
            result,
            Err(MiroPayError::JwtValidationFailed(
                TokenError::InvalidSignature(_)
            ))
        ));
    }

    #[tokio::test]
    async fn test_custom_body_type() {
        #[derive(serde::Deserialize)]
        struct Refund {
            #[serde(rename = "refundId")]
            refund_id: String,
        }

        let token = test_keys::es512_token(&json!({ "refundId": "RF-1" }));
        let source = registry(Arc::new(AtomicUsize::new(0)));
        let cache = PublicKeyCache::new();

        let refund: Refund = verify(Some(&token), "kid1", &cache, &source).await.unwrap();
        assert_eq!(refund.refund_id, "RF-1");
    }
}
