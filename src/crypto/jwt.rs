//! ES512 token verification
//!
//! Gateway callbacks carry a compact JWS (`header.payload.signature`) signed with
//! ECDSA P-521 / SHA-512. Only the signature and the algorithm are checked; the
//! token carries no issuer, audience or lifetime claims that are enforced here.

use super::keys::PublicKey;
use crate::error::TokenError;
use crate::{MiroPayError, Result};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use p521::ecdsa::signature::Verifier as _;
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// The only accepted token algorithm
pub const ALGORITHM: &str = "ES512";

/// Length of a raw `r || s` P-521 signature
pub const SIGNATURE_LENGTH: usize = 132;

#[derive(Debug, Deserialize)]
struct TokenHeader {
    alg: String,
}

/// Verify an ES512 token and decode its payload
///
/// The header is checked before any signature work, so a token asserting another
/// algorithm is rejected without touching the key. The token is used exactly as
/// given; surrounding whitespace makes it invalid.
pub fn verify_token<T: DeserializeOwned>(token: &str, key: &PublicKey) -> Result<T> {
    let mut segments = token.split('.');
    let (header_segment, payload_segment, signature_segment) =
        match (segments.next(), segments.next(), segments.next(), segments.next()) {
            (Some(header), Some(payload), Some(signature), None) => (header, payload, signature),
            _ => {
                return Err(TokenError::Malformed(
                    "expected three dot-separated segments".to_string(),
                )
                .into())
            }
        };

    let header_bytes = URL_SAFE_NO_PAD.decode(header_segment).map_err(TokenError::Encoding)?;
    let header: TokenHeader =
        serde_json::from_slice(&header_bytes).map_err(TokenError::Header)?;
    if header.alg != ALGORITHM {
        return Err(TokenError::UnsupportedAlgorithm(header.alg).into());
    }

    let signature_bytes = URL_SAFE_NO_PAD
        .decode(signature_segment)
        .map_err(TokenError::Encoding)?;
    if signature_bytes.len() != SIGNATURE_LENGTH {
        return Err(TokenError::Malformed(format!(
            "signature is {} bytes, expected {}",
            signature_bytes.len(),
            SIGNATURE_LENGTH
        ))
        .into());
    }
    let signature =
        p521::ecdsa::Signature::from_slice(&signature_bytes).map_err(TokenError::InvalidSignature)?;

    let signing_input = format!("{}.{}", header_segment, payload_segment);
    key.verifying_key()
        .verify(signing_input.as_bytes(), &signature)
        .map_err(TokenError::InvalidSignature)?;

    let payload_bytes = URL_SAFE_NO_PAD
        .decode(payload_segment)
        .map_err(TokenError::Encoding)?;
    serde_json::from_slice(&payload_bytes).map_err(MiroPayError::PayloadDeserializationFailed)
}
