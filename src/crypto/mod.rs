//! Cryptographic primitives for the MiroPay gateway
//!
//! This module holds the signing and verification core of the SDK: PEM key
//! loading, deterministic request signing and ES512 token verification.
//!
//! # Architecture
//!
//! The crypto module is organized as follows:
//! - [`keys`] - Ed25519 private keys (plain, key pair or password-encrypted PKCS#8)
//!   and P-521 public keys
//! - [`signature`] - Ed25519 signatures over the canonical request string
//! - [`jwt`] - ES512 token verification and payload decoding
//!
//! # Examples
//!
//! ## Signing a request
//!
//! ```no_run
//! use miropay::crypto::signature::RequestSigner;
//! use miropay::types::Credential;
//!
//! # fn example(merchant_pem: String) -> miropay::Result<()> {
//! let credential = Credential::new(merchant_pem, "test_abc");
//! let signer = RequestSigner::new(&credential)?;
//!
//! let signature = signer.sign("GET", "/v1/payment/rest/test/status/REF123")?;
//! println!("x-signature: {}", signature);
//! # Ok(())
//! # }
//! ```
//!
//! ## Verifying a gateway token
//!
//! ```no_run
//! use miropay::crypto::{jwt, keys};
//! use miropay::types::VerifiedPayment;
//!
//! # fn example(gateway_pem: &str, token: &str) -> miropay::Result<()> {
//! let key = keys::load_public_key(gateway_pem)?;
//! let payment: VerifiedPayment = jwt::verify_token(token, &key)?;
//! println!("{} is {:?}", payment.reference_code, payment.status);
//! # Ok(())
//! # }
//! ```

pub mod jwt;
pub mod keys;
pub mod signature;


// Re-export commonly used items
pub use jwt::verify_token;
pub use keys::{load_private_key, load_public_key, PrivateKey, PublicKey};
pub use signature::{canonical_string, sign, RequestSigner, Signature};

/// Key material shared by tests across the crate
#[cfg(test)]
pub(crate) mod test_keys {
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
    use p521::ecdsa::signature::Signer as _;

    /// Secret of the test credential; also the password of the encrypted key
    pub const SECRET: &str = "test_abc";

    /// RFC 8032 test 1 key, unencrypted PKCS#8
    pub const ED25519_PRIVATE_PEM: &str = include_str!("fixtures/ed25519_private.pem");
    /// Same key, PBES2-encrypted with [`SECRET`]
    pub const ED25519_ENCRYPTED_PEM: &str = include_str!("fixtures/ed25519_encrypted.pem");
    /// Same key as a PKCS#8 v2 key pair
    pub const ED25519_KEYPAIR_PEM: &str = include_str!("fixtures/ed25519_keypair.pem");
    /// Key pair whose public half belongs to a different key
    pub const ED25519_KEYPAIR_MISMATCH_PEM: &str =
        include_str!("fixtures/ed25519_keypair_mismatch.pem");
    pub const ED25519_PUBLIC_PEM: &str = include_str!("fixtures/ed25519_public.pem");

    /// Gateway verification key
    pub const P521_PUBLIC_PEM: &str = include_str!("fixtures/p521_public.pem");
    pub const P256_PUBLIC_PEM: &str = include_str!("fixtures/p256_public.pem");

    /// Payment token signed by the gateway key
    pub const ES512_TOKEN: &str = include_str!("fixtures/es512_token.txt");

    /// Private scalar behind [`P521_PUBLIC_PEM`]
    pub const P521_PRIVATE_SCALAR: [u8; 66] = {
        let mut scalar = [0xa5; 66];
        scalar[0] = 0x01;
        scalar
    };

    pub fn gateway_signing_key() -> p521::ecdsa::SigningKey {
        p521::ecdsa::SigningKey::from_slice(&P521_PRIVATE_SCALAR).unwrap()
    }

    /// Mint an ES512 token signed by the gateway key
    pub fn es512_token(claims: &serde_json::Value) -> String {
        es512_token_with(&gateway_signing_key(), claims)
    }

    pub fn es512_token_with(key: &p521::ecdsa::SigningKey, claims: &serde_json::Value) -> String {
        let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"ES512","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
        let signing_input = format!("{}.{}", header, payload);

        let signature: p521::ecdsa::Signature = key.sign(signing_input.as_bytes());
        format!(
            "{}.{}",
            signing_input,
            URL_SAFE_NO_PAD.encode(signature.to_bytes())
        )
    }
}
