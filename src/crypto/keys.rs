//! PEM key loading
//!
//! Private keys are Ed25519 PKCS#8 documents, optionally password-encrypted.
//! Public keys are P-521 `SubjectPublicKeyInfo` documents served by the gateway.

use crate::error::KeyMaterialError;
use crate::{MiroPayError, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use ed25519_dalek::pkcs8::{DecodePrivateKey, KeypairBytes};
use ed25519_dalek::SigningKey;
use p521::pkcs8::DecodePublicKey;

/// Substring that marks a password-encrypted private key
pub const ENCRYPTED_KEY_MARKER: &str = "ENCRYPTED PRIVATE KEY";

const PUBLIC_KEY_HEADER: &str = "-----BEGIN PUBLIC KEY-----";
const PUBLIC_KEY_FOOTER: &str = "-----END PUBLIC KEY-----";

/// Ed25519 private key used to sign outgoing requests
#[derive(Clone)]
pub struct PrivateKey(SigningKey);

impl PrivateKey {
    /// Raw 32-byte public half of this key
    pub fn public_key_bytes(&self) -> [u8; 32] {
        self.0.verifying_key().to_bytes()
    }

    pub(crate) fn signing_key(&self) -> &SigningKey {
        &self.0
    }
}

impl From<SigningKey> for PrivateKey {
    fn from(signing_key: SigningKey) -> Self {
        Self(signing_key)
    }
}

impl std::fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrivateKey")
            .field("algorithm", &"Ed25519")
            .finish_non_exhaustive()
    }
}

/// P-521 public key used to verify gateway tokens
#[derive(Clone)]
pub struct PublicKey(p521::ecdsa::VerifyingKey);

impl PublicKey {
    pub(crate) fn verifying_key(&self) -> &p521::ecdsa::VerifyingKey {
        &self.0
    }
}

impl From<p521::ecdsa::VerifyingKey> for PublicKey {
    fn from(verifying_key: p521::ecdsa::VerifyingKey) -> Self {
        Self(verifying_key)
    }
}

impl std::fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PublicKey")
            .field("curve", &"P-521")
            .finish()
    }
}

/// Load an Ed25519 private key from PEM text
///
/// Accepts a plain PKCS#8 key, a PKCS#8 v2 key pair (only the private half is kept)
/// or an `ENCRYPTED PRIVATE KEY` document, which requires a non-empty `password`.
/// The password is ignored for unencrypted keys.
pub fn load_private_key(pem: &str, password: &str) -> Result<PrivateKey> {
    let keypair = if pem.contains(ENCRYPTED_KEY_MARKER) {
        if password.is_empty() {
            return Err(MiroPayError::MissingPassword);
        }
        KeypairBytes::from_pkcs8_encrypted_pem(pem.trim(), password)
            .map_err(KeyMaterialError::PrivateKey)?
    } else {
        KeypairBytes::from_pkcs8_pem(pem.trim()).map_err(KeyMaterialError::PrivateKey)?
    };

    let signing_key = signing_key_from_keypair(&keypair)?;

    tracing::debug!(
        encrypted = pem.contains(ENCRYPTED_KEY_MARKER),
        key_pair = keypair.public_key.is_some(),
        "Loaded ED25519 private key"
    );

    Ok(PrivateKey(signing_key))
}

fn signing_key_from_keypair(keypair: &KeypairBytes) -> Result<SigningKey> {
    let signing_key = SigningKey::from_bytes(&keypair.secret_key);

    if let Some(public_key) = &keypair.public_key {
        if signing_key.verifying_key().as_bytes() != &public_key.0 {
            return Err(KeyMaterialError::KeyPairMismatch.into());
        }
    }

    Ok(signing_key)
}

/// Load a P-521 public key from PEM text
///
/// The exact `-----BEGIN PUBLIC KEY-----` / `-----END PUBLIC KEY-----` markers are
/// required. Whitespace between them is ignored.
pub fn load_public_key(pem: &str) -> Result<PublicKey> {
    let der = decode_public_key_pem(pem)?;

    let public_key =
        p521::PublicKey::from_public_key_der(&der).map_err(KeyMaterialError::PublicKey)?;
    let verifying_key = p521::ecdsa::VerifyingKey::from_affine(*public_key.as_affine())
        .map_err(KeyMaterialError::VerifyingKey)?;

    Ok(PublicKey(verifying_key))
}

fn decode_public_key_pem(pem: &str) -> Result<Vec<u8>> {
    let start = pem
        .find(PUBLIC_KEY_HEADER)
        .ok_or_else(|| MiroPayError::malformed_pem("missing BEGIN PUBLIC KEY marker"))?
        + PUBLIC_KEY_HEADER.len();
    let end = pem[start..]
        .find(PUBLIC_KEY_FOOTER)
        .ok_or_else(|| MiroPayError::malformed_pem("missing END PUBLIC KEY marker"))?
        + start;

    let body: String = pem[start..end]
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    if body.is_empty() {
        return Err(MiroPayError::malformed_pem("empty public key body"));
    }

    STANDARD
        .decode(body.as_bytes())
        .map_err(|e| MiroPayError::malformed_pem(format!("public key body is not base64: {}", e)))
}
