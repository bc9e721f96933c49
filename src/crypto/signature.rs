//! Request signing
//!
//! Every authenticated gateway call carries an Ed25519 signature over the canonical
//! string `"{METHOD} || {secret} || {relativeUrl}"`. Ed25519 is deterministic, so the
//! same request always yields the same signature; nothing in the signed string
//! varies between calls.

use super::keys::{load_private_key, PrivateKey};
use crate::types::{headers, Credential};
use crate::{MiroPayError, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use ed25519_dalek::Signer as _;
use http::{HeaderMap, HeaderValue};

/// Standard base64 of a 64-byte Ed25519 signature
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signature(String);

impl Signature {
    /// Base64 text of the signature
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Signature {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Build the canonical string for a request
///
/// The method is upper-cased; the relative URL is used verbatim.
pub fn canonical_string(method: &str, secret: &str, relative_url: &str) -> String {
    format!(
        "{} || {} || {}",
        method.to_ascii_uppercase(),
        secret,
        relative_url
    )
}

/// Signs outgoing requests with a loaded private key
///
/// The key is decoded once in [`RequestSigner::new`]; signing itself is a pure
/// function of its inputs, so a signer can be shared freely between threads.
#[derive(Debug, Clone)]
pub struct RequestSigner {
    credential: Credential,
    key: PrivateKey,
}

impl RequestSigner {
    /// Load the credential's private key, using its secret as the password
    ///
    /// Load failures keep their loader kind, such as
    /// [`MiroPayError::MissingPassword`] or [`MiroPayError::UnsupportedKeyMaterial`].
    pub fn new(credential: &Credential) -> Result<Self> {
        let key = load_private_key(credential.private_key_pem(), credential.secret())?;
        Ok(Self {
            credential: credential.clone(),
            key,
        })
    }

    /// Identity sent alongside every signature
    pub fn key_id(&self) -> &str {
        self.credential.key_id()
    }

    /// Sign a request
    pub fn sign(&self, method: &str, relative_url: &str) -> Result<Signature> {
        sign_with_key(&self.key, self.credential.secret(), method, relative_url)
    }

    /// Sign a request on the blocking thread pool
    pub async fn sign_async(&self, method: &str, relative_url: &str) -> Result<Signature> {
        let signer = self.clone();
        let method = method.to_string();
        let relative_url = relative_url.to_string();

        tokio::task::spawn_blocking(move || signer.sign(&method, &relative_url))
            .await
            .map_err(MiroPayError::signing_failed)?
    }

    /// `x-signature` and `x-id` headers for a request
    pub fn headers(&self, method: &str, relative_url: &str) -> Result<HeaderMap> {
        let signature = self.sign(method, relative_url)?;

        let mut map = HeaderMap::new();
        map.insert(
            headers::SIGNATURE,
            HeaderValue::from_str(signature.as_str())
                .map_err(|e| MiroPayError::invalid_argument(format!("signature header: {}", e)))?,
        );
        map.insert(
            headers::KEY_ID,
            HeaderValue::from_str(self.key_id())
                .map_err(|e| MiroPayError::invalid_argument(format!("key id header: {}", e)))?,
        );

        Ok(map)
    }
}

/// Sign a single request with a credential
///
/// Decodes the private key on every call; prefer [`RequestSigner`] when signing
/// more than once. Blank arguments are rejected before the key is touched. A key
/// that fails to load is reported as [`MiroPayError::SigningFailed`] with the
/// loader error as its source.
pub fn sign(method: &str, relative_url: &str, credential: &Credential) -> Result<Signature> {
    check_arguments(method, relative_url)?;

    let signer = RequestSigner::new(credential).map_err(|e| {
        tracing::error!(error = %e, "Failed to load signing key");
        MiroPayError::signing_failed(e)
    })?;
    signer.sign(method, relative_url)
}

fn check_arguments(method: &str, relative_url: &str) -> Result<()> {
    if method.trim().is_empty() {
        return Err(MiroPayError::invalid_argument("method cannot be blank"));
    }
    if relative_url.trim().is_empty() {
        return Err(MiroPayError::invalid_argument("relative URL cannot be blank"));
    }
    Ok(())
}

fn sign_with_key(
    key: &PrivateKey,
    secret: &str,
    method: &str,
    relative_url: &str,
) -> Result<Signature> {
    check_arguments(method, relative_url)?;

    let message = canonical_string(method, secret, relative_url);
    let signature = key
        .signing_key()
        .try_sign(message.as_bytes())
        .map_err(MiroPayError::signing_failed)?;

    Ok(Signature(STANDARD.encode(signature.to_bytes())))
}
