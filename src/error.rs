//! Error types for the MiroPay SDK

use thiserror::Error;

/// Result type alias for MiroPay operations
pub type Result<T> = std::result::Result<T, MiroPayError>;

/// Boxed error raised by a caller-supplied collaborator
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors returned by the MiroPay SDK
#[derive(Error, Debug)]
pub enum MiroPayError {
    /// Encrypted private key supplied without a password
    #[error("Password is required for encrypted private key")]
    MissingPassword,

    /// PEM text did not yield a usable key
    #[error("Unsupported key material: {0}")]
    UnsupportedKeyMaterial(#[from] KeyMaterialError),

    /// PEM envelope markers missing or the region between them is unparsable
    #[error("Invalid PEM format: {0}")]
    MalformedPem(String),

    /// Invalid argument passed by the caller
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Signing failed; the key load or engine error is kept as the source
    #[error("Error while generating ED25519 signature")]
    SigningFailed(#[source] BoxError),

    /// No public key with this id, even after a forced refresh
    #[error("Public key with ID '{key_id}' was not found")]
    PublicKeyNotFound { key_id: String },

    /// Signed payload was not supplied at all
    #[error("Signed payload content is missing")]
    MissingContent,

    /// Signed payload was supplied but is unusable
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    /// Token structure, algorithm or signature check failed
    #[error("JWT validation failed")]
    JwtValidationFailed(#[from] TokenError),

    /// Token signature is valid but its payload does not decode
    #[error("Failed to deserialize JWT payload")]
    PayloadDeserializationFailed(#[source] serde_json::Error),

    /// Transport failure talking to the gateway
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Gateway answered with a non-success status
    #[error("Gateway request failed with status {status}: {body}")]
    Gateway { status: u16, body: String },

    /// Failure raised by a caller-supplied key source
    #[error("Transport error: {0}")]
    Transport(#[source] BoxError),

    /// Invalid client configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Gateway response body could not be decoded
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl MiroPayError {
    /// Create an invalid argument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Create a malformed PEM error
    pub fn malformed_pem(message: impl Into<String>) -> Self {
        Self::MalformedPem(message.into())
    }

    /// Create an invalid payload error
    pub fn invalid_payload(message: impl Into<String>) -> Self {
        Self::InvalidPayload(message.into())
    }

    /// Create a public key not found error
    pub fn public_key_not_found(key_id: impl Into<String>) -> Self {
        Self::PublicKeyNotFound {
            key_id: key_id.into(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Wrap a key or engine failure raised while signing
    pub fn signing_failed(error: impl Into<BoxError>) -> Self {
        Self::SigningFailed(error.into())
    }

    /// Wrap an error raised by a custom key source
    pub fn transport(error: impl Into<BoxError>) -> Self {
        Self::Transport(error.into())
    }

    /// Whether the error came from the transport layer rather than from the SDK
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Http(_) | Self::Gateway { .. } | Self::Transport(_)
        )
    }
}

/// Why a PEM document could not be turned into a key
#[derive(Error, Debug)]
pub enum KeyMaterialError {
    /// PKCS#8 parse or decryption failure
    #[error("unreadable ED25519 private key: {0}")]
    PrivateKey(#[from] pkcs8::Error),

    /// Key pair whose public half does not belong to its private half
    #[error("key pair public half does not match its private key")]
    KeyPairMismatch,

    /// Public key is not a P-521 SubjectPublicKeyInfo
    #[error("unreadable P-521 public key: {0}")]
    PublicKey(#[from] pkcs8::spki::Error),

    /// Public key point is not usable for ECDSA verification
    #[error("invalid P-521 verification key")]
    VerifyingKey(#[source] p521::ecdsa::Error),
}

/// Why a signed token was rejected
#[derive(Error, Debug)]
pub enum TokenError {
    /// Not a three-segment compact token
    #[error("malformed token: {0}")]
    Malformed(String),

    /// A segment is not valid base64url
    #[error("invalid base64url segment: {0}")]
    Encoding(#[from] base64::DecodeError),

    /// Header segment is not a JSON object with `alg`
    #[error("invalid token header: {0}")]
    Header(#[source] serde_json::Error),

    /// Header asserts an algorithm other than ES512
    #[error("unsupported token algorithm '{0}', expected ES512")]
    UnsupportedAlgorithm(String),

    /// Signature bytes are not a P-521 `r || s` pair or do not verify
    #[error("invalid token signature")]
    InvalidSignature(#[source] p521::ecdsa::Error),
}
