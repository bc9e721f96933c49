//! Integrator credential

use super::constants::Mode;

/// Integrator credential: the PEM private key and the secret issued with it
///
/// The secret plays three roles: it is the password of an encrypted private key,
/// a component of the canonical signing string and the public key id sent as `x-id`.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    private_key_pem: String,
    secret: String,
}

impl Credential {
    /// Create a new credential
    pub fn new(private_key_pem: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            private_key_pem: private_key_pem.into(),
            secret: secret.into(),
        }
    }

    /// PEM text of the private key, possibly encrypted
    pub fn private_key_pem(&self) -> &str {
        &self.private_key_pem
    }

    /// The credential secret
    pub fn secret(&self) -> &str {
        &self.secret
    }

    /// Identity sent in the `x-id` header
    pub fn key_id(&self) -> &str {
        &self.secret
    }

    /// Gateway mode selected by this credential
    pub fn mode(&self) -> Mode {
        Mode::from_secret(&self.secret)
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("private_key_pem", &"<redacted>")
            .field("secret", &"<redacted>")
            .finish()
    }
}
