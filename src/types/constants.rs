//! Common constants for the gateway wire protocol

/// Gateway REST API version used in relative URLs
pub const API_VERSION: u32 = 1;

/// Default gateway base URL
pub const DEFAULT_BASE_URL: &str = "https://api.miropay.com";

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Header names attached to every authenticated request
pub mod headers {
    /// Base64 Ed25519 signature over the canonical request string
    pub const SIGNATURE: &str = "x-signature";
    /// Public identity of the caller (the credential secret)
    pub const KEY_ID: &str = "x-id";
}

/// Gateway endpoint paths, relative to `/v{API_VERSION}/payment/rest/{mode}`
pub mod paths {
    /// Public key registry
    pub const PUBLIC_KEYS: &str = "/get-public-keys";
}

/// Environment variables read by [`crate::types::ClientConfig::from_env`]
pub mod env {
    /// PEM text of the (optionally encrypted) Ed25519 private key
    pub const PRIVATE_KEY: &str = "MIROPAY_PRIVATE_KEY";
    /// Credential secret
    pub const SECRET: &str = "MIROPAY_SECRET";
    /// Override for the gateway base URL
    pub const BASE_URL: &str = "MIROPAY_BASE_URL";
    /// Override for the request timeout, in whole seconds
    pub const TIMEOUT_SECS: &str = "MIROPAY_TIMEOUT_SECS";
}

/// Gateway operating mode, derived from the credential secret
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Sandbox traffic
    Test,
    /// Production traffic
    Live,
}

impl Mode {
    /// Select the mode for a secret: any secret containing `test` (any case) is a test secret
    pub fn from_secret(secret: &str) -> Self {
        if secret.to_ascii_lowercase().contains("test") {
            Mode::Test
        } else {
            Mode::Live
        }
    }

    /// Path segment used in relative URLs
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Test => "test",
            Mode::Live => "live",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_from_secret() {
        assert_eq!(Mode::from_secret("test_abc"), Mode::Test);
        assert_eq!(Mode::from_secret("sk_TEST_123"), Mode::Test);
        assert_eq!(Mode::from_secret("live_abc"), Mode::Live);
        assert_eq!(Mode::Test.as_str(), "test");
        assert_eq!(Mode::Live.as_str(), "live");
    }
}
