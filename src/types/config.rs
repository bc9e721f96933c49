//! Gateway client configuration

use super::constants::{env as env_vars, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
use super::credential::Credential;
use std::env;
use std::time::Duration;

/// Gateway client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Integrator credential
    pub credential: Credential,
    /// Base URL of the gateway, without a trailing slash
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
    /// Keep `http://` base URLs instead of upgrading them to `https://`
    pub allow_http: bool,
}

impl ClientConfig {
    /// Create a new client config for the default gateway
    pub fn new(private_key_pem: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            credential: Credential::new(private_key_pem, secret),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            allow_http: false,
        }
    }

    /// Create a client config from `MIROPAY_*` environment variables
    pub fn from_env() -> crate::Result<Self> {
        let private_key = env::var(env_vars::PRIVATE_KEY).unwrap_or_default();
        let secret = env::var(env_vars::SECRET).unwrap_or_default();

        if private_key.trim().is_empty() || secret.trim().is_empty() {
            return Err(crate::MiroPayError::config(format!(
                "Missing credentials: {} and {} must be set",
                env_vars::PRIVATE_KEY,
                env_vars::SECRET
            )));
        }

        let mut config = Self::new(private_key, secret);

        if let Ok(base_url) = env::var(env_vars::BASE_URL) {
            config = config.with_base_url(base_url);
        }

        if let Ok(timeout) = env::var(env_vars::TIMEOUT_SECS) {
            let secs: u64 = timeout.trim().parse().map_err(|_| {
                crate::MiroPayError::config(format!(
                    "{} must be a whole number of seconds",
                    env_vars::TIMEOUT_SECS
                ))
            })?;
            config = config.with_timeout(Duration::from_secs(secs));
        }

        Ok(config)
    }

    /// Set the gateway base URL
    ///
    /// A missing scheme defaults to `https://` and `http://` is upgraded to
    /// `https://` unless [`ClientConfig::with_plain_http`] was called first.
    /// Trailing slashes are removed; an empty value falls back to the default gateway.
    pub fn with_base_url(mut self, base_url: impl AsRef<str>) -> Self {
        self.base_url = normalize_base_url(base_url.as_ref(), self.allow_http);
        self
    }

    /// Keep plain `http://` base URLs, for local gateways and test servers
    ///
    /// Affects later [`ClientConfig::with_base_url`] calls.
    pub fn with_plain_http(mut self) -> Self {
        self.allow_http = true;
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Validate the client configuration
    pub fn validate(&self) -> crate::Result<()> {
        if self.credential.secret().trim().is_empty() {
            return Err(crate::MiroPayError::config("Secret cannot be empty"));
        }

        if self.credential.private_key_pem().trim().is_empty() {
            return Err(crate::MiroPayError::config("Private key cannot be empty"));
        }

        let url = url::Url::parse(&self.base_url)
            .map_err(|e| crate::MiroPayError::config(format!("Invalid base URL: {}", e)))?;
        match url.scheme() {
            "https" => {}
            "http" if self.allow_http => {}
            "http" => {
                return Err(crate::MiroPayError::config(
                    "Plain http:// base URL requires allow_http",
                ))
            }
            _ => {
                return Err(crate::MiroPayError::config(
                    "Base URL must start with http:// or https://",
                ))
            }
        }

        if self.timeout.is_zero() {
            return Err(crate::MiroPayError::config("Timeout must be greater than zero"));
        }

        Ok(())
    }
}

fn normalize_base_url(base_url: &str, allow_http: bool) -> String {
    let trimmed = base_url.trim();
    if trimmed.is_empty() {
        return DEFAULT_BASE_URL.to_string();
    }

    let with_scheme = if trimmed.starts_with("https://") {
        trimmed.to_string()
    } else if let Some(rest) = trimmed.strip_prefix("http://") {
        if allow_http {
            trimmed.to_string()
        } else {
            format!("https://{}", rest)
        }
    } else {
        format!("https://{}", trimmed)
    };

    with_scheme.trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_config_defaults() {
        let config = ClientConfig::new("pem", "test_abc");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_base_url_normalization() {
        let config = ClientConfig::new("pem", "s").with_base_url("gateway.example.com/");
        assert_eq!(config.base_url, "https://gateway.example.com");

        let config = ClientConfig::new("pem", "s").with_base_url("https://gateway.example.com//");
        assert_eq!(config.base_url, "https://gateway.example.com");

        let config = ClientConfig::new("pem", "s").with_base_url("   ");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_plain_http_is_upgraded_by_default() {
        let config = ClientConfig::new("pem", "s").with_base_url("http://gateway.example.com/");
        assert_eq!(config.base_url, "https://gateway.example.com");
        assert!(config.validate().is_ok());

        let config = ClientConfig::new("pem", "s")
            .with_plain_http()
            .with_base_url("http://127.0.0.1:8080//");
        assert_eq!(config.base_url, "http://127.0.0.1:8080");
        assert!(config.validate().is_ok());

        let mut config = ClientConfig::new("pem", "s");
        config.base_url = "http://gateway.example.com".to_string();
        assert!(matches!(
            config.validate(),
            Err(crate::MiroPayError::Config(_))
        ));
    }

    #[test]
    fn test_validate_rejects_bad_config() {
        assert!(ClientConfig::new("pem", " ").validate().is_err());
        assert!(ClientConfig::new("", "secret").validate().is_err());
        assert!(ClientConfig::new("pem", "secret")
            .with_timeout(Duration::ZERO)
            .validate()
            .is_err());

        let mut config = ClientConfig::new("pem", "secret");
        config.base_url = "ftp://gateway.example.com".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_env() {
        env::set_var(env_vars::PRIVATE_KEY, "pem-from-env");
        env::set_var(env_vars::SECRET, "test_env");
        env::set_var(env_vars::BASE_URL, "sandbox.example.com");
        env::set_var(env_vars::TIMEOUT_SECS, "3");

        let config = ClientConfig::from_env().unwrap();
        assert_eq!(config.credential.secret(), "test_env");
        assert_eq!(config.credential.private_key_pem(), "pem-from-env");
        assert_eq!(config.base_url, "https://sandbox.example.com");
        assert_eq!(config.timeout, Duration::from_secs(3));

        env::set_var(env_vars::TIMEOUT_SECS, "soon");
        assert!(ClientConfig::from_env().is_err());

        for var in [
            env_vars::PRIVATE_KEY,
            env_vars::SECRET,
            env_vars::BASE_URL,
            env_vars::TIMEOUT_SECS,
        ] {
            env::remove_var(var);
        }
        assert!(matches!(
            ClientConfig::from_env(),
            Err(crate::MiroPayError::Config(_))
        ));
    }
}
