//! Gateway client
//!
//! This module provides an authenticated client for the MiroPay gateway. It owns
//! the integrator credential, signs every request with it and keeps the cache of
//! gateway public keys used to verify signed callbacks.
//!
//! # Architecture
//!
//! - [`GatewayClient`] - Signed requests, the key registry and callback verification
//! - Tests - mockito-backed tests of the HTTP surface
//!
//! # Examples
//!
//! ## Verifying a payment callback
//!
//! ```no_run
//! use miropay::client::GatewayClient;
//! use miropay::types::{ClientConfig, VerifyPayload};
//!
//! # async fn example(private_key_pem: String, callback_body: &str) -> miropay::Result<()> {
//! let config = ClientConfig::new(private_key_pem, "test_abc");
//! let client = GatewayClient::new(config)?;
//!
//! let payload: VerifyPayload = serde_json::from_str(callback_body)?;
//! let payment = client.verify_payment(&payload).await?;
//! println!("{} is {:?}", payment.reference_code, payment.status);
//! # Ok(())
//! # }
//! ```
//!
//! ## Sending a signed request
//!
//! ```no_run
//! use miropay::client::GatewayClient;
//! use miropay::types::ClientConfig;
//! use reqwest::Method;
//!
//! # async fn example(config: ClientConfig) -> miropay::Result<()> {
//! let client = GatewayClient::new(config)?;
//! let response = client
//!     .signed_request(Method::GET, "/status/REF123")?
//!     .send()
//!     .await?;
//! println!("gateway answered {}", response.status());
//! # Ok(())
//! # }
//! ```

use crate::crypto::signature::RequestSigner;
use crate::key_cache::{PublicKeyCache, PublicKeySource};
use crate::types::{
    paths, ClientConfig, Mode, PublicKeyRecord, VerifiedPayment, VerifyPayload, API_VERSION,
};
use crate::{verifier, MiroPayError, Result};
use async_trait::async_trait;
use reqwest::{header, Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use std::sync::Arc;


/// Authenticated MiroPay gateway client
#[derive(Clone)]
pub struct GatewayClient {
    /// Base URL of the gateway
    base_url: String,
    /// Mode selected by the credential secret
    mode: Mode,
    /// Request signer holding the decoded private key
    signer: RequestSigner,
    /// Gateway public keys, shared between clones
    cache: Arc<PublicKeyCache>,
    /// HTTP client
    client: Client,
}

impl std::fmt::Debug for GatewayClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayClient")
            .field("base_url", &self.base_url)
            .field("mode", &self.mode)
            .field("signer", &"<redacted>")
            .finish()
    }
}

impl GatewayClient {
    /// Create a new gateway client
    ///
    /// The private key is decoded here, once, using the secret as its password.
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;

        let signer = RequestSigner::new(&config.credential)?;

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| MiroPayError::config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            base_url: config.base_url,
            mode: config.credential.mode(),
            signer,
            cache: Arc::new(PublicKeyCache::new()),
            client,
        })
    }

    /// Base URL of the gateway
    pub fn url(&self) -> &str {
        &self.base_url
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// The gateway public key cache
    pub fn cache(&self) -> &PublicKeyCache {
        &self.cache
    }

    pub fn signer(&self) -> &RequestSigner {
        &self.signer
    }

    /// Relative URL of a gateway endpoint, e.g. `/v1/payment/rest/test/status/REF123`
    pub fn relative_url(&self, path: &str) -> String {
        format!(
            "/v{}/payment/rest/{}{}",
            API_VERSION,
            self.mode.as_str(),
            path
        )
    }

    /// Start a request to `path` carrying the `x-signature` and `x-id` headers
    pub fn signed_request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let relative_url = self.relative_url(path);
        let headers = self.signer.headers(method.as_str(), &relative_url)?;

        Ok(self
            .client
            .request(method, format!("{}{}", self.base_url, relative_url))
            .header(header::ACCEPT, "application/json")
            .headers(headers))
    }

    /// Fetch the current gateway public keys
    pub async fn fetch_public_keys(&self) -> Result<Vec<PublicKeyRecord>> {
        tracing::debug!(
            "Fetching public keys from: {}{}",
            self.base_url,
            self.relative_url(paths::PUBLIC_KEYS)
        );

        let response = self
            .signed_request(Method::GET, paths::PUBLIC_KEYS)?
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read response body".to_string());
            tracing::error!(
                "Public key request failed with status {}: {}",
                status,
                body
            );
            return Err(MiroPayError::Gateway {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        let records: Vec<PublicKeyRecord> = serde_json::from_str(&body)?;
        tracing::debug!(keys = records.len(), "Fetched public keys");

        Ok(records)
    }

    /// Verify a payment callback
    pub async fn verify_payment(&self, payload: &VerifyPayload) -> Result<VerifiedPayment> {
        self.verify_payload(payload).await
    }

    /// Verify a signed callback and decode its body as `T`
    pub async fn verify_payload<T: DeserializeOwned>(&self, payload: &VerifyPayload) -> Result<T> {
        verifier::verify(
            payload.content.as_deref(),
            &payload.key_id,
            &self.cache,
            self,
        )
        .await
    }
}

#[async_trait]
impl PublicKeySource for GatewayClient {
    async fn fetch_public_keys(&self) -> Result<Vec<PublicKeyRecord>> {
        GatewayClient::fetch_public_keys(self).await
    }
}
