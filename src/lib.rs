//! # MiroPay Rust SDK
//!
//! A client SDK for the MiroPay payment gateway: it signs outgoing requests and
//! verifies the signed payloads the gateway sends back.
//!
//! ## Features
//!
//! - **Key loading**: Ed25519 private keys from PEM, including password-encrypted PKCS#8
//! - **Request signing**: Deterministic Ed25519 signatures in the `x-signature` / `x-id` headers
//! - **Callback verification**: ES512 tokens checked against the gateway's published keys
//! - **Key cache**: Lazily fetched gateway keys with a single forced refresh on a miss
//! - **Typed errors**: One error enum with the underlying cause kept as its source
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use miropay::{ClientConfig, GatewayClient, VerifyPayload};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // MIROPAY_PRIVATE_KEY and MIROPAY_SECRET
//!     let config = ClientConfig::from_env()?;
//!     let client = GatewayClient::new(config)?;
//!
//!     // Body of a payment callback
//!     let payload: VerifyPayload = serde_json::from_str(r#"{"keyId":"kid1","content":"..."}"#)?;
//!     let payment = client.verify_payment(&payload).await?;
//!
//!     println!("{} is {:?}", payment.reference_code, payment.status);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! The crate is organized into several modules:
//!
//! - **`types`**: Credentials, key records, callback payloads and configuration
//! - **`crypto`**: PEM key loading, request signing and token verification
//! - **`key_cache`**: Gateway public key cache and the `PublicKeySource` trait
//! - **`verifier`**: Payload verification on top of the key cache
//! - **`client`**: Authenticated HTTP client for the gateway
//! - **`error`**: Error types
//!
//! ## Wire format
//!
//! Each request is signed over `"{METHOD} || {secret} || {relativeUrl}"`, where the
//! relative URL is `/v1/payment/rest/{test|live}{path}`. The mode is `test` whenever
//! the secret contains `test`.

pub mod client;
pub mod crypto;
pub mod error;
pub mod key_cache;
pub mod types;
pub mod verifier;

// Re-exports for convenience
pub use client::GatewayClient;
pub use crypto::{RequestSigner, Signature};
pub use error::{MiroPayError, Result};
pub use key_cache::{PublicKeyCache, PublicKeySource};
pub use types::*;

/// Current version of the MiroPay library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
