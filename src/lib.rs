//! Trakt Integration Module
//!
//! Typed client for the Trakt REST API (v2).
//!
//! # Features
//!
//! - Declarative endpoint templates with path, query, filter, pagination and extended validation
//! - Response enrichment from pagination, sort, interval, VIP and rate-limit headers
//! - Token presence and expiry enforcement on authenticated calls
//! - Authorization Code flow with CSRF state verification
//! - Token refresh, import and revocation
//! - Device Code flow with a cancellable poll session
//! - Optional response cache
//!
//! # Example
//!
//! ```rust,ignore
//! use integrations_trakt::{endpoints, RequestParams, TraktClient, TraktConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = TraktConfig::builder()
//!         .client_id("my-client-id")
//!         .client_secret("my-client-secret")
//!         .build()?;
//!     let client = TraktClient::new(config)?;
//!
//!     // Device authentication
//!     let device = client.get_device_code().await?;
//!     println!("Open {} and enter {}", device.verification_url, device.user_code);
//!     client.poll_with_device_code(None)?.await?;
//!
//!     let params = RequestParams::new().filter("genres", "action").limit(10);
//!     let response = client.call(&endpoints::movies::TRENDING, &params, None).await?;
//!     println!("{:?}", response.pagination);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - `core`: HTTP transport abstraction and header names
//! - `config`: Client configuration and environment loading
//! - `error`: Error hierarchy and status message table
//! - `filters`: Filter names and value validation
//! - `template`: Endpoint templates, call parameters and the URL/body builder
//! - `response`: Response checks and header metadata
//! - `auth`: Authentication state and token payloads
//! - `client`: Authenticated request executor
//! - `flows`: OAuth authorization code, token and device flows
//! - `endpoints`: Endpoint registry
//! - `cache`: Response cache collaborator
//! - `types`: Response bodies

pub mod auth;
pub mod cache;
pub mod client;
pub mod config;
pub mod core;
pub mod endpoints;
pub mod error;
pub mod filters;
pub mod flows;
pub mod response;
pub mod template;
pub mod types;

// Re-export main client
pub use client::{TraktClient, TraktClientBuilder};

// Re-export configuration
pub use config::{TraktConfig, TraktConfigBuilder};

// Re-export errors
pub use error::{NetworkError, TraktError, TraktResult};

pub use auth::{TraktAuthentication, TraktClientAuthentication, TraktDeviceAuthentication};
pub use cache::{InMemoryResponseCache, ResponseCache};
pub use crate::core::{HttpTransport, MockHttpTransport, ReqwestHttpTransport};
pub use filters::{TraktApiFilter, TraktApiFilterValidator};
pub use flows::{AuthorizeRequest, DevicePolling, PollingCancelHandle, PollingState};
pub use response::{parse_response, EnrichedResponse};
pub use template::{ApiTemplate, RequestParams, TraktApiExtended};
