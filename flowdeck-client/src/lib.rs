//! Flowdeck HTTP Client
//!
//! A typed HTTP client for the job-flow engine's REST API and its attached
//! backup/snapshot service.
//!
//! Every method resolves to either a decoded value or a single normalized
//! [`ClientError`]; raw transport errors and undecoded error bodies never
//! escape this crate.
//!
//! # Example
//!
//! ```no_run
//! use flowdeck_client::EngineClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), flowdeck_client::ClientError> {
//!     let client = EngineClient::new("http://localhost:8080");
//!
//!     let flows = client.get_all_flow_info().await?;
//!     for flow in flows {
//!         println!("{}: {:?}", flow.flow_name, flow.last_execution_exec_status);
//!     }
//!     Ok(())
//! }
//! ```

pub mod error;
mod flows;
mod snapshots;

// Re-export commonly used types
pub use error::{ClientError, Result};

use flowdeck_core::dto::ApiEnvelope;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Per-request deadline applied by [`EngineClient::with_timeout`]
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// HTTP client for the job-flow engine API
///
/// Methods are organized into logical groups:
/// - Flow management (validation, creation, listing, enable/disable/delete)
/// - Snapshot browsing and restore (listing, item filtering, downloads)
#[derive(Debug, Clone)]
pub struct EngineClient {
    /// Base URL of the engine (e.g., "http://localhost:8080")
    base_url: String,
    /// HTTP client instance
    client: Client,
}

impl EngineClient {
    /// Create a new engine client with the library's default HTTP settings
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Create a new engine client with a fixed per-request deadline
    ///
    /// # Example
    /// ```no_run
    /// use flowdeck_client::{DEFAULT_REQUEST_TIMEOUT, EngineClient};
    ///
    /// let client = EngineClient::with_timeout("http://localhost:8080", DEFAULT_REQUEST_TIMEOUT)?;
    /// # Ok::<(), flowdeck_client::ClientError>(())
    /// ```
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(base_url, client))
    }

    /// Create a new engine client with a custom HTTP client
    ///
    /// This allows configuring proxies, TLS settings, etc.
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Get the base URL of the engine
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Handle an enveloped API response and return its `data` payload
    ///
    /// Non-2xx responses are converted into a normalized server error built
    /// from the status code and whatever message the body carries.
    async fn handle_envelope<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let body = response.bytes().await.unwrap_or_default();
            return Err(ClientError::server_error(status.as_u16(), &body));
        }

        let envelope: ApiEnvelope<T> = response.json().await?;
        Ok(envelope.data)
    }

    /// Handle an enveloped API response whose `data` payload is discarded
    async fn handle_empty(&self, response: reqwest::Response) -> Result<()> {
        let status = response.status();

        if !status.is_success() {
            let body = response.bytes().await.unwrap_or_default();
            return Err(ClientError::server_error(status.as_u16(), &body));
        }

        Ok(())
    }

    /// Handle a raw binary response (no envelope)
    async fn handle_blob(&self, response: reqwest::Response) -> Result<Vec<u8>> {
        let status = response.status();

        if !status.is_success() {
            let body = response.bytes().await.unwrap_or_default();
            return Err(ClientError::server_error(status.as_u16(), &body));
        }

        let bytes = response.bytes().await?;
        Ok(bytes.to_vec())
    }
}
