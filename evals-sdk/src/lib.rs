//! Evals SDK
//!
//! This crate provides a Rust client for the evals endpoints of the OpenAI
//! API: evals, their runs, and the runs' output items.
//!
//! # Features
//!
//! - **Thin resource clients**: each call maps to exactly one HTTP request
//! - **Pluggable transport**: resource clients talk to a [`Transport`] trait object
//! - **Pass-through payloads**: parameters and responses are plain JSON values
//! - **Typed views**: optional structs over the common response shapes
//! - **Classified errors**: non-success statuses map onto [`SdkError`] variants
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use evals_sdk::{ListParams, OpenAiClient, SdkConfig};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = OpenAiClient::new(SdkConfig::from_env())?;
//!
//!     let eval = client
//!         .evals()
//!         .create(&json!({
//!             "name": "Sentiment Analysis",
//!             "data_source_config": {"type": "custom", "item_schema": {"type": "object"}},
//!             "testing_criteria": []
//!         }))
//!         .await?;
//!     let eval_id = eval["id"].as_str().unwrap_or_default();
//!
//!     let run = client
//!         .evals()
//!         .runs()
//!         .create(eval_id, &json!({"name": "Run 1"}))
//!         .await?;
//!     println!("run status: {}", run["status"]);
//!
//!     let page = client.evals().list(Some(ListParams::new().with_limit(10))).await?;
//!     println!("{} evals", page["data"].as_array().map_or(0, Vec::len));
//!
//!     Ok(())
//! }
//! ```
//!
//! # Error Handling
//!
//! ```rust,no_run
//! use evals_sdk::{OpenAiClient, SdkError};
//!
//! async fn handle_errors(client: &OpenAiClient) {
//!     match client.evals().retrieve("eval_missing").await {
//!         Ok(eval) => println!("Got eval {}", eval["id"]),
//!         Err(SdkError::AuthenticationError { message, .. }) => eprintln!("Auth failed: {}", message),
//!         Err(SdkError::NotFound { message, request_id }) => {
//!             eprintln!("Not found: {} (request {:?})", message, request_id)
//!         }
//!         Err(SdkError::RateLimited { retry_after, .. }) => {
//!             eprintln!("Rate limited, retry after {} seconds", retry_after)
//!         }
//!         Err(e) => eprintln!("Other error: {}", e),
//!     }
//! }
//! ```

#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod resources;
pub mod transport;

pub use client::{HttpTransport, ListParams, SortOrder};
pub use config::{AuthConfig, SdkConfig, SdkConfigBuilder, DEFAULT_BASE_URL};
pub use error::{SdkError, SdkResult};
pub use models::{from_value, DeletionStatus, Eval, EvalRun, ListPage, OutputItem, ResultCounts};
pub use resources::{EvalsClient, OutputItemsClient, RunsClient};
pub use transport::Transport;

use std::sync::Arc;

/// The main client for the API.
///
/// Owns the shared transport and the resource clients built on it.
///
/// # Example
///
/// ```rust,no_run
/// use evals_sdk::{AuthConfig, OpenAiClient, SdkConfig};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = SdkConfig::new("https://api.openai.com/v1")
///     .with_auth(AuthConfig::BearerToken("sk-...".to_string()));
///
/// let client = OpenAiClient::new(config)?;
/// let runs = client.evals().runs();
/// let output_items = runs.output_items();
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    transport: Arc<dyn Transport>,
    evals: EvalsClient,
}

impl OpenAiClient {
    /// Create a new client backed by [`HttpTransport`].
    ///
    /// Fails if the configuration is invalid.
    pub fn new(config: SdkConfig) -> SdkResult<Self> {
        let transport = HttpTransport::new(config)?;
        Ok(Self::with_transport(Arc::new(transport)))
    }

    /// Create a client over any transport
    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self {
            evals: EvalsClient::new(Arc::clone(&transport)),
            transport,
        }
    }

    /// Create a new client using a builder pattern.
    ///
    /// ```rust,no_run
    /// use evals_sdk::OpenAiClient;
    /// use std::time::Duration;
    ///
    /// let client = OpenAiClient::builder("https://api.openai.com/v1")
    ///     .with_bearer_token("sk-...")
    ///     .with_timeout(Duration::from_secs(30))
    ///     .build()?;
    /// # Ok::<(), evals_sdk::SdkError>(())
    /// ```
    pub fn builder(base_url: impl Into<String>) -> ClientBuilder {
        ClientBuilder::new(base_url)
    }

    /// Get the evals client
    pub fn evals(&self) -> &EvalsClient {
        &self.evals
    }

    /// The underlying transport, for requests the resource clients don't cover
    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }
}

/// Builder for creating an [`OpenAiClient`] with fluent configuration.
#[derive(Debug)]
pub struct ClientBuilder {
    config: SdkConfig,
}

impl ClientBuilder {
    /// Create a new client builder with the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            config: SdkConfig::new(base_url),
        }
    }

    /// Set the authentication configuration.
    pub fn with_auth(mut self, auth: AuthConfig) -> Self {
        self.config = self.config.with_auth(auth);
        self
    }

    /// Authenticate with a bearer token.
    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.config = self.config.with_bearer_token(token);
        self
    }

    /// Send the `OpenAI-Organization` header.
    pub fn with_organization(mut self, organization_id: impl Into<String>) -> Self {
        self.config = self.config.with_organization(organization_id);
        self
    }

    /// Send the `OpenAI-Project` header.
    pub fn with_project(mut self, project_id: impl Into<String>) -> Self {
        self.config = self.config.with_project(project_id);
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: std::time::Duration) -> Self {
        self.config = self.config.with_timeout(timeout);
        self
    }

    /// Set the maximum number of retries.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.config = self.config.with_max_retries(max_retries);
        self
    }

    /// Enable or disable request/response logging.
    pub fn with_logging(mut self, enable: bool) -> Self {
        self.config = self.config.with_logging(enable);
        self
    }

    /// Add a custom header to all requests.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.config = self.config.with_header(name, value);
        self
    }

    /// Build the client.
    pub fn build(self) -> SdkResult<OpenAiClient> {
        OpenAiClient::new(self.config)
    }
}
