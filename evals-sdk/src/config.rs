//! SDK configuration
//!
//! This module provides configuration options for the SDK client.

use crate::error::{SdkError, SdkResult};
use std::time::Duration;

/// Default API base URL
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Configuration for the SDK client
#[derive(Debug, Clone)]
pub struct SdkConfig {
    /// Base URL for the API
    pub base_url: String,

    /// Authentication method
    pub auth: AuthConfig,

    /// Sent as `OpenAI-Organization` when set
    pub organization_id: Option<String>,

    /// Sent as `OpenAI-Project` when set
    pub project_id: Option<String>,

    /// Appended to every request as the `api-version` query parameter (Azure deployments)
    pub api_version: Option<String>,

    /// Request timeout
    pub timeout: Duration,

    /// Connection timeout
    pub connect_timeout: Duration,

    /// Maximum number of retries. Zero surfaces every failure immediately.
    pub max_retries: u32,

    /// Initial backoff duration for retries
    pub retry_initial_backoff: Duration,

    /// Maximum backoff duration for retries
    pub retry_max_backoff: Duration,

    /// User agent string
    pub user_agent: String,

    /// Enable request/response logging
    pub enable_logging: bool,

    /// Log the body of failed responses
    pub log_errors: bool,

    /// Custom headers to add to all requests
    pub custom_headers: Vec<(String, String)>,
}

impl Default for SdkConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            auth: AuthConfig::None,
            organization_id: None,
            project_id: None,
            api_version: None,
            timeout: Duration::from_secs(120),
            connect_timeout: Duration::from_secs(10),
            max_retries: 0,
            retry_initial_backoff: Duration::from_millis(100),
            retry_max_backoff: Duration::from_secs(30),
            user_agent: format!("evals-sdk/{}", env!("CARGO_PKG_VERSION")),
            enable_logging: false,
            log_errors: false,
            custom_headers: Vec::new(),
        }
    }
}

impl SdkConfig {
    /// Create a new configuration with the given base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Create a new builder with the given base URL
    pub fn builder(base_url: impl Into<String>) -> SdkConfigBuilder {
        SdkConfigBuilder {
            config: Self::new(base_url),
        }
    }

    /// Build a configuration from the standard `OPENAI_*` environment variables.
    ///
    /// Reads `OPENAI_API_KEY`, `OPENAI_BASE_URL`, `OPENAI_ORGANIZATION_ID`,
    /// `OPENAI_PROJECT_ID` and `OPENAI_API_VERSION`. Unset variables keep
    /// their defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        let mut config = Self::default();
        if let Some(url) = get("OPENAI_BASE_URL") {
            config.base_url = url;
        }
        if let Some(key) = get("OPENAI_API_KEY") {
            config.auth = AuthConfig::BearerToken(key);
        }
        config.organization_id = get("OPENAI_ORGANIZATION_ID");
        config.project_id = get("OPENAI_PROJECT_ID");
        config.api_version = get("OPENAI_API_VERSION");
        config
    }

    /// Set the authentication method
    pub fn with_auth(mut self, auth: AuthConfig) -> Self {
        self.auth = auth;
        self
    }

    /// Set the bearer token for authentication
    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.auth = AuthConfig::BearerToken(token.into());
        self
    }

    /// Set the organization header
    pub fn with_organization(mut self, organization_id: impl Into<String>) -> Self {
        self.organization_id = Some(organization_id.into());
        self
    }

    /// Set the project header
    pub fn with_project(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }

    /// Set the `api-version` query parameter
    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = Some(api_version.into());
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the connection timeout
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the maximum number of retries
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Set the retry backoff configuration
    pub fn with_retry_backoff(mut self, initial: Duration, max: Duration) -> Self {
        self.retry_initial_backoff = initial;
        self.retry_max_backoff = max;
        self
    }

    /// Set the user agent string
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Enable request/response logging
    pub fn with_logging(mut self, enable: bool) -> Self {
        self.enable_logging = enable;
        self
    }

    /// Log failed response bodies
    pub fn with_log_errors(mut self, enable: bool) -> Self {
        self.log_errors = enable;
        self
    }

    /// Add a custom header to all requests
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.custom_headers.push((name.into(), value.into()));
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> SdkResult<()> {
        if self.base_url.is_empty() {
            return Err(SdkError::ConfigurationError(
                "Base URL cannot be empty".to_string(),
            ));
        }

        url::Url::parse(&self.base_url)?;

        if self.timeout.is_zero() {
            return Err(SdkError::ConfigurationError(
                "Timeout cannot be zero".to_string(),
            ));
        }

        Ok(())
    }
}

/// Authentication configuration
#[derive(Clone, Default)]
pub enum AuthConfig {
    /// No authentication
    #[default]
    None,

    /// `Authorization: Bearer <token>`
    BearerToken(String),

    /// `api-key: <key>`, as used by Azure-hosted deployments
    AzureApiKey(String),
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthConfig::None => write!(f, "None"),
            AuthConfig::BearerToken(_) => write!(f, "BearerToken(***)"),
            AuthConfig::AzureApiKey(_) => write!(f, "AzureApiKey(***)"),
        }
    }
}

impl AuthConfig {
    /// Header name and value carrying the credential
    pub fn to_header(&self) -> Option<(&'static str, String)> {
        match self {
            AuthConfig::None => None,
            AuthConfig::BearerToken(token) => Some(("Authorization", format!("Bearer {}", token))),
            AuthConfig::AzureApiKey(key) => Some(("api-key", key.clone())),
        }
    }

    /// Check if authentication is configured
    pub fn is_configured(&self) -> bool {
        !matches!(self, AuthConfig::None)
    }
}

/// Builder for SDK configuration
#[derive(Debug, Default)]
pub struct SdkConfigBuilder {
    config: SdkConfig,
}

impl SdkConfigBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    /// Set the bearer token
    pub fn bearer_token(mut self, token: impl Into<String>) -> Self {
        self.config.auth = AuthConfig::BearerToken(token.into());
        self
    }

    /// Set the authentication method
    pub fn with_auth(mut self, auth: AuthConfig) -> Self {
        self.config.auth = auth;
        self
    }

    /// Set the organization header
    pub fn with_organization(mut self, organization_id: impl Into<String>) -> Self {
        self.config.organization_id = Some(organization_id.into());
        self
    }

    /// Set the project header
    pub fn with_project(mut self, project_id: impl Into<String>) -> Self {
        self.config.project_id = Some(project_id.into());
        self
    }

    /// Set the timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the connect timeout
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    /// Set max retries
    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.config.max_retries = retries;
        self
    }

    /// Enable/disable logging
    pub fn with_logging(mut self, enable: bool) -> Self {
        self.config.enable_logging = enable;
        self
    }

    /// Add a custom header
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.custom_headers.push((name.into(), value.into()));
        self
    }

    /// Build the configuration
    pub fn build(self) -> SdkConfig {
        self.config
    }
}
