//! CLI execution context

use anyhow::{Context as _, Result};
use clap::ValueEnum;
use evals_sdk::{OpenAiClient, SdkConfig};
use std::time::Duration;

use crate::cli::Cli;
use crate::config::{CliConfig, Profile};
use crate::output::{OutputFormat, OutputWriter};

/// Execution context for CLI commands
pub struct Context {
    /// CLI configuration
    pub config: CliConfig,

    /// Active profile name
    pub profile_name: Option<String>,

    /// Active profile
    pub profile: Profile,

    /// Output writer
    pub output: OutputWriter,

    /// Verbose mode
    pub verbose: bool,

    api_url_override: Option<String>,
    api_key_override: Option<String>,
    organization_override: Option<String>,
    project_override: Option<String>,
}

impl Context {
    /// Create a new context from CLI arguments
    pub fn new(cli: &Cli) -> Result<Self> {
        let config = CliConfig::load()?;
        Ok(Self::with_config(cli, config))
    }

    /// Create a context from CLI arguments and an already loaded configuration
    pub fn with_config(cli: &Cli, config: CliConfig) -> Self {
        let profile_name = cli
            .profile
            .clone()
            .or_else(|| config.default_profile.clone());
        let profile = config
            .get_profile(profile_name.as_deref())
            .cloned()
            .unwrap_or_default();

        // Flag wins, then the configured default; an unknown setting falls back to table
        let format = cli.output.unwrap_or_else(|| {
            OutputFormat::from_str(&config.settings.output_format, true).unwrap_or_default()
        });

        Self {
            output: OutputWriter::new(format, cli.no_color),
            config,
            profile_name,
            profile,
            verbose: cli.verbose,
            api_url_override: cli.api_url.clone(),
            api_key_override: cli.api_key.clone(),
            organization_override: cli.organization.clone(),
            project_override: cli.project.clone(),
        }
    }

    /// Get the effective API URL
    pub fn api_url(&self) -> &str {
        self.api_url_override
            .as_deref()
            .unwrap_or_else(|| self.profile.api_url())
    }

    fn api_key(&self) -> Option<&str> {
        self.api_key_override
            .as_deref()
            .or(self.profile.api_key.as_deref())
    }

    /// Build the SDK configuration for the active profile and overrides
    pub fn sdk_config(&self) -> SdkConfig {
        let mut config = SdkConfig::new(self.api_url())
            .with_timeout(Duration::from_secs(self.config.settings.timeout_secs))
            .with_max_retries(self.config.settings.max_retries)
            .with_logging(self.verbose)
            .with_log_errors(self.verbose);

        if let Some(key) = self.api_key() {
            config = config.with_bearer_token(key);
        }
        if let Some(org) = self
            .organization_override
            .as_deref()
            .or(self.profile.organization.as_deref())
        {
            config = config.with_organization(org);
        }
        if let Some(project) = self
            .project_override
            .as_deref()
            .or(self.profile.project.as_deref())
        {
            config = config.with_project(project);
        }

        for (name, value) in &self.profile.headers {
            config = config.with_header(name.clone(), value.clone());
        }

        config
    }

    /// Create an SDK client
    pub fn create_client(&self) -> Result<OpenAiClient> {
        if self.api_key().is_none() {
            anyhow::bail!(
                "No API key configured. Pass --api-key, set OPENAI_API_KEY, or add api_key to a profile."
            );
        }
        OpenAiClient::new(self.sdk_config()).context("Failed to create API client")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["evals"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    /// Parse with env-backed flags cleared so ambient OPENAI_* variables do not leak in
    fn parse_clean(args: &[&str]) -> Cli {
        let mut cli = parse(args);
        cli.api_url = None;
        cli.api_key = None;
        cli.organization = None;
        cli.project = None;
        cli.profile = None;
        cli
    }

    fn config_with_profile() -> CliConfig {
        let mut config = CliConfig::default();
        config.profiles.insert(
            "work".to_string(),
            Profile {
                api_url: Some("http://localhost:9000/v1".to_string()),
                api_key: Some("sk-profile".to_string()),
                organization: Some("org-profile".to_string()),
                ..Default::default()
            },
        );
        config.set_default_profile("work");
        config.settings.output_format = "json".to_string();
        config
    }

    #[test]
    fn test_profile_values_apply() {
        let cli = parse_clean(&["config", "path"]);
        let ctx = Context::with_config(&cli, config_with_profile());

        assert_eq!(ctx.profile_name.as_deref(), Some("work"));
        assert_eq!(ctx.output.format(), OutputFormat::Json);

        let sdk = ctx.sdk_config();
        assert_eq!(sdk.base_url, "http://localhost:9000/v1");
        assert_eq!(sdk.organization_id.as_deref(), Some("org-profile"));
        assert!(sdk.auth.is_configured());
    }

    #[test]
    fn test_flags_override_profile() {
        let cli = parse(&[
            "--api-url",
            "http://override/v1",
            "--organization",
            "org-flag",
            "--project",
            "proj-flag",
            "-o",
            "yaml",
            "config",
            "path",
        ]);
        let ctx = Context::with_config(&cli, config_with_profile());

        assert_eq!(ctx.api_url(), "http://override/v1");
        assert_eq!(ctx.output.format(), OutputFormat::Yaml);

        let sdk = ctx.sdk_config();
        assert_eq!(sdk.organization_id.as_deref(), Some("org-flag"));
        assert_eq!(sdk.project_id.as_deref(), Some("proj-flag"));
    }

    #[test]
    fn test_missing_key_is_reported() {
        let cli = parse_clean(&["config", "path"]);
        let ctx = Context::with_config(&cli, CliConfig::default());

        assert_eq!(ctx.api_url(), evals_sdk::DEFAULT_BASE_URL);
        assert!(ctx.create_client().is_err());
    }
}
