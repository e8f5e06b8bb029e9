//! CLI configuration management

use anyhow::{Context as _, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Prefix for environment overrides, e.g. `EVALS_SETTINGS__TIMEOUT_SECS=60`
pub const ENV_PREFIX: &str = "EVALS";

/// CLI configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CliConfig {
    /// Default profile to use
    #[serde(default)]
    pub default_profile: Option<String>,

    /// Named profiles
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,

    /// Global settings
    #[serde(default)]
    pub settings: Settings,
}

impl CliConfig {
    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from `path`, layered with `EVALS_*` environment variables.
    ///
    /// A missing file is not an error.
    pub fn load_from(path: &Path) -> Result<Self> {
        let loader = ::config::Config::builder()
            .add_source(
                ::config::File::from(path.to_path_buf())
                    .format(::config::FileFormat::Toml)
                    .required(false),
            )
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .with_context(|| format!("Failed to read config from {:?}", path))?;

        loader
            .try_deserialize()
            .with_context(|| format!("Failed to parse config from {:?}", path))
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to `path`, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory {:?}", parent))?;
        }
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write config to {:?}", path))?;

        // Profiles may hold API keys
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = fs::metadata(path)?.permissions();
            perms.set_mode(0o600);
            fs::set_permissions(path, perms)?;
        }

        Ok(())
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("com", "openai-evals", "evals")
            .context("Could not determine config directory")?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Get a profile by name, falling back to the default profile
    pub fn get_profile(&self, name: Option<&str>) -> Option<&Profile> {
        let profile_name = name.or(self.default_profile.as_deref())?;
        self.profiles.get(profile_name)
    }

    /// Set the default profile
    pub fn set_default_profile(&mut self, name: &str) {
        self.default_profile = Some(name.to_string());
    }

    /// List all profile names, sorted
    pub fn list_profiles(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.profiles.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }
}

/// A configuration profile
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Profile {
    /// API base URL
    #[serde(default)]
    pub api_url: Option<String>,

    /// API key, sent as a bearer token
    #[serde(default)]
    pub api_key: Option<String>,

    /// `OpenAI-Organization` header
    #[serde(default)]
    pub organization: Option<String>,

    /// `OpenAI-Project` header
    #[serde(default)]
    pub project: Option<String>,

    /// Additional headers
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

impl Profile {
    /// Get the API URL, falling back to default
    pub fn api_url(&self) -> &str {
        self.api_url.as_deref().unwrap_or(evals_sdk::DEFAULT_BASE_URL)
    }
}

/// Global settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Default output format
    #[serde(default = "default_output_format")]
    pub output_format: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Maximum retries for failed requests
    #[serde(default)]
    pub max_retries: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            output_format: default_output_format(),
            timeout_secs: default_timeout(),
            max_retries: 0,
        }
    }
}

fn default_output_format() -> String {
    "table".to_string()
}

fn default_timeout() -> u64 {
    120
}
