//! Configuration commands

use anyhow::{Context as _, Result};
use clap::{Args, Subcommand};
use colored::Colorize;

use crate::config::{CliConfig, Profile};
use crate::context::Context;

/// Configuration management commands
#[derive(Debug, Args)]
pub struct ConfigCommands {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigSubcommand {
    /// Show current configuration
    Show {
        /// Show a single profile
        #[arg(long)]
        name: Option<String>,
    },

    /// List all profiles
    Profiles,

    /// Set the default profile
    UseProfile {
        /// Profile name to use as default
        name: String,
    },

    /// Create a profile, or merge the given fields into an existing one
    SetProfile {
        /// Profile name
        name: String,

        /// API base URL for this profile
        #[arg(long)]
        api_url: Option<String>,

        /// API key for this profile
        #[arg(long)]
        api_key: Option<String>,

        /// Organization ID for this profile
        #[arg(long)]
        organization: Option<String>,

        /// Project ID for this profile
        #[arg(long)]
        project: Option<String>,
    },

    /// Delete a profile
    DeleteProfile {
        /// Profile name to delete
        name: String,

        /// Force deletion without confirmation
        #[arg(long)]
        force: bool,
    },

    /// Show the configuration file path
    Path,
}

/// Execute configuration commands
pub async fn execute(ctx: &Context, cmd: ConfigCommands) -> Result<()> {
    match cmd.command {
        ConfigSubcommand::Show { name } => show(ctx, name.as_deref()),
        ConfigSubcommand::Profiles => list_profiles(ctx),
        ConfigSubcommand::UseProfile { name } => use_profile(ctx, &name),
        ConfigSubcommand::SetProfile {
            name,
            api_url,
            api_key,
            organization,
            project,
        } => {
            let profile = Profile {
                api_url,
                api_key,
                organization,
                project,
                ..Default::default()
            };
            set_profile(ctx, &name, profile)
        }
        ConfigSubcommand::DeleteProfile { name, force } => delete_profile(ctx, &name, force),
        ConfigSubcommand::Path => show_path(),
    }
}

/// Mask all but the last four characters of a secret
fn mask(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 4 {
        return "****".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("****{}", tail)
}

fn print_profile(name: &str, profile: &Profile, is_default: bool) {
    let marker = if is_default {
        " (default)".green().to_string()
    } else {
        String::new()
    };
    println!("  [{}]{}", name, marker);
    println!("    api_url: {}", profile.api_url());
    if let Some(key) = &profile.api_key {
        println!("    api_key: {}", mask(key));
    }
    if let Some(org) = &profile.organization {
        println!("    organization: {}", org);
    }
    if let Some(project) = &profile.project {
        println!("    project: {}", project);
    }
    if !profile.headers.is_empty() {
        println!("    headers:");
        let mut headers: Vec<_> = profile.headers.iter().collect();
        headers.sort();
        for (k, v) in headers {
            println!("      {}: {}", k, v);
        }
    }
}

fn show(ctx: &Context, name: Option<&str>) -> Result<()> {
    println!("{}", "Configuration".bold().underline());
    println!();

    println!("{}", "Settings:".cyan());
    println!("  output_format: {}", ctx.config.settings.output_format);
    println!("  timeout_secs: {}", ctx.config.settings.timeout_secs);
    println!("  max_retries: {}", ctx.config.settings.max_retries);

    println!();
    println!("{}", "Profiles:".cyan());

    let default = ctx.config.default_profile.as_deref();
    if let Some(name) = name {
        let profile = ctx
            .config
            .profiles
            .get(name)
            .with_context(|| format!("Profile '{}' not found", name))?;
        print_profile(name, profile, default == Some(name));
    } else if ctx.config.profiles.is_empty() {
        println!("  No profiles configured");
    } else {
        for name in ctx.config.list_profiles() {
            print_profile(name, &ctx.config.profiles[name], default == Some(name));
        }
    }

    Ok(())
}

fn list_profiles(ctx: &Context) -> Result<()> {
    if ctx.config.profiles.is_empty() {
        ctx.output
            .info("No profiles configured. Run 'evals config set-profile <name>' to create one.");
        return Ok(());
    }

    for name in ctx.config.list_profiles() {
        if ctx.config.default_profile.as_deref() == Some(name) {
            println!("  {} {}", "→".green(), name.green().bold());
        } else {
            println!("    {}", name);
        }
    }

    Ok(())
}

fn use_profile(ctx: &Context, name: &str) -> Result<()> {
    let mut config = ctx.config.clone();

    if !config.profiles.contains_key(name) {
        anyhow::bail!(
            "Profile '{}' not found. Run 'evals config profiles' to list available profiles.",
            name
        );
    }

    config.set_default_profile(name);
    config.save().context("Failed to save configuration")?;

    ctx.output.success(&format!("Now using profile '{}'", name));
    Ok(())
}

fn set_profile(ctx: &Context, name: &str, profile: Profile) -> Result<()> {
    let mut config = ctx.config.clone();
    apply_profile(&mut config, name, profile);
    config.save().context("Failed to save configuration")?;

    ctx.output.success(&format!("Saved profile '{}'", name));
    Ok(())
}

/// Merge `update` into the named profile, creating it if needed.
/// The first profile created becomes the default.
fn apply_profile(config: &mut CliConfig, name: &str, update: Profile) {
    let first = config.profiles.is_empty();
    let entry = config.profiles.entry(name.to_string()).or_default();

    if update.api_url.is_some() {
        entry.api_url = update.api_url;
    }
    if update.api_key.is_some() {
        entry.api_key = update.api_key;
    }
    if update.organization.is_some() {
        entry.organization = update.organization;
    }
    if update.project.is_some() {
        entry.project = update.project;
    }

    if first {
        config.set_default_profile(name);
    }
}

fn delete_profile(ctx: &Context, name: &str, force: bool) -> Result<()> {
    let mut config = ctx.config.clone();

    if !config.profiles.contains_key(name) {
        anyhow::bail!("Profile '{}' not found", name);
    }

    if !force && !super::confirm(format!("Delete profile '{}'?", name))? {
        ctx.output.info("Cancelled");
        return Ok(());
    }

    config.profiles.remove(name);
    if config.default_profile.as_deref() == Some(name) {
        config.default_profile = None;
    }
    config.save().context("Failed to save configuration")?;

    ctx.output.success(&format!("Deleted profile '{}'", name));
    Ok(())
}

fn show_path() -> Result<()> {
    let path = CliConfig::config_path()?;
    let status = if path.exists() {
        "✓".green()
    } else {
        "✗".red()
    };
    println!("{} {}", status, path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask() {
        assert_eq!(mask("sk-abcdef123456"), "****3456");
        assert_eq!(mask("abc"), "****");
    }

    #[test]
    fn test_apply_profile_merges_and_sets_default() {
        let mut config = CliConfig::default();
        apply_profile(
            &mut config,
            "work",
            Profile {
                api_key: Some("sk-1".to_string()),
                organization: Some("org-1".to_string()),
                ..Default::default()
            },
        );
        assert_eq!(config.default_profile.as_deref(), Some("work"));

        apply_profile(
            &mut config,
            "work",
            Profile {
                project: Some("proj-1".to_string()),
                ..Default::default()
            },
        );
        let profile = &config.profiles["work"];
        assert_eq!(profile.api_key.as_deref(), Some("sk-1"));
        assert_eq!(profile.organization.as_deref(), Some("org-1"));
        assert_eq!(profile.project.as_deref(), Some("proj-1"));

        apply_profile(&mut config, "other", Profile::default());
        assert_eq!(config.default_profile.as_deref(), Some("work"));
        assert_eq!(config.list_profiles(), vec!["other", "work"]);
    }
}
