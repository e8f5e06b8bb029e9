//! CLI subcommands

pub mod config;
pub mod evals;
pub mod output_items;
pub mod runs;

use anyhow::{Context as _, Result};
use clap::Args;
use evals_sdk::{ListParams, SortOrder};
use serde_json::Value;
use std::path::PathBuf;

use crate::context::Context;

/// Request body given inline or from a file
#[derive(Debug, Clone, Args)]
pub struct ParamsInput {
    /// Path to a JSON file with the request parameters
    #[arg(short, long, conflicts_with = "data", required_unless_present = "data")]
    pub file: Option<PathBuf>,

    /// Request parameters as an inline JSON object
    #[arg(short, long)]
    pub data: Option<String>,
}

impl ParamsInput {
    /// Parse the parameters into a JSON value
    pub fn read(&self) -> Result<Value> {
        let (source, text) = match (&self.file, &self.data) {
            (Some(path), _) => (
                path.display().to_string(),
                std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read {:?}", path))?,
            ),
            (None, Some(data)) => ("--data".to_string(), data.clone()),
            (None, None) => anyhow::bail!("Either --file or --data is required"),
        };

        let value: Value = serde_json::from_str(&text)
            .with_context(|| format!("Invalid JSON in {}", source))?;
        if !value.is_object() {
            anyhow::bail!("Parameters in {} must be a JSON object", source);
        }
        Ok(value)
    }
}

/// Pagination flags shared by list commands
#[derive(Debug, Clone, Args)]
pub struct PageArgs {
    /// Maximum number of items to return
    #[arg(short, long, default_value = "20")]
    pub limit: u32,

    /// Cursor: return items after this ID
    #[arg(short, long)]
    pub after: Option<String>,

    /// Sort order (asc, desc)
    #[arg(long)]
    pub order: Option<String>,
}

impl PageArgs {
    /// Build list parameters from the flags
    pub fn to_params(&self) -> Result<ListParams> {
        let mut params = ListParams::new().with_limit(self.limit);
        if let Some(after) = &self.after {
            params = params.with_after(after.clone());
        }
        if let Some(order) = &self.order {
            params = params.with_order(order.parse::<SortOrder>()?);
        }
        Ok(params)
    }
}

/// Print a hint for fetching the next page when the response says there is one
pub(crate) fn next_page_hint(ctx: &Context, raw: &Value) {
    if raw["has_more"].as_bool().unwrap_or(false) {
        if let Some(last) = raw["last_id"].as_str() {
            ctx.output
                .info(&format!("More results available. Use --after {} to continue.", last));
        }
    }
}

/// Ask for confirmation before a destructive call
pub(crate) fn confirm(prompt: String) -> Result<bool> {
    dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .context("Failed to get confirmation")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn test_params_from_inline_data() {
        let input = ParamsInput {
            file: None,
            data: Some(r#"{"name": "Run 1"}"#.to_string()),
        };
        assert_eq!(input.read().unwrap(), json!({"name": "Run 1"}));
    }

    #[test]
    fn test_params_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"metadata": {{"modified": "true"}}}}"#).unwrap();

        let input = ParamsInput {
            file: Some(file.path().to_path_buf()),
            data: None,
        };
        assert_eq!(
            input.read().unwrap(),
            json!({"metadata": {"modified": "true"}})
        );
    }

    #[test]
    fn test_params_must_be_object() {
        let input = ParamsInput {
            file: None,
            data: Some("[1, 2]".to_string()),
        };
        assert!(input.read().is_err());

        let input = ParamsInput {
            file: None,
            data: Some("{not json".to_string()),
        };
        assert!(input.read().is_err());
    }

    #[test]
    fn test_page_args() {
        let args = PageArgs {
            limit: 5,
            after: Some("eval_9".to_string()),
            order: Some("DESC".to_string()),
        };
        let params = args.to_params().unwrap();
        assert_eq!(params.limit, Some(5));
        assert_eq!(params.after.as_deref(), Some("eval_9"));
        assert_eq!(params.order, Some(SortOrder::Desc));

        let bad = PageArgs {
            limit: 5,
            after: None,
            order: Some("up".to_string()),
        };
        assert!(bad.to_params().is_err());
    }
}
