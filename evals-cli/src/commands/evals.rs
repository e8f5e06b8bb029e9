//! Evals commands

use anyhow::Result;
use clap::{Args, Subcommand};
use comfy_table::Cell;
use evals_sdk::{from_value, DeletionStatus, Eval, ListPage};
use serde_json::Value;

use super::{confirm, next_page_hint, PageArgs, ParamsInput};
use crate::context::Context;
use crate::output::{
    format_relative_time, format_timestamp, print_field, print_optional_field, print_section,
    TableDisplay,
};

/// Eval management commands
#[derive(Debug, Args)]
pub struct EvalsCommands {
    #[command(subcommand)]
    pub command: EvalsSubcommand,
}

#[derive(Debug, Subcommand)]
pub enum EvalsSubcommand {
    /// List evals
    List {
        #[command(flatten)]
        page: PageArgs,

        /// Sort field (created_at, updated_at)
        #[arg(long)]
        order_by: Option<String>,
    },

    /// Get eval details
    Get {
        /// Eval ID
        id: String,
    },

    /// Create a new eval
    Create {
        #[command(flatten)]
        params: ParamsInput,
    },

    /// Update an eval
    Update {
        /// Eval ID
        id: String,

        #[command(flatten)]
        params: ParamsInput,
    },

    /// Delete an eval
    Delete {
        /// Eval ID
        id: String,

        /// Force deletion without confirmation
        #[arg(long)]
        force: bool,
    },
}

/// Execute eval commands
pub async fn execute(ctx: &Context, cmd: EvalsCommands) -> Result<()> {
    match cmd.command {
        EvalsSubcommand::List { page, order_by } => list(ctx, page, order_by).await,
        EvalsSubcommand::Get { id } => get(ctx, &id).await,
        EvalsSubcommand::Create { params } => create(ctx, params).await,
        EvalsSubcommand::Update { id, params } => update(ctx, &id, params).await,
        EvalsSubcommand::Delete { id, force } => delete(ctx, &id, force).await,
    }
}

/// Displayable eval for output
#[derive(Debug)]
struct EvalDisplay {
    id: String,
    name: Option<String>,
    criteria: usize,
    data_source: Option<String>,
    created_at: Option<i64>,
}

impl From<Eval> for EvalDisplay {
    fn from(e: Eval) -> Self {
        Self {
            data_source: e
                .data_source_config
                .as_ref()
                .and_then(|c| c["type"].as_str())
                .map(str::to_string),
            id: e.id,
            name: e.name,
            criteria: e.testing_criteria.len(),
            created_at: e.created_at,
        }
    }
}

impl TableDisplay for EvalDisplay {
    fn to_row(&self) -> Vec<Cell> {
        vec![
            Cell::new(&self.id),
            Cell::new(self.name.as_deref().unwrap_or("-")),
            Cell::new(self.data_source.as_deref().unwrap_or("-")),
            Cell::new(self.criteria.to_string()),
            Cell::new(format_relative_time(self.created_at)),
        ]
    }

    fn display_single(&self) {
        print_section("Eval");
        print_field("ID", &self.id);
        print_optional_field("Name", self.name.as_deref());
        print_optional_field("Data Source", self.data_source.as_deref());
        print_field("Testing Criteria", &self.criteria.to_string());
        print_field("Created", &format_timestamp(self.created_at));
    }

    fn display_compact(&self) {
        println!(
            "{}\t{}\t{} criteria\t{}",
            self.id,
            self.name.as_deref().unwrap_or("-"),
            self.criteria,
            format_timestamp(self.created_at)
        );
    }
}

fn show_eval(ctx: &Context, raw: &Value) -> Result<()> {
    if ctx.output.is_raw() {
        return ctx.output.write_raw(raw);
    }
    let display: EvalDisplay = from_value::<Eval>(raw.clone())?.into();
    ctx.output.write(raw, &display)
}

async fn list(ctx: &Context, page: PageArgs, order_by: Option<String>) -> Result<()> {
    let client = ctx.create_client()?;

    let mut params = page.to_params()?;
    if let Some(field) = order_by {
        params = params.with_order_by(field);
    }

    let spinner = ctx.output.spinner("Fetching evals...");
    let raw = client.evals().list(Some(params)).await;
    if let Some(s) = spinner {
        s.finish_and_clear();
    }
    let raw = raw?;
    if ctx.output.is_raw() {
        return ctx.output.write_raw(&raw);
    }

    let page: ListPage<Eval> = from_value(raw.clone())?;
    let evals: Vec<EvalDisplay> = page.data.into_iter().map(Into::into).collect();
    ctx.output
        .write_list(&raw, &evals, &["ID", "Name", "Data Source", "Criteria", "Created"])?;

    next_page_hint(ctx, &raw);
    Ok(())
}

async fn get(ctx: &Context, id: &str) -> Result<()> {
    let client = ctx.create_client()?;

    let spinner = ctx.output.spinner("Fetching eval...");
    let raw = client.evals().retrieve(id).await;
    if let Some(s) = spinner {
        s.finish_and_clear();
    }

    show_eval(ctx, &raw?)
}

async fn create(ctx: &Context, params: ParamsInput) -> Result<()> {
    let client = ctx.create_client()?;
    let body = params.read()?;

    let spinner = ctx.output.spinner("Creating eval...");
    let raw = client.evals().create(&body).await;
    if let Some(s) = spinner {
        s.finish_and_clear();
    }
    let raw = raw?;

    ctx.output.success(&format!(
        "Created eval: {}",
        raw["id"].as_str().unwrap_or("-")
    ));
    show_eval(ctx, &raw)
}

async fn update(ctx: &Context, id: &str, params: ParamsInput) -> Result<()> {
    let client = ctx.create_client()?;
    let body = params.read()?;

    let spinner = ctx.output.spinner("Updating eval...");
    let raw = client.evals().update(id, &body).await;
    if let Some(s) = spinner {
        s.finish_and_clear();
    }
    let raw = raw?;

    ctx.output.success("Eval updated");
    show_eval(ctx, &raw)
}

async fn delete(ctx: &Context, id: &str, force: bool) -> Result<()> {
    if !force && !confirm(format!("Delete eval {}?", id))? {
        ctx.output.info("Cancelled");
        return Ok(());
    }

    let client = ctx.create_client()?;

    let spinner = ctx.output.spinner("Deleting eval...");
    let raw = client.evals().delete(id).await;
    if let Some(s) = spinner {
        s.finish_and_clear();
    }
    let raw = raw?;

    if ctx.output.is_raw() {
        ctx.output.write_raw(&raw)?;
    }

    let status: DeletionStatus = from_value(raw)?;
    if !status.deleted {
        anyhow::bail!("Eval {} was not deleted", id);
    }
    if !ctx.output.is_raw() {
        ctx.output.success(&format!("Deleted eval: {}", id));
    }

    Ok(())
}
