//! Eval run commands

use anyhow::Result;
use clap::{Args, Subcommand};
use comfy_table::Cell;
use evals_sdk::{from_value, DeletionStatus, EvalRun, ListPage};
use serde_json::Value;

use super::{confirm, next_page_hint, PageArgs, ParamsInput};
use crate::context::Context;
use crate::output::{
    format_relative_time, format_timestamp, print_field, print_optional_field, print_section,
    status_badge, TableDisplay,
};

/// Run management commands
#[derive(Debug, Args)]
pub struct RunsCommands {
    #[command(subcommand)]
    pub command: RunsSubcommand,
}

#[derive(Debug, Subcommand)]
pub enum RunsSubcommand {
    /// List runs of an eval
    List {
        /// Eval ID
        eval_id: String,

        #[command(flatten)]
        page: PageArgs,

        /// Filter by status (queued, in_progress, completed, canceled, failed)
        #[arg(short, long)]
        status: Option<String>,
    },

    /// Get run details
    Get {
        /// Eval ID
        eval_id: String,

        /// Run ID
        id: String,
    },

    /// Start a run
    Create {
        /// Eval ID
        eval_id: String,

        #[command(flatten)]
        params: ParamsInput,
    },

    /// Cancel an in-progress run
    Cancel {
        /// Eval ID
        eval_id: String,

        /// Run ID
        id: String,
    },

    /// Delete a run
    Delete {
        /// Eval ID
        eval_id: String,

        /// Run ID
        id: String,

        /// Force deletion without confirmation
        #[arg(long)]
        force: bool,
    },
}

/// Execute run commands
pub async fn execute(ctx: &Context, cmd: RunsCommands) -> Result<()> {
    match cmd.command {
        RunsSubcommand::List {
            eval_id,
            page,
            status,
        } => list(ctx, &eval_id, page, status).await,
        RunsSubcommand::Get { eval_id, id } => get(ctx, &eval_id, &id).await,
        RunsSubcommand::Create { eval_id, params } => create(ctx, &eval_id, params).await,
        RunsSubcommand::Cancel { eval_id, id } => cancel(ctx, &eval_id, &id).await,
        RunsSubcommand::Delete { eval_id, id, force } => delete(ctx, &eval_id, &id, force).await,
    }
}

/// Displayable run for output
#[derive(Debug)]
struct RunDisplay {
    id: String,
    eval_id: String,
    name: Option<String>,
    status: String,
    model: Option<String>,
    counts: Option<String>,
    report_url: Option<String>,
    error: Option<String>,
    created_at: Option<i64>,
}

impl From<EvalRun> for RunDisplay {
    fn from(r: EvalRun) -> Self {
        Self {
            counts: r.result_counts.as_ref().map(|c| {
                format!(
                    "{}/{} passed, {} failed, {} errored",
                    c.passed, c.total, c.failed, c.errored
                )
            }),
            error: r
                .error
                .as_ref()
                .filter(|e| !e.is_null())
                .map(|e| e["message"].as_str().map_or_else(|| e.to_string(), str::to_string)),
            status: r.status.unwrap_or_else(|| "-".to_string()),
            id: r.id,
            eval_id: r.eval_id,
            name: r.name,
            model: r.model,
            report_url: r.report_url,
            created_at: r.created_at,
        }
    }
}

impl TableDisplay for RunDisplay {
    fn to_row(&self) -> Vec<Cell> {
        vec![
            Cell::new(&self.id),
            Cell::new(self.name.as_deref().unwrap_or("-")),
            Cell::new(status_badge(&self.status)),
            Cell::new(self.model.as_deref().unwrap_or("-")),
            Cell::new(self.counts.as_deref().unwrap_or("-")),
            Cell::new(format_relative_time(self.created_at)),
        ]
    }

    fn display_single(&self) {
        print_section("Run");
        print_field("ID", &self.id);
        print_field("Eval ID", &self.eval_id);
        print_optional_field("Name", self.name.as_deref());
        print_field("Status", &status_badge(&self.status));
        print_optional_field("Model", self.model.as_deref());
        print_optional_field("Results", self.counts.as_deref());
        print_optional_field("Error", self.error.as_deref());
        print_optional_field("Report", self.report_url.as_deref());
        print_field("Created", &format_timestamp(self.created_at));
    }

    fn display_compact(&self) {
        println!(
            "{}\t{}\t{}\t{}",
            self.id,
            self.status,
            self.name.as_deref().unwrap_or("-"),
            format_timestamp(self.created_at)
        );
    }
}

fn show_run(ctx: &Context, raw: &Value) -> Result<()> {
    if ctx.output.is_raw() {
        return ctx.output.write_raw(raw);
    }
    let display: RunDisplay = from_value::<EvalRun>(raw.clone())?.into();
    ctx.output.write(raw, &display)
}

async fn list(
    ctx: &Context,
    eval_id: &str,
    page: PageArgs,
    status: Option<String>,
) -> Result<()> {
    let client = ctx.create_client()?;

    let mut params = page.to_params()?;
    if let Some(s) = status {
        params = params.with_status(s);
    }

    let spinner = ctx.output.spinner("Fetching runs...");
    let raw = client.evals().runs().list(eval_id, Some(params)).await;
    if let Some(s) = spinner {
        s.finish_and_clear();
    }
    let raw = raw?;
    if ctx.output.is_raw() {
        return ctx.output.write_raw(&raw);
    }

    let page: ListPage<EvalRun> = from_value(raw.clone())?;
    let runs: Vec<RunDisplay> = page.data.into_iter().map(Into::into).collect();
    ctx.output.write_list(
        &raw,
        &runs,
        &["ID", "Name", "Status", "Model", "Results", "Created"],
    )?;

    next_page_hint(ctx, &raw);
    Ok(())
}

async fn get(ctx: &Context, eval_id: &str, id: &str) -> Result<()> {
    let client = ctx.create_client()?;

    let spinner = ctx.output.spinner("Fetching run...");
    let raw = client.evals().runs().retrieve(eval_id, id).await;
    if let Some(s) = spinner {
        s.finish_and_clear();
    }

    show_run(ctx, &raw?)
}

async fn create(ctx: &Context, eval_id: &str, params: ParamsInput) -> Result<()> {
    let client = ctx.create_client()?;
    let body = params.read()?;

    let spinner = ctx.output.spinner("Starting run...");
    let raw = client.evals().runs().create(eval_id, &body).await;
    if let Some(s) = spinner {
        s.finish_and_clear();
    }
    let raw = raw?;

    ctx.output.success(&format!(
        "Created run: {}",
        raw["id"].as_str().unwrap_or("-")
    ));
    show_run(ctx, &raw)
}

async fn cancel(ctx: &Context, eval_id: &str, id: &str) -> Result<()> {
    let client = ctx.create_client()?;

    let spinner = ctx.output.spinner("Canceling run...");
    let raw = client.evals().runs().cancel(eval_id, id).await;
    if let Some(s) = spinner {
        s.finish_and_clear();
    }
    let raw = raw?;

    ctx.output.success(&format!("Cancel requested for run: {}", id));
    show_run(ctx, &raw)
}

async fn delete(ctx: &Context, eval_id: &str, id: &str, force: bool) -> Result<()> {
    if !force && !confirm(format!("Delete run {} of eval {}?", id, eval_id))? {
        ctx.output.info("Cancelled");
        return Ok(());
    }

    let client = ctx.create_client()?;

    let spinner = ctx.output.spinner("Deleting run...");
    let raw = client.evals().runs().delete(eval_id, id).await;
    if let Some(s) = spinner {
        s.finish_and_clear();
    }
    let raw = raw?;

    if ctx.output.is_raw() {
        ctx.output.write_raw(&raw)?;
    }

    let status: DeletionStatus = from_value(raw)?;
    if !status.deleted {
        anyhow::bail!("Run {} was not deleted", id);
    }
    if !ctx.output.is_raw() {
        ctx.output.success(&format!("Deleted run: {}", id));
    }

    Ok(())
}
