//! Run output item commands

use anyhow::Result;
use clap::{Args, Subcommand};
use comfy_table::Cell;
use evals_sdk::{from_value, ListPage, OutputItem};
use serde_json::Value;

use super::{next_page_hint, PageArgs};
use crate::context::Context;
use crate::output::{
    format_timestamp, print_field, print_section, status_badge, TableDisplay,
};

/// Output item commands
#[derive(Debug, Args)]
pub struct OutputItemsCommands {
    #[command(subcommand)]
    pub command: OutputItemsSubcommand,
}

#[derive(Debug, Subcommand)]
pub enum OutputItemsSubcommand {
    /// List output items of a run
    List {
        /// Eval ID
        eval_id: String,

        /// Run ID
        run_id: String,

        #[command(flatten)]
        page: PageArgs,

        /// Filter by status (pass, fail)
        #[arg(short, long)]
        status: Option<String>,
    },

    /// Get a single output item
    Get {
        /// Eval ID
        eval_id: String,

        /// Run ID
        run_id: String,

        /// Output item ID
        id: String,
    },
}

/// Execute output item commands
pub async fn execute(ctx: &Context, cmd: OutputItemsCommands) -> Result<()> {
    match cmd.command {
        OutputItemsSubcommand::List {
            eval_id,
            run_id,
            page,
            status,
        } => list(ctx, &eval_id, &run_id, page, status).await,
        OutputItemsSubcommand::Get {
            eval_id,
            run_id,
            id,
        } => get(ctx, &eval_id, &run_id, &id).await,
    }
}

#[derive(Debug)]
struct OutputItemDisplay {
    id: String,
    run_id: String,
    status: String,
    datasource_item_id: Option<u64>,
    results: Vec<(String, bool)>,
    created_at: Option<i64>,
}

impl From<OutputItem> for OutputItemDisplay {
    fn from(item: OutputItem) -> Self {
        let results = item
            .results
            .iter()
            .map(|r| {
                (
                    r["name"].as_str().unwrap_or("-").to_string(),
                    r["passed"].as_bool().unwrap_or(false),
                )
            })
            .collect();

        Self {
            id: item.id,
            run_id: item.run_id,
            status: item.status.unwrap_or_else(|| "-".to_string()),
            datasource_item_id: item.datasource_item_id,
            results,
            created_at: item.created_at,
        }
    }
}

impl OutputItemDisplay {
    fn passed(&self) -> usize {
        self.results.iter().filter(|(_, passed)| *passed).count()
    }

    fn summary(&self) -> String {
        format!("{}/{}", self.passed(), self.results.len())
    }
}

impl TableDisplay for OutputItemDisplay {
    fn to_row(&self) -> Vec<Cell> {
        vec![
            Cell::new(&self.id),
            Cell::new(status_badge(&self.status)),
            Cell::new(
                self.datasource_item_id
                    .map_or_else(|| "-".to_string(), |i| i.to_string()),
            ),
            Cell::new(self.summary()),
            Cell::new(format_timestamp(self.created_at)),
        ]
    }

    fn display_single(&self) {
        print_section("Output Item");
        print_field("ID", &self.id);
        print_field("Run ID", &self.run_id);
        print_field("Status", &status_badge(&self.status));
        if let Some(item) = self.datasource_item_id {
            print_field("Datasource Item", &item.to_string());
        }
        print_field("Created", &format_timestamp(self.created_at));

        if !self.results.is_empty() {
            print_section("Grader Results");
            for (name, passed) in &self.results {
                let verdict = if *passed { "pass" } else { "fail" };
                print_field(name, &status_badge(verdict));
            }
        }
    }

    fn display_compact(&self) {
        println!("{}\t{}\t{}", self.id, self.status, self.summary());
    }
}

async fn list(
    ctx: &Context,
    eval_id: &str,
    run_id: &str,
    page: PageArgs,
    status: Option<String>,
) -> Result<()> {
    let client = ctx.create_client()?;

    let mut params = page.to_params()?;
    if let Some(s) = status {
        params = params.with_status(s);
    }

    let spinner = ctx.output.spinner("Fetching output items...");
    let raw = client
        .evals()
        .runs()
        .output_items()
        .list(eval_id, run_id, Some(params))
        .await;
    if let Some(s) = spinner {
        s.finish_and_clear();
    }
    let raw = raw?;
    if ctx.output.is_raw() {
        return ctx.output.write_raw(&raw);
    }

    let page: ListPage<OutputItem> = from_value(raw.clone())?;
    let items: Vec<OutputItemDisplay> = page.data.into_iter().map(Into::into).collect();
    ctx.output.write_list(
        &raw,
        &items,
        &["ID", "Status", "Datasource Item", "Passed", "Created"],
    )?;

    next_page_hint(ctx, &raw);
    Ok(())
}

async fn get(ctx: &Context, eval_id: &str, run_id: &str, id: &str) -> Result<()> {
    let client = ctx.create_client()?;

    let spinner = ctx.output.spinner("Fetching output item...");
    let raw = client
        .evals()
        .runs()
        .output_items()
        .retrieve(eval_id, run_id, id)
        .await;
    if let Some(s) = spinner {
        s.finish_and_clear();
    }
    let raw: Value = raw?;
    if ctx.output.is_raw() {
        return ctx.output.write_raw(&raw);
    }

    let display: OutputItemDisplay = from_value::<OutputItem>(raw.clone())?.into();
    ctx.output.write(&raw, &display)
}
