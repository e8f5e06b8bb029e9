//! Output formatting for CLI

use anyhow::Result;
use clap::ValueEnum;
use colored::Colorize;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Cell, Color, Table};
use serde_json::Value;

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    /// Table format (default)
    #[default]
    Table,
    /// Raw JSON response
    Json,
    /// Raw response as YAML
    Yaml,
    /// Compact format (single line per item)
    Compact,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Table => write!(f, "table"),
            Self::Json => write!(f, "json"),
            Self::Yaml => write!(f, "yaml"),
            Self::Compact => write!(f, "compact"),
        }
    }
}

/// Output writer that handles different formats.
///
/// JSON and YAML print the response exactly as the API returned it; table and
/// compact render the typed view.
pub struct OutputWriter {
    format: OutputFormat,
}

impl OutputWriter {
    /// Create a new output writer
    pub fn new(format: OutputFormat, no_color: bool) -> Self {
        if no_color {
            colored::control::set_override(false);
        }
        Self { format }
    }

    /// The active format
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Whether the response is printed as-is (JSON or YAML)
    pub fn is_raw(&self) -> bool {
        matches!(self.format(), OutputFormat::Json | OutputFormat::Yaml)
    }

    /// Write a single item
    pub fn write<T: TableDisplay>(&self, raw: &Value, item: &T) -> Result<()> {
        match self.format {
            OutputFormat::Table => item.display_single(),
            OutputFormat::Compact => item.display_compact(),
            OutputFormat::Json | OutputFormat::Yaml => self.write_raw(raw)?,
        }
        Ok(())
    }

    /// Write a list of items
    pub fn write_list<T: TableDisplay>(
        &self,
        raw: &Value,
        items: &[T],
        headers: &[&str],
    ) -> Result<()> {
        match self.format {
            OutputFormat::Table => {
                if items.is_empty() {
                    println!("{}", "No items found.".dimmed());
                    return Ok(());
                }
                println!("{}", render_table(items, headers));
                println!(
                    "\n{} {} item(s)",
                    "Total:".bold(),
                    items.len().to_string().green()
                );
            }
            OutputFormat::Compact => {
                for item in items {
                    item.display_compact();
                }
            }
            OutputFormat::Json | OutputFormat::Yaml => self.write_raw(raw)?,
        }
        Ok(())
    }

    /// Print a response value as JSON or YAML
    pub fn write_raw(&self, raw: &Value) -> Result<()> {
        match self.format {
            OutputFormat::Yaml => print!("{}", serde_yaml::to_string(raw)?),
            _ => println!("{}", serde_json::to_string_pretty(raw)?),
        }
        Ok(())
    }

    /// Write a success message
    pub fn success(&self, message: &str) {
        if self.format == OutputFormat::Table {
            println!("{} {}", "✓".green(), message);
        } else {
            eprintln!("{}", message);
        }
    }

    /// Write an error message
    pub fn error(&self, message: &str) {
        if self.format == OutputFormat::Table {
            eprintln!("{} {}", "✗".red(), message);
        } else {
            eprintln!("Error: {}", message);
        }
    }

    /// Write an info message
    pub fn info(&self, message: &str) {
        if self.format == OutputFormat::Table {
            println!("{} {}", "ℹ".blue(), message);
        } else {
            eprintln!("{}", message);
        }
    }

    /// Start a spinner for long operations
    pub fn spinner(&self, message: &str) -> Option<indicatif::ProgressBar> {
        if self.format != OutputFormat::Table {
            return None;
        }

        let pb = indicatif::ProgressBar::new_spinner();
        if let Ok(style) = indicatif::ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            pb.set_style(style);
        }
        pb.set_message(message.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        Some(pb)
    }
}

/// Trait for displaying items in a table
pub trait TableDisplay {
    /// Convert item to a table row
    fn to_row(&self) -> Vec<Cell>;

    /// Display a single item in detail
    fn display_single(&self);

    /// Display in compact format
    fn display_compact(&self);
}

/// Render items as a table with colored headers
pub fn render_table<T: TableDisplay>(items: &[T], headers: &[&str]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.apply_modifier(UTF8_ROUND_CORNERS);

    let header_cells: Vec<Cell> = headers
        .iter()
        .map(|h| Cell::new(h).fg(Color::Cyan))
        .collect();
    table.set_header(header_cells);

    for item in items {
        table.add_row(item.to_row());
    }
    table
}

/// Print a key-value pair in detail format
pub fn print_field(key: &str, value: &str) {
    println!("  {}: {}", key.cyan(), value);
}

/// Print an optional key-value pair
pub fn print_optional_field(key: &str, value: Option<&str>) {
    if let Some(v) = value {
        print_field(key, v);
    }
}

/// Print a section header
pub fn print_section(title: &str) {
    println!("\n{}", title.bold().underline());
}

/// Format a unix timestamp for display
pub fn format_timestamp(secs: Option<i64>) -> String {
    secs.and_then(|s| chrono::DateTime::from_timestamp(s, 0))
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// Format a unix timestamp relative to now
pub fn format_relative_time(secs: Option<i64>) -> String {
    let Some(dt) = secs.and_then(|s| chrono::DateTime::from_timestamp(s, 0)) else {
        return "-".to_string();
    };
    let diff = chrono::Utc::now().signed_duration_since(dt);

    if diff.num_seconds() < 60 {
        "just now".to_string()
    } else if diff.num_minutes() < 60 {
        format!("{} minute(s) ago", diff.num_minutes())
    } else if diff.num_hours() < 24 {
        format!("{} hour(s) ago", diff.num_hours())
    } else if diff.num_days() < 30 {
        format!("{} day(s) ago", diff.num_days())
    } else {
        format_timestamp(secs)
    }
}

/// Status badge with color
pub fn status_badge(status: &str) -> String {
    match status.to_lowercase().as_str() {
        "in_progress" | "running" => status.blue().to_string(),
        "completed" | "pass" => status.green().to_string(),
        "failed" | "fail" | "error" => status.red().to_string(),
        "queued" => status.yellow().to_string(),
        "canceled" => status.dimmed().to_string(),
        _ => status.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Row(&'static str);

    impl TableDisplay for Row {
        fn to_row(&self) -> Vec<Cell> {
            vec![Cell::new(self.0)]
        }
        fn display_single(&self) {}
        fn display_compact(&self) {}
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(Some(0)), "1970-01-01 00:00:00 UTC");
        assert_eq!(format_timestamp(None), "-");
        assert_eq!(format_relative_time(None), "-");
    }

    #[test]
    fn test_relative_time_falls_back_to_absolute() {
        assert_eq!(format_relative_time(Some(0)), "1970-01-01 00:00:00 UTC");
    }

    #[test]
    fn test_output_format_display() {
        assert_eq!(OutputFormat::Table.to_string(), "table");
        assert_eq!(OutputFormat::Json.to_string(), "json");
        assert_eq!(OutputFormat::Yaml.to_string(), "yaml");
        assert_eq!(
            OutputFormat::from_str("compact", true).unwrap(),
            OutputFormat::Compact
        );
    }

    #[test]
    fn test_raw_formats() {
        assert!(OutputWriter::new(OutputFormat::Json, false).is_raw());
        assert!(OutputWriter::new(OutputFormat::Yaml, false).is_raw());
        assert!(!OutputWriter::new(OutputFormat::Table, false).is_raw());
        assert!(!OutputWriter::new(OutputFormat::Compact, false).is_raw());
    }

    #[test]
    fn test_status_badge_plain() {
        colored::control::set_override(false);
        assert_eq!(status_badge("canceled"), "canceled");
        assert_eq!(status_badge("unknown"), "unknown");
    }

    #[test]
    fn test_render_table_contains_rows() {
        let rendered = render_table(&[Row("eval_1"), Row("eval_2")], &["ID"]).to_string();
        assert!(rendered.contains("eval_1"));
        assert!(rendered.contains("eval_2"));
    }
}
