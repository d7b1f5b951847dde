//! Output formatting for the CLI.

use std::time::Duration;

use console::{style, StyledObject};
use indicatif::{ProgressBar, ProgressStyle};

/// Output handler for CLI messages. In JSON mode only `json` and `error`
/// print anything.
#[derive(Clone)]
pub struct Output {
    verbose: bool,
    json: bool,
}

impl Output {
    pub fn new(verbose: bool, json: bool) -> Self {
        Self { verbose, json }
    }

    fn mark(&self, mark: StyledObject<&str>, msg: &str) {
        if !self.json {
            println!("{} {}", mark, msg);
        }
    }

    pub fn success(&self, msg: &str) {
        self.mark(style("✓").green(), msg);
    }

    /// A dim remark under the main output.
    pub fn note(&self, msg: &str) {
        self.mark(style("·").dim(), &style(msg).dim().to_string());
    }

    /// Warnings go to stderr so they survive piping the report.
    pub fn warn(&self, msg: &str) {
        if !self.json {
            eprintln!("{} {}", style("⚠").yellow(), msg);
        }
    }

    pub fn error(&self, msg: &str) {
        if self.json {
            eprintln!("{}", serde_json::json!({ "error": msg }));
        } else {
            eprintln!("{} {}", style("✗").red(), style(msg).red());
        }
    }

    /// Only shown with `--verbose`.
    pub fn debug(&self, msg: &str) {
        if self.verbose && !self.json {
            eprintln!("{} {}", style("→").dim(), style(msg).dim());
        }
    }

    pub fn header(&self, msg: &str) {
        if !self.json {
            println!("\n{}", style(msg).bold().underlined());
        }
    }

    /// A bracketed group heading inside a header's body.
    pub fn section(&self, name: &str) {
        if !self.json {
            println!("  {}", style(format!("[{}]", name)).cyan());
        }
    }

    pub fn json<T: serde::Serialize>(&self, value: &T) {
        if let Ok(json) = serde_json::to_string_pretty(value) {
            println!("{}", json);
        }
    }

    pub fn kv(&self, key: &str, value: &str) {
        if !self.json {
            println!("  {}: {}", style(key).dim(), value);
        }
    }

    pub fn list_item(&self, item: &str) {
        if !self.json {
            println!("  {} {}", style("•").dim(), item);
        }
    }

    /// Left-aligned columns, each padded to its width.
    pub fn table_row(&self, cols: &[&str], widths: &[usize]) {
        if self.json {
            return;
        }
        let row: Vec<String> = cols
            .iter()
            .zip(widths)
            .map(|(col, width)| format!("{:<width$}", col, width = *width))
            .collect();
        println!("  {}", row.join("  ").trim_end());
    }

    /// Spinner shown while a simulated fetch is in flight. Hidden in JSON
    /// mode.
    pub fn spinner(&self, msg: &str) -> ProgressBar {
        if self.json {
            return ProgressBar::hidden();
        }
        let spinner = ProgressBar::new_spinner().with_message(msg.to_string());
        if let Ok(template) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            spinner.set_style(template);
        }
        spinner.enable_steady_tick(Duration::from_millis(80));
        spinner
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    pub fn is_json(&self) -> bool {
        self.json
    }
}

/// Colored label for a mount origin or outcome.
pub fn origin_badge(origin: &str) -> String {
    match origin {
        "source" => style(origin).green().to_string(),
        "error-fallback" => style(origin).yellow().to_string(),
        "container-missing" | "failed" => style(origin).red().to_string(),
        _ => origin.to_string(),
    }
}

/// Format a duration in milliseconds as a short human-readable string.
pub fn format_millis(ms: u64) -> String {
    if ms < 1000 {
        format!("{}ms", ms)
    } else {
        format!("{:.2}s", ms as f64 / 1000.0)
    }
}
