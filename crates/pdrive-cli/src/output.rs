//! CLI output formatting
//!
//! Human output mirrors the activity-log severities of the terminal UI
//! (check mark, cross, warning sign, indented info); JSON output emits one
//! object per message so scripts can consume it line-wise.

use pdrive_core::domain::console::Severity;

/// Output format selector
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputFormat {
    Human,
    Json,
}

/// Trait for formatting CLI output
///
/// `Send + Sync` so a formatter can follow a streaming task.
pub trait OutputFormatter: Send + Sync {
    fn success(&self, message: &str);
    fn error(&self, message: &str);
    fn warn(&self, message: &str);
    fn info(&self, message: &str);
    /// Raw passthrough for tool output lines (no decoration)
    fn plain(&self, message: &str);
    fn print_json(&self, value: &serde_json::Value);

    /// Dispatch on a classified severity
    fn severity(&self, severity: Severity, message: &str) {
        match severity {
            Severity::Success => self.success(message),
            Severity::Error => self.error(message),
            Severity::Warning => self.warn(message),
            Severity::Info => self.info(message),
        }
    }
}

/// Human-readable output formatter with checkmarks and indentation
pub struct HumanFormatter {
    /// Suppress info/plain lines (--quiet)
    quiet: bool,
}

impl OutputFormatter for HumanFormatter {
    fn success(&self, message: &str) {
        println!("\u{2713} {}", message);
    }
    fn error(&self, message: &str) {
        eprintln!("\u{2717} Error: {}", message);
    }
    fn warn(&self, message: &str) {
        eprintln!("\u{26a0} Warning: {}", message);
    }
    fn info(&self, message: &str) {
        if !self.quiet {
            println!("  {}", message);
        }
    }
    fn plain(&self, message: &str) {
        if !self.quiet {
            println!("{}", message);
        }
    }
    fn print_json(&self, _value: &serde_json::Value) {
        // Human formatter doesn't print JSON
    }
}

/// JSON output formatter
pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn success(&self, message: &str) {
        println!(
            "{}",
            serde_json::json!({"success": true, "message": message})
        );
    }
    fn error(&self, message: &str) {
        eprintln!(
            "{}",
            serde_json::json!({"success": false, "error": message})
        );
    }
    fn warn(&self, message: &str) {
        eprintln!(
            "{}",
            serde_json::json!({"level": "warning", "message": message})
        );
    }
    fn info(&self, _message: &str) {}
    fn plain(&self, message: &str) {
        println!("{}", serde_json::json!({"level": "output", "message": message}));
    }
    fn print_json(&self, value: &serde_json::Value) {
        println!(
            "{}",
            serde_json::to_string_pretty(value).unwrap_or_default()
        );
    }
}

pub fn get_formatter(json: bool, quiet: bool) -> Box<dyn OutputFormatter> {
    if json {
        Box::new(JsonFormatter)
    } else {
        Box::new(HumanFormatter { quiet })
    }
}
