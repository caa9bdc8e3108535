//! Terminal output utilities

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use projwiz_core::types::{StepRecord, StepStatus};

/// Print a success message
pub fn success(msg: &str) {
    println!("{} {}", style("✓").green().bold(), msg);
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{} {}", style("✗").red().bold(), msg);
}

/// Print a warning message
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("⚠").yellow().bold(), msg);
}

/// Print an info message
pub fn info(msg: &str) {
    println!("{} {}", style("ℹ").blue().bold(), msg);
}

/// Print a header
pub fn header(msg: &str) {
    println!("\n{}", style(msg).bold().underlined());
}

/// Print a key-value pair
pub fn kv(key: &str, value: &str) {
    println!("  {}: {}", style(key).dim(), value);
}

/// Create a spinner
pub fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

/// One-line rendering of a step with a status glyph
pub fn step_line(record: &StepRecord) -> String {
    let glyph = match record.status {
        StepStatus::Ok => style("✓").green().bold(),
        StepStatus::Degraded => style("⚠").yellow().bold(),
        StepStatus::Skipped => style("-").dim(),
        StepStatus::Failed => style("✗").red().bold(),
    };
    if record.detail.is_empty() {
        format!("{} {}", glyph, record.step)
    } else {
        format!("{} {} {}", glyph, record.step, style(&record.detail).dim())
    }
}
