//! Snapshot rendering for text and JSON output.
//!
//! This is the presentation boundary: minor-unit monetary values become
//! major units here and nowhere earlier.

use anyhow::Result;
use chrono::{DateTime, Utc};

use pinch_core::{UsageBucket, UsageLevel, UsageSnapshot};

use crate::OutputFormat;

/// Prints a snapshot in the requested format.
pub fn print_snapshot(snapshot: &UsageSnapshot, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => print!("{}", render_text(snapshot)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(snapshot)?),
    }
    Ok(())
}

fn render_text(snapshot: &UsageSnapshot) -> String {
    if let Some(error) = &snapshot.error {
        return format!("Error: {error}\n");
    }

    let mut out = String::new();
    out.push_str(&render_bucket("5-hour", &snapshot.five_hour));
    out.push_str(&render_bucket("7-day", &snapshot.seven_day));
    out.push_str(&render_bucket("7-day Sonnet", &snapshot.seven_day_sonnet));

    let extra = &snapshot.extra_usage;
    if extra.enabled {
        out.push_str(&format!(
            "Extra usage:  ${:.2} / ${:.2} ({:.1}%)\n",
            extra.used_credits_major(),
            extra.monthly_limit_major(),
            extra.utilization,
        ));
    }

    if let Some(updated) = snapshot.last_updated {
        out.push_str(&format!("Updated:      {}\n", format_time(updated)));
    }
    out
}

fn render_bucket(label: &str, bucket: &UsageBucket) -> String {
    let marker = match bucket.level() {
        UsageLevel::Ok => " ",
        UsageLevel::Warning => "!",
        UsageLevel::Critical => "!!",
    };
    let resets = bucket
        .resets_at
        .map(|at| format!("  resets {}", format_time(at)))
        .unwrap_or_default();
    format!(
        "{label:<13}{:>5.1}% {marker:<2}{resets}\n",
        bucket.utilization
    )
}

fn format_time(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M UTC").to_string()
}

// ============================================================================
// Tests
// ============================================================================
