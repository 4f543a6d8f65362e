//! Terminal output.
//!
//! Records go to stdout as JSON so they can be piped into `jq`; status
//! lines and notices are colored and go to stderr, except `success` and
//! `field`, which belong to the command's answer.

use anyhow::Result;
use chrono::{DateTime, Utc};
use colored::Colorize;
use serde::Serialize;
use serde_json::Value;

use strapi::Record;

pub fn success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

pub fn error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

/// Side note on stderr.
pub fn notice(msg: &str) {
    eprintln!("{}", msg.dimmed());
}

pub fn field(label: &str, value: &str) {
    println!("{}: {}", label.dimmed(), value);
}

/// A timestamp field with its distance from now, e.g. `in 42 min`.
pub fn time_field(label: &str, at: DateTime<Utc>) {
    let minutes = at.signed_duration_since(Utc::now()).num_minutes();
    let relative = if minutes >= 0 {
        format!("in {minutes} min")
    } else {
        format!("{} min ago", -minutes)
    };
    field(label, &format!("{} ({relative})", at.to_rfc3339()));
}

/// One JSON document, compact or indented.
pub fn value<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{json}");
    Ok(())
}

/// One record per line (or per indented block), with a notice when there
/// are none.
pub fn records(records: &[Record], pretty: bool) -> Result<()> {
    if records.is_empty() {
        notice("No records found.");
    }
    records.iter().try_for_each(|record| value(record, pretty))
}

/// Status line of a write, followed by the entry Strapi answered with.
/// An empty answer (`null`) prints nothing more.
pub fn written(msg: &str, answer: &Value) -> Result<()> {
    success(msg);
    if answer.is_null() {
        return Ok(());
    }
    value(answer, true)
}
