//! `switchboard dispatch` — fan one event out to webhook subscribers.

use anyhow::{Context, Result};
use colored::Colorize;
use serde_json::Value;

use switchboard_core::config::load_config;

/// Run the dispatch command.
///
/// Delivery failures are reported but never turn into a non-zero exit; only
/// a malformed payload does.
pub async fn run(event: &str, payload: Option<&str>) -> Result<()> {
    let payload = parse_payload(payload)?;
    let config = load_config(None);
    let dispatcher = crate::build_dispatcher(&config)?;

    let summary = dispatcher.dispatch(event, payload).await;

    println!();
    if summary.matched == 0 {
        println!("  {} no active subscribers for {}", "·".dimmed(), event.bold());
    } else {
        println!(
            "  {} {} → {} matched, {} delivered, {}",
            "⚡".cyan(),
            event.bold(),
            summary.matched,
            summary.delivered.to_string().green(),
            if summary.failed > 0 {
                format!("{} failed", summary.failed).red().to_string()
            } else {
                "0 failed".dimmed().to_string()
            }
        );
    }
    println!();

    Ok(())
}

/// Parse the `--payload` argument. Absent means an empty object.
fn parse_payload(raw: Option<&str>) -> Result<Value> {
    match raw.map(str::trim) {
        None | Some("") => Ok(Value::Object(Default::default())),
        Some(raw) => serde_json::from_str(raw).context("payload is not valid JSON"),
    }
}
