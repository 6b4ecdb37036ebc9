//! `switchboard status` — show configuration, provider and webhook status.

use anyhow::Result;
use colored::Colorize;

use switchboard_core::config::{get_config_path, load_config};
use switchboard_core::types::WILDCARD_EVENT;
use switchboard_providers::registry::{find_by_name, PROVIDERS};

use crate::helpers::mark;

/// Run the status command.
pub async fn run() -> Result<()> {
    let config = load_config(None);
    let config_path = get_config_path();

    println!();
    println!("{}", "⚡ Switchboard Status".cyan().bold());
    println!();

    println!(
        "  {:<18} {} {}",
        "Config:".bold(),
        config_path.display(),
        if config_path.exists() {
            "✓".green().to_string()
        } else {
            "(not found)".red().to_string()
        }
    );

    // Providers, in the order they are tried
    println!();
    println!("  {}", "Providers (fallback order):".bold());
    for spec in PROVIDERS {
        let provider = config.providers.get(spec.id);
        let model = provider.model.as_deref().unwrap_or(spec.default_model);
        println!(
            "    {:<12} {:<28} {}",
            spec.display_name,
            model.dimmed(),
            mark(provider.is_configured(), "key set", "not configured")
        );
    }

    // Preferred provider
    println!();
    let preference = crate::build_preference(&config);
    let preferred = match preference.preferred_provider().await {
        Ok(Some(id)) => id.to_string(),
        Ok(None) => "none (fixed order)".dimmed().to_string(),
        Err(e) => format!("{} {e}", "unreadable:".red()),
    };
    println!("  {:<18} {}", "Preferred:".bold(), preferred);
    match &config.assistant.settings_path {
        Some(path) => println!("  {:<18} {}", "Settings file:".bold(), path),
        None => {
            if let Some(raw) = config.assistant.preferred_provider.as_deref() {
                if !raw.trim().is_empty() && find_by_name(raw).is_none() {
                    println!(
                        "  {:<18} {}",
                        "",
                        format!("(ignoring unknown provider '{raw}')").yellow()
                    );
                }
            }
        }
    }
    println!(
        "  {:<18} {}",
        "Timeouts:".bold(),
        format!(
            "provider {}s | webhook {}s",
            config.assistant.attempt_timeout_secs, config.webhooks.delivery_timeout_secs
        )
        .dimmed()
    );

    // Webhooks
    println!();
    let store = crate::build_subscription_store(&config);
    let source = config
        .webhooks
        .store_path
        .clone()
        .unwrap_or_else(|| "inline config".to_string());
    match store.active_subscriptions().await {
        Ok(subs) => {
            let wildcard = subs
                .iter()
                .filter(|s| s.events.iter().any(|e| e == WILDCARD_EVENT))
                .count();
            println!(
                "  {:<18} {} active ({} wildcard) from {}",
                "Webhooks:".bold(),
                subs.len(),
                wildcard,
                source.dimmed()
            );
        }
        Err(e) => println!("  {:<18} {} {e}", "Webhooks:".bold(), "unreadable:".red()),
    }

    println!();

    Ok(())
}
