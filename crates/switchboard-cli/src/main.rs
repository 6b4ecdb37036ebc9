//! Switchboard CLI — entry point.
//!
//! # Commands
//!
//! - `switchboard chat [-m MESSAGE] [-t TEMPLATE]` — site chat (single-shot or REPL)
//! - `switchboard assist -m MESSAGE [-t TEMPLATE]` — one admin content-assist reply
//! - `switchboard dispatch EVENT [-p JSON]` — fan an event out to webhook subscribers
//! - `switchboard status` — show configuration, provider and webhook status
//! - `switchboard onboard` — write a default config

mod dispatch_cmd;
mod helpers;
mod onboard;
mod repl;
mod status;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use switchboard_core::config::{load_config, Config, PersonaConfig};
use switchboard_core::types::ConversationTurn;
use switchboard_core::utils::expand_home;
use switchboard_providers::{
    build_adapters, build_http_client, CompletionGateway, Persona, PreferenceSource,
    SettingsFilePreference, StaticPreference,
};
use switchboard_webhooks::{
    build_webhook_client, JsonFileSubscriptionStore, StaticSubscriptionStore, SubscriptionStore,
    WebhookDispatcher, WebhookRegistry,
};

// ─────────────────────────────────────────────
// CLI definition
// ─────────────────────────────────────────────

/// ⚡ Switchboard — multi-provider assistant and webhook fan-out
#[derive(Parser)]
#[command(name = "switchboard", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Chat as a site visitor (single-shot or interactive REPL)
    Chat {
        /// Single message (non-interactive). Omit for REPL mode.
        #[arg(short, long)]
        message: Option<String>,

        /// Prompt template merged into every request
        #[arg(short, long)]
        template: Option<String>,

        /// Enable debug logging
        #[arg(long, default_value_t = false)]
        logs: bool,
    },

    /// Ask the admin content assistant for one reply
    Assist {
        /// What to write or rewrite
        #[arg(short, long)]
        message: String,

        /// Prompt template, e.g. "Write a meta description under 160 characters."
        #[arg(short, long)]
        template: Option<String>,

        /// Enable debug logging
        #[arg(long, default_value_t = false)]
        logs: bool,
    },

    /// Deliver an event to every matching webhook subscriber
    Dispatch {
        /// Event name, e.g. "audit.requested"
        event: String,

        /// JSON payload (defaults to `{}`)
        #[arg(short, long)]
        payload: Option<String>,

        /// Enable debug logging
        #[arg(long, default_value_t = false)]
        logs: bool,
    },

    /// Show configuration and provider status
    Status,

    /// Initialize configuration
    Onboard,
}

// ─────────────────────────────────────────────
// Entrypoint
// ─────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Chat {
            message,
            template,
            logs,
        } => {
            init_logging(logs);
            run_chat(message, template).await
        }
        Commands::Assist {
            message,
            template,
            logs,
        } => {
            init_logging(logs);
            run_assist(message, template).await
        }
        Commands::Dispatch {
            event,
            payload,
            logs,
        } => {
            init_logging(logs);
            dispatch_cmd::run(&event, payload.as_deref()).await
        }
        Commands::Status => status::run().await,
        Commands::Onboard => onboard::run(),
    }
}

// ─────────────────────────────────────────────
// Chat / assist commands
// ─────────────────────────────────────────────

async fn run_chat(message: Option<String>, template: Option<String>) -> Result<()> {
    let config = load_config(None);
    let gateway = build_gateway(&config, &config.assistant.chat)?;

    match message {
        Some(msg) => {
            info!("processing single chat message");
            let reply = gateway
                .complete(&[ConversationTurn::user(msg)], template.as_deref())
                .await;
            helpers::print_reply(&reply);
        }
        None => repl::run(gateway, template.as_deref()).await?,
    }

    Ok(())
}

async fn run_assist(message: String, template: Option<String>) -> Result<()> {
    let config = load_config(None);
    let gateway = build_gateway(&config, &config.assistant.assist)?;

    let reply = gateway
        .complete(&[ConversationTurn::user(message)], template.as_deref())
        .await;
    helpers::print_reply(&reply);
    Ok(())
}

// ─────────────────────────────────────────────
// Wiring
// ─────────────────────────────────────────────

/// Build a `CompletionGateway` for one persona from the loaded configuration.
pub fn build_gateway(config: &Config, persona: &PersonaConfig) -> Result<CompletionGateway> {
    let timeout = config.assistant.attempt_timeout();
    let client = build_http_client(timeout).context("failed to build HTTP client")?;
    let adapters = build_adapters(&client, &config.providers);

    Ok(
        CompletionGateway::new(adapters, build_preference(config), Persona::from(persona))
            .with_attempt_timeout(timeout),
    )
}

/// The settings file wins over the static config value when both are set.
pub fn build_preference(config: &Config) -> Arc<dyn PreferenceSource> {
    match config.assistant.settings_path.as_deref().map(str::trim) {
        Some(path) if !path.is_empty() => Arc::new(SettingsFilePreference::new(expand_home(path))),
        _ => Arc::new(StaticPreference::from_setting(
            config.assistant.preferred_provider.as_deref(),
        )),
    }
}

/// Build a `WebhookDispatcher` from the loaded configuration.
pub fn build_dispatcher(config: &Config) -> Result<WebhookDispatcher> {
    let timeout = config.webhooks.delivery_timeout();
    let client = build_webhook_client(timeout).context("failed to build webhook client")?;
    let registry = WebhookRegistry::new(build_subscription_store(config));
    Ok(WebhookDispatcher::new(registry, client))
}

/// A JSON store file wins over inline `webhooks.subscriptions`.
pub fn build_subscription_store(config: &Config) -> Arc<dyn SubscriptionStore> {
    match config.webhooks.store_path.as_deref().map(str::trim) {
        Some(path) if !path.is_empty() => Arc::new(JsonFileSubscriptionStore::new(expand_home(path))),
        _ => Arc::new(StaticSubscriptionStore::new(
            config.webhooks.subscriptions.clone(),
        )),
    }
}

/// Initialize tracing/logging.
fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("switchboard=debug,info")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
