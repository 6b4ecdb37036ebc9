//! Config loader — reads `~/.switchboard/config.json` and merges env vars.
//!
//! # Loading precedence
//! 1. Defaults (from `Config::default()`)
//! 2. JSON file at `~/.switchboard/config.json`
//! 3. Environment variables `SWITCHBOARD_<SECTION>__<FIELD>` (override JSON)
//! 4. Conventional vendor keys (`OPENAI_API_KEY`, …) for credentials still empty

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::schema::{Config, ProviderConfig};
use crate::types::ProviderId;

/// Default config file path.
pub fn get_config_path() -> PathBuf {
    crate::utils::get_data_path().join("config.json")
}

/// Load configuration from the default path + env vars.
///
/// Falls back to `Config::default()` if the file doesn't exist or can't be parsed.
pub fn load_config(path: Option<&Path>) -> Config {
    let config_path = path.map(PathBuf::from).unwrap_or_else(get_config_path);

    load_config_from_path(&config_path)
}

/// Load config from a specific file path.
fn load_config_from_path(path: &Path) -> Config {
    if !path.exists() {
        info!("No config file found at {}, using defaults", path.display());
        return apply_env_overrides(Config::default());
    }

    debug!("Loading config from {}", path.display());

    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to read config file {}: {}", path.display(), e);
            return apply_env_overrides(Config::default());
        }
    };

    let config: Config = match serde_json::from_str(&content) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to parse config JSON: {}", e);
            return apply_env_overrides(Config::default());
        }
    };

    apply_env_overrides(config)
}

/// Save configuration to disk (pretty-printed JSON with camelCase keys).
pub fn save_config(config: &Config, path: Option<&Path>) -> anyhow::Result<()> {
    let config_path = path.map(PathBuf::from).unwrap_or_else(get_config_path);

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(config)?;
    std::fs::write(&config_path, json)?;
    debug!("Config saved to {}", config_path.display());
    Ok(())
}

/// Apply environment variable overrides on top of a loaded config.
///
/// Env var format: `SWITCHBOARD_<SECTION>__<FIELD>` (double underscore as delimiter).
///
/// Supported overrides:
/// - `SWITCHBOARD_PROVIDERS__<NAME>__API_KEY` → `providers.<name>.api_key`
/// - `SWITCHBOARD_PROVIDERS__<NAME>__API_BASE` → `providers.<name>.api_base`
/// - `SWITCHBOARD_PROVIDERS__<NAME>__MODEL` → `providers.<name>.model`
/// - `SWITCHBOARD_ASSISTANT__PREFERRED_PROVIDER` → `assistant.preferred_provider`
/// - `SWITCHBOARD_ASSISTANT__SETTINGS_PATH` → `assistant.settings_path`
/// - `SWITCHBOARD_ASSISTANT__ATTEMPT_TIMEOUT_SECS` → `assistant.attempt_timeout_secs`
/// - `SWITCHBOARD_WEBHOOKS__STORE_PATH` → `webhooks.store_path`
/// - `SWITCHBOARD_WEBHOOKS__DELIVERY_TIMEOUT_SECS` → `webhooks.delivery_timeout_secs`
fn apply_env_overrides(mut config: Config) -> Config {
    for id in ProviderId::ALL {
        apply_provider_env(config.providers.get_mut(id), id);
    }

    // Assistant
    if let Ok(val) = std::env::var("SWITCHBOARD_ASSISTANT__PREFERRED_PROVIDER") {
        config.assistant.preferred_provider = Some(val);
    }
    if let Ok(val) = std::env::var("SWITCHBOARD_ASSISTANT__SETTINGS_PATH") {
        config.assistant.settings_path = Some(val);
    }
    if let Ok(val) = std::env::var("SWITCHBOARD_ASSISTANT__ATTEMPT_TIMEOUT_SECS") {
        if let Ok(n) = val.parse::<u64>() {
            config.assistant.attempt_timeout_secs = n;
        }
    }

    // Webhooks
    if let Ok(val) = std::env::var("SWITCHBOARD_WEBHOOKS__STORE_PATH") {
        config.webhooks.store_path = Some(val);
    }
    if let Ok(val) = std::env::var("SWITCHBOARD_WEBHOOKS__DELIVERY_TIMEOUT_SECS") {
        if let Ok(n) = val.parse::<u64>() {
            config.webhooks.delivery_timeout_secs = n;
        }
    }

    config
}

/// Apply env var overrides for a single provider.
fn apply_provider_env(provider: &mut ProviderConfig, id: ProviderId) {
    let name = id.as_str().to_uppercase();
    if let Ok(val) = std::env::var(format!("SWITCHBOARD_PROVIDERS__{name}__API_KEY")) {
        provider.api_key = val;
    }
    if let Ok(val) = std::env::var(format!("SWITCHBOARD_PROVIDERS__{name}__API_BASE")) {
        provider.api_base = Some(val);
    }
    if let Ok(val) = std::env::var(format!("SWITCHBOARD_PROVIDERS__{name}__MODEL")) {
        provider.model = Some(val);
    }

    if !provider.is_configured() {
        let vendor_var = id.vendor_key_var();
        if let Ok(val) = std::env::var(vendor_var) {
            debug!(provider = %id, "Using {} from environment", vendor_var);
            provider.api_key = val;
        }
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
