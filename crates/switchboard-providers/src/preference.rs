//! Preferred provider sources.
//!
//! The admin dashboard lets the team pick which provider answers first. The
//! gateway reads that choice once at the start of every `complete` call, so a
//! change takes effect on the next request without a restart.

use std::path::PathBuf;

use anyhow::Context;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use switchboard_core::types::ProviderId;

/// Where the preferred provider setting comes from.
#[async_trait]
pub trait PreferenceSource: Send + Sync {
    /// The current preference, or `None` when nothing (valid) is set.
    ///
    /// Errors mean the setting could not be read at all; the gateway treats
    /// them as "no preference".
    async fn preferred_provider(&self) -> anyhow::Result<Option<ProviderId>>;
}

/// Turn a raw setting into a provider id, ignoring unknown names.
fn parse_setting(raw: Option<&str>) -> Option<ProviderId> {
    let raw = raw.map(str::trim).filter(|s| !s.is_empty())?;
    match raw.parse::<ProviderId>() {
        Ok(id) => Some(id),
        Err(e) => {
            warn!(setting = raw, "Ignoring preferred provider: {}", e);
            None
        }
    }
}

// ─────────────────────────────────────────────
// StaticPreference
// ─────────────────────────────────────────────

/// A preference fixed at startup (from config or a test).
#[derive(Clone, Copy, Debug, Default)]
pub struct StaticPreference(pub Option<ProviderId>);

impl StaticPreference {
    /// Build from a raw config string; unknown names mean no preference.
    pub fn from_setting(raw: Option<&str>) -> Self {
        StaticPreference(parse_setting(raw))
    }
}

#[async_trait]
impl PreferenceSource for StaticPreference {
    async fn preferred_provider(&self) -> anyhow::Result<Option<ProviderId>> {
        Ok(self.0)
    }
}

// ─────────────────────────────────────────────
// SettingsFilePreference
// ─────────────────────────────────────────────

/// Shape of the settings document written by the admin layer.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct SiteSettings {
    preferred_provider: Option<String>,
}

/// Reads `{"preferredProvider": "..."}` from a JSON file on every call.
#[derive(Clone, Debug)]
pub struct SettingsFilePreference {
    path: PathBuf,
}

impl SettingsFilePreference {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl PreferenceSource for SettingsFilePreference {
    async fn preferred_provider(&self) -> anyhow::Result<Option<ProviderId>> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No settings file, no preferred provider");
                return Ok(None);
            }
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("failed to read settings file {}", self.path.display())
                })
            }
        };

        let settings: SiteSettings = serde_json::from_str(&content)
            .with_context(|| format!("invalid settings JSON in {}", self.path.display()))?;

        Ok(parse_setting(settings.preferred_provider.as_deref()))
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
