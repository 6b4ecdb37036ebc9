//! Configuration schema.
//!
//! Hierarchy: `Config` → `ProvidersConfig`, `AssistantConfig`, `WebhooksConfig`.
//!
//! JSON on disk uses **camelCase** keys; Rust uses snake_case.
//! We use `#[serde(rename_all = "camelCase")]` to handle the conversion.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

use crate::types::{ProviderId, WebhookSubscription};

// ─────────────────────────────────────────────
// Root Config
// ─────────────────────────────────────────────

/// Root configuration — loaded from `~/.switchboard/config.json` + env vars.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub providers: ProvidersConfig,
    pub assistant: AssistantConfig,
    pub webhooks: WebhooksConfig,
}

// ─────────────────────────────────────────────
// Providers
// ─────────────────────────────────────────────

/// Configuration for a single completion provider.
///
/// An empty `api_key` disables the provider.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProviderConfig {
    /// API key for authentication.
    #[serde(default)]
    pub api_key: String,
    /// Custom API base URL (overrides provider default).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
    /// Model name (overrides provider default).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Extra HTTP headers to send with each request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra_headers: Option<HashMap<String, String>>,
}

impl ProviderConfig {
    /// Whether this provider has a configured API key.
    pub fn is_configured(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

/// One `ProviderConfig` per known provider.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub openai: ProviderConfig,
    #[serde(default)]
    pub anthropic: ProviderConfig,
    #[serde(default)]
    pub gemini: ProviderConfig,
}

impl ProvidersConfig {
    pub fn get(&self, id: ProviderId) -> &ProviderConfig {
        match id {
            ProviderId::OpenAi => &self.openai,
            ProviderId::Anthropic => &self.anthropic,
            ProviderId::Gemini => &self.gemini,
        }
    }

    pub fn get_mut(&mut self, id: ProviderId) -> &mut ProviderConfig {
        match id {
            ProviderId::OpenAi => &mut self.openai,
            ProviderId::Anthropic => &mut self.anthropic,
            ProviderId::Gemini => &mut self.gemini,
        }
    }

    /// Providers with a credential set, in fixed priority order.
    pub fn configured(&self) -> Vec<ProviderId> {
        ProviderId::ALL
            .into_iter()
            .filter(|id| self.get(*id).is_configured())
            .collect()
    }
}

// ─────────────────────────────────────────────
// Assistant
// ─────────────────────────────────────────────

/// Completion gateway settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AssistantConfig {
    /// Provider to try first. Kept as a string so an unknown value
    /// degrades to "no preference" instead of failing the whole config.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_provider: Option<String>,
    /// JSON settings document re-read on every completion
    /// (`{"preferredProvider": "..."}`). Takes precedence over
    /// `preferred_provider` when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings_path: Option<String>,
    /// Upper bound for a single provider attempt.
    pub attempt_timeout_secs: u64,
    /// End-user site chat persona.
    pub chat: PersonaConfig,
    /// Admin content-assistance persona. Fields left out of a partial
    /// persona fall back to the chat defaults, so override it whole.
    pub assist: PersonaConfig,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            preferred_provider: None,
            settings_path: None,
            attempt_timeout_secs: 10,
            chat: PersonaConfig::chat(),
            assist: PersonaConfig::assist(),
        }
    }
}

impl AssistantConfig {
    /// Per-attempt timeout, never shorter than one second.
    pub fn attempt_timeout(&self) -> Duration {
        Duration::from_secs(self.attempt_timeout_secs.max(MIN_TIMEOUT_SECS))
    }
}

/// System prompt and per-call limits for one gateway use.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonaConfig {
    pub system_prompt: String,
    /// Maximum tokens to generate per reply.
    pub max_tokens: u32,
    /// Sampling temperature (0.0 – 2.0).
    pub temperature: f64,
}

impl PersonaConfig {
    pub fn chat() -> Self {
        Self {
            system_prompt: CHAT_SYSTEM_PROMPT.to_string(),
            max_tokens: 500,
            temperature: 0.7,
        }
    }

    pub fn assist() -> Self {
        Self {
            system_prompt: ASSIST_SYSTEM_PROMPT.to_string(),
            max_tokens: 2000,
            temperature: 0.7,
        }
    }
}

impl Default for PersonaConfig {
    fn default() -> Self {
        Self::chat()
    }
}

const CHAT_SYSTEM_PROMPT: &str = "You are the website assistant for our digital agency. \
Answer questions about our services, process and pricing in a friendly, professional tone. \
Keep replies under 150 words. When a visitor wants a quote or a site audit, point them to \
the contact form.";

const ASSIST_SYSTEM_PROMPT: &str = "You are a senior copywriter helping the agency team \
draft website content: blog posts, service descriptions, case studies and SEO metadata. \
Write clear, persuasive, well-structured copy and follow any formatting the request asks for.";

// ─────────────────────────────────────────────
// Webhooks
// ─────────────────────────────────────────────

/// Webhook dispatcher settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WebhooksConfig {
    /// JSON file holding the subscription list, re-read on every dispatch.
    /// When unset, `subscriptions` below is used.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_path: Option<String>,
    /// Upper bound for a single delivery.
    pub delivery_timeout_secs: u64,
    #[serde(default)]
    pub subscriptions: Vec<WebhookSubscription>,
}

impl Default for WebhooksConfig {
    fn default() -> Self {
        Self {
            store_path: None,
            delivery_timeout_secs: 5,
            subscriptions: Vec::new(),
        }
    }
}

impl WebhooksConfig {
    /// Per-delivery timeout, never shorter than one second.
    pub fn delivery_timeout(&self) -> Duration {
        Duration::from_secs(self.delivery_timeout_secs.max(MIN_TIMEOUT_SECS))
    }
}

/// Lower bound for configured timeouts.
const MIN_TIMEOUT_SECS: u64 = 1;

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
