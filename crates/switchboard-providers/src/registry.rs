//! Provider registry — static specs for the supported completion providers.
//!
//! Each `ProviderSpec` describes how to reach one provider: default endpoint,
//! default model, and wire format.
//! `PROVIDERS` is declared in the fixed fallback order.

use switchboard_core::types::ProviderId;

use crate::wire::WireFormat;

// ─────────────────────────────────────────────
// ProviderSpec
// ─────────────────────────────────────────────

/// Static specification describing one completion provider.
#[derive(Clone, Debug)]
pub struct ProviderSpec {
    pub id: ProviderId,
    /// Human-readable name for logs. E.g. `"Anthropic"`.
    pub display_name: &'static str,
    /// API base URL used when the config doesn't override it.
    pub default_api_base: &'static str,
    /// Model used when the config doesn't override it.
    pub default_model: &'static str,
    /// Request/response shape spoken by this provider.
    pub wire: WireFormat,
}

// ─────────────────────────────────────────────
// Supported providers (fixed priority order)
// ─────────────────────────────────────────────

/// Every supported provider, in fixed fallback order.
pub static PROVIDERS: &[ProviderSpec] = &[
    // A. OpenAI-compatible chat completions
    ProviderSpec {
        id: ProviderId::OpenAi,
        display_name: "OpenAI",
        default_api_base: "https://api.openai.com/v1",
        default_model: "gpt-4o-mini",
        wire: WireFormat::OpenAiChat,
    },
    // B. Anthropic messages API
    ProviderSpec {
        id: ProviderId::Anthropic,
        display_name: "Anthropic",
        default_api_base: "https://api.anthropic.com/v1",
        default_model: "claude-3-5-haiku-latest",
        wire: WireFormat::AnthropicMessages,
    },
    // C. Gemini generateContent
    ProviderSpec {
        id: ProviderId::Gemini,
        display_name: "Gemini",
        default_api_base: "https://generativelanguage.googleapis.com/v1beta",
        default_model: "gemini-1.5-flash",
        wire: WireFormat::GeminiGenerate,
    },
];

/// Find a provider spec by identifier.
pub fn find_by_id(id: ProviderId) -> &'static ProviderSpec {
    // One entry per ProviderId variant, declared in priority order.
    &PROVIDERS[id.priority()]
}

/// Find a provider spec by name (case-insensitive).
pub fn find_by_name(name: &str) -> Option<&'static ProviderSpec> {
    name.parse::<ProviderId>().ok().map(find_by_id)
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
