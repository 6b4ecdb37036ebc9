//! Provider adapter trait — the one capability every completion backend offers.

use async_trait::async_trait;
use switchboard_core::config::PersonaConfig;
use switchboard_core::types::{CompletionResult, ConversationTurn, ProviderId};

/// Per-call generation limits.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CompletionLimits {
    /// Maximum tokens to generate.
    pub max_tokens: u32,
    /// Sampling temperature (0.0 – 2.0).
    pub temperature: f64,
}

impl Default for CompletionLimits {
    fn default() -> Self {
        Self {
            max_tokens: 500,
            temperature: 0.7,
        }
    }
}

impl From<&PersonaConfig> for CompletionLimits {
    fn from(persona: &PersonaConfig) -> Self {
        Self {
            max_tokens: persona.max_tokens,
            temperature: persona.temperature,
        }
    }
}

/// Trait that all completion providers implement.
///
/// The gateway holds an ordered list of `Arc<dyn ProviderAdapter>` and tries
/// them one at a time.
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    /// Which provider this adapter wraps.
    fn id(&self) -> ProviderId;

    /// Whether a credential is configured. Disabled adapters are never attempted.
    fn is_enabled(&self) -> bool;

    /// Make one call to the provider.
    ///
    /// # Returns
    /// `Some` with the normalized reply, or `None` on any failure: missing
    /// credential, transport error, non-2xx status, or a reply without text.
    /// Failures are logged here and never propagated.
    async fn attempt(
        &self,
        conversation: &[ConversationTurn],
        limits: &CompletionLimits,
    ) -> Option<CompletionResult>;

    /// Display name for logging.
    fn display_name(&self) -> &str {
        self.id().as_str()
    }
}
