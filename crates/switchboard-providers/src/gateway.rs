//! Completion gateway — tries providers until one answers.
//!
//! Order of attempts for one `complete` call:
//! 1. The preferred provider, if set and enabled.
//! 2. Every other enabled provider, in fixed priority order.
//! 3. Nobody answered: the offline sentinel.
//!
//! Attempts are strictly sequential. Providers bill per call, so there is no
//! speculative parallel fan-out here.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info, warn};

use switchboard_core::config::PersonaConfig;
use switchboard_core::types::{CompletionResult, ConversationTurn, ProviderId};

use crate::augment::augment;
use crate::preference::PreferenceSource;
use crate::traits::{CompletionLimits, ProviderAdapter};

/// Default upper bound for one provider attempt.
pub const DEFAULT_ATTEMPT_TIMEOUT: Duration = Duration::from_secs(10);

// ─────────────────────────────────────────────
// Persona
// ─────────────────────────────────────────────

/// Who the assistant is for a given call site, and how long it may talk.
#[derive(Clone, Debug, PartialEq)]
pub struct Persona {
    /// Synthesized as the leading system turn. Empty means no system turn.
    pub system_prompt: String,
    pub limits: CompletionLimits,
}

impl From<&PersonaConfig> for Persona {
    fn from(config: &PersonaConfig) -> Self {
        Persona {
            system_prompt: config.system_prompt.clone(),
            limits: CompletionLimits::from(config),
        }
    }
}

// ─────────────────────────────────────────────
// CompletionGateway
// ─────────────────────────────────────────────

/// Orchestrates provider adapters for one persona.
pub struct CompletionGateway {
    /// Adapters in fixed priority order.
    adapters: Vec<Arc<dyn ProviderAdapter>>,
    preference: Arc<dyn PreferenceSource>,
    persona: Persona,
    attempt_timeout: Duration,
}

impl CompletionGateway {
    /// Create a gateway. Adapters are sorted into fixed priority order
    /// whatever order they are passed in.
    pub fn new(
        mut adapters: Vec<Arc<dyn ProviderAdapter>>,
        preference: Arc<dyn PreferenceSource>,
        persona: Persona,
    ) -> Self {
        adapters.sort_by_key(|a| a.id().priority());
        Self {
            adapters,
            preference,
            persona,
            attempt_timeout: DEFAULT_ATTEMPT_TIMEOUT,
        }
    }

    /// Override the per-attempt timeout.
    pub fn with_attempt_timeout(mut self, timeout: Duration) -> Self {
        self.attempt_timeout = timeout;
        self
    }

    pub fn persona(&self) -> &Persona {
        &self.persona
    }

    /// Get a reply for `conversation`. Never fails: when no provider
    /// answers, the offline sentinel is returned.
    pub async fn complete(
        &self,
        conversation: &[ConversationTurn],
        template: Option<&str>,
    ) -> CompletionResult {
        let messages = self.build_messages(conversation, template);
        let preferred = self.resolve_preference().await;
        let order = self.attempt_order(preferred);

        debug!(
            preferred = preferred.map_or("none", ProviderId::as_str),
            order = ?order.iter().map(|a| a.id()).collect::<Vec<_>>(),
            "Resolved provider order"
        );

        let attempted = order.len();
        for (i, adapter) in order.into_iter().enumerate() {
            if i > 0 {
                warn!(provider = adapter.display_name(), "Falling back to next provider");
            }
            if let Some(result) = self.try_adapter(adapter, &messages).await {
                info!(provider = result.provider_name(), attempts = i + 1, "Completion answered");
                return result;
            }
        }

        error!(attempted, "No provider answered, returning offline notice");
        CompletionResult::offline()
    }

    /// Persona system turn followed by the template-augmented conversation.
    fn build_messages(
        &self,
        conversation: &[ConversationTurn],
        template: Option<&str>,
    ) -> Vec<ConversationTurn> {
        let augmented = augment(conversation, template);
        if self.persona.system_prompt.is_empty() {
            return augmented;
        }

        let mut messages = Vec::with_capacity(augmented.len() + 1);
        messages.push(ConversationTurn::system(self.persona.system_prompt.clone()));
        messages.extend(augmented);
        messages
    }

    /// Read the preference snapshot for this call. Read failures mean "no preference".
    async fn resolve_preference(&self) -> Option<ProviderId> {
        match self.preference.preferred_provider().await {
            Ok(p) => p,
            Err(e) => {
                warn!(error = %e, "Could not read preferred provider, using fixed order");
                None
            }
        }
    }

    /// Enabled adapters with the preferred one (if enabled) moved to the front.
    fn attempt_order(&self, preferred: Option<ProviderId>) -> Vec<&Arc<dyn ProviderAdapter>> {
        let enabled = self.adapters.iter().filter(|a| a.is_enabled());

        let first = preferred.and_then(|p| self.adapters.iter().find(|a| a.id() == p && a.is_enabled()));
        match first {
            Some(first) => std::iter::once(first)
                .chain(enabled.filter(|a| a.id() != first.id()))
                .collect(),
            None => {
                if let Some(p) = preferred {
                    debug!(provider = %p, "Preferred provider is not enabled");
                }
                enabled.collect()
            }
        }
    }

    /// One bounded attempt. A timeout counts as a failed attempt.
    async fn try_adapter(
        &self,
        adapter: &Arc<dyn ProviderAdapter>,
        messages: &[ConversationTurn],
    ) -> Option<CompletionResult> {
        match tokio::time::timeout(
            self.attempt_timeout,
            adapter.attempt(messages, &self.persona.limits),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    provider = adapter.display_name(),
                    timeout_ms = self.attempt_timeout.as_millis() as u64,
                    "Provider attempt timed out"
                );
                None
            }
        }
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
