//! Core types for Switchboard.
//!
//! Conversation turns and completion results flow through the completion
//! gateway; webhook subscriptions and dispatch events flow through the
//! webhook dispatcher. All of them serialize to the JSON shapes that the chat
//! UI and downstream webhook receivers expect.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};

// ─────────────────────────────────────────────
// Providers
// ─────────────────────────────────────────────

/// Identifier of a known completion provider.
///
/// Declaration order is the fixed fallback priority (A, B, C).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    OpenAi,
    Anthropic,
    Gemini,
}

impl ProviderId {
    /// Every known provider, in fixed priority order.
    pub const ALL: [ProviderId; 3] = [ProviderId::OpenAi, ProviderId::Anthropic, ProviderId::Gemini];

    /// Stable lowercase identifier used in config and results.
    pub fn as_str(self) -> &'static str {
        match self {
            ProviderId::OpenAi => "openai",
            ProviderId::Anthropic => "anthropic",
            ProviderId::Gemini => "gemini",
        }
    }

    /// Conventional vendor environment variable holding this provider's API key.
    pub fn vendor_key_var(self) -> &'static str {
        match self {
            ProviderId::OpenAi => "OPENAI_API_KEY",
            ProviderId::Anthropic => "ANTHROPIC_API_KEY",
            ProviderId::Gemini => "GEMINI_API_KEY",
        }
    }

    /// Position in the fixed fallback order; lower is tried first.
    pub fn priority(self) -> usize {
        self as usize
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        ProviderId::ALL
            .into_iter()
            .find(|id| id.as_str() == wanted)
            .ok_or_else(|| format!("unknown provider '{}'", s.trim()))
    }
}

// ─────────────────────────────────────────────
// Conversation
// ─────────────────────────────────────────────

/// Who authored a conversation turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// One turn of a conversation, as sent by the chat UI.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub content: String,
}

impl ConversationTurn {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        ConversationTurn {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

// ─────────────────────────────────────────────
// Completion result
// ─────────────────────────────────────────────

/// Reply shown to the user when no provider could answer.
pub const OFFLINE_NOTICE: &str = "Our assistant is offline at the moment. \
Please try again in a few minutes, or reach our team directly through the contact form.";

/// A normalized reply from the completion gateway.
///
/// `provider` is `None` only for the offline sentinel; it serializes as
/// `"none"` in that case.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CompletionResult {
    pub text: String,
    #[serde(serialize_with = "serialize_provider")]
    pub provider: Option<ProviderId>,
}

impl CompletionResult {
    /// A successful reply from `provider`.
    pub fn answered(provider: ProviderId, text: impl Into<String>) -> Self {
        CompletionResult {
            text: text.into(),
            provider: Some(provider),
        }
    }

    /// The fixed "every provider failed" result.
    pub fn offline() -> Self {
        CompletionResult {
            text: OFFLINE_NOTICE.to_string(),
            provider: None,
        }
    }

    pub fn is_offline(&self) -> bool {
        self.provider.is_none()
    }

    /// Identifier of the provider that answered, or `"none"`.
    pub fn provider_name(&self) -> &'static str {
        self.provider.map_or("none", ProviderId::as_str)
    }
}

fn serialize_provider<S: Serializer>(
    provider: &Option<ProviderId>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(provider.map_or("none", ProviderId::as_str))
}

// ─────────────────────────────────────────────
// Webhooks
// ─────────────────────────────────────────────

/// Event pattern that matches every event name.
pub const WILDCARD_EVENT: &str = "*";

/// An externally registered webhook endpoint.
///
/// Owned by the admin layer; the dispatcher only reads it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookSubscription {
    pub id: String,
    /// Human-readable label used in logs.
    #[serde(default)]
    pub name: String,
    pub url: String,
    /// Shared secret forwarded to the subscriber in `X-Webhook-Secret`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,
    /// Event names, or `"*"` for every event.
    #[serde(default)]
    pub events: Vec<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

impl WebhookSubscription {
    /// Whether this subscription listens for `event` (exact name or wildcard).
    pub fn matches(&self, event: &str) -> bool {
        self.events
            .iter()
            .any(|pattern| pattern == WILDCARD_EVENT || pattern == event)
    }

    /// Label for logs: the name if set, otherwise the id.
    pub fn label(&self) -> &str {
        if self.name.is_empty() {
            &self.id
        } else {
            &self.name
        }
    }
}

/// A domain event on its way to subscribers.
///
/// Serializes to the exact envelope POSTed to every subscriber:
/// `{"event": ..., "timestamp": ..., "payload": ...}`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DispatchEvent {
    pub event: String,
    pub timestamp: DateTime<Utc>,
    pub payload: serde_json::Value,
}

impl DispatchEvent {
    /// Stamp a new event with the current time.
    pub fn new(event: impl Into<String>, payload: serde_json::Value) -> Self {
        DispatchEvent {
            event: event.into(),
            timestamp: Utc::now(),
            payload,
        }
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_provider_order_is_fixed() {
        assert_eq!(
            ProviderId::ALL,
            [ProviderId::OpenAi, ProviderId::Anthropic, ProviderId::Gemini]
        );
        for (i, id) in ProviderId::ALL.into_iter().enumerate() {
            assert_eq!(id.priority(), i);
        }
    }

    #[test]
    fn test_vendor_key_vars() {
        assert_eq!(ProviderId::OpenAi.vendor_key_var(), "OPENAI_API_KEY");
        assert_eq!(ProviderId::Anthropic.vendor_key_var(), "ANTHROPIC_API_KEY");
        assert_eq!(ProviderId::Gemini.vendor_key_var(), "GEMINI_API_KEY");
    }

    #[test]
    fn test_provider_from_str() {
        assert_eq!("openai".parse::<ProviderId>(), Ok(ProviderId::OpenAi));
        assert_eq!(" Gemini ".parse::<ProviderId>(), Ok(ProviderId::Gemini));
        assert!("cohere".parse::<ProviderId>().is_err());
        assert!("".parse::<ProviderId>().is_err());
    }

    #[test]
    fn test_provider_serde_names() {
        assert_eq!(serde_json::to_value(ProviderId::OpenAi).unwrap(), "openai");
        let id: ProviderId = serde_json::from_value(json!("anthropic")).unwrap();
        assert_eq!(id, ProviderId::Anthropic);
    }

    #[test]
    fn test_turn_serialization() {
        let json = serde_json::to_value(ConversationTurn::user("Hi")).unwrap();
        assert_eq!(json, json!({"role": "user", "content": "Hi"}));

        let turn: ConversationTurn =
            serde_json::from_value(json!({"role": "assistant", "content": "Hello"})).unwrap();
        assert_eq!(turn, ConversationTurn::assistant("Hello"));
    }

    #[test]
    fn test_completion_result_serialization() {
        let ok = CompletionResult::answered(ProviderId::Gemini, "Sure!");
        assert_eq!(
            serde_json::to_value(&ok).unwrap(),
            json!({"text": "Sure!", "provider": "gemini"})
        );

        let offline = CompletionResult::offline();
        let json = serde_json::to_value(&offline).unwrap();
        assert_eq!(json["provider"], "none");
        assert_eq!(json["text"], OFFLINE_NOTICE);
        assert!(offline.is_offline());
        assert_eq!(offline.provider_name(), "none");
    }

    #[test]
    fn test_subscription_matches() {
        let sub = WebhookSubscription {
            id: "1".into(),
            name: String::new(),
            url: "https://a".into(),
            secret: None,
            events: vec!["audit.requested".into()],
            is_active: true,
        };
        assert!(sub.matches("audit.requested"));
        assert!(!sub.matches("contact.submitted"));
        assert_eq!(sub.label(), "1");

        let all = WebhookSubscription {
            events: vec![WILDCARD_EVENT.into()],
            ..sub
        };
        assert!(all.matches("anything.at.all"));
    }

    #[test]
    fn test_subscription_from_camel_case_json() {
        let sub: WebhookSubscription = serde_json::from_value(json!({
            "id": "wh_1",
            "name": "CRM",
            "url": "https://crm.example.com/hook",
            "secret": "s3cret",
            "events": ["*"],
            "isActive": false
        }))
        .unwrap();
        assert_eq!(sub.secret.as_deref(), Some("s3cret"));
        assert!(!sub.is_active);
        assert_eq!(sub.label(), "CRM");
    }

    #[test]
    fn test_subscription_defaults() {
        let sub: WebhookSubscription =
            serde_json::from_value(json!({"id": "wh_2", "url": "https://b"})).unwrap();
        assert!(sub.is_active);
        assert!(sub.events.is_empty());
        assert!(!sub.matches("audit.requested"));
    }

    #[test]
    fn test_dispatch_event_envelope() {
        let event = DispatchEvent::new("audit.requested", json!({"email": "a@b.co"}));
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "audit.requested");
        assert_eq!(json["payload"]["email"], "a@b.co");
        assert!(json["timestamp"].as_str().unwrap().contains('T'));
        assert_eq!(json.as_object().unwrap().len(), 3);
    }
}
