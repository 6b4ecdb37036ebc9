//! HTTP-backed provider adapter.
//!
//! One `HttpAdapter` per supported provider. The provider's [`ProviderSpec`]
//! decides the URL, auth header, and body shape; everything else (timeouts,
//! status handling, logging) is shared.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use tracing::{debug, error, warn};

use switchboard_core::config::{ProviderConfig, ProvidersConfig};
use switchboard_core::types::{CompletionResult, ConversationTurn, ProviderId};
use switchboard_core::utils::truncate_string;

use crate::registry::{ProviderSpec, PROVIDERS};
use crate::traits::{CompletionLimits, ProviderAdapter};

/// How much of an error body makes it into the logs.
const MAX_LOGGED_BODY_CHARS: usize = 500;

// ─────────────────────────────────────────────
// HttpAdapter
// ─────────────────────────────────────────────

/// A completion provider reached over HTTP.
pub struct HttpAdapter {
    /// HTTP client (shared, connection-pooled).
    client: reqwest::Client,
    /// API base URL (e.g. `"https://api.openai.com/v1"`).
    api_base: String,
    /// API key; empty means the adapter is disabled.
    api_key: String,
    /// Model sent with every request.
    model: String,
    /// Extra headers to send with each request.
    extra_headers: HeaderMap,
    /// Static provider spec: wire format and defaults.
    spec: &'static ProviderSpec,
}

impl std::fmt::Debug for HttpAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpAdapter")
            .field("provider", &self.spec.display_name)
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .field("enabled", &self.is_enabled())
            .finish()
    }
}

impl HttpAdapter {
    /// Create an adapter from the user's provider config and the static spec.
    ///
    /// # Arguments
    /// * `client`: shared HTTP client (carries the per-attempt timeout)
    /// * `config`: api_key, api_base, model, extra_headers
    /// * `spec`: static provider spec from the registry
    pub fn new(
        client: reqwest::Client,
        config: &ProviderConfig,
        spec: &'static ProviderSpec,
    ) -> Self {
        // Resolve API base and model: config > spec default
        let api_base = config
            .api_base
            .clone()
            .filter(|b| !b.trim().is_empty())
            .unwrap_or_else(|| spec.default_api_base.to_string());
        let model = config
            .model
            .clone()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| spec.default_model.to_string());

        let mut extra_headers = HeaderMap::new();
        if let Some(ref headers) = config.extra_headers {
            for (key, value) in headers {
                if let (Ok(name), Ok(val)) = (
                    HeaderName::from_bytes(key.as_bytes()),
                    HeaderValue::from_str(value),
                ) {
                    extra_headers.insert(name, val);
                } else {
                    warn!(provider = spec.display_name, "Invalid header: {}", key);
                }
            }
        }

        HttpAdapter {
            client,
            api_base,
            api_key: config.api_key.trim().to_string(),
            model,
            extra_headers,
            spec,
        }
    }

    /// Full request URL for this provider.
    fn endpoint(&self) -> String {
        self.spec.wire.endpoint(&self.api_base, &self.model)
    }

    /// Model name sent with each request.
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl ProviderAdapter for HttpAdapter {
    fn id(&self) -> ProviderId {
        self.spec.id
    }

    fn is_enabled(&self) -> bool {
        !self.api_key.is_empty()
    }

    async fn attempt(
        &self,
        conversation: &[ConversationTurn],
        limits: &CompletionLimits,
    ) -> Option<CompletionResult> {
        if !self.is_enabled() {
            debug!(provider = self.spec.display_name, "No API key, skipping");
            return None;
        }

        debug!(
            provider = self.spec.display_name,
            model = %self.model,
            turns = conversation.len(),
            max_tokens = limits.max_tokens,
            "Calling provider"
        );

        let body = self.spec.wire.request_body(&self.model, conversation, limits);
        let request = self
            .client
            .post(self.endpoint())
            .headers(self.extra_headers.clone())
            .json(&body);

        let result = self.spec.wire.authorize(request, &self.api_key).send().await;

        let response = match result {
            Ok(resp) => resp,
            Err(e) => {
                error!(
                    provider = self.spec.display_name,
                    timeout = e.is_timeout(),
                    error = %e,
                    "HTTP request failed"
                );
                return None;
            }
        };

        let status = response.status();
        let text = match response.text().await {
            Ok(t) => t,
            Err(e) => {
                error!(
                    provider = self.spec.display_name,
                    status = %status,
                    error = %e,
                    "Failed to read response body"
                );
                return None;
            }
        };

        if !status.is_success() {
            error!(
                provider = self.spec.display_name,
                status = %status,
                body = %truncate_string(&text, MAX_LOGGED_BODY_CHARS),
                "API error"
            );
            return None;
        }

        match self.spec.wire.extract_text(&text) {
            Ok(Some(reply)) => {
                debug!(
                    provider = self.spec.display_name,
                    chars = reply.len(),
                    "Provider reply received"
                );
                Some(CompletionResult::answered(self.spec.id, reply))
            }
            Ok(None) => {
                warn!(
                    provider = self.spec.display_name,
                    body = %truncate_string(&text, MAX_LOGGED_BODY_CHARS),
                    "Response had no text"
                );
                None
            }
            Err(e) => {
                error!(
                    provider = self.spec.display_name,
                    error = %e,
                    body = %truncate_string(&text, MAX_LOGGED_BODY_CHARS),
                    "Failed to parse provider response"
                );
                None
            }
        }
    }

    fn display_name(&self) -> &str {
        self.spec.display_name
    }
}

// ─────────────────────────────────────────────
// Builders (convenience)
// ─────────────────────────────────────────────

/// Build the shared HTTP client used by every adapter.
///
/// `timeout` bounds a whole attempt, connect through body.
pub fn build_http_client(timeout: Duration) -> anyhow::Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("switchboard/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}

/// Build one adapter per supported provider, in fixed priority order.
///
/// Providers without a credential are still built (and report
/// `is_enabled() == false`) so status output can list them.
pub fn build_adapters(
    client: &reqwest::Client,
    providers: &ProvidersConfig,
) -> Vec<Arc<dyn ProviderAdapter>> {
    PROVIDERS
        .iter()
        .map(|spec| {
            let adapter = HttpAdapter::new(client.clone(), providers.get(spec.id), spec);
            debug!(
                provider = spec.display_name,
                enabled = adapter.is_enabled(),
                api_base = %adapter.api_base,
                "Built provider adapter"
            );
            Arc::new(adapter) as Arc<dyn ProviderAdapter>
        })
        .collect()
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::find_by_id;
    use std::collections::HashMap;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn make_config(api_key: &str, api_base: Option<&str>) -> ProviderConfig {
        ProviderConfig {
            api_key: api_key.to_string(),
            api_base: api_base.map(String::from),
            model: None,
            extra_headers: None,
        }
    }

    fn client() -> reqwest::Client {
        build_http_client(Duration::from_secs(5)).unwrap()
    }

    fn adapter(id: ProviderId, api_key: &str, api_base: Option<&str>) -> HttpAdapter {
        HttpAdapter::new(client(), &make_config(api_key, api_base), find_by_id(id))
    }

    fn conversation() -> Vec<ConversationTurn> {
        vec![
            ConversationTurn::system("You are the site assistant."),
            ConversationTurn::user("Hello"),
        ]
    }

    // ── Unit tests ──

    #[test]
    fn test_defaults_from_spec() {
        let a = adapter(ProviderId::Anthropic, "key", None);
        assert_eq!(a.api_base, "https://api.anthropic.com/v1");
        assert_eq!(a.model(), "claude-3-5-haiku-latest");
        assert_eq!(a.endpoint(), "https://api.anthropic.com/v1/messages");
    }

    #[test]
    fn test_config_overrides_defaults() {
        let config = ProviderConfig {
            api_key: "key".into(),
            api_base: Some("https://proxy.example.com/v1/".into()),
            model: Some("gpt-4o".into()),
            extra_headers: None,
        };
        let a = HttpAdapter::new(client(), &config, find_by_id(ProviderId::OpenAi));
        assert_eq!(a.model(), "gpt-4o");
        assert_eq!(a.endpoint(), "https://proxy.example.com/v1/chat/completions");
    }

    #[test]
    fn test_enabled_requires_key() {
        assert!(adapter(ProviderId::Gemini, "g-key", None).is_enabled());
        assert!(!adapter(ProviderId::Gemini, "", None).is_enabled());
        assert!(!adapter(ProviderId::Gemini, "  ", None).is_enabled());
    }

    #[test]
    fn test_extra_headers() {
        let mut headers = HashMap::new();
        headers.insert("HTTP-Referer".to_string(), "https://agency.example".to_string());
        headers.insert("bad header".to_string(), "x".to_string());
        let config = ProviderConfig {
            api_key: "key".into(),
            extra_headers: Some(headers),
            ..Default::default()
        };
        let a = HttpAdapter::new(client(), &config, find_by_id(ProviderId::OpenAi));
        assert!(a.extra_headers.contains_key("http-referer"));
        assert_eq!(a.extra_headers.len(), 1);
    }

    #[test]
    fn test_build_adapters_fixed_order() {
        let mut providers = ProvidersConfig::default();
        providers.gemini.api_key = "g".into();
        let adapters = build_adapters(&client(), &providers);
        let ids: Vec<ProviderId> = adapters.iter().map(|a| a.id()).collect();
        assert_eq!(ids, ProviderId::ALL.to_vec());
        let enabled: Vec<bool> = adapters.iter().map(|a| a.is_enabled()).collect();
        assert_eq!(enabled, vec![false, false, true]);
    }

    // ── Integration tests with mock server ──

    #[tokio::test]
    async fn test_openai_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("Authorization", "Bearer test-key-123"))
            .and(body_partial_json(serde_json::json!({
                "model": "gpt-4o-mini",
                "max_tokens": 500
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "chatcmpl-test",
                "choices": [{
                    "message": { "content": "Happy to help!" },
                    "finish_reason": "stop"
                }]
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let a = adapter(ProviderId::OpenAi, "test-key-123", Some(&mock_server.uri()));
        let result = a
            .attempt(&conversation(), &CompletionLimits::default())
            .await
            .unwrap();

        assert_eq!(result.text, "Happy to help!");
        assert_eq!(result.provider, Some(ProviderId::OpenAi));
    }

    #[tokio::test]
    async fn test_anthropic_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/messages"))
            .and(header("x-api-key", "sk-ant"))
            .and(header("anthropic-version", "2023-06-01"))
            .and(body_partial_json(serde_json::json!({
                "system": "You are the site assistant.",
                "messages": [{ "role": "user", "content": "Hello" }]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "msg_1",
                "type": "message",
                "content": [{ "type": "text", "text": "Hi! How can I help?" }],
                "stop_reason": "end_turn"
            })))
            .mount(&mock_server)
            .await;

        let a = adapter(ProviderId::Anthropic, "sk-ant", Some(&mock_server.uri()));
        let result = a
            .attempt(&conversation(), &CompletionLimits::default())
            .await
            .unwrap();

        assert_eq!(result.text, "Hi! How can I help?");
        assert_eq!(result.provider_name(), "anthropic");
    }

    #[tokio::test]
    async fn test_gemini_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/models/gemini-1.5-flash:generateContent"))
            .and(header("x-goog-api-key", "g-key"))
            .and(body_partial_json(serde_json::json!({
                "generationConfig": { "maxOutputTokens": 500 }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{
                    "content": { "role": "model", "parts": [{ "text": "Welcome!" }] },
                    "finishReason": "STOP"
                }]
            })))
            .mount(&mock_server)
            .await;

        let a = adapter(ProviderId::Gemini, "g-key", Some(&mock_server.uri()));
        let result = a
            .attempt(&conversation(), &CompletionLimits::default())
            .await
            .unwrap();

        assert_eq!(result.text, "Welcome!");
        assert_eq!(result.provider, Some(ProviderId::Gemini));
    }

    #[tokio::test]
    async fn test_api_error_returns_none() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(429).set_body_json(serde_json::json!({
                "error": { "message": "Rate limit exceeded", "type": "rate_limit_error" }
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let a = adapter(ProviderId::OpenAi, "key", Some(&mock_server.uri()));
        let result = a.attempt(&conversation(), &CompletionLimits::default()).await;
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_empty_reply_returns_none() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{ "message": { "content": "" }, "finish_reason": "length" }]
            })))
            .mount(&mock_server)
            .await;

        let a = adapter(ProviderId::OpenAi, "key", Some(&mock_server.uri()));
        assert!(a
            .attempt(&conversation(), &CompletionLimits::default())
            .await
            .is_none());
    }

    #[tokio::test]
    async fn test_malformed_body_returns_none() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/messages"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
            .mount(&mock_server)
            .await;

        let a = adapter(ProviderId::Anthropic, "key", Some(&mock_server.uri()));
        assert!(a
            .attempt(&conversation(), &CompletionLimits::default())
            .await
            .is_none());
    }

    #[tokio::test]
    async fn test_network_error_returns_none() {
        // Point to a port that's not listening
        let a = adapter(ProviderId::OpenAi, "key", Some("http://127.0.0.1:1"));
        assert!(a
            .attempt(&conversation(), &CompletionLimits::default())
            .await
            .is_none());
    }

    #[tokio::test]
    async fn test_missing_key_makes_no_request() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock_server)
            .await;

        let a = adapter(ProviderId::Gemini, "", Some(&mock_server.uri()));
        assert!(a
            .attempt(&conversation(), &CompletionLimits::default())
            .await
            .is_none());
    }

    #[tokio::test]
    async fn test_slow_provider_times_out() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_delay(Duration::from_secs(3))
                    .set_body_json(serde_json::json!({
                        "choices": [{ "message": { "content": "too late" } }]
                    })),
            )
            .mount(&mock_server)
            .await;

        let client = build_http_client(Duration::from_millis(200)).unwrap();
        let a = HttpAdapter::new(
            client,
            &make_config("key", Some(&mock_server.uri())),
            find_by_id(ProviderId::OpenAi),
        );
        assert!(a
            .attempt(&conversation(), &CompletionLimits::default())
            .await
            .is_none());
    }
}
