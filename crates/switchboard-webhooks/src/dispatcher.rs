//! Webhook fan-out.
//!
//! Every matching subscriber gets its own POST, all in flight at once. One
//! slow or broken endpoint never holds back or fails the others, and nothing
//! here is retried.

use std::time::Duration;

use futures::future::join_all;
use reqwest::StatusCode;
use tracing::{debug, error, info, warn};

use switchboard_core::types::{DispatchEvent, WebhookSubscription};

use crate::registry::WebhookRegistry;

/// Header carrying the event name.
pub const EVENT_HEADER: &str = "X-Webhook-Event";
/// Header carrying the subscriber's shared secret.
pub const SECRET_HEADER: &str = "X-Webhook-Secret";

/// How a single delivery went.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// Subscriber answered 2xx.
    Delivered(StatusCode),
    /// Subscriber answered, but not 2xx.
    Rejected(StatusCode),
    /// No response: connect error, timeout, TLS failure...
    Failed(String),
}

impl DeliveryOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, DeliveryOutcome::Delivered(_))
    }
}

/// Tally of one `dispatch` call. Purely informational.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DispatchSummary {
    /// Subscriptions that matched the event.
    pub matched: usize,
    pub delivered: usize,
    pub failed: usize,
}

// ─────────────────────────────────────────────
// WebhookDispatcher
// ─────────────────────────────────────────────

pub struct WebhookDispatcher {
    registry: WebhookRegistry,
    client: reqwest::Client,
}

impl WebhookDispatcher {
    pub fn new(registry: WebhookRegistry, client: reqwest::Client) -> Self {
        Self { registry, client }
    }

    /// Deliver `event` with `payload` to every active subscriber.
    ///
    /// Never fails. Returns once every delivery has settled; the summary may
    /// be ignored by callers that only care that the event went out.
    pub async fn dispatch(&self, event: &str, payload: serde_json::Value) -> DispatchSummary {
        let subscribers = match self.registry.active_subscribers_for(event).await {
            Ok(subs) => subs,
            Err(e) => {
                error!(event, error = %e, "Could not load webhook subscriptions, skipping dispatch");
                return DispatchSummary::default();
            }
        };

        if subscribers.is_empty() {
            debug!(event, "No webhook subscribers");
            return DispatchSummary::default();
        }

        let envelope = DispatchEvent::new(event, payload);
        debug!(event, subscribers = subscribers.len(), "Dispatching webhook");

        let deliveries = subscribers.iter().map(|sub| self.deliver(sub, &envelope));
        let outcomes = join_all(deliveries).await;

        let delivered = outcomes.iter().filter(|o| o.is_delivered()).count();
        let summary = DispatchSummary {
            matched: subscribers.len(),
            delivered,
            failed: outcomes.len() - delivered,
        };

        info!(
            event,
            matched = summary.matched,
            delivered = summary.delivered,
            failed = summary.failed,
            "Webhook dispatch finished"
        );
        summary
    }

    async fn deliver(&self, sub: &WebhookSubscription, envelope: &DispatchEvent) -> DeliveryOutcome {
        let mut request = self
            .client
            .post(&sub.url)
            .header(EVENT_HEADER, &envelope.event)
            .json(envelope);

        if let Some(secret) = sub.secret.as_deref().filter(|s| !s.is_empty()) {
            request = request.header(SECRET_HEADER, secret);
        }

        let outcome = match request.send().await {
            Ok(resp) if resp.status().is_success() => DeliveryOutcome::Delivered(resp.status()),
            Ok(resp) => DeliveryOutcome::Rejected(resp.status()),
            Err(e) => DeliveryOutcome::Failed(e.to_string()),
        };

        match &outcome {
            DeliveryOutcome::Delivered(status) => {
                debug!(webhook = sub.label(), url = %sub.url, status = %status, "Webhook delivered");
            }
            DeliveryOutcome::Rejected(status) => {
                warn!(webhook = sub.label(), url = %sub.url, status = %status, "Webhook rejected");
            }
            DeliveryOutcome::Failed(err) => {
                error!(webhook = sub.label(), url = %sub.url, error = %err, "Webhook delivery failed");
            }
        }
        outcome
    }
}

/// Build the HTTP client used for deliveries.
pub fn build_webhook_client(timeout: Duration) -> anyhow::Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("switchboard-webhooks/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
