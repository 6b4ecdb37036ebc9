//! Outbound webhooks.
//!
//! A domain event (say `audit.requested`) is delivered to every active
//! subscription listening for it. Delivery failures are logged per subscriber
//! and never reach the code that raised the event.

pub mod dispatcher;
pub mod error;
pub mod registry;
pub mod store;

pub use dispatcher::{build_webhook_client, DeliveryOutcome, DispatchSummary, WebhookDispatcher};
pub use error::RegistryError;
pub use registry::WebhookRegistry;
pub use store::{JsonFileSubscriptionStore, StaticSubscriptionStore, SubscriptionStore};
