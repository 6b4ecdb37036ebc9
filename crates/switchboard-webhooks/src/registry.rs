use std::sync::Arc;

use switchboard_core::types::WebhookSubscription;

use crate::error::RegistryError;
use crate::store::SubscriptionStore;

/// Answers "who wants this event?" from the current subscription store.
#[derive(Clone)]
pub struct WebhookRegistry {
    store: Arc<dyn SubscriptionStore>,
}

impl WebhookRegistry {
    pub fn new(store: Arc<dyn SubscriptionStore>) -> Self {
        Self { store }
    }

    /// Active subscriptions listening for `event`, directly or via `"*"`.
    ///
    /// Store order is preserved. The active flag is checked again here so a
    /// store that returns everything cannot leak inactive endpoints.
    pub async fn active_subscribers_for(
        &self,
        event: &str,
    ) -> Result<Vec<WebhookSubscription>, RegistryError> {
        let subscriptions = self.store.active_subscriptions().await?;
        Ok(subscriptions
            .into_iter()
            .filter(|s| s.is_active && s.matches(event))
            .collect())
    }
}
