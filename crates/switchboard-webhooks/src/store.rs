//! Where webhook subscriptions live.
//!
//! The store is consulted on every dispatch, so edits made by the admin layer
//! (new subscriber, deactivated endpoint) apply to the next event.

use std::path::PathBuf;

use async_trait::async_trait;
use tracing::debug;

use switchboard_core::types::WebhookSubscription;

use crate::error::RegistryError;

/// Source of webhook subscriptions.
#[async_trait]
pub trait SubscriptionStore: Send + Sync {
    /// Subscriptions whose `is_active` flag is set.
    async fn active_subscriptions(&self) -> Result<Vec<WebhookSubscription>, RegistryError>;
}

// ─────────────────────────────────────────────
// StaticSubscriptionStore
// ─────────────────────────────────────────────

/// Subscriptions fixed at startup, usually from `webhooks.subscriptions` in config.
#[derive(Clone, Debug, Default)]
pub struct StaticSubscriptionStore {
    subscriptions: Vec<WebhookSubscription>,
}

impl StaticSubscriptionStore {
    pub fn new(subscriptions: Vec<WebhookSubscription>) -> Self {
        Self { subscriptions }
    }
}

#[async_trait]
impl SubscriptionStore for StaticSubscriptionStore {
    async fn active_subscriptions(&self) -> Result<Vec<WebhookSubscription>, RegistryError> {
        Ok(self
            .subscriptions
            .iter()
            .filter(|s| s.is_active)
            .cloned()
            .collect())
    }
}

// ─────────────────────────────────────────────
// JsonFileSubscriptionStore
// ─────────────────────────────────────────────

/// Reads a JSON array of subscriptions from disk on every call.
///
/// A missing file means no subscriptions. Unreadable or malformed files are
/// errors.
#[derive(Clone, Debug)]
pub struct JsonFileSubscriptionStore {
    path: PathBuf,
}

impl JsonFileSubscriptionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

#[async_trait]
impl SubscriptionStore for JsonFileSubscriptionStore {
    async fn active_subscriptions(&self) -> Result<Vec<WebhookSubscription>, RegistryError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No subscription file, nothing to deliver");
                return Ok(Vec::new());
            }
            Err(source) => {
                return Err(RegistryError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let subscriptions: Vec<WebhookSubscription> =
            serde_json::from_str(&content).map_err(|source| RegistryError::Parse {
                path: self.path.clone(),
                source,
            })?;

        Ok(subscriptions.into_iter().filter(|s| s.is_active).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sub(id: &str, active: bool) -> WebhookSubscription {
        WebhookSubscription {
            id: id.into(),
            name: String::new(),
            url: format!("https://hooks.example.com/{id}"),
            secret: None,
            events: vec!["*".into()],
            is_active: active,
        }
    }

    #[tokio::test]
    async fn test_static_store_drops_inactive() {
        let store = StaticSubscriptionStore::new(vec![sub("a", true), sub("b", false)]);
        let active = store.active_subscriptions().await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, "a");
    }

    #[tokio::test]
    async fn test_json_store_reads_camel_case_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("webhooks.json");
        std::fs::write(
            &path,
            r#"[
                {"id": "wh_1", "name": "CRM", "url": "https://crm.example.com/hook",
                 "secret": "s3cret", "events": ["audit.requested"], "isActive": true},
                {"id": "wh_2", "url": "https://old.example.com", "events": ["*"], "isActive": false}
            ]"#,
        )
        .unwrap();

        let store = JsonFileSubscriptionStore::new(&path);
        let active = store.active_subscriptions().await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].name, "CRM");
        assert_eq!(active[0].secret.as_deref(), Some("s3cret"));
    }

    #[tokio::test]
    async fn test_json_store_is_reread() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("webhooks.json");
        let store = JsonFileSubscriptionStore::new(&path);

        std::fs::write(&path, "[]").unwrap();
        assert!(store.active_subscriptions().await.unwrap().is_empty());

        std::fs::write(&path, r#"[{"id": "wh_1", "url": "https://a", "events": ["*"]}]"#).unwrap();
        assert_eq!(store.active_subscriptions().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_json_store_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileSubscriptionStore::new(dir.path().join("absent.json"));
        assert!(store.active_subscriptions().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_json_store_invalid_json_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("webhooks.json");
        std::fs::write(&path, "{ not: json").unwrap();

        let err = JsonFileSubscriptionStore::new(&path)
            .active_subscriptions()
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::Parse { .. }));
        assert!(err.to_string().contains("webhooks.json"));
    }

    #[tokio::test]
    async fn test_json_store_directory_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = JsonFileSubscriptionStore::new(dir.path())
            .active_subscriptions()
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::Read { .. }));
    }
}
