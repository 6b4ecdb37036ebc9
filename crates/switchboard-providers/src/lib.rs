//! Completion provider layer for Switchboard.
//!
//! # Architecture
//!
//! - [`traits::ProviderAdapter`]: uniform `attempt` contract every provider implements
//! - [`registry`]: static specs for the three supported providers, in fixed priority order
//! - [`wire`]: per-provider request bodies and reply extraction
//! - [`http_adapter::HttpAdapter`]: one outbound HTTP call per attempt, failures become `None`
//! - [`augment`]: merges an optional prompt template into the last user turn
//! - [`preference`]: where the "try this provider first" hint is read from
//! - [`gateway::CompletionGateway`]: preferred pass, fixed-order fallback, offline sentinel

pub mod augment;
pub mod gateway;
pub mod http_adapter;
pub mod preference;
pub mod registry;
pub mod traits;
pub mod wire;

// Re-export main types for convenience
pub use augment::augment;
pub use gateway::{CompletionGateway, Persona};
pub use http_adapter::{build_adapters, build_http_client, HttpAdapter};
pub use preference::{PreferenceSource, SettingsFilePreference, StaticPreference};
pub use registry::{ProviderSpec, PROVIDERS};
pub use traits::{CompletionLimits, ProviderAdapter};
