//! Core building blocks shared by the Switchboard crates.
//!
//! - [`types`] — conversation turns, completion results, webhook records
//! - [`config`] — JSON config file + environment overrides
//! - [`utils`] — data paths and string helpers

pub mod config;
pub mod types;
pub mod utils;

pub use types::{
    CompletionResult, ConversationTurn, DispatchEvent, ProviderId, Role, WebhookSubscription,
    OFFLINE_NOTICE, WILDCARD_EVENT,
};
