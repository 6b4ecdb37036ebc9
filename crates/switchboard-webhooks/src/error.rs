use std::path::PathBuf;

use thiserror::Error;

/// Failure to produce the subscription list.
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("failed to read subscriptions from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid subscriptions JSON in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("subscription store unavailable: {0}")]
    Store(String),
}
