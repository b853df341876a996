use std::path::PathBuf;

/// Failure while writing one of the persisted JSON records.
///
/// Reads never produce this: a missing or corrupt file loads as defaults.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize {}: {source}", path.display())]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Why a key-combination string was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ComboError {
    #[error("shortcut is empty")]
    Empty,

    #[error("shortcut needs at least one modifier before the key")]
    MissingModifier,

    #[error("unknown modifier `{0}`")]
    UnknownModifier(String),

    #[error("key must be a single letter or digit, got `{0}`")]
    InvalidKey(String),
}
