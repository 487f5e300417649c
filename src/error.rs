//! Error types for dnr-rulegen.

use std::path::PathBuf;

use thiserror::Error;

/// Error type for rule generation.
#[derive(Error, Debug)]
pub enum Error {
    /// The first-party content script is missing or declared more than once
    #[error("configuration error: expected exactly one content script loading {script_id:?}, found {found}")]
    Configuration { script_id: String, found: usize },

    /// A first-party match pattern has the expected shape but an unusable host
    #[error("invalid match pattern: {0}")]
    InvalidMatchPattern(#[from] MatchPatternError),

    /// Priority tiers violate a cross-list ordering invariant
    #[error("priority conflict: {0}")]
    PriorityConflict(String),

    /// A generated rule list failed validation
    #[error("invalid rule in {list}: {reason}")]
    InvalidRule { list: String, reason: String },

    /// JSON (de)serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Writing a rule set to its destination failed
    #[error("failed to write {path:?}: {source}")]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for dnr-rulegen operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for content-script match pattern parsing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MatchPatternError {
    /// Not an `https://www.<host>/*` pattern
    #[error("unsupported match pattern shape: {0}")]
    UnsupportedShape(String),

    /// Shape is right but the host part cannot be used in a rule
    #[error("invalid host in match pattern {pattern:?}: {reason}")]
    InvalidHost { pattern: String, reason: &'static str },
}
