//! Error types for the recipe finder
//!
//! Library code returns these thiserror enums; the binary wraps them in
//! `anyhow` at the edge and the HTTP layer maps `SearchError` onto status
//! codes (see `api::AppError`).

use thiserror::Error;

/// Errors raised on the query path
#[derive(Error, Debug)]
pub enum SearchError {
    /// Caller supplied no usable criteria (surfaced as 400)
    #[error("{0}")]
    Validation(String),

    /// The pipeline narrowed the collection to nothing (surfaced as 404).
    /// This is a distinct outcome, not a successful empty result.
    #[error("No recipes matched the criteria")]
    NoMatch,

    /// A direct lookup found nothing (surfaced as 404)
    #[error("{0}")]
    NotFound(String),

    /// Unexpected failure while reading the store or comparing values (500)
    #[error("{0}")]
    Internal(String),
}

impl SearchError {
    /// Validation error for an empty or absent criteria list
    pub fn criteria_required() -> Self {
        SearchError::Validation("Search criteria is required".to_string())
    }
}

/// Errors raised while loading or saving the knowledge store
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid knowledge store JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Snapshot encoding error: {0}")]
    Snapshot(#[from] bincode::Error),

    #[error("Knowledge snapshot version mismatch: expected {expected}, got {found}")]
    VersionMismatch { expected: u32, found: u32 },

    #[error("Duplicate entity name '{0}'")]
    DuplicateEntity(String),
}

/// Errors raised while loading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error reading config '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid config value for {field}: {message}")]
    Invalid { field: &'static str, message: String },
}

pub type SearchResult<T> = Result<T, SearchError>;
