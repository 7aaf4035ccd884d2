use thiserror::Error;

/// Message shown for any fetch or extraction failure.
pub const UNREADABLE_RECIPE: &str = "Could not retrieve or understand this recipe";

/// Errors raised while turning a web page into a recipe
#[derive(Error, Debug)]
pub enum ExtractError {
    /// The source document could not be fetched (network, blocked, bad status)
    #[error("Failed to fetch URL: {0}")]
    Fetch(String),

    /// No JSON-LD block contained a Recipe entity
    #[error("No recipe found. This page might not use schema.org markup")]
    NotFound,
}

impl ExtractError {
    /// Both kinds collapse to the same message for end users.
    pub fn user_message(&self) -> &'static str {
        UNREADABLE_RECIPE
    }
}

impl From<reqwest::Error> for ExtractError {
    fn from(err: reqwest::Error) -> Self {
        ExtractError::Fetch(err.to_string())
    }
}

/// Errors raised by the local recipe store
#[derive(Error, Debug)]
pub enum StoreError {
    /// The database could not be opened or initialised
    #[error("Storage unavailable: {0}")]
    Unavailable(#[source] tokio_rusqlite::Error),

    /// Another stored recipe already uses this URL
    #[error("A recipe from {url} is already saved")]
    Duplicate { url: String },

    /// No row with this id
    #[error("No entry with id {id}")]
    NotFound { id: i64 },

    #[error("Database error: {0}")]
    Database(#[from] tokio_rusqlite::Error),

    #[error("Failed to encode recipe data: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors raised by the import pipelines and the builder
#[derive(Error, Debug)]
pub enum ImportError {
    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// Import file is not a JSON array of recipes
    #[error("Invalid import file: {0}")]
    InvalidFormat(String),

    /// Builder configuration error
    #[error("Builder error: {0}")]
    BuilderError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Why a single record of an import file was not stored
#[derive(Error, Debug)]
pub enum RecordError {
    #[error("Malformed recipe record: {0}")]
    Decode(#[from] serde_json::Error),

    #[error(transparent)]
    Store(#[from] StoreError),
}
