use formsync_codec::ParseError;
use thiserror::Error;

/// Why a schema could not be loaded
///
/// Recoverable: callers retry or fall back to the default schema source.
#[derive(Error, Debug)]
pub enum SchemaLoadError {
    #[error("Failed to read schema {url}: {source}")]
    Io {
        url: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to fetch schema {url}: {message}")]
    Http { url: String, message: String },

    #[error("Schema {url} is not valid: {source}")]
    Parse {
        url: String,
        #[source]
        source: ParseError,
    },

    #[error("Schema {url} must be an object or a boolean")]
    NotASchema { url: String },

    #[error("No loader for schema {url}")]
    UnsupportedUrl { url: String },
}

impl SchemaLoadError {
    pub fn url(&self) -> &str {
        match self {
            SchemaLoadError::Io { url, .. }
            | SchemaLoadError::Http { url, .. }
            | SchemaLoadError::Parse { url, .. }
            | SchemaLoadError::NotASchema { url }
            | SchemaLoadError::UnsupportedUrl { url } => url,
        }
    }
}

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupt settings: {0}")]
    Json(#[from] serde_json::Error),
}

pub type SchemaResult<T> = Result<T, SchemaLoadError>;
