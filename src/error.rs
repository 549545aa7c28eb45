use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum PokedexError {
    #[error("HTTP client initialization failed: {0}")]
    HttpClientInit(reqwest::Error),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Connection to {api} failed: {source}")]
    Connection {
        api: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Pokémon '{name}' not found")]
    NotFound { name: String },

    #[error("API error from {api}: {message}")]
    Api { api: String, message: String },

    #[error("API error from {api}: HTTP {status}")]
    ApiStatus { api: String, status: u16 },

    #[error("Unexpected response shape from {api}: {source}")]
    DataShape {
        api: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unexpected response shape from {api}: missing {field}")]
    MissingField { api: String, field: String },

    #[error("Could not save {}: {source}", path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Timestamp formatting failed: {0}")]
    Timestamp(#[from] time::error::Format),

    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PokedexError {
    /// Errors that end a single lookup but leave the session running.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Io(_) | Self::Template(_))
    }
}
