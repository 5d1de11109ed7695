//! Error types for the series catalog.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the series catalog.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors
    #[error("Webshare token not configured. Set WEBSHARE_TOKEN or webshare.token in config.toml")]
    WebshareTokenMissing,

    #[error("TMDB API key not configured. Set TMDB_API_KEY environment variable")]
    TmdbApiKeyMissing,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // Search collaborator errors
    #[error("Search transport failed for '{query}': {reason}")]
    Transport { query: String, reason: String },

    #[error("Malformed search response for '{query}': {reason}")]
    MalformedResponse { query: String, reason: String },

    #[error("Search rejected for '{query}' with status {status}")]
    SearchRejected { query: String, status: String },

    // Outcome errors
    #[error("No episodes found for series: {0}")]
    NoContentFound(String),

    #[error("Series not found: {0}")]
    SeriesNotFound(String),

    #[error("Season {season} not found for series: {series}")]
    SeasonNotFound { series: String, season: u32 },

    #[error("Not a valid store key: '{0}'")]
    InvalidSlug(String),

    #[error("Stored data for '{slug}' is unreadable: {reason}")]
    CorruptStore { slug: String, reason: String },

    #[error("A refresh of '{0}' is already running")]
    RefreshInProgress(String),

    #[error("Search for '{0}' was cancelled")]
    Cancelled(String),

    #[error("Search for '{series}' timed out after {secs}s")]
    Timeout { series: String, secs: u64 },

    // Metadata collaborator errors
    #[error("Metadata unavailable: {0}")]
    MetadataUnavailable(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // HTTP errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    // JSON errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // XML errors
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::DeError),

    // Generic errors
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a generic error from a string.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Error::Other(msg.into())
    }

    /// Whether this error means "nothing usable was found" rather than a failure.
    pub fn is_no_content(&self) -> bool {
        matches!(self, Error::NoContentFound(_))
    }

    /// Whether this error is the store's not-found signal.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::SeriesNotFound(_) | Error::SeasonNotFound { .. })
    }
}
