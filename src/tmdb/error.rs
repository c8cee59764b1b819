use thiserror::Error;

#[derive(Debug, Error)]
pub enum TmdbError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: the API token was rejected")]
    Unauthorized,

    #[error("No API token configured (set TMDB_API_TOKEN)")]
    MissingToken,

    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },
}

impl From<reqwest::Error> for TmdbError {
    fn from(err: reqwest::Error) -> Self {
        TmdbError::NetworkError(err.to_string())
    }
}

impl From<serde_json::Error> for TmdbError {
    fn from(err: serde_json::Error) -> Self {
        TmdbError::ParseError(err.to_string())
    }
}
