/// Ways a scoreboard fetch can fail. None of these are fatal to the
/// dashboard; [`crate::scoreboard::fetch`] logs them and degrades to an
/// empty scoreboard.
#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    /// The shared HTTP client could not be built.
    #[error("failed to build http client: {0}")]
    Client(#[source] reqwest::Error),

    /// HTTP request failed (network, DNS, TLS, timeout, etc.).
    #[error("http request failed for {url}: {source}")]
    Http {
        url: String,
        source: reqwest::Error,
    },

    /// Server returned a non-success status that was not a "not found" body.
    #[error("unexpected status {status} for {url}")]
    UnexpectedStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    /// Failed to read the response body as text.
    #[error("failed to read response body from {url}: {source}")]
    Body {
        url: String,
        source: reqwest::Error,
    },

    /// The body was not the expected scoreboard JSON.
    #[error("invalid scoreboard json: {0}")]
    Decode(#[from] serde_json::Error),

    /// The endpoint answered with an embedded `"code": 404`.
    #[error("scoreboard endpoint not found")]
    NotFound,
}

pub type Result<T> = std::result::Result<T, FetchError>;
