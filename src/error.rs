use thiserror::Error;

/// Errors that abort an extraction attempt.
///
/// Fetching is the only fatal stage of the pipeline: once a page has been
/// retrieved, every parsing problem degrades to an absent field instead.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The input could not be parsed as an absolute URL
    #[error("Invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// Only http and https are fetched
    #[error("Unsupported URL scheme '{0}' (expected http or https)")]
    UnsupportedScheme(String),

    /// The remote server did not answer in time
    #[error("Timed out fetching {0}")]
    Timeout(String),

    /// The server answered with a non-success status
    #[error("HTTP {status} fetching {url}")]
    Status {
        status: reqwest::StatusCode,
        url: String,
    },

    /// Redirect limit exceeded or redirect loop detected
    #[error("Too many redirects fetching {0}")]
    TooManyRedirects(String),

    /// Connection, DNS or I/O failure
    #[error("Failed to fetch URL: {0}")]
    Transport(#[source] reqwest::Error),

    /// The response body is not usable page text
    #[error("Could not decode page content: {0}")]
    Decode(String),

    /// The HTTP client could not be built
    #[error("Failed to create HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

impl FetchError {
    /// Map a reqwest failure onto the fetch taxonomy.
    pub(crate) fn from_reqwest(err: reqwest::Error, url: &str) -> Self {
        if err.is_timeout() {
            FetchError::Timeout(url.to_string())
        } else if err.is_redirect() {
            FetchError::TooManyRedirects(url.to_string())
        } else if err.is_decode() || err.is_body() {
            FetchError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            FetchError::Status {
                status,
                url: url.to_string(),
            }
        } else {
            FetchError::Transport(err)
        }
    }
}
