use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request to {endpoint} failed: {source}")]
    Request {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{endpoint} returned HTTP {status}")]
    Status { endpoint: String, status: u16 },

    #[error("could not decode response from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("suggestion service reported: {0}")]
    Suggestion(String),

    #[error("server did not redirect after creating the ticket")]
    MissingRedirect,

    #[error("could not read attachment {path}: {source}")]
    Attachment {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("could not build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
}

pub type ApiResult<T> = Result<T, ApiError>;
