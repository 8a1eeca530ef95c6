use pipedrive_http::Method;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The executor could not perform the request at all.
    #[error("HTTP transport error: {0}")]
    Transport(String),

    /// The API answered with a non-success status.
    ///
    /// Carries the response body and the parameters of the failing call.
    #[error("{method} {url} failed with HTTP {status}")]
    BadResponse {
        method: Method,
        url: String,
        status: u16,
        body: serde_json::Value,
        params: serde_json::Value,
    },

    /// A success response without the expected shape.
    #[error("unexpected response from {url}: {message}")]
    UnexpectedResponse { url: String, message: String },

    #[error("invalid options: {message}")]
    InvalidOptions { message: String },

    #[error("record has no id")]
    MissingId,

    #[error("configuration error: {message}")]
    Config { message: String },

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Core(#[from] pipedrive_core::Error),
}

impl Error {
    /// HTTP status of a [`Error::BadResponse`].
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::BadResponse { status, .. } => Some(*status),
            _ => None,
        }
    }
}
