use thiserror::Error;

/// SDK errors
#[derive(Debug, Error)]
pub enum Error {
    /// Transport failure talking to the server
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("Server returned {status} for {url}")]
    Status {
        status: reqwest::StatusCode,
        url: String,
    },

    /// No tokio runtime to deliver chats on
    #[error("No tokio runtime available: {0}")]
    NoRuntime(#[from] tokio::runtime::TryCurrentError),
}
