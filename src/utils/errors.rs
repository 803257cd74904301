use thiserror::Error;

/// Failure taxonomy for remote progress persistence.
///
/// Store failures never interrupt playback: callers log them and surface a
/// non-blocking notification instead of propagating.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("progress store returned status {status}")]
    Status { status: reqwest::StatusCode },

    #[error("invalid store endpoint: {0}")]
    Endpoint(#[from] url::ParseError),
}
