//! Sync error type shared by the HTTP client and test doubles.

/// Errors produced by board fetch/post operations.
///
/// Every failure path is explicit: callers decide whether to keep the stale
/// board, log, or surface the error.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// The request never produced a response (connect, DNS, reset, timeout).
    #[error("request failed: {0}")]
    Transport(String),

    /// The server answered with a non-success HTTP status.
    #[error("server responded with status {status}")]
    Status { status: u16, body: String },

    /// The body could not be decoded, or the outgoing message encoded.
    #[error(transparent)]
    Wire(#[from] wire::WireError),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl SyncError {
    /// Stable machine-readable code, used as a log field.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Transport(_) => "E_TRANSPORT",
            Self::Status { .. } => "E_STATUS",
            Self::Wire(_) => "E_WIRE",
            Self::HttpClientBuild(_) => "E_HTTP_CLIENT_BUILD",
        }
    }
}
