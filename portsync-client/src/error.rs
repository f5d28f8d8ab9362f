use thiserror::Error;

/// Failure of a single WebUI request.
///
/// These stay inside the client: [`PortService`](crate::PortService) methods
/// log them and report `false`/`None` instead.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Connection refused, DNS failure, timeout, TLS error.
    #[error("transport error: {0}")]
    Transport(#[source] Box<ureq::Transport>),

    #[error("unexpected HTTP status {0}")]
    Status(u16),

    #[error("login rejected (HTTP {status}): {body:?}")]
    LoginRejected { status: u16, body: String },

    #[error("failed to read response body: {0}")]
    Body(#[source] std::io::Error),

    #[error("failed to encode preferences: {0}")]
    Encode(#[from] serde_json::Error),
}

impl From<ureq::Error> for ClientError {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::Status(status, _) => ClientError::Status(status),
            ureq::Error::Transport(transport) => ClientError::Transport(Box::new(transport)),
        }
    }
}
