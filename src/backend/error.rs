use thiserror::Error;

/// Failure taxonomy for observance backend calls. Validation (400) and
/// missing-record (404) responses are distinguished from server and
/// transport failures because they drive different user-facing messages.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("invalid request: {0}")]
    BadRequest(String),
    #[error("prayer record not found")]
    NotFound,
    #[error("server error (status {0})")]
    Server(u16),
    #[error("request failed")]
    Transport(#[from] reqwest::Error),
}
