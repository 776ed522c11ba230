//! Advisory error types. These stay inside the gateway; callers only ever
//! see the fallback text.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AdvisoryError {
    /// No API key configured
    #[error("Advisory API key is not configured")]
    MissingApiKey,
    /// Network, TLS or timeout failure
    #[error("Advisory transport error: {0}")]
    Transport(String),
    /// Service answered with a non-success status
    #[error("Advisory service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    /// Response body was not the expected JSON
    #[error("Malformed advisory response: {0}")]
    MalformedResponse(String),
}

impl From<ureq::Error> for AdvisoryError {
    fn from(error: ureq::Error) -> Self {
        match error {
            ureq::Error::Status(status, response) => {
                let body = response
                    .into_string()
                    .unwrap_or_else(|e| format!("<unreadable body: {e}>"));
                AdvisoryError::Status { status, body }
            }
            ureq::Error::Transport(transport) => AdvisoryError::Transport(transport.to_string()),
        }
    }
}
