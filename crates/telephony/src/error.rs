//! Telephony error types

/// Errors from the SMS and call-control services. All of them are caught at
/// the tool boundary and reported as narration strings.
#[derive(Debug, thiserror::Error)]
pub enum TelephonyError {
    #[error("missing credentials: {0}")]
    MissingCredentials(&'static str),

    #[error("no destination phone number")]
    MissingDestination,

    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("provider rejected the request ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("call teardown failed: {0}")]
    Teardown(String),
}
