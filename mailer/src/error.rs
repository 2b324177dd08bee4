use common::error::AppError;
use thiserror::Error;

/// Why a single attempt against the provider failed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SendFailure {
    #[error("Invalid Brevo API key. Please check your configuration.")]
    InvalidApiKey,

    #[error("Rate limit exceeded. Please try again later.")]
    RateLimited,

    #[error("Brevo API request failed with status {status} : {body}")]
    Upstream { status: u16, body: String },

    #[error("Brevo API request failed: {0}")]
    Transport(String),
}

#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("{0}")]
    Validation(String),

    #[error("Failed to generate invoice PDF: {0}")]
    Pdf(String),

    #[error("Failed to store invoice PDF: {0}")]
    Storage(String),

    #[error("Failed to send invoice #{invoice_number} after {attempts} attempts: {last}")]
    Exhausted {
        invoice_number: String,
        attempts: u32,
        last: SendFailure,
    },
}

impl From<DispatchError> for AppError {
    fn from(err: DispatchError) -> Self {
        match err {
            DispatchError::Validation(msg) => AppError::BadRequest(msg),
            other => AppError::Upstream(other.to_string()),
        }
    }
}
