use reqwest::StatusCode;

use crate::utils::error_chain_fmt;

#[derive(thiserror::Error)]
pub enum BiometricError {
    #[error("Biometric service request failed")]
    RequestFailed(#[from] reqwest::Error),
    #[error("Biometric service returned {status}: {body}")]
    UnexpectedStatus { status: StatusCode, body: String },
    #[error("Failed to parse biometric response: {0}")]
    ParseError(String),
}

impl std::fmt::Debug for BiometricError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}
