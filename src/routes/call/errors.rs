use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};

use crate::utils::error_chain_fmt;
use crate::voice_response::VoiceResponse;

pub const APOLOGY_MESSAGE: &str = "Sorry, something went wrong with your call. Please try again.";

#[derive(thiserror::Error)]
pub enum WebhookError {
    #[error("{message}")]
    ValidationError { message: String, retry_url: String },
}

impl WebhookError {
    pub fn validation(message: impl Into<String>, retry_url: impl Into<String>) -> Self {
        WebhookError::ValidationError {
            message: message.into(),
            retry_url: retry_url.into(),
        }
    }

    pub fn retry_url(&self) -> &str {
        match self {
            WebhookError::ValidationError { retry_url, .. } => retry_url,
        }
    }
}

impl std::fmt::Debug for WebhookError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

/// The platform needs valid markup on every turn, so failures are spoken to the
/// caller instead of being returned as an HTTP error status.
impl ResponseError for WebhookError {
    fn status_code(&self) -> StatusCode {
        StatusCode::OK
    }

    fn error_response(&self) -> HttpResponse {
        tracing::warn!(error = %self, retry_url = %self.retry_url(), "Webhook degraded to retry prompt");
        VoiceResponse::new()
            .say(APOLOGY_MESSAGE)
            .redirect(self.retry_url())
            .into_http_response()
    }
}
