use axum::http::StatusCode;
use thiserror::Error;

use crate::config::Environment;
use crate::models::ErrorBody;

/** \brief Upper bound on upstream error text echoed back to the caller. */
pub const MAX_DETAIL_CHARS: usize = 500;

const REDACTED: &str = "[REDACTED]";

/**
 * \brief Every way a relay request can fail. Each variant maps to one status and one body.
 */
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("method {method} not allowed, expected POST")]
    MethodNotAllowed { method: String },

    #[error("invalid request body: {reason}")]
    InvalidRequestBody { reason: String },

    #[error("request body exceeds the size limit")]
    PayloadTooLarge,

    #[error("message must be a non-empty string")]
    InvalidMessage,

    /** \brief `key` is the name of the missing entry, never its value. */
    #[error("credential {key} is not configured")]
    Configuration { key: String },

    #[error("upstream rejected the API key")]
    UpstreamUnauthorized { hint: String },

    #[error("upstream rate limit exceeded")]
    UpstreamRateLimited,

    #[error("upstream returned {status}")]
    Upstream { status: StatusCode, details: String },

    #[error("unexpected upstream response format: {reason}")]
    UpstreamMalformedResponse { reason: String },

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl RelayError {
    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            RelayError::InvalidRequestBody { .. } | RelayError::InvalidMessage => {
                StatusCode::BAD_REQUEST
            }
            RelayError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            RelayError::Configuration { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            RelayError::UpstreamUnauthorized { .. } => StatusCode::UNAUTHORIZED,
            RelayError::UpstreamRateLimited => StatusCode::TOO_MANY_REQUESTS,
            RelayError::Upstream { status, .. } => *status,
            RelayError::UpstreamMalformedResponse { .. } | RelayError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /** \brief Short variant name, used in logs. */
    pub fn kind(&self) -> &'static str {
        match self {
            RelayError::MethodNotAllowed { .. } => "MethodNotAllowed",
            RelayError::InvalidRequestBody { .. } => "InvalidRequestBody",
            RelayError::PayloadTooLarge => "PayloadTooLarge",
            RelayError::InvalidMessage => "InvalidMessage",
            RelayError::Configuration { .. } => "ConfigurationError",
            RelayError::UpstreamUnauthorized { .. } => "UpstreamUnauthorized",
            RelayError::UpstreamRateLimited => "UpstreamRateLimited",
            RelayError::Upstream { .. } => "UpstreamError",
            RelayError::UpstreamMalformedResponse { .. } => "UpstreamMalformedResponse",
            RelayError::Internal(_) => "InternalError",
        }
    }

    /**
     * \brief Builds the JSON body for this error. Internal detail beyond the message
     * is only attached in development.
     */
    pub fn to_body(&self, environment: Environment) -> ErrorBody {
        match self {
            RelayError::MethodNotAllowed { .. } => {
                ErrorBody::new("Method not allowed").message("Expected POST")
            }
            RelayError::InvalidRequestBody { reason } => ErrorBody::new("Invalid JSON")
                .message("Invalid request format")
                .details(reason.clone()),
            RelayError::PayloadTooLarge => ErrorBody::new("Payload too large")
                .message("Request body exceeds the size limit"),
            RelayError::InvalidMessage => ErrorBody::new("Invalid message")
                .message("Message must be a non-empty string"),
            RelayError::Configuration { key } => ErrorBody::new("Server configuration error")
                .message("API key not configured")
                .hint(format!("Add {} to environment variables", key)),
            RelayError::UpstreamUnauthorized { hint } => ErrorBody::new("Invalid API key")
                .message("The AI service rejected the configured API key")
                .hint(hint.clone()),
            RelayError::UpstreamRateLimited => ErrorBody::new("Rate limit exceeded")
                .message("The AI service is receiving too many requests")
                .hint("Please wait a moment and try again"),
            RelayError::Upstream { status, details } => ErrorBody::new("AI service error")
                .message(format!("AI service responded with status {}", status.as_u16()))
                .details(truncate_details(details)),
            RelayError::UpstreamMalformedResponse { reason } => {
                ErrorBody::new("Invalid response format")
                    .message("Unexpected response format from AI service")
                    .details(reason.clone())
            }
            RelayError::Internal(err) => {
                let mut body = ErrorBody::new("Internal server error")
                    .message("Failed to get response from AI service")
                    .details(format!("{:#}", err));
                if environment.is_development() {
                    body.stack = Some(format!("{:?}", err));
                }
                body
            }
        }
    }
}

/**
 * \brief Cuts upstream error text to at most `MAX_DETAIL_CHARS` characters.
 */
pub fn truncate_details(text: &str) -> String {
    match text.char_indices().nth(MAX_DETAIL_CHARS) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

/**
 * \brief Replaces every occurrence of `secret` in upstream text with a mask.
 */
pub fn redact_secret(text: &str, secret: &str) -> String {
    if secret.is_empty() {
        return text.to_string();
    }
    text.replace(secret, REDACTED)
}
