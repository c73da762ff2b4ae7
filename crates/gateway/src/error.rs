//! Error types for the Braintree client.

use thiserror::Error;

use btmirror_core::errors::{Error as CoreError, GatewayError};

/// Result type alias for Braintree client operations.
pub type Result<T> = std::result::Result<T, BraintreeError>;

#[derive(Debug, Error)]
pub enum BraintreeError {
    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Body could not be written, or did not match the expected shape
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::de::DeError),

    #[error("{resource} '{id}' not found")]
    NotFound { resource: &'static str, id: String },

    /// Non-success status reported by the gateway
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Credentials rejected, or not usable as a header
    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl BraintreeError {
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth(message.into())
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::NotFound { .. } => Some(404),
            _ => None,
        }
    }
}

impl From<BraintreeError> for GatewayError {
    fn from(err: BraintreeError) -> Self {
        match err {
            BraintreeError::NotFound { resource, id } => GatewayError::not_found(resource, id),
            BraintreeError::Api { status, message } => GatewayError::api(status, message),
            BraintreeError::Auth(message) => GatewayError::Authentication(message),
            BraintreeError::Http(err) => GatewayError::Transport(err.to_string()),
            BraintreeError::Xml(err) => GatewayError::InvalidResponse(err.to_string()),
            BraintreeError::Config(message) => GatewayError::Transport(message),
        }
    }
}

impl From<BraintreeError> for CoreError {
    fn from(err: BraintreeError) -> Self {
        CoreError::Gateway(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_becomes_gateway_not_found() {
        let err = BraintreeError::NotFound {
            resource: "subscription",
            id: "sub-9".to_string(),
        };
        assert_eq!(err.status_code(), Some(404));
        assert_eq!(
            GatewayError::from(err),
            GatewayError::not_found("subscription", "sub-9")
        );
    }

    #[test]
    fn core_error_is_flagged_as_gateway() {
        let err: CoreError = BraintreeError::api(422, "Quantity is invalid").into();
        assert!(err.is_gateway());
        assert_eq!(err.to_string(), "Gateway error: API error (422): Quantity is invalid");
    }
}
