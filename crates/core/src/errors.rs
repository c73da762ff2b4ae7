//! Error types shared by the mirror services.

use thiserror::Error;

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by core services.
#[derive(Debug, Error)]
pub enum Error {
    /// Local persistence failure
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Failure talking to, or reported by, the payment gateway
    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    /// A local record that was expected to exist does not
    #[error("{entity} '{id}' not found")]
    NotFound { entity: &'static str, id: String },

    /// Caller supplied invalid input
    #[error("Invalid input: {0}")]
    Validation(String),
}

impl Error {
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// True when the error came from the gateway rather than local state.
    pub fn is_gateway(&self) -> bool {
        matches!(self, Self::Gateway(_))
    }
}

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    #[error("Constraint violated: {0}")]
    ConstraintViolation(String),

    #[error("Invalid stored value: {0}")]
    InvalidValue(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Gateway failures, independent of the HTTP client used to reach it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    #[error("{resource} '{id}' not found on gateway")]
    NotFound { resource: String, id: String },

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl GatewayError {
    pub fn not_found(resource: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
            id: id.into(),
        }
    }

    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// HTTP status if this is an API error.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::NotFound { .. } => Some(404),
            Self::Authentication(_) => Some(401),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gateway_status_code_covers_not_found_and_auth() {
        assert_eq!(
            GatewayError::not_found("subscription", "sub-1").status_code(),
            Some(404)
        );
        assert_eq!(
            GatewayError::Authentication("bad key".to_string()).status_code(),
            Some(401)
        );
        assert_eq!(GatewayError::api(422, "invalid").status_code(), Some(422));
        assert_eq!(
            GatewayError::Transport("reset".to_string()).status_code(),
            None
        );
    }

    #[test]
    fn not_found_message_names_entity_and_id() {
        let err = Error::not_found("Subscription", "abc");
        assert_eq!(err.to_string(), "Subscription 'abc' not found");
        assert!(!err.is_gateway());
    }
}
