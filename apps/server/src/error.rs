use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use btmirror_core::errors::{DatabaseError, Error as CoreError, GatewayError};

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    /// Admin pages answer with a Basic auth challenge instead of JSON.
    #[error("authentication required")]
    AdminChallenge,

    #[error("{0}")]
    Conflict(String),

    /// The gateway failed or rejected the call
    #[error("{0}")]
    BadGateway(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) | Self::AdminChallenge => StatusCode::UNAUTHORIZED,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::BadGateway(_) => StatusCode::BAD_GATEWAY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::BadRequest(_) => "bad_request",
            Self::Unauthorized(_) | Self::AdminChallenge => "unauthorized",
            Self::Conflict(_) => "conflict",
            Self::BadGateway(_) => "gateway_error",
            Self::Internal(_) => "internal",
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NotFound { .. } => Self::NotFound(err.to_string()),
            CoreError::Validation(message) => Self::BadRequest(message),
            CoreError::Gateway(GatewayError::NotFound { .. }) => Self::NotFound(err.to_string()),
            CoreError::Gateway(GatewayError::Api { status, ref message })
                if (400..500).contains(&status) =>
            {
                Self::BadRequest(message.clone())
            }
            CoreError::Gateway(_) => Self::BadGateway(err.to_string()),
            CoreError::Database(DatabaseError::ConstraintViolation(message)) => {
                Self::Conflict(message)
            }
            other => Self::Internal(other.to_string()),
        }
    }
}

impl From<tera::Error> for ApiError {
    fn from(err: tera::Error) -> Self {
        Self::Internal(format!("Template error: {}", err))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("{}", self);
        }

        let mut response = (
            status,
            Json(json!({ "code": self.code(), "message": self.to_string() })),
        )
            .into_response();
        if matches!(self, Self::AdminChallenge) {
            response.headers_mut().insert(
                header::WWW_AUTHENTICATE,
                HeaderValue::from_static("Basic realm=\"btmirror admin\""),
            );
        }
        response
    }
}
