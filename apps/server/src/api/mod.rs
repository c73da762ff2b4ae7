//! JSON API over the mirror, plus router assembly for the whole server.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::header,
    middleware::{self, Next},
    response::Response,
    Router,
};
use tower_http::trace::TraceLayer;

use crate::admin;
use crate::error::{ApiError, ApiResult};
use crate::main_lib::AppState;

mod customers;
mod health;
mod payment_methods;
mod plans;
mod subscriptions;

/// Rejects API calls that do not carry `Authorization: Bearer <token>`.
async fn require_api_token(
    State(state): State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> ApiResult<Response> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("missing authorization header".to_string()))?
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError::Unauthorized("invalid authorization header".to_string()))?;

    if token != state.auth.api_token {
        return Err(ApiError::Unauthorized(
            "invalid authorization token".to_string(),
        ));
    }

    Ok(next.run(req).await)
}

pub fn app_router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .merge(customers::router())
        .merge(payment_methods::router())
        .merge(plans::router())
        .merge(subscriptions::router())
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_api_token,
        ));

    Router::new()
        .merge(health::router())
        .nest("/api", api)
        .nest("/admin", admin::router(state.clone()))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
