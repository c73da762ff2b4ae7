use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use tracing::info;

use btmirror_core::gateway::CreditCardUpdateRequest;
use btmirror_core::payment_methods::CreditCard;
use btmirror_core::sync::Upserted;

use crate::error::ApiResult;
use crate::main_lib::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListQuery {
    customer_id: Option<String>,
}

async fn list_credit_cards(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Vec<CreditCard>>> {
    let cards = match query.customer_id {
        Some(customer_id) => state.payment_method_service.list_for_customer(&customer_id)?,
        None => state.payment_method_service.list_credit_cards()?,
    };
    Ok(Json(cards))
}

async fn get_credit_card(
    State(state): State<Arc<AppState>>,
    Path(token): Path<String>,
) -> ApiResult<Json<CreditCard>> {
    Ok(Json(state.payment_method_service.get_credit_card(&token)?))
}

async fn update_credit_card(
    State(state): State<Arc<AppState>>,
    Path(token): Path<String>,
    Json(body): Json<CreditCardUpdateRequest>,
) -> ApiResult<Json<CreditCard>> {
    info!("[PaymentMethods] Updating credit card {}", token);
    let card = state
        .payment_method_service
        .update_credit_card(&token, body)
        .await?;
    Ok(Json(card))
}

async fn sync_credit_card(
    State(state): State<Arc<AppState>>,
    Path(token): Path<String>,
) -> ApiResult<Json<Upserted<CreditCard>>> {
    Ok(Json(
        state.payment_method_service.sync_credit_card(&token).await?,
    ))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/payment-methods", get(list_credit_cards))
        .route(
            "/payment-methods/:token",
            get(get_credit_card).patch(update_credit_card),
        )
        .route("/payment-methods/:token/sync", post(sync_credit_card))
}
