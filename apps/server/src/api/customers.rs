use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tracing::info;

use btmirror_core::customers::{Address, Customer};
use btmirror_core::gateway::CustomerUpdateRequest;
use btmirror_core::payment_methods::CreditCard;
use btmirror_core::sync::Upserted;

use crate::error::ApiResult;
use crate::main_lib::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CustomerDetail {
    #[serde(flatten)]
    customer: Customer,
    addresses: Vec<Address>,
    credit_cards: Vec<CreditCard>,
}

async fn list_customers(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Customer>>> {
    Ok(Json(state.customer_service.list_customers()?))
}

async fn get_customer(
    State(state): State<Arc<AppState>>,
    Path(customer_id): Path<String>,
) -> ApiResult<Json<CustomerDetail>> {
    let customer = state.customer_service.get_customer(&customer_id)?;
    let addresses = state.customer_service.list_addresses(&customer_id)?;
    let credit_cards = state
        .payment_method_service
        .list_for_customer(&customer_id)?;
    Ok(Json(CustomerDetail {
        customer,
        addresses,
        credit_cards,
    }))
}

async fn update_customer(
    State(state): State<Arc<AppState>>,
    Path(customer_id): Path<String>,
    Json(body): Json<CustomerUpdateRequest>,
) -> ApiResult<Json<Customer>> {
    info!("[Customers] Updating customer {}", customer_id);
    let customer = state
        .customer_service
        .update_customer(&customer_id, body)
        .await?;
    Ok(Json(customer))
}

async fn sync_customer(
    State(state): State<Arc<AppState>>,
    Path(customer_id): Path<String>,
) -> ApiResult<Json<Upserted<Customer>>> {
    Ok(Json(state.customer_service.sync_customer(&customer_id).await?))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/customers", get(list_customers))
        .route("/customers/:id", get(get_customer).patch(update_customer))
        .route("/customers/:id/sync", post(sync_customer))
}
