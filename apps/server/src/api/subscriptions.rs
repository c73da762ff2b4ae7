use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use btmirror_core::subscriptions::{
    ModifierKind, Subscription, SubscriptionHistory, SubscriptionModifier,
};
use btmirror_core::sync::{SyncSummary, Upserted};

use crate::error::{ApiError, ApiResult};
use crate::main_lib::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SubscriptionDetail {
    #[serde(flatten)]
    subscription: Subscription,
    add_ons: Vec<SubscriptionModifier>,
    discounts: Vec<SubscriptionModifier>,
    status_history: Vec<SubscriptionHistory>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SyncRequest {
    ids: Vec<String>,
    /// Refresh the plan catalogue before the subscriptions.
    #[serde(default)]
    refresh_catalog: bool,
}

#[derive(Debug, Deserialize)]
struct QuantityRequest {
    quantity: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ModifierState {
    subscription_id: String,
    kind: ModifierKind,
    modifier_id: String,
    quantity: u32,
    present: bool,
}

#[derive(Debug, Serialize)]
struct RemoveResponse {
    removed: bool,
}

async fn list_subscriptions(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<Subscription>>> {
    Ok(Json(state.subscription_service.list_subscriptions()?))
}

async fn get_subscription(
    State(state): State<Arc<AppState>>,
    Path(subscription_id): Path<String>,
) -> ApiResult<Json<SubscriptionDetail>> {
    let service = &state.subscription_service;
    let subscription = service.get_subscription(&subscription_id)?;
    Ok(Json(SubscriptionDetail {
        add_ons: service.list_subscription_add_ons(&subscription_id)?,
        discounts: service.list_subscription_discounts(&subscription_id)?,
        status_history: service.list_history(&subscription_id)?,
        subscription,
    }))
}

async fn sync_subscriptions(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SyncRequest>,
) -> ApiResult<Json<SyncSummary>> {
    if body.ids.is_empty() {
        return Err(ApiError::BadRequest("ids must not be empty".to_string()));
    }
    info!(
        "[Subscriptions] Syncing {} subscription(s){}",
        body.ids.len(),
        if body.refresh_catalog { " with catalogue" } else { "" }
    );

    let summary = if body.refresh_catalog {
        state.sync_service.sync_all(&body.ids).await?
    } else {
        state.subscription_service.sync_by_ids(&body.ids).await?
    };
    Ok(Json(summary))
}

async fn sync_subscription(
    State(state): State<Arc<AppState>>,
    Path(subscription_id): Path<String>,
) -> ApiResult<Json<Upserted<Subscription>>> {
    Ok(Json(
        state
            .subscription_service
            .sync_subscription(&subscription_id)
            .await?,
    ))
}

async fn cancel_subscription(
    State(state): State<Arc<AppState>>,
    Path(subscription_id): Path<String>,
) -> ApiResult<Json<Subscription>> {
    info!("[Subscriptions] Canceling {}", subscription_id);
    Ok(Json(
        state.subscription_service.cancel(&subscription_id).await?,
    ))
}

fn modifier_state(
    state: &AppState,
    subscription_id: String,
    kind: ModifierKind,
    modifier_id: String,
) -> ApiResult<ModifierState> {
    let service = &state.subscription_service;
    service.get_subscription(&subscription_id)?;
    let (quantity, present) = match kind {
        ModifierKind::AddOn => (
            service.add_on_quantity(&subscription_id, &modifier_id)?,
            service.has_add_on(&subscription_id, &modifier_id)?,
        ),
        ModifierKind::Discount => (
            service.discount_quantity(&subscription_id, &modifier_id)?,
            service.has_discount(&subscription_id, &modifier_id)?,
        ),
    };
    Ok(ModifierState {
        subscription_id,
        kind,
        modifier_id,
        quantity,
        present,
    })
}

async fn get_add_on(
    State(state): State<Arc<AppState>>,
    Path((subscription_id, add_on_id)): Path<(String, String)>,
) -> ApiResult<Json<ModifierState>> {
    Ok(Json(modifier_state(
        &state,
        subscription_id,
        ModifierKind::AddOn,
        add_on_id,
    )?))
}

async fn set_add_on(
    State(state): State<Arc<AppState>>,
    Path((subscription_id, add_on_id)): Path<(String, String)>,
    Json(body): Json<QuantityRequest>,
) -> ApiResult<Json<SubscriptionModifier>> {
    Ok(Json(
        state
            .subscription_service
            .set_add_on(&subscription_id, &add_on_id, body.quantity)
            .await?,
    ))
}

async fn remove_add_on(
    State(state): State<Arc<AppState>>,
    Path((subscription_id, add_on_id)): Path<(String, String)>,
) -> ApiResult<Json<RemoveResponse>> {
    let removed = state
        .subscription_service
        .remove_add_on(&subscription_id, &add_on_id)
        .await?;
    Ok(Json(RemoveResponse { removed }))
}

async fn get_discount(
    State(state): State<Arc<AppState>>,
    Path((subscription_id, discount_id)): Path<(String, String)>,
) -> ApiResult<Json<ModifierState>> {
    Ok(Json(modifier_state(
        &state,
        subscription_id,
        ModifierKind::Discount,
        discount_id,
    )?))
}

async fn set_discount(
    State(state): State<Arc<AppState>>,
    Path((subscription_id, discount_id)): Path<(String, String)>,
    Json(body): Json<QuantityRequest>,
) -> ApiResult<Json<SubscriptionModifier>> {
    Ok(Json(
        state
            .subscription_service
            .set_discount(&subscription_id, &discount_id, body.quantity)
            .await?,
    ))
}

async fn remove_discount(
    State(state): State<Arc<AppState>>,
    Path((subscription_id, discount_id)): Path<(String, String)>,
) -> ApiResult<Json<RemoveResponse>> {
    let removed = state
        .subscription_service
        .remove_discount(&subscription_id, &discount_id)
        .await?;
    Ok(Json(RemoveResponse { removed }))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/subscriptions", get(list_subscriptions))
        .route("/subscriptions/sync", post(sync_subscriptions))
        .route("/subscriptions/:id", get(get_subscription))
        .route("/subscriptions/:id/sync", post(sync_subscription))
        .route("/subscriptions/:id/cancel", post(cancel_subscription))
        .route(
            "/subscriptions/:id/add-ons/:add_on_id",
            get(get_add_on).put(set_add_on).delete(remove_add_on),
        )
        .route(
            "/subscriptions/:id/discounts/:discount_id",
            get(get_discount).put(set_discount).delete(remove_discount),
        )
}
