use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tracing::info;

use btmirror_core::plans::{AddOn, Discount, Plan};
use btmirror_core::sync::CatalogSyncSummary;

use crate::error::ApiResult;
use crate::main_lib::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PlanDetail {
    #[serde(flatten)]
    plan: Plan,
    add_on_ids: Vec<String>,
    discount_ids: Vec<String>,
}

async fn list_plans(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Plan>>> {
    Ok(Json(state.plan_service.list_plans()?))
}

async fn get_plan(
    State(state): State<Arc<AppState>>,
    Path(plan_id): Path<String>,
) -> ApiResult<Json<PlanDetail>> {
    let plan = state.plan_service.get_plan(&plan_id)?;
    Ok(Json(PlanDetail {
        add_on_ids: state.plan_service.plan_add_on_ids(&plan_id)?,
        discount_ids: state.plan_service.plan_discount_ids(&plan_id)?,
        plan,
    }))
}

async fn sync_plans(State(state): State<Arc<AppState>>) -> ApiResult<Json<CatalogSyncSummary>> {
    info!("[Plans] Syncing catalogue");
    Ok(Json(state.plan_service.sync_catalog().await?))
}

async fn list_add_ons(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<AddOn>>> {
    Ok(Json(state.plan_service.list_add_ons()?))
}

async fn list_discounts(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Discount>>> {
    Ok(Json(state.plan_service.list_discounts()?))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/plans", get(list_plans))
        .route("/plans/sync", post(sync_plans))
        .route("/plans/:id", get(get_plan))
        .route("/add-ons", get(list_add_ons))
        .route("/discounts", get(list_discounts))
}
