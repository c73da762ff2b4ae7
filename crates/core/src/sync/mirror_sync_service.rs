use log::info;
use std::sync::Arc;

use super::SyncSummary;
use crate::errors::Result;
use crate::plans::PlanServiceTrait;
use crate::subscriptions::SubscriptionServiceTrait;

/// Full mirror refresh: the plan catalogue first, then the given subscriptions.
pub struct MirrorSyncService {
    plan_service: Arc<dyn PlanServiceTrait>,
    subscription_service: Arc<dyn SubscriptionServiceTrait>,
}

impl MirrorSyncService {
    pub fn new(
        plan_service: Arc<dyn PlanServiceTrait>,
        subscription_service: Arc<dyn SubscriptionServiceTrait>,
    ) -> Self {
        Self {
            plan_service,
            subscription_service,
        }
    }

    pub async fn sync_all(&self, subscription_ids: &[String]) -> Result<SyncSummary> {
        let catalog = self.plan_service.sync_catalog().await?;
        info!(
            "[Mirror] Catalogue refreshed ({} plan(s))",
            catalog.plans.created + catalog.plans.updated
        );

        let summary = self
            .subscription_service
            .sync_by_ids(subscription_ids)
            .await?;
        info!(
            "[Mirror] Subscriptions: {} created, {} updated, {} failed",
            summary.created,
            summary.updated,
            summary.failed.len()
        );
        Ok(summary)
    }
}
