use async_trait::async_trait;
use log::{debug, info};
use std::collections::HashSet;
use std::sync::Arc;

use super::{
    AddOn, CatalogSnapshot, Discount, Plan, PlanRepositoryTrait, PlanServiceTrait,
    PlanWithModifiers,
};
use crate::errors::{Error, Result};
use crate::gateway::{GatewayClientTrait, RemoteModifier};
use crate::sync::CatalogSyncSummary;

pub struct PlanService {
    repository: Arc<dyn PlanRepositoryTrait>,
    gateway: Arc<dyn GatewayClientTrait>,
}

impl PlanService {
    pub fn new(
        repository: Arc<dyn PlanRepositoryTrait>,
        gateway: Arc<dyn GatewayClientTrait>,
    ) -> Self {
        Self {
            repository,
            gateway,
        }
    }
}

/// Merges the listed modifiers with those only found embedded in plans.
/// The listed copy wins when both exist.
fn merge_modifiers<'a, T>(
    listed: &'a [RemoteModifier],
    embedded: impl Iterator<Item = &'a RemoteModifier>,
) -> Vec<T>
where
    T: From<&'a RemoteModifier>,
{
    let mut seen = HashSet::new();
    listed
        .iter()
        .chain(embedded)
        .filter(|modifier| seen.insert(modifier.id.as_str()))
        .map(T::from)
        .collect()
}

#[async_trait]
impl PlanServiceTrait for PlanService {
    fn get_plan(&self, plan_id: &str) -> Result<Plan> {
        self.repository
            .get_plan(plan_id)?
            .ok_or_else(|| Error::not_found("Plan", plan_id))
    }

    fn list_plans(&self) -> Result<Vec<Plan>> {
        self.repository.list_plans()
    }

    fn get_add_on(&self, add_on_id: &str) -> Result<AddOn> {
        self.repository
            .get_add_on(add_on_id)?
            .ok_or_else(|| Error::not_found("AddOn", add_on_id))
    }

    fn list_add_ons(&self) -> Result<Vec<AddOn>> {
        self.repository.list_add_ons()
    }

    fn get_discount(&self, discount_id: &str) -> Result<Discount> {
        self.repository
            .get_discount(discount_id)?
            .ok_or_else(|| Error::not_found("Discount", discount_id))
    }

    fn list_discounts(&self) -> Result<Vec<Discount>> {
        self.repository.list_discounts()
    }

    fn plan_add_on_ids(&self, plan_id: &str) -> Result<Vec<String>> {
        self.repository.plan_add_on_ids(plan_id)
    }

    fn plan_discount_ids(&self, plan_id: &str) -> Result<Vec<String>> {
        self.repository.plan_discount_ids(plan_id)
    }

    async fn sync_catalog(&self) -> Result<CatalogSyncSummary> {
        let remote_add_ons = self.gateway.list_add_ons().await?;
        let remote_discounts = self.gateway.list_discounts().await?;
        let remote_plans = self.gateway.list_plans().await?;

        let add_ons: Vec<AddOn> = merge_modifiers(
            &remote_add_ons,
            remote_plans.iter().flat_map(|plan| plan.add_ons.iter()),
        );
        let discounts: Vec<Discount> = merge_modifiers(
            &remote_discounts,
            remote_plans.iter().flat_map(|plan| plan.discounts.iter()),
        );
        let plans = remote_plans
            .iter()
            .map(|remote| PlanWithModifiers {
                plan: Plan::from(remote),
                add_on_ids: remote.add_ons.iter().map(|m| m.id.clone()).collect(),
                discount_ids: remote.discounts.iter().map(|m| m.id.clone()).collect(),
            })
            .collect::<Vec<_>>();

        debug!(
            "Saving catalogue: {} plan(s), {} add-on(s), {} discount(s)",
            plans.len(),
            add_ons.len(),
            discounts.len()
        );

        let summary = self
            .repository
            .save_catalog(CatalogSnapshot {
                add_ons,
                discounts,
                plans,
            })
            .await?;

        info!(
            "Synced plan catalogue: plans {}/{} add-ons {}/{} discounts {}/{} (created/updated)",
            summary.plans.created,
            summary.plans.updated,
            summary.add_ons.created,
            summary.add_ons.updated,
            summary.discounts.created,
            summary.discounts.updated
        );
        Ok(summary)
    }

    async fn get_or_sync_plan(&self, plan_id: &str) -> Result<Plan> {
        if let Some(plan) = self.repository.get_plan(plan_id)? {
            return Ok(plan);
        }
        self.sync_catalog().await?;
        self.get_plan(plan_id)
    }
}
