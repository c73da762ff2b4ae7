use async_trait::async_trait;

use super::{AddOn, CatalogSnapshot, Discount, Plan};
use crate::errors::Result;
use crate::sync::CatalogSyncSummary;

#[async_trait]
pub trait PlanRepositoryTrait: Send + Sync {
    fn get_plan(&self, plan_id: &str) -> Result<Option<Plan>>;
    fn list_plans(&self) -> Result<Vec<Plan>>;
    fn get_add_on(&self, add_on_id: &str) -> Result<Option<AddOn>>;
    fn list_add_ons(&self) -> Result<Vec<AddOn>>;
    fn get_discount(&self, discount_id: &str) -> Result<Option<Discount>>;
    fn list_discounts(&self) -> Result<Vec<Discount>>;
    fn plan_add_on_ids(&self, plan_id: &str) -> Result<Vec<String>>;
    fn plan_discount_ids(&self, plan_id: &str) -> Result<Vec<String>>;

    /// Upserts the whole catalogue and replaces each plan's links, in one transaction.
    async fn save_catalog(&self, snapshot: CatalogSnapshot) -> Result<CatalogSyncSummary>;
}

#[async_trait]
pub trait PlanServiceTrait: Send + Sync {
    fn get_plan(&self, plan_id: &str) -> Result<Plan>;
    fn list_plans(&self) -> Result<Vec<Plan>>;
    fn get_add_on(&self, add_on_id: &str) -> Result<AddOn>;
    fn list_add_ons(&self) -> Result<Vec<AddOn>>;
    fn get_discount(&self, discount_id: &str) -> Result<Discount>;
    fn list_discounts(&self) -> Result<Vec<Discount>>;
    fn plan_add_on_ids(&self, plan_id: &str) -> Result<Vec<String>>;
    fn plan_discount_ids(&self, plan_id: &str) -> Result<Vec<String>>;

    /// Pulls plans, add-ons and discounts from the gateway and mirrors them.
    async fn sync_catalog(&self) -> Result<CatalogSyncSummary>;

    /// Returns the local plan, syncing the catalogue once when it is absent.
    async fn get_or_sync_plan(&self, plan_id: &str) -> Result<Plan>;
}
