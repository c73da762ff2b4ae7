use async_trait::async_trait;

use super::{
    ModifierKind, NewSubscriptionModifier, Subscription, SubscriptionHistory,
    SubscriptionModifier, SubscriptionSnapshot,
};
use crate::errors::Result;
use crate::gateway::RemoteSubscription;
use crate::sync::{SyncSummary, Upserted};

#[async_trait]
pub trait SubscriptionRepositoryTrait: Send + Sync {
    fn get_by_id(&self, subscription_id: &str) -> Result<Option<Subscription>>;
    fn list(&self) -> Result<Vec<Subscription>>;
    fn list_modifiers(
        &self,
        subscription_id: &str,
        kind: ModifierKind,
    ) -> Result<Vec<SubscriptionModifier>>;
    fn get_modifier(
        &self,
        subscription_id: &str,
        kind: ModifierKind,
        modifier_id: &str,
    ) -> Result<Option<SubscriptionModifier>>;
    fn list_history(&self, subscription_id: &str) -> Result<Vec<SubscriptionHistory>>;

    /// Upserts the subscription and its modifier rows, deletes modifier rows
    /// absent from the snapshot and replaces the status history.
    async fn save_synced(&self, snapshot: SubscriptionSnapshot) -> Result<Upserted<Subscription>>;

    /// Inserts or updates the row keyed by (subscription, kind, modifier id).
    async fn upsert_modifier(&self, modifier: NewSubscriptionModifier)
        -> Result<SubscriptionModifier>;

    /// Returns the number of rows deleted.
    async fn delete_modifier(
        &self,
        subscription_id: &str,
        kind: ModifierKind,
        modifier_id: &str,
    ) -> Result<usize>;
}

#[async_trait]
pub trait SubscriptionServiceTrait: Send + Sync {
    fn get_subscription(&self, subscription_id: &str) -> Result<Subscription>;
    fn list_subscriptions(&self) -> Result<Vec<Subscription>>;
    fn list_subscription_add_ons(&self, subscription_id: &str)
        -> Result<Vec<SubscriptionModifier>>;
    fn list_subscription_discounts(
        &self,
        subscription_id: &str,
    ) -> Result<Vec<SubscriptionModifier>>;
    fn list_history(&self, subscription_id: &str) -> Result<Vec<SubscriptionHistory>>;

    /// Mirrors a remote subscription, syncing its card, customer and catalogue
    /// entries first when they are missing locally.
    async fn upsert_from_remote(
        &self,
        remote: RemoteSubscription,
    ) -> Result<Upserted<Subscription>>;
    async fn sync_subscription(&self, subscription_id: &str) -> Result<Upserted<Subscription>>;

    /// Searches the gateway for `ids` and mirrors each result. Per-subscription
    /// failures are reported and listed in the summary.
    async fn sync_by_ids(&self, ids: &[String]) -> Result<SyncSummary>;

    async fn cancel(&self, subscription_id: &str) -> Result<Subscription>;

    /// Local quantity, 0 when the subscription does not carry the add-on.
    fn add_on_quantity(&self, subscription_id: &str, add_on_id: &str) -> Result<u32>;
    fn discount_quantity(&self, subscription_id: &str, discount_id: &str) -> Result<u32>;
    fn has_add_on(&self, subscription_id: &str, add_on_id: &str) -> Result<bool>;
    fn has_discount(&self, subscription_id: &str, discount_id: &str) -> Result<bool>;

    async fn set_add_on(
        &self,
        subscription_id: &str,
        add_on_id: &str,
        quantity: u32,
    ) -> Result<SubscriptionModifier>;
    async fn set_discount(
        &self,
        subscription_id: &str,
        discount_id: &str,
        quantity: u32,
    ) -> Result<SubscriptionModifier>;

    /// Returns false, after reporting it, when the subscription has no such add-on.
    async fn remove_add_on(&self, subscription_id: &str, add_on_id: &str) -> Result<bool>;
    async fn remove_discount(&self, subscription_id: &str, discount_id: &str) -> Result<bool>;
}
