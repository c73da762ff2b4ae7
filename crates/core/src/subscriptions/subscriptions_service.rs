use async_trait::async_trait;
use log::{debug, info, warn};
use rust_decimal::Decimal;
use std::collections::HashSet;
use std::sync::Arc;

use super::{
    ModifierKind, NewSubscriptionModifier, Subscription, SubscriptionHistory,
    SubscriptionModifier, SubscriptionRepositoryTrait, SubscriptionServiceTrait,
    SubscriptionSnapshot,
};
use crate::errors::{Error, Result};
use crate::gateway::{
    GatewayClientTrait, ModifierChanges, RemoteSubscription, SubscriptionUpdateRequest,
};
use crate::payment_methods::PaymentMethodServiceTrait;
use crate::plans::PlanServiceTrait;
use crate::reporting::{ErrorReporter, LogErrorReporter};
use crate::sync::{SyncSummary, Upserted};

/// Catalogue fields copied onto a subscription modifier row.
struct CatalogItem {
    name: String,
    amount: Decimal,
}

/// Ok(true) for a local `NotFound`, other errors propagate.
fn is_missing<T>(lookup: Result<T>) -> Result<bool> {
    match lookup {
        Ok(_) => Ok(false),
        Err(Error::NotFound { .. }) => Ok(true),
        Err(err) => Err(err),
    }
}

pub struct SubscriptionService {
    repository: Arc<dyn SubscriptionRepositoryTrait>,
    payment_method_service: Arc<dyn PaymentMethodServiceTrait>,
    plan_service: Arc<dyn PlanServiceTrait>,
    gateway: Arc<dyn GatewayClientTrait>,
    reporter: Arc<dyn ErrorReporter>,
}

impl SubscriptionService {
    pub fn new(
        repository: Arc<dyn SubscriptionRepositoryTrait>,
        payment_method_service: Arc<dyn PaymentMethodServiceTrait>,
        plan_service: Arc<dyn PlanServiceTrait>,
        gateway: Arc<dyn GatewayClientTrait>,
    ) -> Self {
        Self {
            repository,
            payment_method_service,
            plan_service,
            gateway,
            reporter: Arc::new(LogErrorReporter),
        }
    }

    pub fn with_error_reporter(mut self, reporter: Arc<dyn ErrorReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    fn catalog_item(&self, kind: ModifierKind, modifier_id: &str) -> Result<CatalogItem> {
        Ok(match kind {
            ModifierKind::AddOn => {
                let add_on = self.plan_service.get_add_on(modifier_id)?;
                CatalogItem {
                    name: add_on.name,
                    amount: add_on.amount,
                }
            }
            ModifierKind::Discount => {
                let discount = self.plan_service.get_discount(modifier_id)?;
                CatalogItem {
                    name: discount.name,
                    amount: discount.amount,
                }
            }
        })
    }

    fn missing_catalog_ids(
        &self,
        remote: &RemoteSubscription,
    ) -> Result<Vec<(ModifierKind, String)>> {
        let mut missing = Vec::new();
        for add_on in &remote.add_ons {
            if is_missing(self.plan_service.get_add_on(&add_on.id))? {
                missing.push((ModifierKind::AddOn, add_on.id.clone()));
            }
        }
        for discount in &remote.discounts {
            if is_missing(self.plan_service.get_discount(&discount.id))? {
                missing.push((ModifierKind::Discount, discount.id.clone()));
            }
        }
        Ok(missing)
    }

    /// Makes sure the plan and every modifier the subscription references exist
    /// locally, pulling the catalogue at most once.
    async fn ensure_catalog(&self, remote: &RemoteSubscription) -> Result<()> {
        let plan_known = !is_missing(self.plan_service.get_plan(&remote.plan_id))?;
        let missing = self.missing_catalog_ids(remote)?;
        if plan_known && missing.is_empty() {
            return Ok(());
        }

        debug!(
            "Subscription {} references unknown catalogue entries, syncing catalogue",
            remote.id
        );
        self.plan_service.sync_catalog().await?;

        self.plan_service.get_plan(&remote.plan_id)?;
        if let Some((kind, id)) = self.missing_catalog_ids(remote)?.into_iter().next() {
            return Err(Error::not_found(kind.entity(), id));
        }
        Ok(())
    }

    fn quantity(
        &self,
        subscription_id: &str,
        kind: ModifierKind,
        modifier_id: &str,
    ) -> Result<u32> {
        let quantity = self
            .repository
            .get_modifier(subscription_id, kind, modifier_id)?
            .map_or(0, |row| row.quantity);
        Ok(u32::try_from(quantity).unwrap_or(0))
    }

    /// Looks the subscription up on the gateway before mutating it. A failed
    /// lookup is reported and aborts the mutation.
    async fn find_remote(&self, subscription_id: &str) -> Result<RemoteSubscription> {
        match self.gateway.find_subscription(subscription_id).await {
            Ok(remote) => Ok(remote),
            Err(err) => {
                self.reporter.capture_error(&err);
                Err(err)
            }
        }
    }

    fn modifier_update(kind: ModifierKind, changes: ModifierChanges) -> SubscriptionUpdateRequest {
        match kind {
            ModifierKind::AddOn => SubscriptionUpdateRequest {
                add_ons: Some(changes),
                discounts: None,
            },
            ModifierKind::Discount => SubscriptionUpdateRequest {
                add_ons: None,
                discounts: Some(changes),
            },
        }
    }

    async fn set_modifier(
        &self,
        subscription_id: &str,
        kind: ModifierKind,
        modifier_id: &str,
        quantity: u32,
    ) -> Result<SubscriptionModifier> {
        let quantity = i32::try_from(quantity)
            .map_err(|_| Error::validation(format!("Quantity {} is out of range", quantity)))?;
        let subscription = self.get_subscription(subscription_id)?;
        let catalog = self.catalog_item(kind, modifier_id)?;
        let existing = self
            .repository
            .get_modifier(subscription_id, kind, modifier_id)?;

        self.find_remote(subscription_id).await?;

        let changes = if existing.is_some() {
            ModifierChanges::update(modifier_id, quantity)
        } else {
            ModifierChanges::add(modifier_id, quantity)
        };
        self.gateway
            .update_subscription(subscription_id, &Self::modifier_update(kind, changes))
            .await?;

        let row = match existing {
            Some(row) => NewSubscriptionModifier {
                quantity,
                ..row.into()
            },
            None => NewSubscriptionModifier {
                subscription_id: subscription.id.clone(),
                kind,
                modifier_id: modifier_id.to_string(),
                name: catalog.name,
                amount: catalog.amount,
                quantity,
                current_billing_cycle: subscription.current_billing_cycle,
                never_expires: true,
                number_of_billing_cycles: None,
            },
        };

        info!(
            "Set {} {} quantity {} on subscription {}",
            kind.entity(),
            modifier_id,
            quantity,
            subscription_id
        );
        self.repository.upsert_modifier(row).await
    }

    async fn remove_modifier(
        &self,
        subscription_id: &str,
        kind: ModifierKind,
        modifier_id: &str,
    ) -> Result<bool> {
        self.get_subscription(subscription_id)?;
        let existing = self
            .repository
            .get_modifier(subscription_id, kind, modifier_id)?;
        if existing.is_none() {
            self.reporter.capture_message(&format!(
                "Tried to remove {} {} from subscription {} which does not have it",
                kind.entity(),
                modifier_id,
                subscription_id
            ));
            return Ok(false);
        }

        self.find_remote(subscription_id).await?;
        self.gateway
            .update_subscription(
                subscription_id,
                &Self::modifier_update(kind, ModifierChanges::remove(modifier_id)),
            )
            .await?;

        self.repository
            .delete_modifier(subscription_id, kind, modifier_id)
            .await?;
        info!(
            "Removed {} {} from subscription {}",
            kind.entity(),
            modifier_id,
            subscription_id
        );
        Ok(true)
    }
}

#[async_trait]
impl SubscriptionServiceTrait for SubscriptionService {
    fn get_subscription(&self, subscription_id: &str) -> Result<Subscription> {
        self.repository
            .get_by_id(subscription_id)?
            .ok_or_else(|| Error::not_found("Subscription", subscription_id))
    }

    fn list_subscriptions(&self) -> Result<Vec<Subscription>> {
        self.repository.list()
    }

    fn list_subscription_add_ons(
        &self,
        subscription_id: &str,
    ) -> Result<Vec<SubscriptionModifier>> {
        self.repository
            .list_modifiers(subscription_id, ModifierKind::AddOn)
    }

    fn list_subscription_discounts(
        &self,
        subscription_id: &str,
    ) -> Result<Vec<SubscriptionModifier>> {
        self.repository
            .list_modifiers(subscription_id, ModifierKind::Discount)
    }

    fn list_history(&self, subscription_id: &str) -> Result<Vec<SubscriptionHistory>> {
        self.repository.list_history(subscription_id)
    }

    async fn upsert_from_remote(
        &self,
        remote: RemoteSubscription,
    ) -> Result<Upserted<Subscription>> {
        if let Some(token) = remote.payment_method_token.as_deref() {
            self.payment_method_service.get_or_sync(token).await?;
        } else {
            warn!("Subscription {} has no payment method token", remote.id);
        }
        self.ensure_catalog(&remote).await?;

        let snapshot = SubscriptionSnapshot::from(&remote);
        debug!(
            "Saving subscription {} with {} add-on(s), {} discount(s), {} history event(s)",
            remote.id,
            snapshot.add_ons.len(),
            snapshot.discounts.len(),
            snapshot.history.len()
        );
        self.repository.save_synced(snapshot).await
    }

    async fn sync_subscription(&self, subscription_id: &str) -> Result<Upserted<Subscription>> {
        let remote = self.gateway.find_subscription(subscription_id).await?;
        let result = self.upsert_from_remote(remote).await?;
        info!(
            "Synced subscription {} ({})",
            subscription_id,
            if result.created { "created" } else { "updated" }
        );
        Ok(result)
    }

    async fn sync_by_ids(&self, ids: &[String]) -> Result<SyncSummary> {
        let mut summary = SyncSummary::default();
        if ids.is_empty() {
            return Ok(summary);
        }

        let remotes = self.gateway.search_subscriptions(ids).await?;
        let mut returned = HashSet::new();

        for remote in remotes {
            let id = remote.id.clone();
            returned.insert(id.clone());
            match self.upsert_from_remote(remote).await {
                Ok(upserted) => summary.record(&upserted),
                Err(err) => {
                    warn!("Failed to sync subscription {}: {}", id, err);
                    self.reporter.capture_error(&err);
                    summary.fail(id);
                }
            }
        }

        for id in ids.iter().filter(|id| !returned.contains(id.as_str())) {
            warn!("Subscription {} was not returned by the gateway", id);
            summary.fail(id.clone());
        }

        info!(
            "Synced {} subscription(s): {} created, {} updated, {} failed",
            summary.total(),
            summary.created,
            summary.updated,
            summary.failed.len()
        );
        Ok(summary)
    }

    async fn cancel(&self, subscription_id: &str) -> Result<Subscription> {
        let remote = self.gateway.cancel_subscription(subscription_id).await?;
        info!("Canceled subscription {}", subscription_id);
        Ok(self.upsert_from_remote(remote).await?.record)
    }

    fn add_on_quantity(&self, subscription_id: &str, add_on_id: &str) -> Result<u32> {
        self.quantity(subscription_id, ModifierKind::AddOn, add_on_id)
    }

    fn discount_quantity(&self, subscription_id: &str, discount_id: &str) -> Result<u32> {
        self.quantity(subscription_id, ModifierKind::Discount, discount_id)
    }

    fn has_add_on(&self, subscription_id: &str, add_on_id: &str) -> Result<bool> {
        Ok(self.add_on_quantity(subscription_id, add_on_id)? > 0)
    }

    fn has_discount(&self, subscription_id: &str, discount_id: &str) -> Result<bool> {
        Ok(self.discount_quantity(subscription_id, discount_id)? > 0)
    }

    async fn set_add_on(
        &self,
        subscription_id: &str,
        add_on_id: &str,
        quantity: u32,
    ) -> Result<SubscriptionModifier> {
        self.set_modifier(subscription_id, ModifierKind::AddOn, add_on_id, quantity)
            .await
    }

    async fn set_discount(
        &self,
        subscription_id: &str,
        discount_id: &str,
        quantity: u32,
    ) -> Result<SubscriptionModifier> {
        self.set_modifier(subscription_id, ModifierKind::Discount, discount_id, quantity)
            .await
    }

    async fn remove_add_on(&self, subscription_id: &str, add_on_id: &str) -> Result<bool> {
        self.remove_modifier(subscription_id, ModifierKind::AddOn, add_on_id)
            .await
    }

    async fn remove_discount(&self, subscription_id: &str, discount_id: &str) -> Result<bool> {
        self.remove_modifier(subscription_id, ModifierKind::Discount, discount_id)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::customers::CustomerService;
    use crate::errors::GatewayError;
    use crate::payment_methods::PaymentMethodService;
    use crate::plans::PlanService;
    use crate::subscriptions::SubscriptionStatus;
    use crate::test_support::{
        remote_credit_card, remote_customer, remote_modifier, remote_plan, remote_subscription,
        GatewayCall, InMemoryCustomerRepository, InMemoryPaymentMethodRepository,
        InMemoryPlanRepository, InMemorySubscriptionRepository, MockGateway, RecordingReporter,
    };
    use rust_decimal_macros::dec;

    struct Fixture {
        gateway: Arc<MockGateway>,
        reporter: Arc<RecordingReporter>,
        repository: Arc<InMemorySubscriptionRepository>,
        service: SubscriptionService,
    }

    /// Gateway seeded with customer cus-1, card tok-1, plan gold and the
    /// `seat` add-on and `loyal` discount.
    fn fixture() -> Fixture {
        let gateway = Arc::new(MockGateway::default());
        gateway.put_customer(remote_customer("cus-1"));
        gateway.put_credit_card(remote_credit_card("tok-1", "cus-1"));
        gateway.put_add_on(remote_modifier("seat", dec!(5.00)));
        gateway.put_discount(remote_modifier("loyal", dec!(2.50)));
        gateway.put_plan(remote_plan("gold"));

        let customer_repository = Arc::new(InMemoryCustomerRepository::default());
        let customers = Arc::new(CustomerService::new(
            customer_repository.clone(),
            gateway.clone(),
        ));
        let cards = Arc::new(PaymentMethodService::new(
            Arc::new(InMemoryPaymentMethodRepository::new(customer_repository)),
            customers,
            gateway.clone(),
        ));
        let plans = Arc::new(PlanService::new(
            Arc::new(InMemoryPlanRepository::default()),
            gateway.clone(),
        ));
        let repository = Arc::new(InMemorySubscriptionRepository::default());
        let reporter = Arc::new(RecordingReporter::default());
        let service = SubscriptionService::new(repository.clone(), cards, plans, gateway.clone())
            .with_error_reporter(reporter.clone());

        Fixture {
            gateway,
            reporter,
            repository,
            service,
        }
    }

    async fn mirrored(f: &Fixture, id: &str) -> Subscription {
        f.gateway.put_subscription(remote_subscription(id, "gold", "tok-1"));
        f.service.sync_subscription(id).await.expect("sync").record
    }

    #[tokio::test]
    async fn sync_resolves_card_customer_and_catalogue() {
        let f = fixture();
        let mut remote = remote_subscription("sub-1", "gold", "tok-1");
        remote.add_ons.push(crate::gateway::RemoteModifier {
            quantity: Some(3),
            current_billing_cycle: Some(2),
            ..remote_modifier("seat", dec!(5.00))
        });
        f.gateway.put_subscription(remote);

        let result = f.service.sync_subscription("sub-1").await.unwrap();

        assert!(result.created);
        assert_eq!(result.record.plan_id, "gold");
        assert_eq!(f.service.add_on_quantity("sub-1", "seat").unwrap(), 3);
        assert_eq!(f.service.list_history("sub-1").unwrap().len(), 1);
    }

    #[tokio::test]
    async fn repeated_sync_is_idempotent_and_prunes_stale_rows() {
        let f = fixture();
        let mut remote = remote_subscription("sub-2", "gold", "tok-1");
        remote.add_ons.push(remote_modifier("seat", dec!(5.00)));
        f.gateway.put_subscription(remote.clone());

        let first = f.service.sync_subscription("sub-2").await.unwrap();
        remote.add_ons.clear();
        f.gateway.put_subscription(remote);
        let second = f.service.sync_subscription("sub-2").await.unwrap();

        assert!(first.created);
        assert!(!second.created);
        assert_eq!(first.record, second.record);
        assert!(!f.service.has_add_on("sub-2", "seat").unwrap());
        assert_eq!(f.service.list_history("sub-2").unwrap().len(), 1);
        assert_eq!(f.repository.subscription_count(), 1);
    }

    #[tokio::test]
    async fn unknown_plan_after_catalogue_sync_is_not_found() {
        let f = fixture();
        f.gateway
            .put_subscription(remote_subscription("sub-3", "platinum", "tok-1"));

        let err = f.service.sync_subscription("sub-3").await.unwrap_err();

        assert!(matches!(err, Error::NotFound { entity: "Plan", .. }));
        assert_eq!(f.repository.subscription_count(), 0);
    }

    #[tokio::test]
    async fn set_add_on_adds_then_updates_quantity() {
        let f = fixture();
        mirrored(&f, "sub-4").await;

        let added = f.service.set_add_on("sub-4", "seat", 2).await.unwrap();
        assert_eq!(added.quantity, 2);
        assert!(added.never_expires);
        assert_eq!(added.amount, dec!(5.00));
        assert_eq!(f.service.add_on_quantity("sub-4", "seat").unwrap(), 2);

        f.service.set_add_on("sub-4", "seat", 5).await.unwrap();
        assert_eq!(f.service.add_on_quantity("sub-4", "seat").unwrap(), 5);

        let updates: Vec<_> = f
            .gateway
            .calls()
            .into_iter()
            .filter_map(|call| match call {
                GatewayCall::UpdateSubscription(_, payload) => payload.add_ons,
                _ => None,
            })
            .collect();
        assert_eq!(
            updates,
            vec![
                ModifierChanges::add("seat", 2),
                ModifierChanges::update("seat", 5)
            ]
        );
    }

    #[tokio::test]
    async fn set_discount_uses_discount_payload() {
        let f = fixture();
        mirrored(&f, "sub-5").await;

        f.service.set_discount("sub-5", "loyal", 1).await.unwrap();

        assert!(f.service.has_discount("sub-5", "loyal").unwrap());
        assert!(!f.service.has_add_on("sub-5", "loyal").unwrap());
        let last = f.gateway.calls().pop().unwrap();
        assert_eq!(
            last,
            GatewayCall::UpdateSubscription(
                "sub-5".to_string(),
                SubscriptionUpdateRequest {
                    add_ons: None,
                    discounts: Some(ModifierChanges::add("loyal", 1)),
                }
            )
        );
    }

    #[tokio::test]
    async fn failed_lookup_is_reported_and_leaves_rows_untouched() {
        let f = fixture();
        mirrored(&f, "sub-6").await;
        f.gateway
            .fail_finds(GatewayError::Transport("connection reset".to_string()));

        let err = f.service.set_add_on("sub-6", "seat", 1).await.unwrap_err();

        assert!(err.is_gateway());
        assert_eq!(f.reporter.errors().len(), 1);
        assert_eq!(f.service.add_on_quantity("sub-6", "seat").unwrap(), 0);
        assert!(!f
            .gateway
            .calls()
            .iter()
            .any(|call| matches!(call, GatewayCall::UpdateSubscription(..))));
    }

    #[tokio::test]
    async fn remove_absent_add_on_reports_without_gateway_call() {
        let f = fixture();
        mirrored(&f, "sub-7").await;
        let calls_before = f.gateway.calls().len();

        let removed = f.service.remove_add_on("sub-7", "seat").await.unwrap();

        assert!(!removed);
        assert_eq!(f.reporter.messages().len(), 1);
        assert_eq!(f.gateway.calls().len(), calls_before);
    }

    #[tokio::test]
    async fn remove_present_add_on_deletes_local_row() {
        let f = fixture();
        mirrored(&f, "sub-8").await;
        f.service.set_add_on("sub-8", "seat", 1).await.unwrap();

        let removed = f.service.remove_add_on("sub-8", "seat").await.unwrap();

        assert!(removed);
        assert_eq!(f.service.add_on_quantity("sub-8", "seat").unwrap(), 0);
        assert!(f.service.list_subscription_add_ons("sub-8").unwrap().is_empty());
    }

    #[tokio::test]
    async fn rejected_quantity_update_keeps_local_quantity() {
        let f = fixture();
        mirrored(&f, "sub-14").await;
        f.service.set_add_on("sub-14", "seat", 2).await.unwrap();
        f.gateway
            .fail_updates(GatewayError::api(422, "Quantity is invalid"));

        let err = f.service.set_add_on("sub-14", "seat", 9).await.unwrap_err();

        assert!(matches!(
            err,
            Error::Gateway(GatewayError::Api { status: 422, .. })
        ));
        assert_eq!(f.service.add_on_quantity("sub-14", "seat").unwrap(), 2);
        assert_eq!(
            f.gateway.calls().pop().unwrap(),
            GatewayCall::UpdateSubscription(
                "sub-14".to_string(),
                SubscriptionUpdateRequest {
                    add_ons: Some(ModifierChanges::update("seat", 9)),
                    discounts: None,
                }
            )
        );
    }

    #[tokio::test]
    async fn rejected_removal_keeps_local_row() {
        let f = fixture();
        mirrored(&f, "sub-15").await;
        f.service.set_add_on("sub-15", "seat", 3).await.unwrap();
        f.gateway
            .fail_updates(GatewayError::Transport("connection reset".to_string()));

        let err = f.service.remove_add_on("sub-15", "seat").await.unwrap_err();

        assert!(err.is_gateway());
        assert!(f.service.has_add_on("sub-15", "seat").unwrap());
        assert_eq!(f.service.list_subscription_add_ons("sub-15").unwrap().len(), 1);
    }

    #[tokio::test]
    async fn removal_from_unknown_subscription_is_not_found() {
        let f = fixture();

        let err = f.service.remove_discount("ghost", "loyal").await.unwrap_err();

        assert!(matches!(
            err,
            Error::NotFound { entity: "Subscription", ref id } if id == "ghost"
        ));
        assert!(f.reporter.messages().is_empty());
        assert!(f.gateway.calls().is_empty());
    }

    #[tokio::test]
    async fn cancel_mirrors_canceled_status() {
        let f = fixture();
        mirrored(&f, "sub-9").await;

        let canceled = f.service.cancel("sub-9").await.unwrap();

        assert_eq!(canceled.status, SubscriptionStatus::Canceled);
        assert_eq!(
            f.service.get_subscription("sub-9").unwrap().status,
            SubscriptionStatus::Canceled
        );
    }

    #[tokio::test]
    async fn failed_cancel_keeps_local_status() {
        let f = fixture();
        mirrored(&f, "sub-10").await;
        f.gateway
            .fail_updates(GatewayError::api(422, "Subscription has already been canceled."));

        assert!(f.service.cancel("sub-10").await.is_err());
        assert_eq!(
            f.service.get_subscription("sub-10").unwrap().status,
            SubscriptionStatus::Active
        );
    }

    #[tokio::test]
    async fn sync_by_ids_collects_failures() {
        let f = fixture();
        f.gateway
            .put_subscription(remote_subscription("sub-11", "gold", "tok-1"));
        f.gateway
            .put_subscription(remote_subscription("sub-12", "gold", "tok-unknown"));

        let ids = vec![
            "sub-11".to_string(),
            "sub-12".to_string(),
            "sub-13".to_string(),
        ];
        let summary = f.service.sync_by_ids(&ids).await.unwrap();

        assert_eq!(summary.created, 1);
        assert_eq!(summary.failed, vec!["sub-12".to_string(), "sub-13".to_string()]);
        assert_eq!(f.reporter.errors().len(), 1);
    }
}
