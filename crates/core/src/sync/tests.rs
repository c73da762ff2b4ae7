use std::sync::Arc;

use rust_decimal_macros::dec;

use super::*;
use crate::customers::CustomerService;
use crate::payment_methods::PaymentMethodService;
use crate::plans::{PlanService, PlanServiceTrait};
use crate::reporting::NoOpErrorReporter;
use crate::subscriptions::{SubscriptionService, SubscriptionServiceTrait};
use crate::test_support::{
    remote_credit_card, remote_customer, remote_modifier, remote_plan, remote_subscription,
    GatewayCall, InMemoryCustomerRepository, InMemoryPaymentMethodRepository,
    InMemoryPlanRepository, InMemorySubscriptionRepository, MockGateway,
};

struct Mirror {
    gateway: Arc<MockGateway>,
    plans: Arc<PlanService>,
    subscriptions: Arc<SubscriptionService>,
    sync: MirrorSyncService,
}

fn mirror() -> Mirror {
    let gateway = Arc::new(MockGateway::default());
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
    let subscriptions = Arc::new(
        SubscriptionService::new(
            Arc::new(InMemorySubscriptionRepository::default()),
            cards,
            plans.clone(),
            gateway.clone(),
        )
        .with_error_reporter(Arc::new(NoOpErrorReporter)),
    );
    let sync = MirrorSyncService::new(plans.clone(), subscriptions.clone());
    Mirror {
        gateway,
        plans,
        subscriptions,
        sync,
    }
}

#[tokio::test]
async fn sync_all_refreshes_catalogue_before_subscriptions() {
    let m = mirror();
    m.gateway.put_customer(remote_customer("cus-1"));
    m.gateway.put_credit_card(remote_credit_card("tok-1", "cus-1"));
    m.gateway.put_add_on(remote_modifier("seat", dec!(5.00)));
    m.gateway.put_plan(remote_plan("gold"));
    m.gateway
        .put_subscription(remote_subscription("sub-1", "gold", "tok-1"));

    let summary = m
        .sync
        .sync_all(&["sub-1".to_string()])
        .await
        .expect("sync all");

    assert_eq!(summary.created, 1);
    assert!(summary.failed.is_empty());
    assert_eq!(m.plans.list_plans().unwrap().len(), 1);
    assert!(m.subscriptions.get_subscription("sub-1").is_ok());

    let calls = m.gateway.calls();
    let first_plan_listing = calls
        .iter()
        .position(|call| *call == GatewayCall::ListPlans)
        .unwrap();
    let search = calls
        .iter()
        .position(|call| matches!(call, GatewayCall::SearchSubscriptions(_)))
        .unwrap();
    assert!(first_plan_listing < search);
}

#[tokio::test]
async fn sync_all_without_ids_only_touches_catalogue() {
    let m = mirror();
    m.gateway.put_plan(remote_plan("gold"));

    let summary = m.sync.sync_all(&[]).await.unwrap();

    assert_eq!(summary, SyncSummary::default());
    assert!(!m
        .gateway
        .calls()
        .iter()
        .any(|call| matches!(call, GatewayCall::SearchSubscriptions(_))));
}

#[test]
fn summary_counts_created_and_updated() {
    let mut summary = SyncSummary::default();
    summary.record(&Upserted::created(()));
    summary.record(&Upserted::updated(()));
    summary.record(&Upserted::updated(()));
    summary.fail("sub-x");

    assert_eq!(summary.created, 1);
    assert_eq!(summary.updated, 2);
    assert_eq!(summary.total(), 4);
}
