//! Application state: storage, gateway client and services wired together.

use std::sync::Arc;

use anyhow::{Context, Result};
use tera::Tera;
use tracing::info;

use btmirror_core::customers::{CustomerService, CustomerServiceTrait};
use btmirror_core::gateway::GatewayClientTrait;
use btmirror_core::payment_methods::{PaymentMethodService, PaymentMethodServiceTrait};
use btmirror_core::plans::{PlanService, PlanServiceTrait};
use btmirror_core::reporting::{ErrorReporter, LogErrorReporter};
use btmirror_core::subscriptions::{SubscriptionService, SubscriptionServiceTrait};
use btmirror_core::sync::MirrorSyncService;
use btmirror_gateway::BraintreeClient;
use btmirror_storage_sqlite::{
    create_pool, init, run_migrations, spawn_writer, CustomerRepository, PaymentMethodRepository,
    PlanRepository, SubscriptionRepository,
};

use crate::admin;
use crate::config::Config;

/// Credentials checked by the API and admin middlewares.
#[derive(Debug, Clone)]
pub struct AuthSettings {
    pub api_token: String,
    pub admin_user: String,
    pub admin_password: Option<String>,
}

impl From<&Config> for AuthSettings {
    fn from(config: &Config) -> Self {
        Self {
            api_token: config.api_token.clone(),
            admin_user: config.admin_user.clone(),
            admin_password: config.admin_password.clone(),
        }
    }
}

pub struct AppState {
    pub auth: AuthSettings,
    pub customer_service: Arc<dyn CustomerServiceTrait>,
    pub payment_method_service: Arc<dyn PaymentMethodServiceTrait>,
    pub plan_service: Arc<dyn PlanServiceTrait>,
    pub subscription_service: Arc<dyn SubscriptionServiceTrait>,
    pub sync_service: Arc<MirrorSyncService>,
    pub templates: Tera,
}

/// Opens (and migrates) the database under `data_dir` and builds the services
/// on top of it and `gateway`.
pub fn build_state(
    data_dir: &str,
    auth: AuthSettings,
    gateway: Arc<dyn GatewayClientTrait>,
) -> Result<Arc<AppState>> {
    let db_path = init(data_dir)?;
    run_migrations(&db_path)?;
    let pool = create_pool(&db_path)?;
    let writer = spawn_writer(pool.as_ref().clone());
    info!("Database ready at {}", db_path);

    let customer_repository = Arc::new(CustomerRepository::new(pool.clone(), writer.clone()));
    let payment_method_repository =
        Arc::new(PaymentMethodRepository::new(pool.clone(), writer.clone()));
    let plan_repository = Arc::new(PlanRepository::new(pool.clone(), writer.clone()));
    let subscription_repository = Arc::new(SubscriptionRepository::new(pool, writer));
    let reporter: Arc<dyn ErrorReporter> = Arc::new(LogErrorReporter);

    let customer_service: Arc<dyn CustomerServiceTrait> =
        Arc::new(CustomerService::new(customer_repository, gateway.clone()));
    let payment_method_service: Arc<dyn PaymentMethodServiceTrait> =
        Arc::new(PaymentMethodService::new(
            payment_method_repository,
            customer_service.clone(),
            gateway.clone(),
        ));
    let plan_service: Arc<dyn PlanServiceTrait> =
        Arc::new(PlanService::new(plan_repository, gateway.clone()));
    let subscription_service: Arc<dyn SubscriptionServiceTrait> = Arc::new(
        SubscriptionService::new(
            subscription_repository,
            payment_method_service.clone(),
            plan_service.clone(),
            gateway,
        )
        .with_error_reporter(reporter),
    );
    let sync_service = Arc::new(MirrorSyncService::new(
        plan_service.clone(),
        subscription_service.clone(),
    ));

    Ok(Arc::new(AppState {
        auth,
        customer_service,
        payment_method_service,
        plan_service,
        subscription_service,
        sync_service,
        templates: admin::templates().context("Failed to load admin templates")?,
    }))
}

/// State for `config`, talking to the configured Braintree merchant.
pub fn build_state_from_config(config: &Config) -> Result<Arc<AppState>> {
    let gateway: Arc<dyn GatewayClientTrait> = Arc::new(
        BraintreeClient::new(&config.braintree).context("Failed to build Braintree client")?,
    );
    build_state(&config.data_dir, AuthSettings::from(config), gateway)
}
