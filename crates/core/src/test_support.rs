//! In-memory repositories, a scripted gateway and fixtures for service tests.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use crate::customers::{Address, Customer, CustomerRepositoryTrait};
use crate::errors::{Error, GatewayError, Result};
use crate::gateway::{
    CreditCardUpdateRequest, CustomerUpdateRequest, GatewayClientTrait, ModifierChanges,
    RemoteAddress, RemoteCreditCard, RemoteCustomer, RemoteModifier, RemotePlan,
    RemoteStatusEvent, RemoteSubscription, SubscriptionUpdateRequest,
};
use crate::payment_methods::{
    CreditCard, CustomerLocation, PaymentMethodRepositoryTrait, YesNoUnknown,
};
use crate::plans::{AddOn, CatalogSnapshot, Discount, Plan, PlanRepositoryTrait};
use crate::reporting::ErrorReporter;
use crate::subscriptions::{
    ModifierKind, NewSubscriptionModifier, Subscription, SubscriptionHistory,
    SubscriptionModifier, SubscriptionRepositoryTrait, SubscriptionSnapshot, SubscriptionSource,
    SubscriptionStatus,
};
use crate::sync::{CatalogSyncSummary, SyncSummary, Upserted};

pub fn fixed_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 5, 10, 0, 0).unwrap()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn remote_customer(id: &str) -> RemoteCustomer {
    RemoteCustomer {
        id: id.to_string(),
        first_name: Some("Ada".to_string()),
        last_name: Some("Lovelace".to_string()),
        company: None,
        email: Some(format!("{}@example.com", id)),
        phone: None,
        fax: None,
        website: None,
        addresses: Vec::new(),
        created_at: fixed_time(),
        updated_at: fixed_time(),
    }
}

pub fn remote_address(id: &str, customer_id: &str) -> RemoteAddress {
    RemoteAddress {
        id: id.to_string(),
        customer_id: customer_id.to_string(),
        first_name: Some("Ada".to_string()),
        last_name: Some("Lovelace".to_string()),
        company: None,
        street_address: Some("12 Analytical Row".to_string()),
        extended_address: None,
        locality: Some("London".to_string()),
        region: None,
        postal_code: Some("N1 9GU".to_string()),
        country_code_alpha2: Some("GB".to_string()),
        country_code_alpha3: Some("GBR".to_string()),
        country_code_numeric: Some("826".to_string()),
        country_name: Some("United Kingdom".to_string()),
        created_at: fixed_time(),
        updated_at: fixed_time(),
    }
}

pub fn remote_credit_card(token: &str, customer_id: &str) -> RemoteCreditCard {
    RemoteCreditCard {
        token: token.to_string(),
        customer_id: customer_id.to_string(),
        billing_address: None,
        bin: "411111".to_string(),
        card_type: "Visa".to_string(),
        cardholder_name: Some("Ada Lovelace".to_string()),
        commercial: YesNoUnknown::Unknown,
        country_of_issuance: "USA".to_string(),
        customer_location: CustomerLocation::Us,
        debit: YesNoUnknown::No,
        default: false,
        expiration_month: "12".to_string(),
        expiration_year: "2030".to_string(),
        expired: false,
        healthcare: YesNoUnknown::Unknown,
        image_url: "https://assets.braintreegateway.com/payment_method_logo/visa.png".to_string(),
        issuing_bank: "Chase".to_string(),
        last_4: "1111".to_string(),
        masked_number: "411111******1111".to_string(),
        payroll: YesNoUnknown::Unknown,
        prepaid: YesNoUnknown::No,
        unique_number_identifier: format!("uni-{}", token),
        created_at: fixed_time(),
        updated_at: fixed_time(),
    }
}

/// Catalogue-style modifier named after its id.
pub fn remote_modifier(id: &str, amount: Decimal) -> RemoteModifier {
    RemoteModifier {
        id: id.to_string(),
        name: id.to_string(),
        description: None,
        amount,
        never_expires: true,
        number_of_billing_cycles: None,
        quantity: None,
        current_billing_cycle: None,
    }
}

pub fn remote_plan(id: &str) -> RemotePlan {
    RemotePlan {
        id: id.to_string(),
        name: format!("{} plan", id),
        description: None,
        price: dec!(19.99),
        currency_iso_code: Some("USD".to_string()),
        billing_frequency: 1,
        billing_day_of_month: None,
        number_of_billing_cycles: None,
        trial_duration: None,
        trial_duration_unit: None,
        trial_period: false,
        add_ons: Vec::new(),
        discounts: Vec::new(),
        created_at: fixed_time(),
        updated_at: fixed_time(),
    }
}

pub fn remote_subscription(id: &str, plan_id: &str, token: &str) -> RemoteSubscription {
    RemoteSubscription {
        id: id.to_string(),
        plan_id: plan_id.to_string(),
        payment_method_token: Some(token.to_string()),
        status: SubscriptionStatus::Active,
        price: dec!(19.99),
        balance: Decimal::ZERO,
        description: None,
        billing_day_of_month: Some(5),
        billing_period_start_date: Some(date(2024, 3, 5)),
        billing_period_end_date: Some(date(2024, 4, 4)),
        current_billing_cycle: 3,
        days_past_due: None,
        failure_count: 0,
        first_billing_date: date(2024, 1, 5),
        merchant_account_id: "acme_usd".to_string(),
        never_expires: true,
        next_billing_date: date(2024, 4, 5),
        next_billing_period_amount: dec!(19.99),
        number_of_billing_cycles: None,
        paid_through_date: Some(date(2024, 4, 4)),
        trial_duration: None,
        trial_duration_unit: None,
        trial_period: false,
        add_ons: Vec::new(),
        discounts: Vec::new(),
        status_history: vec![RemoteStatusEvent {
            status: SubscriptionStatus::Active,
            price: dec!(19.99),
            balance: Decimal::ZERO,
            subscription_source: SubscriptionSource::Api,
            timestamp: fixed_time(),
        }],
        created_at: fixed_time(),
        updated_at: fixed_time(),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GatewayCall {
    FindCustomer(String),
    UpdateCustomer(String),
    FindCreditCard(String),
    UpdateCreditCard(String),
    FindSubscription(String),
    SearchSubscriptions(Vec<String>),
    UpdateSubscription(String, SubscriptionUpdateRequest),
    CancelSubscription(String),
    ListPlans,
    ListAddOns,
    ListDiscounts,
}

#[derive(Default)]
struct GatewayState {
    customers: HashMap<String, RemoteCustomer>,
    cards: HashMap<String, RemoteCreditCard>,
    subscriptions: HashMap<String, RemoteSubscription>,
    plans: Vec<RemotePlan>,
    add_ons: Vec<RemoteModifier>,
    discounts: Vec<RemoteModifier>,
    calls: Vec<GatewayCall>,
    fail_finds: Option<GatewayError>,
    fail_updates: Option<GatewayError>,
}

/// Gateway double that keeps remote state in memory and records every call.
///
/// `fail_finds` fails the single-resource lookups; `fail_updates` fails
/// updates and cancellation.
#[derive(Default)]
pub struct MockGateway {
    state: Mutex<GatewayState>,
}

impl MockGateway {
    pub fn put_customer(&self, customer: RemoteCustomer) {
        let mut state = self.state.lock().unwrap();
        state.customers.insert(customer.id.clone(), customer);
    }

    pub fn put_credit_card(&self, card: RemoteCreditCard) {
        let mut state = self.state.lock().unwrap();
        state.cards.insert(card.token.clone(), card);
    }

    pub fn put_subscription(&self, subscription: RemoteSubscription) {
        let mut state = self.state.lock().unwrap();
        state
            .subscriptions
            .insert(subscription.id.clone(), subscription);
    }

    pub fn put_plan(&self, plan: RemotePlan) {
        let mut state = self.state.lock().unwrap();
        state.plans.retain(|p| p.id != plan.id);
        state.plans.push(plan);
    }

    pub fn put_add_on(&self, add_on: RemoteModifier) {
        self.state.lock().unwrap().add_ons.push(add_on);
    }

    pub fn put_discount(&self, discount: RemoteModifier) {
        self.state.lock().unwrap().discounts.push(discount);
    }

    pub fn fail_finds(&self, error: GatewayError) {
        self.state.lock().unwrap().fail_finds = Some(error);
    }

    pub fn fail_updates(&self, error: GatewayError) {
        self.state.lock().unwrap().fail_updates = Some(error);
    }

    pub fn calls(&self) -> Vec<GatewayCall> {
        self.state.lock().unwrap().calls.clone()
    }

    fn record(&self, call: GatewayCall) {
        self.state.lock().unwrap().calls.push(call);
    }

    fn find_failure(&self) -> Result<()> {
        match self.state.lock().unwrap().fail_finds.clone() {
            Some(err) => Err(err.into()),
            None => Ok(()),
        }
    }

    fn update_failure(&self) -> Result<()> {
        match self.state.lock().unwrap().fail_updates.clone() {
            Some(err) => Err(err.into()),
            None => Ok(()),
        }
    }
}

fn apply_modifier_changes(
    modifiers: &mut Vec<RemoteModifier>,
    catalogue: &[RemoteModifier],
    changes: &ModifierChanges,
) {
    for add in &changes.add {
        let base = catalogue
            .iter()
            .find(|m| m.id == add.inherited_from_id)
            .cloned()
            .unwrap_or_else(|| remote_modifier(&add.inherited_from_id, Decimal::ZERO));
        modifiers.push(RemoteModifier {
            quantity: Some(add.quantity),
            ..base
        });
    }
    for update in &changes.update {
        for modifier in modifiers.iter_mut().filter(|m| m.id == update.existing_id) {
            modifier.quantity = Some(update.quantity);
        }
    }
    modifiers.retain(|m| !changes.remove.contains(&m.id));
}

#[async_trait]
impl GatewayClientTrait for MockGateway {
    async fn find_customer(&self, customer_id: &str) -> Result<RemoteCustomer> {
        self.record(GatewayCall::FindCustomer(customer_id.to_string()));
        self.find_failure()?;
        self.state
            .lock()
            .unwrap()
            .customers
            .get(customer_id)
            .cloned()
            .ok_or_else(|| GatewayError::not_found("customer", customer_id).into())
    }

    async fn update_customer(
        &self,
        customer_id: &str,
        update: &CustomerUpdateRequest,
    ) -> Result<RemoteCustomer> {
        self.record(GatewayCall::UpdateCustomer(customer_id.to_string()));
        self.update_failure()?;
        let mut state = self.state.lock().unwrap();
        let customer = state
            .customers
            .get_mut(customer_id)
            .ok_or_else(|| Error::from(GatewayError::not_found("customer", customer_id)))?;
        let fields = [
            (&mut customer.first_name, &update.first_name),
            (&mut customer.last_name, &update.last_name),
            (&mut customer.company, &update.company),
            (&mut customer.email, &update.email),
            (&mut customer.phone, &update.phone),
            (&mut customer.fax, &update.fax),
            (&mut customer.website, &update.website),
        ];
        for (field, value) in fields {
            if let Some(value) = value {
                *field = Some(value.clone());
            }
        }
        Ok(customer.clone())
    }

    async fn find_credit_card(&self, token: &str) -> Result<RemoteCreditCard> {
        self.record(GatewayCall::FindCreditCard(token.to_string()));
        self.find_failure()?;
        self.state
            .lock()
            .unwrap()
            .cards
            .get(token)
            .cloned()
            .ok_or_else(|| GatewayError::not_found("credit_card", token).into())
    }

    async fn update_credit_card(
        &self,
        token: &str,
        update: &CreditCardUpdateRequest,
    ) -> Result<RemoteCreditCard> {
        self.record(GatewayCall::UpdateCreditCard(token.to_string()));
        self.update_failure()?;
        let mut state = self.state.lock().unwrap();
        let card = state
            .cards
            .get_mut(token)
            .ok_or_else(|| Error::from(GatewayError::not_found("credit_card", token)))?;
        if let Some(name) = &update.cardholder_name {
            card.cardholder_name = Some(name.clone());
        }
        if let Some(month) = &update.expiration_month {
            card.expiration_month = month.clone();
        }
        if let Some(year) = &update.expiration_year {
            card.expiration_year = year.clone();
        }
        if let Some(make_default) = update.options.as_ref().and_then(|o| o.make_default) {
            card.default = make_default;
        }
        Ok(card.clone())
    }

    async fn find_subscription(&self, subscription_id: &str) -> Result<RemoteSubscription> {
        self.record(GatewayCall::FindSubscription(subscription_id.to_string()));
        self.find_failure()?;
        self.state
            .lock()
            .unwrap()
            .subscriptions
            .get(subscription_id)
            .cloned()
            .ok_or_else(|| GatewayError::not_found("subscription", subscription_id).into())
    }

    async fn search_subscriptions(&self, ids: &[String]) -> Result<Vec<RemoteSubscription>> {
        self.record(GatewayCall::SearchSubscriptions(ids.to_vec()));
        let state = self.state.lock().unwrap();
        Ok(ids
            .iter()
            .filter_map(|id| state.subscriptions.get(id).cloned())
            .collect())
    }

    async fn update_subscription(
        &self,
        subscription_id: &str,
        update: &SubscriptionUpdateRequest,
    ) -> Result<RemoteSubscription> {
        self.record(GatewayCall::UpdateSubscription(
            subscription_id.to_string(),
            update.clone(),
        ));
        self.update_failure()?;
        let mut state = self.state.lock().unwrap();
        let add_on_catalogue = state.add_ons.clone();
        let discount_catalogue = state.discounts.clone();
        let subscription = state
            .subscriptions
            .get_mut(subscription_id)
            .ok_or_else(|| Error::from(GatewayError::not_found("subscription", subscription_id)))?;
        if let Some(changes) = &update.add_ons {
            apply_modifier_changes(&mut subscription.add_ons, &add_on_catalogue, changes);
        }
        if let Some(changes) = &update.discounts {
            apply_modifier_changes(&mut subscription.discounts, &discount_catalogue, changes);
        }
        Ok(subscription.clone())
    }

    async fn cancel_subscription(&self, subscription_id: &str) -> Result<RemoteSubscription> {
        self.record(GatewayCall::CancelSubscription(subscription_id.to_string()));
        self.update_failure()?;
        let mut state = self.state.lock().unwrap();
        let subscription = state
            .subscriptions
            .get_mut(subscription_id)
            .ok_or_else(|| Error::from(GatewayError::not_found("subscription", subscription_id)))?;
        subscription.status = SubscriptionStatus::Canceled;
        subscription.status_history.push(RemoteStatusEvent {
            status: SubscriptionStatus::Canceled,
            price: subscription.price,
            balance: subscription.balance,
            subscription_source: SubscriptionSource::Api,
            timestamp: fixed_time(),
        });
        Ok(subscription.clone())
    }

    async fn list_plans(&self) -> Result<Vec<RemotePlan>> {
        self.record(GatewayCall::ListPlans);
        Ok(self.state.lock().unwrap().plans.clone())
    }

    async fn list_add_ons(&self) -> Result<Vec<RemoteModifier>> {
        self.record(GatewayCall::ListAddOns);
        Ok(self.state.lock().unwrap().add_ons.clone())
    }

    async fn list_discounts(&self) -> Result<Vec<RemoteModifier>> {
        self.record(GatewayCall::ListDiscounts);
        Ok(self.state.lock().unwrap().discounts.clone())
    }
}

#[derive(Default)]
pub struct InMemoryCustomerRepository {
    customers: Mutex<BTreeMap<String, Customer>>,
    addresses: Mutex<BTreeMap<String, Address>>,
}

impl InMemoryCustomerRepository {
    pub fn customer_count(&self) -> usize {
        self.customers.lock().unwrap().len()
    }

    pub fn upsert_address(&self, address: Address) {
        self.addresses
            .lock()
            .unwrap()
            .insert(address.id.clone(), address);
    }
}

#[async_trait]
impl CustomerRepositoryTrait for InMemoryCustomerRepository {
    fn get_by_id(&self, customer_id: &str) -> Result<Option<Customer>> {
        Ok(self.customers.lock().unwrap().get(customer_id).cloned())
    }

    fn list(&self) -> Result<Vec<Customer>> {
        Ok(self.customers.lock().unwrap().values().cloned().collect())
    }

    fn list_addresses(&self, customer_id: &str) -> Result<Vec<Address>> {
        Ok(self
            .addresses
            .lock()
            .unwrap()
            .values()
            .filter(|a| a.customer_id == customer_id)
            .cloned()
            .collect())
    }

    async fn upsert(
        &self,
        customer: Customer,
        addresses: Vec<Address>,
    ) -> Result<Upserted<Customer>> {
        let created = self
            .customers
            .lock()
            .unwrap()
            .insert(customer.id.clone(), customer.clone())
            .is_none();
        for address in addresses {
            self.upsert_address(address);
        }
        Ok(Upserted {
            record: customer,
            created,
        })
    }
}

pub struct InMemoryPaymentMethodRepository {
    customers: Arc<InMemoryCustomerRepository>,
    cards: Mutex<BTreeMap<String, CreditCard>>,
}

impl InMemoryPaymentMethodRepository {
    pub fn new(customers: Arc<InMemoryCustomerRepository>) -> Self {
        Self {
            customers,
            cards: Mutex::new(BTreeMap::new()),
        }
    }

    pub fn card_count(&self) -> usize {
        self.cards.lock().unwrap().len()
    }
}

#[async_trait]
impl PaymentMethodRepositoryTrait for InMemoryPaymentMethodRepository {
    fn get_by_token(&self, token: &str) -> Result<Option<CreditCard>> {
        Ok(self.cards.lock().unwrap().get(token).cloned())
    }

    fn list(&self) -> Result<Vec<CreditCard>> {
        Ok(self.cards.lock().unwrap().values().cloned().collect())
    }

    fn list_for_customer(&self, customer_id: &str) -> Result<Vec<CreditCard>> {
        Ok(self
            .cards
            .lock()
            .unwrap()
            .values()
            .filter(|c| c.customer_id == customer_id)
            .cloned()
            .collect())
    }

    async fn upsert(
        &self,
        card: CreditCard,
        billing_address: Option<Address>,
    ) -> Result<Upserted<CreditCard>> {
        if let Some(address) = billing_address {
            self.customers.upsert_address(address);
        }
        let created = self
            .cards
            .lock()
            .unwrap()
            .insert(card.token.clone(), card.clone())
            .is_none();
        Ok(Upserted {
            record: card,
            created,
        })
    }
}

#[derive(Default)]
struct CatalogState {
    plans: BTreeMap<String, Plan>,
    add_ons: BTreeMap<String, AddOn>,
    discounts: BTreeMap<String, Discount>,
    plan_add_ons: HashMap<String, Vec<String>>,
    plan_discounts: HashMap<String, Vec<String>>,
}

#[derive(Default)]
pub struct InMemoryPlanRepository {
    state: Mutex<CatalogState>,
}

fn upsert_into<T>(
    map: &mut BTreeMap<String, T>,
    id: &str,
    value: T,
    summary: &mut SyncSummary,
) {
    let created = map.insert(id.to_string(), value).is_none();
    summary.record(&Upserted {
        record: (),
        created,
    });
}

#[async_trait]
impl PlanRepositoryTrait for InMemoryPlanRepository {
    fn get_plan(&self, plan_id: &str) -> Result<Option<Plan>> {
        Ok(self.state.lock().unwrap().plans.get(plan_id).cloned())
    }

    fn list_plans(&self) -> Result<Vec<Plan>> {
        Ok(self.state.lock().unwrap().plans.values().cloned().collect())
    }

    fn get_add_on(&self, add_on_id: &str) -> Result<Option<AddOn>> {
        Ok(self.state.lock().unwrap().add_ons.get(add_on_id).cloned())
    }

    fn list_add_ons(&self) -> Result<Vec<AddOn>> {
        Ok(self.state.lock().unwrap().add_ons.values().cloned().collect())
    }

    fn get_discount(&self, discount_id: &str) -> Result<Option<Discount>> {
        Ok(self.state.lock().unwrap().discounts.get(discount_id).cloned())
    }

    fn list_discounts(&self) -> Result<Vec<Discount>> {
        Ok(self.state.lock().unwrap().discounts.values().cloned().collect())
    }

    fn plan_add_on_ids(&self, plan_id: &str) -> Result<Vec<String>> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .plan_add_ons
            .get(plan_id)
            .cloned()
            .unwrap_or_default())
    }

    fn plan_discount_ids(&self, plan_id: &str) -> Result<Vec<String>> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .plan_discounts
            .get(plan_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn save_catalog(&self, snapshot: CatalogSnapshot) -> Result<CatalogSyncSummary> {
        let mut state = self.state.lock().unwrap();
        let mut summary = CatalogSyncSummary::default();
        for add_on in snapshot.add_ons {
            let id = add_on.id.clone();
            upsert_into(&mut state.add_ons, &id, add_on, &mut summary.add_ons);
        }
        for discount in snapshot.discounts {
            let id = discount.id.clone();
            upsert_into(&mut state.discounts, &id, discount, &mut summary.discounts);
        }
        for entry in snapshot.plans {
            let id = entry.plan.id.clone();
            upsert_into(&mut state.plans, &id, entry.plan, &mut summary.plans);
            state.plan_add_ons.insert(id.clone(), entry.add_on_ids);
            state.plan_discounts.insert(id, entry.discount_ids);
        }
        Ok(summary)
    }
}

#[derive(Default)]
struct SubscriptionState {
    subscriptions: BTreeMap<String, Subscription>,
    modifiers: Vec<SubscriptionModifier>,
    history: Vec<SubscriptionHistory>,
    next_id: i32,
}

impl SubscriptionState {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }

    fn upsert_modifier(&mut self, row: NewSubscriptionModifier) -> SubscriptionModifier {
        let existing = self.modifiers.iter().position(|m| {
            m.subscription_id == row.subscription_id
                && m.kind == row.kind
                && m.modifier_id == row.modifier_id
        });
        let id = match existing {
            Some(index) => self.modifiers.remove(index).id,
            None => self.next_id(),
        };
        let stored = SubscriptionModifier {
            id,
            subscription_id: row.subscription_id,
            kind: row.kind,
            modifier_id: row.modifier_id,
            name: row.name,
            amount: row.amount,
            quantity: row.quantity,
            current_billing_cycle: row.current_billing_cycle,
            never_expires: row.never_expires,
            number_of_billing_cycles: row.number_of_billing_cycles,
        };
        self.modifiers.push(stored.clone());
        stored
    }
}

#[derive(Default)]
pub struct InMemorySubscriptionRepository {
    state: Mutex<SubscriptionState>,
}

impl InMemorySubscriptionRepository {
    pub fn subscription_count(&self) -> usize {
        self.state.lock().unwrap().subscriptions.len()
    }
}

#[async_trait]
impl SubscriptionRepositoryTrait for InMemorySubscriptionRepository {
    fn get_by_id(&self, subscription_id: &str) -> Result<Option<Subscription>> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .subscriptions
            .get(subscription_id)
            .cloned())
    }

    fn list(&self) -> Result<Vec<Subscription>> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .subscriptions
            .values()
            .cloned()
            .collect())
    }

    fn list_modifiers(
        &self,
        subscription_id: &str,
        kind: ModifierKind,
    ) -> Result<Vec<SubscriptionModifier>> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .modifiers
            .iter()
            .filter(|m| m.subscription_id == subscription_id && m.kind == kind)
            .cloned()
            .collect())
    }

    fn get_modifier(
        &self,
        subscription_id: &str,
        kind: ModifierKind,
        modifier_id: &str,
    ) -> Result<Option<SubscriptionModifier>> {
        Ok(self
            .list_modifiers(subscription_id, kind)?
            .into_iter()
            .find(|m| m.modifier_id == modifier_id))
    }

    fn list_history(&self, subscription_id: &str) -> Result<Vec<SubscriptionHistory>> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .history
            .iter()
            .filter(|h| h.subscription_id == subscription_id)
            .cloned()
            .collect())
    }

    async fn save_synced(&self, snapshot: SubscriptionSnapshot) -> Result<Upserted<Subscription>> {
        let mut state = self.state.lock().unwrap();
        let subscription = snapshot.subscription;
        let id = subscription.id.clone();
        let created = state
            .subscriptions
            .insert(id.clone(), subscription.clone())
            .is_none();

        let keep: Vec<(ModifierKind, String)> = snapshot
            .add_ons
            .iter()
            .chain(snapshot.discounts.iter())
            .map(|m| (m.kind, m.modifier_id.clone()))
            .collect();
        state.modifiers.retain(|m| {
            m.subscription_id != id || keep.contains(&(m.kind, m.modifier_id.clone()))
        });
        for row in snapshot.add_ons.into_iter().chain(snapshot.discounts) {
            state.upsert_modifier(row);
        }

        state.history.retain(|h| h.subscription_id != id);
        for event in snapshot.history {
            let history_id = state.next_id();
            state.history.push(SubscriptionHistory {
                id: history_id,
                subscription_id: event.subscription_id,
                status: event.status,
                price: event.price,
                balance: event.balance,
                subscription_source: event.subscription_source,
                timestamp: event.timestamp,
            });
        }

        Ok(Upserted {
            record: subscription,
            created,
        })
    }

    async fn upsert_modifier(
        &self,
        modifier: NewSubscriptionModifier,
    ) -> Result<SubscriptionModifier> {
        Ok(self.state.lock().unwrap().upsert_modifier(modifier))
    }

    async fn delete_modifier(
        &self,
        subscription_id: &str,
        kind: ModifierKind,
        modifier_id: &str,
    ) -> Result<usize> {
        let mut state = self.state.lock().unwrap();
        let before = state.modifiers.len();
        state.modifiers.retain(|m| {
            !(m.subscription_id == subscription_id && m.kind == kind && m.modifier_id == modifier_id)
        });
        Ok(before - state.modifiers.len())
    }
}

/// Reporter that keeps everything it is given.
#[derive(Default)]
pub struct RecordingReporter {
    messages: Mutex<Vec<String>>,
    errors: Mutex<Vec<String>>,
}

impl RecordingReporter {
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().unwrap().clone()
    }
}

impl ErrorReporter for RecordingReporter {
    fn capture_message(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }

    fn capture_error(&self, error: &Error) {
        self.errors.lock().unwrap().push(error.to_string());
    }
}
