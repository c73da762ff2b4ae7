//! Records shared by the repository tests.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use rust_decimal_macros::dec;

use btmirror_core::customers::{Address, Customer};
use btmirror_core::payment_methods::{CreditCard, CustomerLocation, YesNoUnknown};
use btmirror_core::plans::{AddOn, Discount, Plan, TrialDurationUnit};
use btmirror_core::subscriptions::{
    ModifierKind, NewSubscriptionHistory, NewSubscriptionModifier, Subscription,
    SubscriptionSnapshot, SubscriptionSource, SubscriptionStatus,
};

pub fn stamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 2, 1, 9, 0, 0).unwrap()
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn customer(id: &str) -> Customer {
    Customer {
        id: id.to_string(),
        first_name: Some("Grace".to_string()),
        last_name: Some("Hopper".to_string()),
        company: Some("Navy".to_string()),
        email: Some(format!("{}@example.com", id)),
        phone: None,
        fax: None,
        website: None,
        created_at: stamp(),
        updated_at: stamp(),
    }
}

pub fn address(id: &str, customer_id: &str) -> Address {
    Address {
        id: id.to_string(),
        customer_id: customer_id.to_string(),
        first_name: Some("Grace".to_string()),
        last_name: Some("Hopper".to_string()),
        company: None,
        street_address: Some("1 Main St".to_string()),
        extended_address: None,
        locality: Some("Arlington".to_string()),
        region: Some("VA".to_string()),
        postal_code: Some("22201".to_string()),
        country_code_alpha2: Some("US".to_string()),
        country_code_alpha3: Some("USA".to_string()),
        country_code_numeric: Some("840".to_string()),
        country_name: Some("United States of America".to_string()),
        created_at: stamp(),
        updated_at: stamp(),
    }
}

pub fn credit_card(token: &str, customer_id: &str) -> CreditCard {
    CreditCard {
        token: token.to_string(),
        customer_id: customer_id.to_string(),
        billing_address_id: None,
        bin: "411111".to_string(),
        card_type: "Visa".to_string(),
        cardholder_name: Some("Grace Hopper".to_string()),
        commercial: YesNoUnknown::Unknown,
        country_of_issuance: "USA".to_string(),
        customer_location: CustomerLocation::Us,
        debit: YesNoUnknown::No,
        default: true,
        expiration_date: "12/2030".to_string(),
        expiration_month: "12".to_string(),
        expiration_year: "2030".to_string(),
        expired: false,
        healthcare: YesNoUnknown::Unknown,
        image_url: "https://assets.example.com/visa.png".to_string(),
        issuing_bank: "First Bank".to_string(),
        last_4: "1111".to_string(),
        masked_number: "411111******1111".to_string(),
        payroll: YesNoUnknown::Unknown,
        prepaid: YesNoUnknown::No,
        unique_number_identifier: format!("uni-{}", token),
        created_at: stamp(),
        updated_at: stamp(),
    }
}

pub fn plan(id: &str) -> Plan {
    Plan {
        id: id.to_string(),
        name: format!("Plan {}", id),
        description: None,
        price: dec!(19.99),
        currency_iso_code: Some("USD".to_string()),
        billing_frequency: 1,
        billing_day_of_month: None,
        number_of_billing_cycles: None,
        trial_duration: Some(14),
        trial_duration_unit: Some(TrialDurationUnit::Day),
        trial_period: true,
        created_at: stamp(),
        updated_at: stamp(),
    }
}

pub fn add_on(id: &str) -> AddOn {
    AddOn {
        id: id.to_string(),
        name: format!("Add-on {}", id),
        description: None,
        amount: dec!(5.00),
        never_expires: true,
        number_of_billing_cycles: None,
    }
}

pub fn discount(id: &str) -> Discount {
    Discount {
        id: id.to_string(),
        name: format!("Discount {}", id),
        description: Some("Loyalty".to_string()),
        amount: dec!(2.50),
        never_expires: false,
        number_of_billing_cycles: Some(6),
    }
}

pub fn subscription(id: &str, plan_id: &str, token: Option<&str>) -> Subscription {
    Subscription {
        id: id.to_string(),
        plan_id: plan_id.to_string(),
        payment_method_token: token.map(str::to_string),
        status: SubscriptionStatus::Active,
        price: dec!(19.99),
        balance: dec!(0.00),
        description: None,
        billing_day_of_month: Some(1),
        billing_period_start_date: Some(day(2024, 2, 1)),
        billing_period_end_date: Some(day(2024, 2, 29)),
        current_billing_cycle: 3,
        days_past_due: None,
        failure_count: 0,
        first_billing_date: day(2023, 12, 1),
        merchant_account_id: "merchant-usd".to_string(),
        never_expires: true,
        next_billing_date: day(2024, 3, 1),
        next_billing_period_amount: dec!(24.99),
        number_of_billing_cycles: None,
        paid_through_date: Some(day(2024, 2, 29)),
        trial_duration: None,
        trial_duration_unit: None,
        trial_period: false,
        created_at: stamp(),
        updated_at: stamp(),
    }
}

pub fn modifier(
    subscription_id: &str,
    kind: ModifierKind,
    modifier_id: &str,
    quantity: i32,
) -> NewSubscriptionModifier {
    NewSubscriptionModifier {
        subscription_id: subscription_id.to_string(),
        kind,
        modifier_id: modifier_id.to_string(),
        name: modifier_id.to_string(),
        amount: dec!(5.00),
        quantity,
        current_billing_cycle: 3,
        never_expires: true,
        number_of_billing_cycles: None,
    }
}

pub fn history_event(subscription_id: &str, status: SubscriptionStatus) -> NewSubscriptionHistory {
    NewSubscriptionHistory {
        subscription_id: subscription_id.to_string(),
        status,
        price: dec!(19.99),
        balance: dec!(0.00),
        subscription_source: SubscriptionSource::Api,
        timestamp: stamp(),
    }
}

pub fn snapshot(subscription: Subscription) -> SubscriptionSnapshot {
    SubscriptionSnapshot {
        subscription,
        add_ons: Vec::new(),
        discounts: Vec::new(),
        history: Vec::new(),
    }
}
