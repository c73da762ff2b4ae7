//! Database models for subscriptions, their modifiers and status history.

use diesel::prelude::*;

use btmirror_core::plans::TrialDurationUnit;
use btmirror_core::subscriptions::{
    ModifierKind, NewSubscriptionHistory, NewSubscriptionModifier, Subscription,
    SubscriptionHistory, SubscriptionModifier, SubscriptionSource, SubscriptionStatus,
};

use crate::conversions::{
    date_from_db, date_to_db, decimal_from_db, enum_from_db, optional_date_from_db,
    timestamp_from_db, timestamp_to_db,
};
use crate::errors::StorageError;

#[derive(Queryable, Identifiable, Insertable, AsChangeset, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::subscriptions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(treat_none_as_null = true)]
pub struct SubscriptionDB {
    pub id: String,
    pub plan_id: String,
    pub payment_method_token: Option<String>,
    pub status: String,
    pub price: String,
    pub balance: String,
    pub description: Option<String>,
    pub billing_day_of_month: Option<i32>,
    pub billing_period_start_date: Option<String>,
    pub billing_period_end_date: Option<String>,
    pub current_billing_cycle: i32,
    pub days_past_due: Option<i32>,
    pub failure_count: i32,
    pub first_billing_date: String,
    pub merchant_account_id: String,
    pub never_expires: bool,
    pub next_billing_date: String,
    pub next_billing_period_amount: String,
    pub number_of_billing_cycles: Option<i32>,
    pub paid_through_date: Option<String>,
    pub trial_duration: Option<i32>,
    pub trial_duration_unit: Option<String>,
    pub trial_period: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Subscription> for SubscriptionDB {
    fn from(sub: Subscription) -> Self {
        Self {
            id: sub.id,
            plan_id: sub.plan_id,
            payment_method_token: sub.payment_method_token,
            status: sub.status.as_str().to_string(),
            price: sub.price.to_string(),
            balance: sub.balance.to_string(),
            description: sub.description,
            billing_day_of_month: sub.billing_day_of_month,
            billing_period_start_date: sub.billing_period_start_date.as_ref().map(date_to_db),
            billing_period_end_date: sub.billing_period_end_date.as_ref().map(date_to_db),
            current_billing_cycle: sub.current_billing_cycle,
            days_past_due: sub.days_past_due,
            failure_count: sub.failure_count,
            first_billing_date: date_to_db(&sub.first_billing_date),
            merchant_account_id: sub.merchant_account_id,
            never_expires: sub.never_expires,
            next_billing_date: date_to_db(&sub.next_billing_date),
            next_billing_period_amount: sub.next_billing_period_amount.to_string(),
            number_of_billing_cycles: sub.number_of_billing_cycles,
            paid_through_date: sub.paid_through_date.as_ref().map(date_to_db),
            trial_duration: sub.trial_duration,
            trial_duration_unit: sub.trial_duration_unit.map(|u| u.as_str().to_string()),
            trial_period: sub.trial_period,
            created_at: timestamp_to_db(&sub.created_at),
            updated_at: timestamp_to_db(&sub.updated_at),
        }
    }
}

impl TryFrom<SubscriptionDB> for Subscription {
    type Error = StorageError;

    fn try_from(db: SubscriptionDB) -> Result<Self, Self::Error> {
        let trial_duration_unit = db
            .trial_duration_unit
            .as_deref()
            .map(|unit| {
                enum_from_db::<TrialDurationUnit>("subscriptions.trial_duration_unit", unit)
            })
            .transpose()?;
        Ok(Self {
            status: enum_from_db::<SubscriptionStatus>("subscriptions.status", &db.status)?,
            price: decimal_from_db("subscriptions.price", &db.price)?,
            balance: decimal_from_db("subscriptions.balance", &db.balance)?,
            billing_period_start_date: optional_date_from_db(
                "subscriptions.billing_period_start_date",
                db.billing_period_start_date.as_deref(),
            )?,
            billing_period_end_date: optional_date_from_db(
                "subscriptions.billing_period_end_date",
                db.billing_period_end_date.as_deref(),
            )?,
            first_billing_date: date_from_db(
                "subscriptions.first_billing_date",
                &db.first_billing_date,
            )?,
            next_billing_date: date_from_db(
                "subscriptions.next_billing_date",
                &db.next_billing_date,
            )?,
            next_billing_period_amount: decimal_from_db(
                "subscriptions.next_billing_period_amount",
                &db.next_billing_period_amount,
            )?,
            paid_through_date: optional_date_from_db(
                "subscriptions.paid_through_date",
                db.paid_through_date.as_deref(),
            )?,
            created_at: timestamp_from_db("subscriptions.created_at", &db.created_at)?,
            updated_at: timestamp_from_db("subscriptions.updated_at", &db.updated_at)?,
            trial_duration_unit,
            id: db.id,
            plan_id: db.plan_id,
            payment_method_token: db.payment_method_token,
            description: db.description,
            billing_day_of_month: db.billing_day_of_month,
            current_billing_cycle: db.current_billing_cycle,
            days_past_due: db.days_past_due,
            failure_count: db.failure_count,
            merchant_account_id: db.merchant_account_id,
            never_expires: db.never_expires,
            number_of_billing_cycles: db.number_of_billing_cycles,
            trial_duration: db.trial_duration,
            trial_period: db.trial_period,
        })
    }
}

#[derive(Queryable, Identifiable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::subscription_add_ons)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct SubscriptionAddOnDB {
    pub id: i32,
    pub subscription_id: String,
    pub add_on_id: String,
    pub name: String,
    pub amount: String,
    pub quantity: i32,
    pub current_billing_cycle: i32,
    pub never_expires: bool,
    pub number_of_billing_cycles: Option<i32>,
}

#[derive(Insertable, AsChangeset, Debug, Clone)]
#[diesel(table_name = crate::schema::subscription_add_ons)]
#[diesel(treat_none_as_null = true)]
pub struct NewSubscriptionAddOnDB {
    pub subscription_id: String,
    pub add_on_id: String,
    pub name: String,
    pub amount: String,
    pub quantity: i32,
    pub current_billing_cycle: i32,
    pub never_expires: bool,
    pub number_of_billing_cycles: Option<i32>,
}

impl From<NewSubscriptionModifier> for NewSubscriptionAddOnDB {
    fn from(m: NewSubscriptionModifier) -> Self {
        Self {
            subscription_id: m.subscription_id,
            add_on_id: m.modifier_id,
            name: m.name,
            amount: m.amount.to_string(),
            quantity: m.quantity,
            current_billing_cycle: m.current_billing_cycle,
            never_expires: m.never_expires,
            number_of_billing_cycles: m.number_of_billing_cycles,
        }
    }
}

impl TryFrom<SubscriptionAddOnDB> for SubscriptionModifier {
    type Error = StorageError;

    fn try_from(db: SubscriptionAddOnDB) -> Result<Self, Self::Error> {
        Ok(Self {
            amount: decimal_from_db("subscription_add_ons.amount", &db.amount)?,
            id: db.id,
            subscription_id: db.subscription_id,
            kind: ModifierKind::AddOn,
            modifier_id: db.add_on_id,
            name: db.name,
            quantity: db.quantity,
            current_billing_cycle: db.current_billing_cycle,
            never_expires: db.never_expires,
            number_of_billing_cycles: db.number_of_billing_cycles,
        })
    }
}

#[derive(Queryable, Identifiable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::subscription_discounts)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct SubscriptionDiscountDB {
    pub id: i32,
    pub subscription_id: String,
    pub discount_id: String,
    pub name: String,
    pub amount: String,
    pub quantity: i32,
    pub current_billing_cycle: i32,
    pub never_expires: bool,
    pub number_of_billing_cycles: Option<i32>,
}

#[derive(Insertable, AsChangeset, Debug, Clone)]
#[diesel(table_name = crate::schema::subscription_discounts)]
#[diesel(treat_none_as_null = true)]
pub struct NewSubscriptionDiscountDB {
    pub subscription_id: String,
    pub discount_id: String,
    pub name: String,
    pub amount: String,
    pub quantity: i32,
    pub current_billing_cycle: i32,
    pub never_expires: bool,
    pub number_of_billing_cycles: Option<i32>,
}

impl From<NewSubscriptionModifier> for NewSubscriptionDiscountDB {
    fn from(m: NewSubscriptionModifier) -> Self {
        Self {
            subscription_id: m.subscription_id,
            discount_id: m.modifier_id,
            name: m.name,
            amount: m.amount.to_string(),
            quantity: m.quantity,
            current_billing_cycle: m.current_billing_cycle,
            never_expires: m.never_expires,
            number_of_billing_cycles: m.number_of_billing_cycles,
        }
    }
}

impl TryFrom<SubscriptionDiscountDB> for SubscriptionModifier {
    type Error = StorageError;

    fn try_from(db: SubscriptionDiscountDB) -> Result<Self, Self::Error> {
        Ok(Self {
            amount: decimal_from_db("subscription_discounts.amount", &db.amount)?,
            id: db.id,
            subscription_id: db.subscription_id,
            kind: ModifierKind::Discount,
            modifier_id: db.discount_id,
            name: db.name,
            quantity: db.quantity,
            current_billing_cycle: db.current_billing_cycle,
            never_expires: db.never_expires,
            number_of_billing_cycles: db.number_of_billing_cycles,
        })
    }
}

#[derive(Queryable, Identifiable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::subscription_history)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct SubscriptionHistoryDB {
    pub id: i32,
    pub subscription_id: String,
    pub status: String,
    pub price: String,
    pub balance: String,
    pub subscription_source: String,
    pub timestamp: String,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::subscription_history)]
pub struct NewSubscriptionHistoryDB {
    pub subscription_id: String,
    pub status: String,
    pub price: String,
    pub balance: String,
    pub subscription_source: String,
    pub timestamp: String,
}

impl From<NewSubscriptionHistory> for NewSubscriptionHistoryDB {
    fn from(event: NewSubscriptionHistory) -> Self {
        Self {
            subscription_id: event.subscription_id,
            status: event.status.as_str().to_string(),
            price: event.price.to_string(),
            balance: event.balance.to_string(),
            subscription_source: event.subscription_source.as_str().to_string(),
            timestamp: timestamp_to_db(&event.timestamp),
        }
    }
}

impl TryFrom<SubscriptionHistoryDB> for SubscriptionHistory {
    type Error = StorageError;

    fn try_from(db: SubscriptionHistoryDB) -> Result<Self, Self::Error> {
        Ok(Self {
            status: enum_from_db::<SubscriptionStatus>("subscription_history.status", &db.status)?,
            price: decimal_from_db("subscription_history.price", &db.price)?,
            balance: decimal_from_db("subscription_history.balance", &db.balance)?,
            subscription_source: enum_from_db::<SubscriptionSource>(
                "subscription_history.subscription_source",
                &db.subscription_source,
            )?,
            timestamp: timestamp_from_db("subscription_history.timestamp", &db.timestamp)?,
            id: db.id,
            subscription_id: db.subscription_id,
        })
    }
}
