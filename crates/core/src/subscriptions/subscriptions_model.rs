use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::Error;
use crate::gateway::{RemoteModifier, RemoteStatusEvent, RemoteSubscription};
use crate::plans::TrialDurationUnit;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubscriptionStatus {
    Active,
    Canceled,
    Expired,
    #[serde(rename = "Past Due")]
    PastDue,
    Pending,
}

impl SubscriptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Canceled => "Canceled",
            Self::Expired => "Expired",
            Self::PastDue => "Past Due",
            Self::Pending => "Pending",
        }
    }
}

impl FromStr for SubscriptionStatus {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Active" => Ok(Self::Active),
            "Canceled" => Ok(Self::Canceled),
            "Expired" => Ok(Self::Expired),
            "Past Due" => Ok(Self::PastDue),
            "Pending" => Ok(Self::Pending),
            other => Err(Error::validation(format!(
                "Unknown subscription status '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who caused a subscription status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionSource {
    Api,
    ControlPanel,
    Recurring,
}

impl SubscriptionSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Api => "api",
            Self::ControlPanel => "control_panel",
            Self::Recurring => "recurring",
        }
    }
}

impl FromStr for SubscriptionSource {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "api" => Ok(Self::Api),
            "control_panel" => Ok(Self::ControlPanel),
            "recurring" => Ok(Self::Recurring),
            other => Err(Error::validation(format!(
                "Unknown subscription source '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for SubscriptionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Add-ons and discounts share one shape on a subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModifierKind {
    AddOn,
    Discount,
}

impl ModifierKind {
    pub fn entity(&self) -> &'static str {
        match self {
            Self::AddOn => "AddOn",
            Self::Discount => "Discount",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub id: String,
    pub plan_id: String,
    pub payment_method_token: Option<String>,
    pub status: SubscriptionStatus,
    pub price: Decimal,
    pub balance: Decimal,
    pub description: Option<String>,
    pub billing_day_of_month: Option<i32>,
    pub billing_period_start_date: Option<NaiveDate>,
    pub billing_period_end_date: Option<NaiveDate>,
    pub current_billing_cycle: i32,
    pub days_past_due: Option<i32>,
    pub failure_count: i32,
    pub first_billing_date: NaiveDate,
    pub merchant_account_id: String,
    pub never_expires: bool,
    pub next_billing_date: NaiveDate,
    pub next_billing_period_amount: Decimal,
    pub number_of_billing_cycles: Option<i32>,
    pub paid_through_date: Option<NaiveDate>,
    pub trial_duration: Option<i32>,
    pub trial_duration_unit: Option<TrialDurationUnit>,
    pub trial_period: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&RemoteSubscription> for Subscription {
    fn from(remote: &RemoteSubscription) -> Self {
        Self {
            id: remote.id.clone(),
            plan_id: remote.plan_id.clone(),
            payment_method_token: remote.payment_method_token.clone(),
            status: remote.status,
            price: remote.price,
            balance: remote.balance,
            description: remote.description.clone(),
            billing_day_of_month: remote.billing_day_of_month,
            billing_period_start_date: remote.billing_period_start_date,
            billing_period_end_date: remote.billing_period_end_date,
            current_billing_cycle: remote.current_billing_cycle,
            days_past_due: remote.days_past_due,
            failure_count: remote.failure_count,
            first_billing_date: remote.first_billing_date,
            merchant_account_id: remote.merchant_account_id.clone(),
            never_expires: remote.never_expires,
            next_billing_date: remote.next_billing_date,
            next_billing_period_amount: remote.next_billing_period_amount,
            number_of_billing_cycles: remote.number_of_billing_cycles,
            paid_through_date: remote.paid_through_date,
            trial_duration: remote.trial_duration,
            trial_duration_unit: remote.trial_duration_unit,
            trial_period: remote.trial_period,
            created_at: remote.created_at,
            updated_at: remote.updated_at,
        }
    }
}

/// An add-on or discount row attached to a subscription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionModifier {
    pub id: i32,
    pub subscription_id: String,
    pub kind: ModifierKind,
    /// Catalogue add-on or discount id.
    pub modifier_id: String,
    pub name: String,
    pub amount: Decimal,
    pub quantity: i32,
    pub current_billing_cycle: i32,
    pub never_expires: bool,
    pub number_of_billing_cycles: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSubscriptionModifier {
    pub subscription_id: String,
    pub kind: ModifierKind,
    pub modifier_id: String,
    pub name: String,
    pub amount: Decimal,
    pub quantity: i32,
    pub current_billing_cycle: i32,
    pub never_expires: bool,
    pub number_of_billing_cycles: Option<i32>,
}

impl NewSubscriptionModifier {
    /// Builds the row for a modifier reported on a remote subscription.
    pub fn from_remote(
        subscription: &RemoteSubscription,
        kind: ModifierKind,
        remote: &RemoteModifier,
    ) -> Self {
        Self {
            subscription_id: subscription.id.clone(),
            kind,
            modifier_id: remote.id.clone(),
            name: remote.name.clone(),
            amount: remote.amount,
            quantity: remote.quantity.unwrap_or(1),
            current_billing_cycle: remote
                .current_billing_cycle
                .unwrap_or(subscription.current_billing_cycle),
            never_expires: remote.never_expires,
            number_of_billing_cycles: remote.number_of_billing_cycles,
        }
    }
}

impl From<SubscriptionModifier> for NewSubscriptionModifier {
    fn from(row: SubscriptionModifier) -> Self {
        Self {
            subscription_id: row.subscription_id,
            kind: row.kind,
            modifier_id: row.modifier_id,
            name: row.name,
            amount: row.amount,
            quantity: row.quantity,
            current_billing_cycle: row.current_billing_cycle,
            never_expires: row.never_expires,
            number_of_billing_cycles: row.number_of_billing_cycles,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionHistory {
    pub id: i32,
    pub subscription_id: String,
    pub status: SubscriptionStatus,
    pub price: Decimal,
    pub balance: Decimal,
    pub subscription_source: SubscriptionSource,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSubscriptionHistory {
    pub subscription_id: String,
    pub status: SubscriptionStatus,
    pub price: Decimal,
    pub balance: Decimal,
    pub subscription_source: SubscriptionSource,
    pub timestamp: DateTime<Utc>,
}

impl NewSubscriptionHistory {
    pub fn from_remote(subscription_id: &str, event: &RemoteStatusEvent) -> Self {
        Self {
            subscription_id: subscription_id.to_string(),
            status: event.status,
            price: event.price,
            balance: event.balance,
            subscription_source: event.subscription_source,
            timestamp: event.timestamp,
        }
    }
}

/// Everything mirrored for one subscription, written in a single transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionSnapshot {
    pub subscription: Subscription,
    pub add_ons: Vec<NewSubscriptionModifier>,
    pub discounts: Vec<NewSubscriptionModifier>,
    pub history: Vec<NewSubscriptionHistory>,
}

impl From<&RemoteSubscription> for SubscriptionSnapshot {
    fn from(remote: &RemoteSubscription) -> Self {
        Self {
            subscription: Subscription::from(remote),
            add_ons: remote
                .add_ons
                .iter()
                .map(|m| NewSubscriptionModifier::from_remote(remote, ModifierKind::AddOn, m))
                .collect(),
            discounts: remote
                .discounts
                .iter()
                .map(|m| NewSubscriptionModifier::from_remote(remote, ModifierKind::Discount, m))
                .collect(),
            history: remote
                .status_history
                .iter()
                .map(|event| NewSubscriptionHistory::from_remote(&remote.id, event))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_gateway_spelling() {
        assert_eq!(
            "Past Due".parse::<SubscriptionStatus>().unwrap(),
            SubscriptionStatus::PastDue
        );
        assert_eq!(SubscriptionStatus::PastDue.to_string(), "Past Due");
        assert!("Paused".parse::<SubscriptionStatus>().is_err());
    }

    #[test]
    fn source_uses_snake_case() {
        assert_eq!(
            serde_json::to_string(&SubscriptionSource::ControlPanel).unwrap(),
            "\"control_panel\""
        );
        assert_eq!(
            "recurring".parse::<SubscriptionSource>().unwrap(),
            SubscriptionSource::Recurring
        );
    }
}
