use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::Error;
use crate::gateway::{RemoteModifier, RemotePlan};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrialDurationUnit {
    Day,
    Month,
}

impl TrialDurationUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Month => "month",
        }
    }
}

impl FromStr for TrialDurationUnit {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "day" => Ok(Self::Day),
            "month" => Ok(Self::Month),
            other => Err(Error::validation(format!(
                "Unknown trial duration unit '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for TrialDurationUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Catalogue add-on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddOn {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub amount: Decimal,
    pub never_expires: bool,
    pub number_of_billing_cycles: Option<i32>,
}

/// Catalogue discount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Discount {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub amount: Decimal,
    pub never_expires: bool,
    pub number_of_billing_cycles: Option<i32>,
}

impl From<&RemoteModifier> for AddOn {
    fn from(remote: &RemoteModifier) -> Self {
        Self {
            id: remote.id.clone(),
            name: remote.name.clone(),
            description: remote.description.clone(),
            amount: remote.amount,
            never_expires: remote.never_expires,
            number_of_billing_cycles: remote.number_of_billing_cycles,
        }
    }
}

impl From<&RemoteModifier> for Discount {
    fn from(remote: &RemoteModifier) -> Self {
        Self {
            id: remote.id.clone(),
            name: remote.name.clone(),
            description: remote.description.clone(),
            amount: remote.amount,
            never_expires: remote.never_expires,
            number_of_billing_cycles: remote.number_of_billing_cycles,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub currency_iso_code: Option<String>,
    pub billing_frequency: i32,
    pub billing_day_of_month: Option<i32>,
    pub number_of_billing_cycles: Option<i32>,
    pub trial_duration: Option<i32>,
    pub trial_duration_unit: Option<TrialDurationUnit>,
    pub trial_period: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&RemotePlan> for Plan {
    fn from(remote: &RemotePlan) -> Self {
        Self {
            id: remote.id.clone(),
            name: remote.name.clone(),
            description: remote.description.clone(),
            price: remote.price,
            currency_iso_code: remote.currency_iso_code.clone(),
            billing_frequency: remote.billing_frequency,
            billing_day_of_month: remote.billing_day_of_month,
            number_of_billing_cycles: remote.number_of_billing_cycles,
            trial_duration: remote.trial_duration,
            trial_duration_unit: remote.trial_duration_unit,
            trial_period: remote.trial_period,
            created_at: remote.created_at,
            updated_at: remote.updated_at,
        }
    }
}

/// A plan together with the ids of the add-ons and discounts it links to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanWithModifiers {
    pub plan: Plan,
    pub add_on_ids: Vec<String>,
    pub discount_ids: Vec<String>,
}

/// Everything written by one catalogue sync.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogSnapshot {
    pub add_ons: Vec<AddOn>,
    pub discounts: Vec<Discount>,
    pub plans: Vec<PlanWithModifiers>,
}
