//! Gateway resource shapes, as exchanged with the Braintree XML API.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

use super::wire::{self, TypedArray};
use crate::payment_methods::{CustomerLocation, YesNoUnknown};
use crate::plans::TrialDurationUnit;
use crate::subscriptions::{SubscriptionSource, SubscriptionStatus};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RemoteCustomer {
    pub id: String,
    #[serde(default, deserialize_with = "wire::optional_text")]
    pub first_name: Option<String>,
    #[serde(default, deserialize_with = "wire::optional_text")]
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "wire::optional_text")]
    pub company: Option<String>,
    #[serde(default, deserialize_with = "wire::optional_text")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "wire::optional_text")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "wire::optional_text")]
    pub fax: Option<String>,
    #[serde(default, deserialize_with = "wire::optional_text")]
    pub website: Option<String>,
    #[serde(default, deserialize_with = "wire::array")]
    pub addresses: Vec<RemoteAddress>,
    #[serde(deserialize_with = "wire::text")]
    pub created_at: DateTime<Utc>,
    #[serde(deserialize_with = "wire::text")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RemoteAddress {
    pub id: String,
    #[serde(default)]
    pub customer_id: String,
    #[serde(default, deserialize_with = "wire::optional_text")]
    pub first_name: Option<String>,
    #[serde(default, deserialize_with = "wire::optional_text")]
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "wire::optional_text")]
    pub company: Option<String>,
    #[serde(default, deserialize_with = "wire::optional_text")]
    pub street_address: Option<String>,
    #[serde(default, deserialize_with = "wire::optional_text")]
    pub extended_address: Option<String>,
    #[serde(default, deserialize_with = "wire::optional_text")]
    pub locality: Option<String>,
    #[serde(default, deserialize_with = "wire::optional_text")]
    pub region: Option<String>,
    #[serde(default, deserialize_with = "wire::optional_text")]
    pub postal_code: Option<String>,
    #[serde(default, deserialize_with = "wire::optional_text")]
    pub country_code_alpha2: Option<String>,
    #[serde(default, deserialize_with = "wire::optional_text")]
    pub country_code_alpha3: Option<String>,
    #[serde(default, deserialize_with = "wire::optional_text")]
    pub country_code_numeric: Option<String>,
    #[serde(default, deserialize_with = "wire::optional_text")]
    pub country_name: Option<String>,
    #[serde(deserialize_with = "wire::text")]
    pub created_at: DateTime<Utc>,
    #[serde(deserialize_with = "wire::text")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RemoteCreditCard {
    pub token: String,
    pub customer_id: String,
    pub billing_address: Option<RemoteAddress>,
    #[serde(default)]
    pub bin: String,
    #[serde(default)]
    pub card_type: String,
    #[serde(default, deserialize_with = "wire::optional_text")]
    pub cardholder_name: Option<String>,
    #[serde(default)]
    pub commercial: YesNoUnknown,
    #[serde(default)]
    pub country_of_issuance: String,
    #[serde(default)]
    pub customer_location: CustomerLocation,
    #[serde(default)]
    pub debit: YesNoUnknown,
    #[serde(default, deserialize_with = "wire::text_or_default")]
    pub default: bool,
    pub expiration_month: String,
    pub expiration_year: String,
    #[serde(default, deserialize_with = "wire::text_or_default")]
    pub expired: bool,
    #[serde(default)]
    pub healthcare: YesNoUnknown,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub issuing_bank: String,
    pub last_4: String,
    #[serde(default)]
    pub masked_number: String,
    #[serde(default)]
    pub payroll: YesNoUnknown,
    #[serde(default)]
    pub prepaid: YesNoUnknown,
    #[serde(default)]
    pub unique_number_identifier: String,
    #[serde(deserialize_with = "wire::text")]
    pub created_at: DateTime<Utc>,
    #[serde(deserialize_with = "wire::text")]
    pub updated_at: DateTime<Utc>,
}

/// An add-on or discount, either in the catalogue or applied to a subscription.
///
/// `quantity` and `current_billing_cycle` are only present on subscription modifiers.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RemoteModifier {
    pub id: String,
    pub name: String,
    #[serde(default, deserialize_with = "wire::optional_text")]
    pub description: Option<String>,
    #[serde(deserialize_with = "wire::text")]
    pub amount: Decimal,
    #[serde(default, deserialize_with = "wire::text_or_default")]
    pub never_expires: bool,
    #[serde(default, deserialize_with = "wire::optional_text")]
    pub number_of_billing_cycles: Option<i32>,
    #[serde(default, deserialize_with = "wire::optional_text")]
    pub quantity: Option<i32>,
    #[serde(default, deserialize_with = "wire::optional_text")]
    pub current_billing_cycle: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RemotePlan {
    pub id: String,
    pub name: String,
    #[serde(default, deserialize_with = "wire::optional_text")]
    pub description: Option<String>,
    #[serde(deserialize_with = "wire::text")]
    pub price: Decimal,
    #[serde(default, deserialize_with = "wire::optional_text")]
    pub currency_iso_code: Option<String>,
    #[serde(deserialize_with = "wire::text")]
    pub billing_frequency: i32,
    #[serde(default, deserialize_with = "wire::optional_text")]
    pub billing_day_of_month: Option<i32>,
    #[serde(default, deserialize_with = "wire::optional_text")]
    pub number_of_billing_cycles: Option<i32>,
    #[serde(default, deserialize_with = "wire::optional_text")]
    pub trial_duration: Option<i32>,
    #[serde(default, deserialize_with = "wire::optional_text")]
    pub trial_duration_unit: Option<TrialDurationUnit>,
    #[serde(default, deserialize_with = "wire::text_or_default")]
    pub trial_period: bool,
    #[serde(default, deserialize_with = "wire::array")]
    pub add_ons: Vec<RemoteModifier>,
    #[serde(default, deserialize_with = "wire::array")]
    pub discounts: Vec<RemoteModifier>,
    #[serde(deserialize_with = "wire::text")]
    pub created_at: DateTime<Utc>,
    #[serde(deserialize_with = "wire::text")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RemoteStatusEvent {
    #[serde(deserialize_with = "wire::text")]
    pub status: SubscriptionStatus,
    #[serde(deserialize_with = "wire::text")]
    pub price: Decimal,
    #[serde(deserialize_with = "wire::text")]
    pub balance: Decimal,
    #[serde(deserialize_with = "wire::text")]
    pub subscription_source: SubscriptionSource,
    #[serde(deserialize_with = "wire::text")]
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RemoteSubscription {
    pub id: String,
    pub plan_id: String,
    #[serde(default, deserialize_with = "wire::optional_text")]
    pub payment_method_token: Option<String>,
    #[serde(deserialize_with = "wire::text")]
    pub status: SubscriptionStatus,
    #[serde(deserialize_with = "wire::text")]
    pub price: Decimal,
    #[serde(deserialize_with = "wire::text")]
    pub balance: Decimal,
    #[serde(default, deserialize_with = "wire::optional_text")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "wire::optional_text")]
    pub billing_day_of_month: Option<i32>,
    #[serde(default, deserialize_with = "wire::optional_text")]
    pub billing_period_start_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "wire::optional_text")]
    pub billing_period_end_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "wire::text_or_default")]
    pub current_billing_cycle: i32,
    #[serde(default, deserialize_with = "wire::optional_text")]
    pub days_past_due: Option<i32>,
    #[serde(default, deserialize_with = "wire::text_or_default")]
    pub failure_count: i32,
    #[serde(deserialize_with = "wire::text")]
    pub first_billing_date: NaiveDate,
    pub merchant_account_id: String,
    #[serde(default, deserialize_with = "wire::text_or_default")]
    pub never_expires: bool,
    #[serde(deserialize_with = "wire::text")]
    pub next_billing_date: NaiveDate,
    #[serde(deserialize_with = "wire::text")]
    pub next_billing_period_amount: Decimal,
    #[serde(default, deserialize_with = "wire::optional_text")]
    pub number_of_billing_cycles: Option<i32>,
    #[serde(default, deserialize_with = "wire::optional_text")]
    pub paid_through_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "wire::optional_text")]
    pub trial_duration: Option<i32>,
    #[serde(default, deserialize_with = "wire::optional_text")]
    pub trial_duration_unit: Option<TrialDurationUnit>,
    #[serde(default, deserialize_with = "wire::text_or_default")]
    pub trial_period: bool,
    #[serde(default, deserialize_with = "wire::array")]
    pub add_ons: Vec<RemoteModifier>,
    #[serde(default, deserialize_with = "wire::array")]
    pub discounts: Vec<RemoteModifier>,
    #[serde(default, deserialize_with = "wire::array")]
    pub status_history: Vec<RemoteStatusEvent>,
    #[serde(deserialize_with = "wire::text")]
    pub created_at: DateTime<Utc>,
    #[serde(deserialize_with = "wire::text")]
    pub updated_at: DateTime<Utc>,
}

/// Fields of a customer that may be changed through the gateway.
///
/// Read from the API as camelCase JSON, written to the gateway as XML.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "kebab-case", deserialize = "camelCase"))]
pub struct CustomerUpdateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fax: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

impl CustomerUpdateRequest {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.company.is_none()
            && self.email.is_none()
            && self.phone.is_none()
            && self.fax.is_none()
            && self.website.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "kebab-case", deserialize = "camelCase"))]
pub struct CreditCardOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub make_default: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "kebab-case", deserialize = "camelCase"))]
pub struct CreditCardUpdateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cardholder_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration_month: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration_year: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<CreditCardOptions>,
}

impl CreditCardUpdateRequest {
    pub fn is_empty(&self) -> bool {
        self.cardholder_name.is_none()
            && self.expiration_month.is_none()
            && self.expiration_year.is_none()
            && self
                .options
                .as_ref()
                .map_or(true, |options| options.make_default.is_none())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct AddModifier {
    pub inherited_from_id: String,
    pub quantity: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct UpdateModifier {
    pub existing_id: String,
    pub quantity: i32,
}

/// Add/update/remove instructions for one kind of modifier on a subscription.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModifierChanges {
    pub add: Vec<AddModifier>,
    pub update: Vec<UpdateModifier>,
    pub remove: Vec<String>,
}

impl ModifierChanges {
    pub fn add(id: impl Into<String>, quantity: i32) -> Self {
        Self {
            add: vec![AddModifier {
                inherited_from_id: id.into(),
                quantity,
            }],
            ..Default::default()
        }
    }

    pub fn update(id: impl Into<String>, quantity: i32) -> Self {
        Self {
            update: vec![UpdateModifier {
                existing_id: id.into(),
                quantity,
            }],
            ..Default::default()
        }
    }

    pub fn remove(id: impl Into<String>) -> Self {
        Self {
            remove: vec![id.into()],
            ..Default::default()
        }
    }
}

impl Serialize for ModifierChanges {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ModifierChanges", 3)?;
        if self.add.is_empty() {
            state.skip_field("add")?;
        } else {
            state.serialize_field("add", &TypedArray::new("add", &self.add))?;
        }
        if self.update.is_empty() {
            state.skip_field("update")?;
        } else {
            state.serialize_field("update", &TypedArray::new("update", &self.update))?;
        }
        if self.remove.is_empty() {
            state.skip_field("remove")?;
        } else {
            state.serialize_field("remove", &TypedArray::new("item", &self.remove))?;
        }
        state.end()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct SubscriptionUpdateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub add_ons: Option<ModifierChanges>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discounts: Option<ModifierChanges>,
}
