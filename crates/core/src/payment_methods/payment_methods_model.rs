use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::gateway::RemoteCreditCard;

/// Tri-state card attribute reported by the card networks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String")]
pub enum YesNoUnknown {
    Yes,
    No,
    #[default]
    Unknown,
}

impl YesNoUnknown {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Yes => "Yes",
            Self::No => "No",
            Self::Unknown => "Unknown",
        }
    }

    pub fn parse(value: &str) -> Self {
        match value {
            "Yes" => Self::Yes,
            "No" => Self::No,
            _ => Self::Unknown,
        }
    }
}

impl From<String> for YesNoUnknown {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl fmt::Display for YesNoUnknown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// "US" when the billing country is the US or unspecified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String")]
pub enum CustomerLocation {
    #[default]
    #[serde(rename = "US")]
    Us,
    #[serde(rename = "International")]
    International,
}

impl CustomerLocation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Us => "US",
            Self::International => "International",
        }
    }

    pub fn parse(value: &str) -> Self {
        match value {
            "International" => Self::International,
            _ => Self::Us,
        }
    }
}

impl From<String> for CustomerLocation {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl fmt::Display for CustomerLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mirror of a vaulted credit card, keyed by its payment method token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditCard {
    pub token: String,
    pub customer_id: String,
    pub billing_address_id: Option<String>,
    pub bin: String,
    pub card_type: String,
    pub cardholder_name: Option<String>,
    pub commercial: YesNoUnknown,
    pub country_of_issuance: String,
    pub customer_location: CustomerLocation,
    pub debit: YesNoUnknown,
    pub default: bool,
    pub expiration_date: String,
    pub expiration_month: String,
    pub expiration_year: String,
    pub expired: bool,
    pub healthcare: YesNoUnknown,
    pub image_url: String,
    pub issuing_bank: String,
    pub last_4: String,
    pub masked_number: String,
    pub payroll: YesNoUnknown,
    pub prepaid: YesNoUnknown,
    pub unique_number_identifier: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Formats the gateway's `MM/YYYY` expiration date.
pub fn expiration_date(month: &str, year: &str) -> String {
    format!("{}/{}", month, year)
}

impl From<&RemoteCreditCard> for CreditCard {
    fn from(remote: &RemoteCreditCard) -> Self {
        Self {
            token: remote.token.clone(),
            customer_id: remote.customer_id.clone(),
            billing_address_id: remote.billing_address.as_ref().map(|a| a.id.clone()),
            bin: remote.bin.clone(),
            card_type: remote.card_type.clone(),
            cardholder_name: remote.cardholder_name.clone(),
            commercial: remote.commercial,
            country_of_issuance: remote.country_of_issuance.clone(),
            customer_location: remote.customer_location,
            debit: remote.debit,
            default: remote.default,
            expiration_date: expiration_date(&remote.expiration_month, &remote.expiration_year),
            expiration_month: remote.expiration_month.clone(),
            expiration_year: remote.expiration_year.clone(),
            expired: remote.expired,
            healthcare: remote.healthcare,
            image_url: remote.image_url.clone(),
            issuing_bank: remote.issuing_bank.clone(),
            last_4: remote.last_4.clone(),
            masked_number: remote.masked_number.clone(),
            payroll: remote.payroll,
            prepaid: remote.prepaid,
            unique_number_identifier: remote.unique_number_identifier.clone(),
            created_at: remote.created_at,
            updated_at: remote.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yes_no_unknown_deserializes_unrecognised_values_as_unknown() {
        let value: YesNoUnknown = serde_json::from_str("\"Maybe\"").unwrap();
        assert_eq!(value, YesNoUnknown::Unknown);
        let value: YesNoUnknown = serde_json::from_str("\"Yes\"").unwrap();
        assert_eq!(value, YesNoUnknown::Yes);
    }

    #[test]
    fn customer_location_uses_gateway_spelling() {
        assert_eq!(
            serde_json::to_string(&CustomerLocation::Us).unwrap(),
            "\"US\""
        );
        assert_eq!(
            CustomerLocation::parse("International"),
            CustomerLocation::International
        );
    }

    #[test]
    fn expiration_date_joins_month_and_year() {
        assert_eq!(expiration_date("04", "2031"), "04/2031");
    }
}
