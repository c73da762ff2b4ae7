use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::gateway::{RemoteAddress, RemoteCustomer};

/// Mirror of a gateway customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub company: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub fax: Option<String>,
    pub website: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Customer {
    /// Human readable label used by listings.
    pub fn display_name(&self) -> String {
        let full_name = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        if !full_name.is_empty() {
            return full_name;
        }
        self.email.clone().unwrap_or_else(|| self.id.clone())
    }
}

impl From<&RemoteCustomer> for Customer {
    fn from(remote: &RemoteCustomer) -> Self {
        Self {
            id: remote.id.clone(),
            first_name: remote.first_name.clone(),
            last_name: remote.last_name.clone(),
            company: remote.company.clone(),
            email: remote.email.clone(),
            phone: remote.phone.clone(),
            fax: remote.fax.clone(),
            website: remote.website.clone(),
            created_at: remote.created_at,
            updated_at: remote.updated_at,
        }
    }
}

/// Mirror of an address stored against a gateway customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub id: String,
    pub customer_id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub company: Option<String>,
    pub street_address: Option<String>,
    pub extended_address: Option<String>,
    pub locality: Option<String>,
    pub region: Option<String>,
    pub postal_code: Option<String>,
    pub country_code_alpha2: Option<String>,
    pub country_code_alpha3: Option<String>,
    pub country_code_numeric: Option<String>,
    pub country_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&RemoteAddress> for Address {
    fn from(remote: &RemoteAddress) -> Self {
        Self {
            id: remote.id.clone(),
            customer_id: remote.customer_id.clone(),
            first_name: remote.first_name.clone(),
            last_name: remote.last_name.clone(),
            company: remote.company.clone(),
            street_address: remote.street_address.clone(),
            extended_address: remote.extended_address.clone(),
            locality: remote.locality.clone(),
            region: remote.region.clone(),
            postal_code: remote.postal_code.clone(),
            country_code_alpha2: remote.country_code_alpha2.clone(),
            country_code_alpha3: remote.country_code_alpha3.clone(),
            country_code_numeric: remote.country_code_numeric.clone(),
            country_name: remote.country_name.clone(),
            created_at: remote.created_at,
            updated_at: remote.updated_at,
        }
    }
}
