//! Database models for customers and addresses.

use diesel::prelude::*;

use btmirror_core::customers::{Address, Customer};

use crate::conversions::{timestamp_from_db, timestamp_to_db};
use crate::errors::StorageError;

#[derive(Queryable, Identifiable, Insertable, AsChangeset, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::customers)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(treat_none_as_null = true)]
pub struct CustomerDB {
    pub id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub company: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub fax: Option<String>,
    pub website: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Customer> for CustomerDB {
    fn from(customer: Customer) -> Self {
        Self {
            id: customer.id,
            first_name: customer.first_name,
            last_name: customer.last_name,
            company: customer.company,
            email: customer.email,
            phone: customer.phone,
            fax: customer.fax,
            website: customer.website,
            created_at: timestamp_to_db(&customer.created_at),
            updated_at: timestamp_to_db(&customer.updated_at),
        }
    }
}

impl TryFrom<CustomerDB> for Customer {
    type Error = StorageError;

    fn try_from(db: CustomerDB) -> Result<Self, Self::Error> {
        Ok(Self {
            created_at: timestamp_from_db("customers.created_at", &db.created_at)?,
            updated_at: timestamp_from_db("customers.updated_at", &db.updated_at)?,
            id: db.id,
            first_name: db.first_name,
            last_name: db.last_name,
            company: db.company,
            email: db.email,
            phone: db.phone,
            fax: db.fax,
            website: db.website,
        })
    }
}

#[derive(Queryable, Identifiable, Insertable, AsChangeset, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::addresses)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(treat_none_as_null = true)]
pub struct AddressDB {
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
    pub created_at: String,
    pub updated_at: String,
}

impl From<Address> for AddressDB {
    fn from(address: Address) -> Self {
        Self {
            id: address.id,
            customer_id: address.customer_id,
            first_name: address.first_name,
            last_name: address.last_name,
            company: address.company,
            street_address: address.street_address,
            extended_address: address.extended_address,
            locality: address.locality,
            region: address.region,
            postal_code: address.postal_code,
            country_code_alpha2: address.country_code_alpha2,
            country_code_alpha3: address.country_code_alpha3,
            country_code_numeric: address.country_code_numeric,
            country_name: address.country_name,
            created_at: timestamp_to_db(&address.created_at),
            updated_at: timestamp_to_db(&address.updated_at),
        }
    }
}

impl TryFrom<AddressDB> for Address {
    type Error = StorageError;

    fn try_from(db: AddressDB) -> Result<Self, Self::Error> {
        Ok(Self {
            created_at: timestamp_from_db("addresses.created_at", &db.created_at)?,
            updated_at: timestamp_from_db("addresses.updated_at", &db.updated_at)?,
            id: db.id,
            customer_id: db.customer_id,
            first_name: db.first_name,
            last_name: db.last_name,
            company: db.company,
            street_address: db.street_address,
            extended_address: db.extended_address,
            locality: db.locality,
            region: db.region,
            postal_code: db.postal_code,
            country_code_alpha2: db.country_code_alpha2,
            country_code_alpha3: db.country_code_alpha3,
            country_code_numeric: db.country_code_numeric,
            country_name: db.country_name,
        })
    }
}
