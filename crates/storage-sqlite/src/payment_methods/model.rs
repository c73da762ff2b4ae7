use diesel::prelude::*;

use btmirror_core::payment_methods::{CreditCard, CustomerLocation, YesNoUnknown};

use crate::conversions::{timestamp_from_db, timestamp_to_db};
use crate::errors::StorageError;

#[derive(Queryable, Identifiable, Insertable, AsChangeset, Selectable, Debug, Clone)]
#[diesel(primary_key(token))]
#[diesel(table_name = crate::schema::credit_cards)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(treat_none_as_null = true)]
pub struct CreditCardDB {
    pub token: String,
    pub customer_id: String,
    pub billing_address_id: Option<String>,
    pub bin: String,
    pub card_type: String,
    pub cardholder_name: Option<String>,
    pub commercial: String,
    pub country_of_issuance: String,
    pub customer_location: String,
    pub debit: String,
    pub is_default: bool,
    pub expiration_date: String,
    pub expiration_month: String,
    pub expiration_year: String,
    pub expired: bool,
    pub healthcare: String,
    pub image_url: String,
    pub issuing_bank: String,
    pub last_4: String,
    pub masked_number: String,
    pub payroll: String,
    pub prepaid: String,
    pub unique_number_identifier: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<CreditCard> for CreditCardDB {
    fn from(card: CreditCard) -> Self {
        Self {
            token: card.token,
            customer_id: card.customer_id,
            billing_address_id: card.billing_address_id,
            bin: card.bin,
            card_type: card.card_type,
            cardholder_name: card.cardholder_name,
            commercial: card.commercial.as_str().to_string(),
            country_of_issuance: card.country_of_issuance,
            customer_location: card.customer_location.as_str().to_string(),
            debit: card.debit.as_str().to_string(),
            is_default: card.default,
            expiration_date: card.expiration_date,
            expiration_month: card.expiration_month,
            expiration_year: card.expiration_year,
            expired: card.expired,
            healthcare: card.healthcare.as_str().to_string(),
            image_url: card.image_url,
            issuing_bank: card.issuing_bank,
            last_4: card.last_4,
            masked_number: card.masked_number,
            payroll: card.payroll.as_str().to_string(),
            prepaid: card.prepaid.as_str().to_string(),
            unique_number_identifier: card.unique_number_identifier,
            created_at: timestamp_to_db(&card.created_at),
            updated_at: timestamp_to_db(&card.updated_at),
        }
    }
}

impl TryFrom<CreditCardDB> for CreditCard {
    type Error = StorageError;

    fn try_from(db: CreditCardDB) -> Result<Self, Self::Error> {
        Ok(Self {
            created_at: timestamp_from_db("credit_cards.created_at", &db.created_at)?,
            updated_at: timestamp_from_db("credit_cards.updated_at", &db.updated_at)?,
            commercial: YesNoUnknown::parse(&db.commercial),
            customer_location: CustomerLocation::parse(&db.customer_location),
            debit: YesNoUnknown::parse(&db.debit),
            healthcare: YesNoUnknown::parse(&db.healthcare),
            payroll: YesNoUnknown::parse(&db.payroll),
            prepaid: YesNoUnknown::parse(&db.prepaid),
            default: db.is_default,
            token: db.token,
            customer_id: db.customer_id,
            billing_address_id: db.billing_address_id,
            bin: db.bin,
            card_type: db.card_type,
            cardholder_name: db.cardholder_name,
            country_of_issuance: db.country_of_issuance,
            expiration_date: db.expiration_date,
            expiration_month: db.expiration_month,
            expiration_year: db.expiration_year,
            expired: db.expired,
            image_url: db.image_url,
            issuing_bank: db.issuing_bank,
            last_4: db.last_4,
            masked_number: db.masked_number,
            unique_number_identifier: db.unique_number_identifier,
        })
    }
}
