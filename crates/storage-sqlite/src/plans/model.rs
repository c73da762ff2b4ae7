//! Database models for the plan catalogue.

use diesel::prelude::*;

use btmirror_core::plans::{AddOn, Discount, Plan, TrialDurationUnit};

use crate::conversions::{decimal_from_db, enum_from_db, timestamp_from_db, timestamp_to_db};
use crate::errors::StorageError;

#[derive(Queryable, Identifiable, Insertable, AsChangeset, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::plans)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(treat_none_as_null = true)]
pub struct PlanDB {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub price: String,
    pub currency_iso_code: Option<String>,
    pub billing_frequency: i32,
    pub billing_day_of_month: Option<i32>,
    pub number_of_billing_cycles: Option<i32>,
    pub trial_duration: Option<i32>,
    pub trial_duration_unit: Option<String>,
    pub trial_period: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Plan> for PlanDB {
    fn from(plan: Plan) -> Self {
        Self {
            id: plan.id,
            name: plan.name,
            description: plan.description,
            price: plan.price.to_string(),
            currency_iso_code: plan.currency_iso_code,
            billing_frequency: plan.billing_frequency,
            billing_day_of_month: plan.billing_day_of_month,
            number_of_billing_cycles: plan.number_of_billing_cycles,
            trial_duration: plan.trial_duration,
            trial_duration_unit: plan.trial_duration_unit.map(|u| u.as_str().to_string()),
            trial_period: plan.trial_period,
            created_at: timestamp_to_db(&plan.created_at),
            updated_at: timestamp_to_db(&plan.updated_at),
        }
    }
}

impl TryFrom<PlanDB> for Plan {
    type Error = StorageError;

    fn try_from(db: PlanDB) -> Result<Self, Self::Error> {
        let trial_duration_unit = db
            .trial_duration_unit
            .as_deref()
            .map(|unit| enum_from_db::<TrialDurationUnit>("plans.trial_duration_unit", unit))
            .transpose()?;
        Ok(Self {
            price: decimal_from_db("plans.price", &db.price)?,
            created_at: timestamp_from_db("plans.created_at", &db.created_at)?,
            updated_at: timestamp_from_db("plans.updated_at", &db.updated_at)?,
            trial_duration_unit,
            id: db.id,
            name: db.name,
            description: db.description,
            currency_iso_code: db.currency_iso_code,
            billing_frequency: db.billing_frequency,
            billing_day_of_month: db.billing_day_of_month,
            number_of_billing_cycles: db.number_of_billing_cycles,
            trial_duration: db.trial_duration,
            trial_period: db.trial_period,
        })
    }
}

#[derive(Queryable, Identifiable, Insertable, AsChangeset, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::add_ons)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(treat_none_as_null = true)]
pub struct AddOnDB {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub amount: String,
    pub never_expires: bool,
    pub number_of_billing_cycles: Option<i32>,
}

impl From<AddOn> for AddOnDB {
    fn from(add_on: AddOn) -> Self {
        Self {
            id: add_on.id,
            name: add_on.name,
            description: add_on.description,
            amount: add_on.amount.to_string(),
            never_expires: add_on.never_expires,
            number_of_billing_cycles: add_on.number_of_billing_cycles,
        }
    }
}

impl TryFrom<AddOnDB> for AddOn {
    type Error = StorageError;

    fn try_from(db: AddOnDB) -> Result<Self, Self::Error> {
        Ok(Self {
            amount: decimal_from_db("add_ons.amount", &db.amount)?,
            id: db.id,
            name: db.name,
            description: db.description,
            never_expires: db.never_expires,
            number_of_billing_cycles: db.number_of_billing_cycles,
        })
    }
}

#[derive(Queryable, Identifiable, Insertable, AsChangeset, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::discounts)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(treat_none_as_null = true)]
pub struct DiscountDB {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub amount: String,
    pub never_expires: bool,
    pub number_of_billing_cycles: Option<i32>,
}

impl From<Discount> for DiscountDB {
    fn from(discount: Discount) -> Self {
        Self {
            id: discount.id,
            name: discount.name,
            description: discount.description,
            amount: discount.amount.to_string(),
            never_expires: discount.never_expires,
            number_of_billing_cycles: discount.number_of_billing_cycles,
        }
    }
}

impl TryFrom<DiscountDB> for Discount {
    type Error = StorageError;

    fn try_from(db: DiscountDB) -> Result<Self, Self::Error> {
        Ok(Self {
            amount: decimal_from_db("discounts.amount", &db.amount)?,
            id: db.id,
            name: db.name,
            description: db.description,
            never_expires: db.never_expires,
            number_of_billing_cycles: db.number_of_billing_cycles,
        })
    }
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::plan_add_ons)]
pub struct PlanAddOnDB {
    pub plan_id: String,
    pub add_on_id: String,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::plan_discounts)]
pub struct PlanDiscountDB {
    pub plan_id: String,
    pub discount_id: String,
}
