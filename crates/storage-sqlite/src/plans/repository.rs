use async_trait::async_trait;
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::SqliteConnection;
use log::debug;
use std::sync::Arc;

use btmirror_core::plans::{AddOn, CatalogSnapshot, Discount, Plan, PlanRepositoryTrait};
use btmirror_core::sync::{CatalogSyncSummary, SyncSummary};
use btmirror_core::Result;

use super::model::{AddOnDB, DiscountDB, PlanAddOnDB, PlanDB, PlanDiscountDB};
use crate::db::{get_connection, WriteHandle};
use crate::errors::StorageError;
use crate::schema::{add_ons, discounts, plan_add_ons, plan_discounts, plans};

pub struct PlanRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl PlanRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        PlanRepository { pool, writer }
    }
}

#[async_trait]
impl PlanRepositoryTrait for PlanRepository {
    fn get_plan(&self, plan_id: &str) -> Result<Option<Plan>> {
        let mut conn = get_connection(&self.pool)?;
        let row = plans::table
            .find(plan_id)
            .select(PlanDB::as_select())
            .first::<PlanDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        Ok(row.map(Plan::try_from).transpose()?)
    }

    fn list_plans(&self) -> Result<Vec<Plan>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = plans::table
            .order(plans::name.asc())
            .select(PlanDB::as_select())
            .load::<PlanDB>(&mut conn)
            .map_err(StorageError::from)?;
        rows.into_iter()
            .map(|row| Plan::try_from(row).map_err(Into::into))
            .collect()
    }

    fn get_add_on(&self, add_on_id: &str) -> Result<Option<AddOn>> {
        let mut conn = get_connection(&self.pool)?;
        let row = add_ons::table
            .find(add_on_id)
            .select(AddOnDB::as_select())
            .first::<AddOnDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        Ok(row.map(AddOn::try_from).transpose()?)
    }

    fn list_add_ons(&self) -> Result<Vec<AddOn>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = add_ons::table
            .order(add_ons::name.asc())
            .select(AddOnDB::as_select())
            .load::<AddOnDB>(&mut conn)
            .map_err(StorageError::from)?;
        rows.into_iter()
            .map(|row| AddOn::try_from(row).map_err(Into::into))
            .collect()
    }

    fn get_discount(&self, discount_id: &str) -> Result<Option<Discount>> {
        let mut conn = get_connection(&self.pool)?;
        let row = discounts::table
            .find(discount_id)
            .select(DiscountDB::as_select())
            .first::<DiscountDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        Ok(row.map(Discount::try_from).transpose()?)
    }

    fn list_discounts(&self) -> Result<Vec<Discount>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = discounts::table
            .order(discounts::name.asc())
            .select(DiscountDB::as_select())
            .load::<DiscountDB>(&mut conn)
            .map_err(StorageError::from)?;
        rows.into_iter()
            .map(|row| Discount::try_from(row).map_err(Into::into))
            .collect()
    }

    fn plan_add_on_ids(&self, plan_id: &str) -> Result<Vec<String>> {
        let mut conn = get_connection(&self.pool)?;
        Ok(plan_add_ons::table
            .filter(plan_add_ons::plan_id.eq(plan_id))
            .order(plan_add_ons::add_on_id.asc())
            .select(plan_add_ons::add_on_id)
            .load::<String>(&mut conn)
            .map_err(StorageError::from)?)
    }

    fn plan_discount_ids(&self, plan_id: &str) -> Result<Vec<String>> {
        let mut conn = get_connection(&self.pool)?;
        Ok(plan_discounts::table
            .filter(plan_discounts::plan_id.eq(plan_id))
            .order(plan_discounts::discount_id.asc())
            .select(plan_discounts::discount_id)
            .load::<String>(&mut conn)
            .map_err(StorageError::from)?)
    }

    async fn save_catalog(&self, snapshot: CatalogSnapshot) -> Result<CatalogSyncSummary> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<CatalogSyncSummary> {
                let mut summary = CatalogSyncSummary::default();

                for add_on in snapshot.add_ons {
                    let existing = add_ons::table
                        .find(&add_on.id)
                        .select(add_ons::id)
                        .first::<String>(conn)
                        .optional()
                        .map_err(StorageError::from)?;
                    let add_on_db = AddOnDB::from(add_on);
                    diesel::insert_into(add_ons::table)
                        .values(&add_on_db)
                        .on_conflict(add_ons::id)
                        .do_update()
                        .set(&add_on_db)
                        .execute(conn)
                        .map_err(StorageError::from)?;
                    count(&mut summary.add_ons, existing.is_none());
                }

                for discount in snapshot.discounts {
                    let existing = discounts::table
                        .find(&discount.id)
                        .select(discounts::id)
                        .first::<String>(conn)
                        .optional()
                        .map_err(StorageError::from)?;
                    let discount_db = DiscountDB::from(discount);
                    diesel::insert_into(discounts::table)
                        .values(&discount_db)
                        .on_conflict(discounts::id)
                        .do_update()
                        .set(&discount_db)
                        .execute(conn)
                        .map_err(StorageError::from)?;
                    count(&mut summary.discounts, existing.is_none());
                }

                for entry in snapshot.plans {
                    let plan_id = entry.plan.id.clone();
                    let existing = plans::table
                        .find(&plan_id)
                        .select(plans::id)
                        .first::<String>(conn)
                        .optional()
                        .map_err(StorageError::from)?;
                    let plan_db = PlanDB::from(entry.plan);
                    diesel::insert_into(plans::table)
                        .values(&plan_db)
                        .on_conflict(plans::id)
                        .do_update()
                        .set(&plan_db)
                        .execute(conn)
                        .map_err(StorageError::from)?;
                    count(&mut summary.plans, existing.is_none());

                    diesel::delete(plan_add_ons::table.filter(plan_add_ons::plan_id.eq(&plan_id)))
                        .execute(conn)
                        .map_err(StorageError::from)?;
                    for add_on_id in entry.add_on_ids {
                        diesel::insert_into(plan_add_ons::table)
                            .values(&PlanAddOnDB {
                                plan_id: plan_id.clone(),
                                add_on_id,
                            })
                            .on_conflict_do_nothing()
                            .execute(conn)
                            .map_err(StorageError::from)?;
                    }

                    diesel::delete(
                        plan_discounts::table.filter(plan_discounts::plan_id.eq(&plan_id)),
                    )
                    .execute(conn)
                    .map_err(StorageError::from)?;
                    for discount_id in entry.discount_ids {
                        diesel::insert_into(plan_discounts::table)
                            .values(&PlanDiscountDB {
                                plan_id: plan_id.clone(),
                                discount_id,
                            })
                            .on_conflict_do_nothing()
                            .execute(conn)
                            .map_err(StorageError::from)?;
                    }
                }

                debug!(
                    "Saved catalogue: {} plans, {} add-ons, {} discounts",
                    summary.plans.created + summary.plans.updated,
                    summary.add_ons.created + summary.add_ons.updated,
                    summary.discounts.created + summary.discounts.updated
                );
                Ok(summary)
            })
            .await
    }
}

fn count(summary: &mut SyncSummary, created: bool) {
    if created {
        summary.created += 1;
    } else {
        summary.updated += 1;
    }
}
