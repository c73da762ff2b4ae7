use async_trait::async_trait;
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::SqliteConnection;
use log::debug;
use std::sync::Arc;

use btmirror_core::subscriptions::{
    ModifierKind, NewSubscriptionModifier, Subscription, SubscriptionHistory,
    SubscriptionModifier, SubscriptionRepositoryTrait, SubscriptionSnapshot,
};
use btmirror_core::sync::Upserted;
use btmirror_core::Result;

use super::model::{
    NewSubscriptionAddOnDB, NewSubscriptionDiscountDB, NewSubscriptionHistoryDB,
    SubscriptionAddOnDB, SubscriptionDB, SubscriptionDiscountDB, SubscriptionHistoryDB,
};
use crate::db::{get_connection, WriteHandle};
use crate::errors::StorageError;
use crate::schema::{subscription_add_ons, subscription_discounts, subscription_history, subscriptions};

fn upsert_add_on_row(
    conn: &mut SqliteConnection,
    modifier: NewSubscriptionModifier,
) -> Result<SubscriptionModifier> {
    let row = NewSubscriptionAddOnDB::from(modifier);
    diesel::insert_into(subscription_add_ons::table)
        .values(&row)
        .on_conflict((
            subscription_add_ons::subscription_id,
            subscription_add_ons::add_on_id,
        ))
        .do_update()
        .set(&row)
        .execute(conn)
        .map_err(StorageError::from)?;

    let stored = subscription_add_ons::table
        .filter(subscription_add_ons::subscription_id.eq(&row.subscription_id))
        .filter(subscription_add_ons::add_on_id.eq(&row.add_on_id))
        .select(SubscriptionAddOnDB::as_select())
        .first::<SubscriptionAddOnDB>(conn)
        .map_err(StorageError::from)?;
    Ok(SubscriptionModifier::try_from(stored)?)
}

fn upsert_discount_row(
    conn: &mut SqliteConnection,
    modifier: NewSubscriptionModifier,
) -> Result<SubscriptionModifier> {
    let row = NewSubscriptionDiscountDB::from(modifier);
    diesel::insert_into(subscription_discounts::table)
        .values(&row)
        .on_conflict((
            subscription_discounts::subscription_id,
            subscription_discounts::discount_id,
        ))
        .do_update()
        .set(&row)
        .execute(conn)
        .map_err(StorageError::from)?;

    let stored = subscription_discounts::table
        .filter(subscription_discounts::subscription_id.eq(&row.subscription_id))
        .filter(subscription_discounts::discount_id.eq(&row.discount_id))
        .select(SubscriptionDiscountDB::as_select())
        .first::<SubscriptionDiscountDB>(conn)
        .map_err(StorageError::from)?;
    Ok(SubscriptionModifier::try_from(stored)?)
}

pub struct SubscriptionRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl SubscriptionRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        SubscriptionRepository { pool, writer }
    }
}

#[async_trait]
impl SubscriptionRepositoryTrait for SubscriptionRepository {
    fn get_by_id(&self, subscription_id: &str) -> Result<Option<Subscription>> {
        let mut conn = get_connection(&self.pool)?;
        let row = subscriptions::table
            .find(subscription_id)
            .select(SubscriptionDB::as_select())
            .first::<SubscriptionDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        Ok(row.map(Subscription::try_from).transpose()?)
    }

    fn list(&self) -> Result<Vec<Subscription>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = subscriptions::table
            .order(subscriptions::created_at.desc())
            .select(SubscriptionDB::as_select())
            .load::<SubscriptionDB>(&mut conn)
            .map_err(StorageError::from)?;
        rows.into_iter()
            .map(|row| Subscription::try_from(row).map_err(Into::into))
            .collect()
    }

    fn list_modifiers(
        &self,
        subscription_id: &str,
        kind: ModifierKind,
    ) -> Result<Vec<SubscriptionModifier>> {
        let mut conn = get_connection(&self.pool)?;
        match kind {
            ModifierKind::AddOn => subscription_add_ons::table
                .filter(subscription_add_ons::subscription_id.eq(subscription_id))
                .order(subscription_add_ons::id.asc())
                .select(SubscriptionAddOnDB::as_select())
                .load::<SubscriptionAddOnDB>(&mut conn)
                .map_err(StorageError::from)?
                .into_iter()
                .map(|row| SubscriptionModifier::try_from(row).map_err(Into::into))
                .collect(),
            ModifierKind::Discount => subscription_discounts::table
                .filter(subscription_discounts::subscription_id.eq(subscription_id))
                .order(subscription_discounts::id.asc())
                .select(SubscriptionDiscountDB::as_select())
                .load::<SubscriptionDiscountDB>(&mut conn)
                .map_err(StorageError::from)?
                .into_iter()
                .map(|row| SubscriptionModifier::try_from(row).map_err(Into::into))
                .collect(),
        }
    }

    fn get_modifier(
        &self,
        subscription_id: &str,
        kind: ModifierKind,
        modifier_id: &str,
    ) -> Result<Option<SubscriptionModifier>> {
        let mut conn = get_connection(&self.pool)?;
        let modifier = match kind {
            ModifierKind::AddOn => subscription_add_ons::table
                .filter(subscription_add_ons::subscription_id.eq(subscription_id))
                .filter(subscription_add_ons::add_on_id.eq(modifier_id))
                .select(SubscriptionAddOnDB::as_select())
                .first::<SubscriptionAddOnDB>(&mut conn)
                .optional()
                .map_err(StorageError::from)?
                .map(SubscriptionModifier::try_from)
                .transpose()?,
            ModifierKind::Discount => subscription_discounts::table
                .filter(subscription_discounts::subscription_id.eq(subscription_id))
                .filter(subscription_discounts::discount_id.eq(modifier_id))
                .select(SubscriptionDiscountDB::as_select())
                .first::<SubscriptionDiscountDB>(&mut conn)
                .optional()
                .map_err(StorageError::from)?
                .map(SubscriptionModifier::try_from)
                .transpose()?,
        };
        Ok(modifier)
    }

    fn list_history(&self, subscription_id: &str) -> Result<Vec<SubscriptionHistory>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = subscription_history::table
            .filter(subscription_history::subscription_id.eq(subscription_id))
            .order((
                subscription_history::timestamp.asc(),
                subscription_history::id.asc(),
            ))
            .select(SubscriptionHistoryDB::as_select())
            .load::<SubscriptionHistoryDB>(&mut conn)
            .map_err(StorageError::from)?;
        rows.into_iter()
            .map(|row| SubscriptionHistory::try_from(row).map_err(Into::into))
            .collect()
    }

    async fn save_synced(&self, snapshot: SubscriptionSnapshot) -> Result<Upserted<Subscription>> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Upserted<Subscription>> {
                let SubscriptionSnapshot {
                    subscription,
                    add_ons,
                    discounts,
                    history,
                } = snapshot;
                let sub_id = subscription.id.clone();

                let existing = subscriptions::table
                    .find(&sub_id)
                    .select(subscriptions::id)
                    .first::<String>(conn)
                    .optional()
                    .map_err(StorageError::from)?;

                let sub_db = SubscriptionDB::from(subscription.clone());
                diesel::insert_into(subscriptions::table)
                    .values(&sub_db)
                    .on_conflict(subscriptions::id)
                    .do_update()
                    .set(&sub_db)
                    .execute(conn)
                    .map_err(StorageError::from)?;

                let kept_add_ons: Vec<String> =
                    add_ons.iter().map(|m| m.modifier_id.clone()).collect();
                for add_on in add_ons {
                    upsert_add_on_row(conn, add_on)?;
                }
                let stale_add_ons = diesel::delete(
                    subscription_add_ons::table
                        .filter(subscription_add_ons::subscription_id.eq(&sub_id))
                        .filter(subscription_add_ons::add_on_id.ne_all(&kept_add_ons)),
                )
                .execute(conn)
                .map_err(StorageError::from)?;

                let kept_discounts: Vec<String> =
                    discounts.iter().map(|m| m.modifier_id.clone()).collect();
                for discount in discounts {
                    upsert_discount_row(conn, discount)?;
                }
                let stale_discounts = diesel::delete(
                    subscription_discounts::table
                        .filter(subscription_discounts::subscription_id.eq(&sub_id))
                        .filter(subscription_discounts::discount_id.ne_all(&kept_discounts)),
                )
                .execute(conn)
                .map_err(StorageError::from)?;

                if stale_add_ons + stale_discounts > 0 {
                    debug!(
                        "Removed {} add-on(s) and {} discount(s) no longer on subscription {}",
                        stale_add_ons, stale_discounts, sub_id
                    );
                }

                diesel::delete(
                    subscription_history::table
                        .filter(subscription_history::subscription_id.eq(&sub_id)),
                )
                .execute(conn)
                .map_err(StorageError::from)?;
                for event in history {
                    diesel::insert_into(subscription_history::table)
                        .values(&NewSubscriptionHistoryDB::from(event))
                        .execute(conn)
                        .map_err(StorageError::from)?;
                }

                Ok(Upserted {
                    record: subscription,
                    created: existing.is_none(),
                })
            })
            .await
    }

    async fn upsert_modifier(
        &self,
        modifier: NewSubscriptionModifier,
    ) -> Result<SubscriptionModifier> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<SubscriptionModifier> {
                match modifier.kind {
                    ModifierKind::AddOn => upsert_add_on_row(conn, modifier),
                    ModifierKind::Discount => upsert_discount_row(conn, modifier),
                }
            })
            .await
    }

    async fn delete_modifier(
        &self,
        subscription_id: &str,
        kind: ModifierKind,
        modifier_id: &str,
    ) -> Result<usize> {
        let subscription_id = subscription_id.to_string();
        let modifier_id = modifier_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                let deleted = match kind {
                    ModifierKind::AddOn => diesel::delete(
                        subscription_add_ons::table
                            .filter(subscription_add_ons::subscription_id.eq(&subscription_id))
                            .filter(subscription_add_ons::add_on_id.eq(&modifier_id)),
                    )
                    .execute(conn),
                    ModifierKind::Discount => diesel::delete(
                        subscription_discounts::table
                            .filter(subscription_discounts::subscription_id.eq(&subscription_id))
                            .filter(subscription_discounts::discount_id.eq(&modifier_id)),
                    )
                    .execute(conn),
                };
                Ok(deleted.map_err(StorageError::from)?)
            })
            .await
    }
}
