use async_trait::async_trait;
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::SqliteConnection;
use std::sync::Arc;

use btmirror_core::customers::Address;
use btmirror_core::payment_methods::{CreditCard, PaymentMethodRepositoryTrait};
use btmirror_core::sync::Upserted;
use btmirror_core::Result;

use super::model::CreditCardDB;
use crate::customers::upsert_address;
use crate::db::{get_connection, WriteHandle};
use crate::errors::StorageError;
use crate::schema::credit_cards;

pub struct PaymentMethodRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl PaymentMethodRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        PaymentMethodRepository { pool, writer }
    }

    fn load(&self, rows: Vec<CreditCardDB>) -> Result<Vec<CreditCard>> {
        rows.into_iter()
            .map(|row| CreditCard::try_from(row).map_err(Into::into))
            .collect()
    }
}

#[async_trait]
impl PaymentMethodRepositoryTrait for PaymentMethodRepository {
    fn get_by_token(&self, token: &str) -> Result<Option<CreditCard>> {
        let mut conn = get_connection(&self.pool)?;
        let row = credit_cards::table
            .find(token)
            .select(CreditCardDB::as_select())
            .first::<CreditCardDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        Ok(row.map(CreditCard::try_from).transpose()?)
    }

    fn list(&self) -> Result<Vec<CreditCard>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = credit_cards::table
            .order(credit_cards::created_at.desc())
            .select(CreditCardDB::as_select())
            .load::<CreditCardDB>(&mut conn)
            .map_err(StorageError::from)?;
        self.load(rows)
    }

    fn list_for_customer(&self, customer_id: &str) -> Result<Vec<CreditCard>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = credit_cards::table
            .filter(credit_cards::customer_id.eq(customer_id))
            .order(credit_cards::created_at.desc())
            .select(CreditCardDB::as_select())
            .load::<CreditCardDB>(&mut conn)
            .map_err(StorageError::from)?;
        self.load(rows)
    }

    async fn upsert(
        &self,
        card: CreditCard,
        billing_address: Option<Address>,
    ) -> Result<Upserted<CreditCard>> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Upserted<CreditCard>> {
                if let Some(address) = billing_address {
                    upsert_address(conn, address)?;
                }

                let existing = credit_cards::table
                    .find(&card.token)
                    .select(credit_cards::token)
                    .first::<String>(conn)
                    .optional()
                    .map_err(StorageError::from)?;

                let card_db = CreditCardDB::from(card.clone());
                diesel::insert_into(credit_cards::table)
                    .values(&card_db)
                    .on_conflict(credit_cards::token)
                    .do_update()
                    .set(&card_db)
                    .execute(conn)
                    .map_err(StorageError::from)?;

                Ok(Upserted {
                    record: card,
                    created: existing.is_none(),
                })
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::customers::CustomerRepository;
    use crate::db::setup_test_db;
    use crate::test_fixtures::{address, credit_card, customer};
    use btmirror_core::customers::CustomerRepositoryTrait;
    use btmirror_core::payment_methods::YesNoUnknown;

    #[tokio::test]
    async fn card_round_trips_with_billing_address() {
        let (_dir, pool, writer) = setup_test_db();
        let customers = CustomerRepository::new(pool.clone(), writer.clone());
        let repo = PaymentMethodRepository::new(pool, writer);
        customers.upsert(customer("c1"), Vec::new()).await.unwrap();

        let mut card = credit_card("tok-1", "c1");
        card.billing_address_id = Some("b1".to_string());
        card.prepaid = YesNoUnknown::Yes;
        let result = repo
            .upsert(card.clone(), Some(address("b1", "c1")))
            .await
            .unwrap();

        assert!(result.created);
        assert_eq!(repo.get_by_token("tok-1").unwrap(), Some(card));
        assert_eq!(customers.list_addresses("c1").unwrap().len(), 1);
    }

    #[tokio::test]
    async fn second_upsert_updates_in_place() {
        let (_dir, pool, writer) = setup_test_db();
        let customers = CustomerRepository::new(pool.clone(), writer.clone());
        let repo = PaymentMethodRepository::new(pool, writer);
        customers.upsert(customer("c2"), Vec::new()).await.unwrap();

        repo.upsert(credit_card("tok-2", "c2"), None).await.unwrap();
        let mut renewed = credit_card("tok-2", "c2");
        renewed.expiration_year = "2032".to_string();
        renewed.expiration_date = "12/2032".to_string();
        let result = repo.upsert(renewed.clone(), None).await.unwrap();

        assert!(!result.created);
        assert_eq!(repo.list_for_customer("c2").unwrap(), vec![renewed]);
        assert!(repo.list_for_customer("other").unwrap().is_empty());
    }

    #[tokio::test]
    async fn card_for_unknown_customer_is_rejected() {
        let (_dir, pool, writer) = setup_test_db();
        let repo = PaymentMethodRepository::new(pool, writer);

        assert!(repo.upsert(credit_card("tok-3", "ghost"), None).await.is_err());
        assert_eq!(repo.get_by_token("tok-3").unwrap(), None);
    }
}
