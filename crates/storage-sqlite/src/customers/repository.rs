use async_trait::async_trait;
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::SqliteConnection;
use std::sync::Arc;

use btmirror_core::customers::{Address, Customer, CustomerRepositoryTrait};
use btmirror_core::sync::Upserted;
use btmirror_core::Result;

use super::model::{AddressDB, CustomerDB};
use crate::db::{get_connection, WriteHandle};
use crate::errors::StorageError;
use crate::schema::{addresses, customers};

/// Inserts or updates one address row. Shared with the credit card repository
/// for billing addresses.
pub(crate) fn upsert_address(conn: &mut SqliteConnection, address: Address) -> Result<()> {
    let address_db = AddressDB::from(address);
    diesel::insert_into(addresses::table)
        .values(&address_db)
        .on_conflict(addresses::id)
        .do_update()
        .set(&address_db)
        .execute(conn)
        .map_err(StorageError::from)?;
    Ok(())
}

pub struct CustomerRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl CustomerRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        CustomerRepository { pool, writer }
    }
}

#[async_trait]
impl CustomerRepositoryTrait for CustomerRepository {
    fn get_by_id(&self, customer_id: &str) -> Result<Option<Customer>> {
        let mut conn = get_connection(&self.pool)?;
        let row = customers::table
            .find(customer_id)
            .select(CustomerDB::as_select())
            .first::<CustomerDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        Ok(row.map(Customer::try_from).transpose()?)
    }

    fn list(&self) -> Result<Vec<Customer>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = customers::table
            .order(customers::created_at.desc())
            .select(CustomerDB::as_select())
            .load::<CustomerDB>(&mut conn)
            .map_err(StorageError::from)?;
        rows.into_iter()
            .map(|row| Customer::try_from(row).map_err(Into::into))
            .collect()
    }

    fn list_addresses(&self, customer_id: &str) -> Result<Vec<Address>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = addresses::table
            .filter(addresses::customer_id.eq(customer_id))
            .order(addresses::created_at.asc())
            .select(AddressDB::as_select())
            .load::<AddressDB>(&mut conn)
            .map_err(StorageError::from)?;
        rows.into_iter()
            .map(|row| Address::try_from(row).map_err(Into::into))
            .collect()
    }

    async fn upsert(
        &self,
        customer: Customer,
        customer_addresses: Vec<Address>,
    ) -> Result<Upserted<Customer>> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Upserted<Customer>> {
                let existing = customers::table
                    .find(&customer.id)
                    .select(customers::id)
                    .first::<String>(conn)
                    .optional()
                    .map_err(StorageError::from)?;

                let customer_db = CustomerDB::from(customer.clone());
                diesel::insert_into(customers::table)
                    .values(&customer_db)
                    .on_conflict(customers::id)
                    .do_update()
                    .set(&customer_db)
                    .execute(conn)
                    .map_err(StorageError::from)?;

                for address in customer_addresses {
                    upsert_address(conn, address)?;
                }

                Ok(Upserted {
                    record: customer,
                    created: existing.is_none(),
                })
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::setup_test_db;
    use crate::test_fixtures::{address, customer};

    #[tokio::test]
    async fn upsert_twice_reports_created_then_updated() {
        let (_dir, pool, writer) = setup_test_db();
        let repo = CustomerRepository::new(pool, writer);

        let first = repo
            .upsert(customer("c1"), vec![address("a1", "c1")])
            .await
            .unwrap();
        let second = repo
            .upsert(customer("c1"), vec![address("a1", "c1")])
            .await
            .unwrap();

        assert!(first.created);
        assert!(!second.created);
        assert_eq!(repo.list().unwrap(), vec![customer("c1")]);
        assert_eq!(repo.list_addresses("c1").unwrap(), vec![address("a1", "c1")]);
    }

    #[tokio::test]
    async fn upsert_overwrites_fields_and_clears_nulls() {
        let (_dir, pool, writer) = setup_test_db();
        let repo = CustomerRepository::new(pool, writer);
        repo.upsert(customer("c2"), Vec::new()).await.unwrap();

        let mut changed = customer("c2");
        changed.company = None;
        changed.phone = Some("555-0199".to_string());
        repo.upsert(changed.clone(), Vec::new()).await.unwrap();

        assert_eq!(repo.get_by_id("c2").unwrap(), Some(changed));
    }

    #[tokio::test]
    async fn address_for_unknown_customer_rolls_back() {
        let (_dir, pool, writer) = setup_test_db();
        let repo = CustomerRepository::new(pool, writer);

        let result = repo
            .upsert(customer("c3"), vec![address("a3", "ghost")])
            .await;

        assert!(result.is_err());
        assert_eq!(repo.get_by_id("c3").unwrap(), None);
    }
}
