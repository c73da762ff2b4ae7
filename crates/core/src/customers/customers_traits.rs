use async_trait::async_trait;

use super::{Address, Customer};
use crate::errors::Result;
use crate::gateway::{CustomerUpdateRequest, RemoteCustomer};
use crate::sync::Upserted;

/// Persistence for mirrored customers and their addresses.
#[async_trait]
pub trait CustomerRepositoryTrait: Send + Sync {
    fn get_by_id(&self, customer_id: &str) -> Result<Option<Customer>>;
    fn list(&self) -> Result<Vec<Customer>>;
    fn list_addresses(&self, customer_id: &str) -> Result<Vec<Address>>;

    /// Inserts or updates the customer row and the given addresses in one transaction.
    async fn upsert(&self, customer: Customer, addresses: Vec<Address>)
        -> Result<Upserted<Customer>>;
}

#[async_trait]
pub trait CustomerServiceTrait: Send + Sync {
    /// Returns the local customer or `Error::NotFound`.
    fn get_customer(&self, customer_id: &str) -> Result<Customer>;
    fn list_customers(&self) -> Result<Vec<Customer>>;
    fn list_addresses(&self, customer_id: &str) -> Result<Vec<Address>>;

    /// Upserts the local mirror of a customer already fetched from the gateway.
    async fn upsert_from_remote(&self, remote: RemoteCustomer) -> Result<Upserted<Customer>>;

    /// Fetches the customer from the gateway and upserts it.
    async fn sync_customer(&self, customer_id: &str) -> Result<Upserted<Customer>>;

    /// Returns the local customer, syncing it from the gateway when absent.
    async fn get_or_sync(&self, customer_id: &str) -> Result<Customer>;

    /// Writes the change to the gateway and mirrors the gateway's answer.
    async fn update_customer(
        &self,
        customer_id: &str,
        update: CustomerUpdateRequest,
    ) -> Result<Customer>;
}
