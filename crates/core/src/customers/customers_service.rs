use async_trait::async_trait;
use log::{debug, info};
use std::sync::Arc;

use super::{Address, Customer, CustomerRepositoryTrait, CustomerServiceTrait};
use crate::errors::{Error, Result};
use crate::gateway::{CustomerUpdateRequest, GatewayClientTrait, RemoteCustomer};
use crate::sync::Upserted;

pub struct CustomerService {
    repository: Arc<dyn CustomerRepositoryTrait>,
    gateway: Arc<dyn GatewayClientTrait>,
}

impl CustomerService {
    pub fn new(
        repository: Arc<dyn CustomerRepositoryTrait>,
        gateway: Arc<dyn GatewayClientTrait>,
    ) -> Self {
        Self {
            repository,
            gateway,
        }
    }
}

#[async_trait]
impl CustomerServiceTrait for CustomerService {
    fn get_customer(&self, customer_id: &str) -> Result<Customer> {
        self.repository
            .get_by_id(customer_id)?
            .ok_or_else(|| Error::not_found("Customer", customer_id))
    }

    fn list_customers(&self) -> Result<Vec<Customer>> {
        self.repository.list()
    }

    fn list_addresses(&self, customer_id: &str) -> Result<Vec<Address>> {
        self.repository.list_addresses(customer_id)
    }

    async fn upsert_from_remote(&self, remote: RemoteCustomer) -> Result<Upserted<Customer>> {
        let customer = Customer::from(&remote);
        let addresses = remote
            .addresses
            .iter()
            .map(|address| {
                let mut address = Address::from(address);
                // Embedded addresses sometimes omit their owner.
                if address.customer_id.is_empty() {
                    address.customer_id = customer.id.clone();
                }
                address
            })
            .collect::<Vec<_>>();

        debug!(
            "Upserting customer {} with {} address(es)",
            customer.id,
            addresses.len()
        );
        self.repository.upsert(customer, addresses).await
    }

    async fn sync_customer(&self, customer_id: &str) -> Result<Upserted<Customer>> {
        let remote = self.gateway.find_customer(customer_id).await?;
        let result = self.upsert_from_remote(remote).await?;
        info!(
            "Synced customer {} ({})",
            customer_id,
            if result.created { "created" } else { "updated" }
        );
        Ok(result)
    }

    async fn get_or_sync(&self, customer_id: &str) -> Result<Customer> {
        if let Some(customer) = self.repository.get_by_id(customer_id)? {
            return Ok(customer);
        }
        Ok(self.sync_customer(customer_id).await?.record)
    }

    async fn update_customer(
        &self,
        customer_id: &str,
        update: CustomerUpdateRequest,
    ) -> Result<Customer> {
        if update.is_empty() {
            return Err(Error::validation("Customer update contains no changes"));
        }

        let remote = self.gateway.update_customer(customer_id, &update).await?;
        Ok(self.upsert_from_remote(remote).await?.record)
    }
}
