use async_trait::async_trait;
use log::{info, warn};
use std::sync::Arc;

use super::{CreditCard, PaymentMethodRepositoryTrait, PaymentMethodServiceTrait};
use crate::customers::{Address, CustomerServiceTrait};
use crate::errors::{Error, Result};
use crate::gateway::{CreditCardUpdateRequest, GatewayClientTrait, RemoteCreditCard};
use crate::sync::Upserted;

pub struct PaymentMethodService {
    repository: Arc<dyn PaymentMethodRepositoryTrait>,
    customer_service: Arc<dyn CustomerServiceTrait>,
    gateway: Arc<dyn GatewayClientTrait>,
}

impl PaymentMethodService {
    pub fn new(
        repository: Arc<dyn PaymentMethodRepositoryTrait>,
        customer_service: Arc<dyn CustomerServiceTrait>,
        gateway: Arc<dyn GatewayClientTrait>,
    ) -> Self {
        Self {
            repository,
            customer_service,
            gateway,
        }
    }
}

#[async_trait]
impl PaymentMethodServiceTrait for PaymentMethodService {
    fn get_credit_card(&self, token: &str) -> Result<CreditCard> {
        self.repository
            .get_by_token(token)?
            .ok_or_else(|| Error::not_found("CreditCard", token))
    }

    fn list_credit_cards(&self) -> Result<Vec<CreditCard>> {
        self.repository.list()
    }

    fn list_for_customer(&self, customer_id: &str) -> Result<Vec<CreditCard>> {
        self.repository.list_for_customer(customer_id)
    }

    async fn upsert_from_remote(&self, remote: RemoteCreditCard) -> Result<Upserted<CreditCard>> {
        let customer = self.customer_service.get_or_sync(&remote.customer_id).await?;

        let billing_address = match remote.billing_address.as_ref() {
            Some(address) => {
                let mut address = Address::from(address);
                if address.customer_id.is_empty() {
                    address.customer_id = customer.id.clone();
                }
                Some(address)
            }
            None => {
                warn!("no address for CC for customer {}", remote.customer_id);
                None
            }
        };

        let mut card = CreditCard::from(&remote);
        card.customer_id = customer.id;
        self.repository.upsert(card, billing_address).await
    }

    async fn sync_credit_card(&self, token: &str) -> Result<Upserted<CreditCard>> {
        let remote = self.gateway.find_credit_card(token).await?;
        let result = self.upsert_from_remote(remote).await?;
        info!(
            "Synced credit card {} ({})",
            token,
            if result.created { "created" } else { "updated" }
        );
        Ok(result)
    }

    async fn get_or_sync(&self, token: &str) -> Result<CreditCard> {
        if let Some(card) = self.repository.get_by_token(token)? {
            return Ok(card);
        }
        Ok(self.sync_credit_card(token).await?.record)
    }

    async fn update_credit_card(
        &self,
        token: &str,
        update: CreditCardUpdateRequest,
    ) -> Result<CreditCard> {
        if update.is_empty() {
            return Err(Error::validation("Credit card update contains no changes"));
        }

        let remote = self.gateway.update_credit_card(token, &update).await?;
        Ok(self.upsert_from_remote(remote).await?.record)
    }
}
