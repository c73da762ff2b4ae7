use async_trait::async_trait;

use super::CreditCard;
use crate::customers::Address;
use crate::errors::Result;
use crate::gateway::{CreditCardUpdateRequest, RemoteCreditCard};
use crate::sync::Upserted;

#[async_trait]
pub trait PaymentMethodRepositoryTrait: Send + Sync {
    fn get_by_token(&self, token: &str) -> Result<Option<CreditCard>>;
    fn list(&self) -> Result<Vec<CreditCard>>;
    fn list_for_customer(&self, customer_id: &str) -> Result<Vec<CreditCard>>;

    /// Upserts the card, and its billing address when given, in one transaction.
    async fn upsert(
        &self,
        card: CreditCard,
        billing_address: Option<Address>,
    ) -> Result<Upserted<CreditCard>>;
}

#[async_trait]
pub trait PaymentMethodServiceTrait: Send + Sync {
    fn get_credit_card(&self, token: &str) -> Result<CreditCard>;
    fn list_credit_cards(&self) -> Result<Vec<CreditCard>>;
    fn list_for_customer(&self, customer_id: &str) -> Result<Vec<CreditCard>>;

    /// Upserts a card fetched from the gateway, syncing its customer first if needed.
    async fn upsert_from_remote(&self, remote: RemoteCreditCard) -> Result<Upserted<CreditCard>>;
    async fn sync_credit_card(&self, token: &str) -> Result<Upserted<CreditCard>>;
    async fn get_or_sync(&self, token: &str) -> Result<CreditCard>;

    async fn update_credit_card(
        &self,
        token: &str,
        update: CreditCardUpdateRequest,
    ) -> Result<CreditCard>;
}
