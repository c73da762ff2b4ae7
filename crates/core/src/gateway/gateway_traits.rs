use async_trait::async_trait;

use super::{
    CreditCardUpdateRequest, CustomerUpdateRequest, RemoteCreditCard, RemoteCustomer,
    RemoteModifier, RemotePlan, RemoteSubscription, SubscriptionUpdateRequest,
};
use crate::errors::Result;

/// Remote operations the mirror needs from the payment gateway.
///
/// Implementations map their transport failures into `Error::Gateway`.
#[async_trait]
pub trait GatewayClientTrait: Send + Sync {
    async fn find_customer(&self, customer_id: &str) -> Result<RemoteCustomer>;
    async fn update_customer(
        &self,
        customer_id: &str,
        update: &CustomerUpdateRequest,
    ) -> Result<RemoteCustomer>;

    async fn find_credit_card(&self, token: &str) -> Result<RemoteCreditCard>;
    async fn update_credit_card(
        &self,
        token: &str,
        update: &CreditCardUpdateRequest,
    ) -> Result<RemoteCreditCard>;

    async fn find_subscription(&self, subscription_id: &str) -> Result<RemoteSubscription>;

    /// Fetches every subscription matching one of `ids`. Unknown ids are skipped.
    async fn search_subscriptions(&self, ids: &[String]) -> Result<Vec<RemoteSubscription>>;

    async fn update_subscription(
        &self,
        subscription_id: &str,
        update: &SubscriptionUpdateRequest,
    ) -> Result<RemoteSubscription>;
    async fn cancel_subscription(&self, subscription_id: &str) -> Result<RemoteSubscription>;

    async fn list_plans(&self) -> Result<Vec<RemotePlan>>;
    async fn list_add_ons(&self) -> Result<Vec<RemoteModifier>>;
    async fn list_discounts(&self) -> Result<Vec<RemoteModifier>>;
}
