//! Braintree API client.
//!
//! Every call is XML over HTTPS against `{base}/merchants/{merchant_id}`,
//! authenticated with the merchant's public/private key pair.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use log::{debug, error};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use btmirror_core::gateway::wire::{self, TypedArray};
use btmirror_core::gateway::{
    CreditCardUpdateRequest, CustomerUpdateRequest, GatewayClientTrait, RemoteCreditCard,
    RemoteCustomer, RemoteModifier, RemotePlan, RemoteSubscription, SubscriptionUpdateRequest,
};

use crate::config::BraintreeConfig;
use crate::error::{BraintreeError, Result};

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const API_VERSION: &str = "6";
const MAX_LOG_BODY_CHARS: usize = 512;
const XML: &str = "application/xml";

#[derive(Deserialize)]
struct SubscriptionPage {
    #[serde(rename = "subscription", default)]
    subscriptions: Vec<RemoteSubscription>,
}

#[derive(Deserialize)]
struct PlanList {
    #[serde(rename = "plan", default)]
    plans: Vec<RemotePlan>,
}

#[derive(Deserialize)]
struct AddOnList {
    #[serde(rename = "add-on", default)]
    add_ons: Vec<RemoteModifier>,
}

#[derive(Deserialize)]
struct DiscountList {
    #[serde(rename = "discount", default)]
    discounts: Vec<RemoteModifier>,
}

/// Answer to `advanced_search_ids`: every matching id, and how many the
/// gateway returns per `advanced_search` call.
#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
struct SearchResults {
    #[serde(deserialize_with = "wire::text")]
    page_size: usize,
    #[serde(default, deserialize_with = "wire::array")]
    ids: Vec<String>,
}

#[derive(Serialize)]
struct IdSearch<'a> {
    ids: TypedArray<'a, String>,
}

impl<'a> IdSearch<'a> {
    fn new(ids: &'a [String]) -> Self {
        Self {
            ids: TypedArray::new("item", ids),
        }
    }
}

#[derive(Deserialize)]
struct ApiErrorResponse {
    message: String,
}

/// Identifies the resource a request targets, for 404 mapping.
struct Target<'a> {
    resource: &'static str,
    id: Option<&'a str>,
}

impl<'a> Target<'a> {
    fn one(resource: &'static str, id: &'a str) -> Self {
        Self {
            resource,
            id: Some(id),
        }
    }

    fn all(resource: &'static str) -> Self {
        Self { resource, id: None }
    }
}

#[derive(Debug, Clone)]
pub struct BraintreeClient {
    client: reqwest::Client,
    merchant_url: String,
}

impl BraintreeClient {
    pub fn new(config: &BraintreeConfig) -> Result<Self> {
        let credentials = BASE64.encode(format!("{}:{}", config.public_key, config.private_key));
        let mut auth_value = HeaderValue::from_str(&format!("Basic {}", credentials))
            .map_err(|_| BraintreeError::auth("Invalid Braintree key format"))?;
        auth_value.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth_value);
        headers.insert(ACCEPT, HeaderValue::from_static(XML));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(XML));
        headers.insert("X-ApiVersion", HeaderValue::from_static(API_VERSION));

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            merchant_url: config.merchant_url(),
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}/{}", self.merchant_url, path);
        debug!("Braintree {} {}", method, url);
        self.client.request(method, url)
    }

    /// Builds a request carrying `value` as the XML document `<root>`.
    fn request_with<T: Serialize>(
        &self,
        method: Method,
        path: &str,
        root: &str,
        value: &T,
    ) -> Result<RequestBuilder> {
        let body = quick_xml::se::to_string_with_root(root, value)?;
        Ok(self.request(method, path).body(body))
    }

    fn log_response(status: StatusCode, body: &str) {
        if status.is_success() {
            debug!("Braintree response status: {}", status);
            return;
        }

        let mut preview = body.chars().take(MAX_LOG_BODY_CHARS).collect::<String>();
        if body.chars().count() > MAX_LOG_BODY_CHARS {
            preview.push_str("...");
        }
        debug!("Braintree response error ({}): {}", status, preview);
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder, target: Target<'_>) -> Result<T> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        Self::log_response(status, &body);

        match status {
            StatusCode::NOT_FOUND => {
                if let Some(id) = target.id {
                    return Err(BraintreeError::NotFound {
                        resource: target.resource,
                        id: id.to_string(),
                    });
                }
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(BraintreeError::auth(format!(
                    "Gateway rejected credentials ({})",
                    status.as_u16()
                )));
            }
            _ => {}
        }

        if !status.is_success() {
            if let Ok(response) = quick_xml::de::from_str::<ApiErrorResponse>(&body) {
                return Err(BraintreeError::api(status.as_u16(), response.message));
            }
            return Err(BraintreeError::api(
                status.as_u16(),
                format!("Request failed: {}", body),
            ));
        }

        quick_xml::de::from_str(&body).map_err(|e| {
            error!(
                "Failed to deserialize {} response. Body: {}, Error: {}",
                target.resource, body, e
            );
            BraintreeError::from(e)
        })
    }

    pub async fn get_customer(&self, customer_id: &str) -> Result<RemoteCustomer> {
        let path = format!("customers/{}", urlencoding::encode(customer_id));
        self.send(
            self.request(Method::GET, &path),
            Target::one("customer", customer_id),
        )
        .await
    }

    pub async fn put_customer(
        &self,
        customer_id: &str,
        update: &CustomerUpdateRequest,
    ) -> Result<RemoteCustomer> {
        let path = format!("customers/{}", urlencoding::encode(customer_id));
        self.send(
            self.request_with(Method::PUT, &path, "customer", update)?,
            Target::one("customer", customer_id),
        )
        .await
    }

    pub async fn get_credit_card(&self, token: &str) -> Result<RemoteCreditCard> {
        let path = format!("payment_methods/credit_card/{}", urlencoding::encode(token));
        self.send(
            self.request(Method::GET, &path),
            Target::one("credit card", token),
        )
        .await
    }

    pub async fn put_credit_card(
        &self,
        token: &str,
        update: &CreditCardUpdateRequest,
    ) -> Result<RemoteCreditCard> {
        let path = format!("payment_methods/credit_card/{}", urlencoding::encode(token));
        self.send(
            self.request_with(Method::PUT, &path, "credit-card", update)?,
            Target::one("credit card", token),
        )
        .await
    }

    pub async fn get_subscription(&self, subscription_id: &str) -> Result<RemoteSubscription> {
        let path = format!("subscriptions/{}", urlencoding::encode(subscription_id));
        self.send(
            self.request(Method::GET, &path),
            Target::one("subscription", subscription_id),
        )
        .await
    }

    /// Resolves `ids` to the subscriptions that exist, the way the SDKs do:
    /// `advanced_search_ids` for the matching ids and page size, then one
    /// `advanced_search` per page. Unknown ids are simply absent.
    pub async fn search_subscriptions_by_id(
        &self,
        ids: &[String],
    ) -> Result<Vec<RemoteSubscription>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let results: SearchResults = self
            .send(
                self.request_with(
                    Method::POST,
                    "subscriptions/advanced_search_ids",
                    "search",
                    &IdSearch::new(ids),
                )?,
                Target::all("subscription ids"),
            )
            .await?;
        debug!(
            "Braintree matched {} of {} subscription ids, page size {}",
            results.ids.len(),
            ids.len(),
            results.page_size
        );

        let mut subscriptions = Vec::with_capacity(results.ids.len());
        for page in results.ids.chunks(results.page_size.max(1)) {
            let found: SubscriptionPage = self
                .send(
                    self.request_with(
                        Method::POST,
                        "subscriptions/advanced_search",
                        "search",
                        &IdSearch::new(page),
                    )?,
                    Target::all("subscriptions"),
                )
                .await?;
            subscriptions.extend(found.subscriptions);
        }
        Ok(subscriptions)
    }

    pub async fn put_subscription(
        &self,
        subscription_id: &str,
        update: &SubscriptionUpdateRequest,
    ) -> Result<RemoteSubscription> {
        let path = format!("subscriptions/{}", urlencoding::encode(subscription_id));
        self.send(
            self.request_with(Method::PUT, &path, "subscription", update)?,
            Target::one("subscription", subscription_id),
        )
        .await
    }

    pub async fn cancel(&self, subscription_id: &str) -> Result<RemoteSubscription> {
        let path = format!("subscriptions/{}/cancel", urlencoding::encode(subscription_id));
        self.send(
            self.request(Method::PUT, &path),
            Target::one("subscription", subscription_id),
        )
        .await
    }

    pub async fn get_plans(&self) -> Result<Vec<RemotePlan>> {
        let list: PlanList = self
            .send(self.request(Method::GET, "plans"), Target::all("plans"))
            .await?;
        Ok(list.plans)
    }

    pub async fn get_add_ons(&self) -> Result<Vec<RemoteModifier>> {
        let list: AddOnList = self
            .send(self.request(Method::GET, "add_ons"), Target::all("add-ons"))
            .await?;
        Ok(list.add_ons)
    }

    pub async fn get_discounts(&self) -> Result<Vec<RemoteModifier>> {
        let list: DiscountList = self
            .send(self.request(Method::GET, "discounts"), Target::all("discounts"))
            .await?;
        Ok(list.discounts)
    }
}

#[async_trait]
impl GatewayClientTrait for BraintreeClient {
    async fn find_customer(&self, customer_id: &str) -> btmirror_core::Result<RemoteCustomer> {
        Ok(self.get_customer(customer_id).await?)
    }

    async fn update_customer(
        &self,
        customer_id: &str,
        update: &CustomerUpdateRequest,
    ) -> btmirror_core::Result<RemoteCustomer> {
        Ok(self.put_customer(customer_id, update).await?)
    }

    async fn find_credit_card(&self, token: &str) -> btmirror_core::Result<RemoteCreditCard> {
        Ok(self.get_credit_card(token).await?)
    }

    async fn update_credit_card(
        &self,
        token: &str,
        update: &CreditCardUpdateRequest,
    ) -> btmirror_core::Result<RemoteCreditCard> {
        Ok(self.put_credit_card(token, update).await?)
    }

    async fn find_subscription(
        &self,
        subscription_id: &str,
    ) -> btmirror_core::Result<RemoteSubscription> {
        Ok(self.get_subscription(subscription_id).await?)
    }

    async fn search_subscriptions(
        &self,
        ids: &[String],
    ) -> btmirror_core::Result<Vec<RemoteSubscription>> {
        Ok(self.search_subscriptions_by_id(ids).await?)
    }

    async fn update_subscription(
        &self,
        subscription_id: &str,
        update: &SubscriptionUpdateRequest,
    ) -> btmirror_core::Result<RemoteSubscription> {
        Ok(self.put_subscription(subscription_id, update).await?)
    }

    async fn cancel_subscription(
        &self,
        subscription_id: &str,
    ) -> btmirror_core::Result<RemoteSubscription> {
        Ok(self.cancel(subscription_id).await?)
    }

    async fn list_plans(&self) -> btmirror_core::Result<Vec<RemotePlan>> {
        Ok(self.get_plans().await?)
    }

    async fn list_add_ons(&self) -> btmirror_core::Result<Vec<RemoteModifier>> {
        Ok(self.get_add_ons().await?)
    }

    async fn list_discounts(&self) -> btmirror_core::Result<Vec<RemoteModifier>> {
        Ok(self.get_discounts().await?)
    }
}
