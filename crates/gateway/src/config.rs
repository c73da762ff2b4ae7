use std::fmt;
use std::str::FromStr;

use crate::error::BraintreeError;

const SANDBOX_URL: &str = "https://api.sandbox.braintreegateway.com";
const PRODUCTION_URL: &str = "https://api.braintreegateway.com";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BraintreeEnvironment {
    #[default]
    Sandbox,
    Production,
}

impl BraintreeEnvironment {
    pub fn base_url(&self) -> &'static str {
        match self {
            Self::Sandbox => SANDBOX_URL,
            Self::Production => PRODUCTION_URL,
        }
    }
}

impl FromStr for BraintreeEnvironment {
    type Err = BraintreeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "sandbox" => Ok(Self::Sandbox),
            "production" => Ok(Self::Production),
            other => Err(BraintreeError::Config(format!(
                "Unknown Braintree environment '{}'",
                other
            ))),
        }
    }
}

/// Merchant credentials and endpoint selection.
#[derive(Clone)]
pub struct BraintreeConfig {
    pub environment: BraintreeEnvironment,
    pub merchant_id: String,
    pub public_key: String,
    pub private_key: String,
    /// Replaces the environment URL. Used for local gateway stubs.
    pub base_url: Option<String>,
}

impl BraintreeConfig {
    pub fn new(
        environment: BraintreeEnvironment,
        merchant_id: impl Into<String>,
        public_key: impl Into<String>,
        private_key: impl Into<String>,
    ) -> Self {
        Self {
            environment,
            merchant_id: merchant_id.into(),
            public_key: public_key.into(),
            private_key: private_key.into(),
            base_url: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// `{base}/merchants/{merchant_id}`, without a trailing slash.
    pub fn merchant_url(&self) -> String {
        let base = self
            .base_url
            .as_deref()
            .unwrap_or_else(|| self.environment.base_url())
            .trim_end_matches('/');
        format!(
            "{}/merchants/{}",
            base,
            urlencoding::encode(&self.merchant_id)
        )
    }
}

impl fmt::Debug for BraintreeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BraintreeConfig")
            .field("environment", &self.environment)
            .field("merchant_id", &self.merchant_id)
            .field("public_key", &self.public_key)
            .field("private_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}
