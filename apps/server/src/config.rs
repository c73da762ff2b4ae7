//! Server configuration read from environment variables.

use std::net::SocketAddr;

use anyhow::{anyhow, Context, Result};
use btmirror_gateway::{BraintreeConfig, BraintreeEnvironment};

const DEFAULT_DATA_DIR: &str = "./data";
const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8080";
const DEFAULT_ADMIN_USER: &str = "admin";
const DEFAULT_LOG_FILTER: &str = "info,tower_http=info";

#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: String,
    pub listen_addr: SocketAddr,
    /// Bearer token required on `/api` routes.
    pub api_token: String,
    pub admin_user: String,
    /// The admin UI is disabled when unset.
    pub admin_password: Option<String>,
    pub braintree: BraintreeConfig,
    pub rust_log: String,
    pub log_json: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let require = |key: &str| get(key).ok_or_else(|| anyhow!("{} must be set", key));

        let listen_addr = get("BTMIRROR_LISTEN_ADDR")
            .unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string())
            .parse::<SocketAddr>()
            .context("BTMIRROR_LISTEN_ADDR is not a socket address")?;

        let environment = match get("BRAINTREE_ENVIRONMENT") {
            Some(value) => value.parse::<BraintreeEnvironment>()?,
            None => BraintreeEnvironment::default(),
        };
        let mut braintree = BraintreeConfig::new(
            environment,
            require("BRAINTREE_MERCHANT_ID")?,
            require("BRAINTREE_PUBLIC_KEY")?,
            require("BRAINTREE_PRIVATE_KEY")?,
        );
        if let Some(base_url) = get("BRAINTREE_BASE_URL") {
            braintree = braintree.with_base_url(base_url);
        }

        Ok(Self {
            data_dir: get("BTMIRROR_DATA_DIR").unwrap_or_else(|| DEFAULT_DATA_DIR.to_string()),
            listen_addr,
            api_token: require("BTMIRROR_API_TOKEN")?,
            admin_user: get("BTMIRROR_ADMIN_USER")
                .unwrap_or_else(|| DEFAULT_ADMIN_USER.to_string()),
            admin_password: get("BTMIRROR_ADMIN_PASSWORD"),
            braintree,
            rust_log: get("RUST_LOG").unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
            log_json: get("LOG_JSON")
                .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
        })
    }
}
