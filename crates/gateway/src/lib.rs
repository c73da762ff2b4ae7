//! Braintree gateway client for the mirror.

pub mod client;
pub mod config;
pub mod error;

pub use client::BraintreeClient;
pub use config::{BraintreeConfig, BraintreeEnvironment};
pub use error::{BraintreeError, Result};
