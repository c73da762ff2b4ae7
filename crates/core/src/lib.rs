//! Domain core of the Braintree mirror.
//!
//! Holds the mirrored entity models, the repository and gateway traits the
//! storage and gateway crates implement, and the services that sync remote
//! objects and write mutations through to the gateway.

pub mod customers;
pub mod errors;
pub mod gateway;
pub mod payment_methods;
pub mod plans;
pub mod reporting;
pub mod subscriptions;
pub mod sync;

#[cfg(test)]
pub(crate) mod test_support;

pub use errors::{Error, Result};
