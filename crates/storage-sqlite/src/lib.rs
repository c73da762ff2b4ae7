//! SQLite persistence for the Braintree mirror.
//!
//! Repositories read through the r2d2 pool and send every write to the
//! single writer thread in [`db::write_actor`].

pub mod conversions;
pub mod customers;
pub mod db;
pub mod errors;
pub mod payment_methods;
pub mod plans;
pub mod schema;
pub mod subscriptions;

#[cfg(test)]
pub(crate) mod test_fixtures;

pub use customers::CustomerRepository;
pub use db::{create_pool, get_connection, init, run_migrations, spawn_writer, DbPool, WriteHandle};
pub use errors::StorageError;
pub use payment_methods::PaymentMethodRepository;
pub use plans::PlanRepository;
pub use subscriptions::SubscriptionRepository;
