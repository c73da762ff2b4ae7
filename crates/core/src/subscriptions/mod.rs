//! Subscriptions, their add-on/discount rows and status history.

mod subscriptions_model;
mod subscriptions_service;
mod subscriptions_traits;

pub use subscriptions_model::*;
pub use subscriptions_service::*;
pub use subscriptions_traits::*;
