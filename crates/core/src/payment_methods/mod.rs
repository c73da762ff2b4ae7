//! Vaulted payment methods (credit cards).

mod payment_methods_model;
mod payment_methods_service;
mod payment_methods_traits;

pub use payment_methods_model::*;
pub use payment_methods_service::*;
pub use payment_methods_traits::*;
