//! Customers and their addresses.

mod customers_model;
mod customers_service;
mod customers_traits;

pub use customers_model::*;
pub use customers_service::*;
pub use customers_traits::*;
