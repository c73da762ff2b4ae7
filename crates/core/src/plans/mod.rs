//! Plan catalogue: plans, add-ons and discounts.

mod plans_model;
mod plans_service;
mod plans_traits;

pub use plans_model::*;
pub use plans_service::*;
pub use plans_traits::*;
