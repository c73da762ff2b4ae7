//! Payment gateway seam: remote resource types and the client trait.

mod gateway_model;
mod gateway_traits;
pub mod wire;

pub use gateway_model::*;
pub use gateway_traits::*;
