//! Sync bookkeeping types and the whole-mirror refresh.

mod mirror_sync_service;
mod sync_model;

pub use mirror_sync_service::*;
pub use sync_model::*;

#[cfg(test)]
mod tests;
