mod model;
mod repository;

pub use model::{AddressDB, CustomerDB};
pub use repository::CustomerRepository;
pub(crate) use repository::upsert_address;
