mod model;
mod repository;

pub use model::CreditCardDB;
pub use repository::PaymentMethodRepository;
