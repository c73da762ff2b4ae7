mod model;
mod repository;

pub use model::{
    NewSubscriptionAddOnDB, NewSubscriptionDiscountDB, NewSubscriptionHistoryDB,
    SubscriptionAddOnDB, SubscriptionDB, SubscriptionDiscountDB, SubscriptionHistoryDB,
};
pub use repository::SubscriptionRepository;
