mod model;
mod repository;

pub use model::{AddOnDB, DiscountDB, PlanAddOnDB, PlanDB, PlanDiscountDB};
pub use repository::PlanRepository;
