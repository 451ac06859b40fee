pub mod payment_plans;
pub mod payments;
pub mod properties;
pub mod users;
