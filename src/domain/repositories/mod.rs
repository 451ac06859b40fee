pub mod payment_plans;
pub mod payments;
pub mod reports;
