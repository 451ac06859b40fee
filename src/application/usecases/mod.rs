pub mod payment_plans;
pub mod reports;
