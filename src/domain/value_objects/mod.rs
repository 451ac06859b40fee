pub mod amounts;
pub mod enums;
pub mod iam;
pub mod payment_plans;
pub mod payments;
pub mod reports;
