use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::domain::{
    entities::{
        payment_plans::{PaymentPlanEntity, PaymentPlanListingEntity},
        payments::PaymentEntity,
    },
    value_objects::amounts::zero_amount,
};

/// `total_amount - amount_paid`, never negative.
pub fn outstanding_balance(total_amount: Decimal, amount_paid: Decimal) -> Decimal {
    (total_amount - amount_paid).max(zero_amount())
}

/// Whether a plan with the given figures can take `amount` more without
/// `amount_paid` exceeding `total_amount`.
pub fn admits_payment(total_amount: Decimal, amount_paid: Decimal, amount: Decimal) -> bool {
    amount_paid + amount <= total_amount
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListPaymentPlansFilter {
    pub plan_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
}

/// Result of a ledger write performed under the plan lock.
#[derive(Debug, Clone, PartialEq)]
pub enum LedgerWriteOutcome {
    Applied {
        plan: PaymentPlanEntity,
        payment: PaymentEntity,
    },
    PlanNotFound,
    PaymentNotFound,
    Overpayment {
        amount_paid: Decimal,
        requested: Decimal,
        total_amount: Decimal,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PropertySummaryDto {
    pub id: Uuid,
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaymentPlanDto {
    pub id: Uuid,
    pub user: Uuid,
    pub property: PropertySummaryDto,
    pub plan_type: String,
    pub total_amount: Decimal,
    pub amount_paid: Decimal,
    pub balance: Decimal,
    pub installments: i32,
    pub next_due_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl From<PaymentPlanListingEntity> for PaymentPlanDto {
    fn from(value: PaymentPlanListingEntity) -> Self {
        let balance = value.plan.balance();
        let plan = value.plan;

        Self {
            id: plan.id,
            user: plan.user_id,
            property: PropertySummaryDto {
                id: plan.property_id,
                title: value.property_title,
            },
            plan_type: plan.plan_type,
            total_amount: plan.total_amount,
            amount_paid: plan.amount_paid,
            balance,
            installments: plan.installments,
            next_due_date: plan.next_due_date,
            created_at: plan.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePaymentPlanModel {
    pub property_id: Uuid,
    pub plan_type: String,
    #[serde(default)]
    pub total_amount: Value,
    pub installments: i64,
    #[serde(default)]
    pub next_due_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MakePaymentModel {
    #[serde(default)]
    pub amount: Value,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub reference: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MakePaymentResponse {
    pub message: String,
    pub new_balance: Decimal,
}
