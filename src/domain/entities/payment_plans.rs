use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    domain::value_objects::payment_plans::{admits_payment, outstanding_balance},
    infrastructure::postgres::schema::payment_plans,
};

#[derive(Debug, Clone, PartialEq, Identifiable, Selectable, Queryable)]
#[diesel(table_name = payment_plans)]
pub struct PaymentPlanEntity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub property_id: Uuid,
    pub plan_type: String,
    pub total_amount: Decimal,
    /// Cached sum of successful ledger entries. Written only by recompute.
    pub amount_paid: Decimal,
    pub installments: i32,
    pub next_due_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl PaymentPlanEntity {
    pub fn balance(&self) -> Decimal {
        outstanding_balance(self.total_amount, self.amount_paid)
    }

    pub fn admits(&self, amount: Decimal) -> bool {
        admits_payment(self.total_amount, self.amount_paid, amount)
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = payment_plans)]
pub struct InsertPaymentPlanEntity {
    pub user_id: Uuid,
    pub property_id: Uuid,
    pub plan_type: String,
    pub total_amount: Decimal,
    pub amount_paid: Decimal,
    pub installments: i32,
    pub next_due_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

/// A plan joined with the title of the property it pays for.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentPlanListingEntity {
    pub plan: PaymentPlanEntity,
    pub property_title: String,
}
