use chrono::{DateTime, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    domain::value_objects::enums::payment_statuses::PaymentStatus,
    infrastructure::postgres::schema::payments,
};

#[derive(Debug, Clone, PartialEq, Identifiable, Selectable, Queryable)]
#[diesel(table_name = payments)]
pub struct PaymentEntity {
    pub id: Uuid,
    pub payment_plan_id: Uuid,
    pub amount: Decimal,
    pub payment_date: DateTime<Utc>,
    pub method: String,
    pub reference: Option<String>,
    pub status: String,
}

impl PaymentEntity {
    /// Stored status. Rows outside the known set never count as paid.
    pub fn current_status(&self) -> PaymentStatus {
        PaymentStatus::from_str(&self.status).unwrap_or(PaymentStatus::Pending)
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = payments)]
pub struct InsertPaymentEntity {
    pub payment_plan_id: Uuid,
    pub amount: Decimal,
    pub payment_date: DateTime<Utc>,
    pub method: String,
    pub reference: Option<String>,
    pub status: String,
}

/// Ledger row joined with the plan, owner and property it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct RecentPaymentEntity {
    pub payment: PaymentEntity,
    pub plan_type: String,
    pub user_id: Uuid,
    pub username: Option<String>,
    pub property_title: String,
}
