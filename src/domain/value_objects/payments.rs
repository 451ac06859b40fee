use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::domain::{entities::payments::PaymentEntity, value_objects::amounts::zero_amount};

/// Sum of the successful entries in a ledger slice. Empty ledgers sum to zero.
pub fn successful_total<'a, I>(payments: I) -> Decimal
where
    I: IntoIterator<Item = &'a PaymentEntity>,
{
    payments
        .into_iter()
        .filter(|payment| payment.current_status().is_counted())
        .fold(zero_amount(), |total, payment| total + payment.amount)
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaymentDto {
    pub id: Uuid,
    pub payment_plan_id: Uuid,
    pub amount: Decimal,
    pub payment_date: DateTime<Utc>,
    pub method: String,
    pub reference: Option<String>,
    pub status: String,
}

impl From<PaymentEntity> for PaymentDto {
    fn from(value: PaymentEntity) -> Self {
        Self {
            id: value.id,
            payment_plan_id: value.payment_plan_id,
            amount: value.amount,
            payment_date: value.payment_date,
            method: value.method,
            reference: value.reference,
            status: value.status,
        }
    }
}

/// Ledger write for a payment whose processing outcome is already known.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordPaymentModel {
    #[serde(default)]
    pub amount: Value,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub payment_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatePaymentStatusModel {
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaymentStatusChangeDto {
    pub payment: PaymentDto,
    pub amount_paid: Decimal,
    pub balance: Decimal,
}
