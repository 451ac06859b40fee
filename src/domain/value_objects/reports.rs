use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    entities::payments::RecentPaymentEntity, value_objects::enums::payment_statuses::PaymentStatus,
};

#[derive(Debug, Clone, Deserialize)]
pub struct PaymentReportQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PaymentStatusCountsDto {
    pub pending: i64,
    pub successful: i64,
    pub failed: i64,
}

impl PaymentStatusCountsDto {
    /// Folds `(status, count)` rows; rows with unknown statuses are skipped.
    pub fn from_rows(rows: Vec<(String, i64)>) -> Self {
        rows.into_iter()
            .fold(Self::default(), |mut counts, (status, count)| {
                match PaymentStatus::from_str(&status) {
                    Some(PaymentStatus::Pending) => counts.pending += count,
                    Some(PaymentStatus::Successful) => counts.successful += count,
                    Some(PaymentStatus::Failed) => counts.failed += count,
                    None => {}
                }
                counts
            })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecentPaymentDto {
    pub id: Uuid,
    pub payment_plan_id: Uuid,
    pub plan_type: String,
    pub user_id: Uuid,
    pub username: Option<String>,
    pub property_title: String,
    pub amount: Decimal,
    pub method: String,
    pub status: String,
    pub payment_date: DateTime<Utc>,
}

impl From<RecentPaymentEntity> for RecentPaymentDto {
    fn from(value: RecentPaymentEntity) -> Self {
        Self {
            id: value.payment.id,
            payment_plan_id: value.payment.payment_plan_id,
            plan_type: value.plan_type,
            user_id: value.user_id,
            username: value.username,
            property_title: value.property_title,
            amount: value.payment.amount,
            method: value.payment.method,
            status: value.payment.status,
            payment_date: value.payment.payment_date,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaymentReportDto {
    pub successful_total: Decimal,
    pub status_counts: PaymentStatusCountsDto,
    pub recent_payments: Vec<RecentPaymentDto>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folds_status_rows_into_counts() {
        let counts = PaymentStatusCountsDto::from_rows(vec![
            ("successful".to_string(), 4),
            ("pending".to_string(), 2),
            ("failed".to_string(), 1),
            ("refunded".to_string(), 9),
        ]);

        assert_eq!(
            counts,
            PaymentStatusCountsDto {
                pending: 2,
                successful: 4,
                failed: 1,
            }
        );
    }
}
