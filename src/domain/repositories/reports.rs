use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use rust_decimal::Decimal;

use crate::domain::entities::payments::RecentPaymentEntity;

/// Read-only queries backing the reporting endpoint.
#[async_trait]
#[automock]
pub trait PaymentReportRepository {
    async fn successful_total_all(&self) -> Result<Decimal>;
    async fn count_by_status(&self) -> Result<Vec<(String, i64)>>;
    async fn recent_payments(&self, limit: i64) -> Result<Vec<RecentPaymentEntity>>;
}
