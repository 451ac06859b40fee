use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::entities::payments::{InsertPaymentEntity, PaymentEntity};

/// The payment ledger: every payment attempt recorded against a plan.
///
/// Entries are never updated except for their status and never deleted except
/// by cascading plan deletion. Writes that can change a plan's paid amount go
/// through [`PaymentPlanRepository`](super::payment_plans::PaymentPlanRepository)
/// so they run under the plan lock.
#[async_trait]
#[automock]
pub trait PaymentRepository {
    async fn record(&self, payment: InsertPaymentEntity) -> Result<PaymentEntity>;
    async fn successful_total(&self, plan_id: Uuid) -> Result<Decimal>;
    async fn find_by_id(&self, payment_id: Uuid) -> Result<Option<PaymentEntity>>;
    async fn list_by_plan(&self, plan_id: Uuid) -> Result<Vec<PaymentEntity>>;
    async fn list_successful_by_property(
        &self,
        property_id: Uuid,
        owner_id: Option<Uuid>,
    ) -> Result<Vec<PaymentEntity>>;
}
