use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::{
    entities::{
        payment_plans::{InsertPaymentPlanEntity, PaymentPlanEntity, PaymentPlanListingEntity},
        payments::InsertPaymentEntity,
    },
    value_objects::{
        enums::payment_statuses::PaymentStatus,
        payment_plans::{LedgerWriteOutcome, ListPaymentPlansFilter},
    },
};

/// Storage for plans and their cached `amount_paid`.
///
/// `accept_payment` and `update_payment_status` run check, ledger write and
/// recompute as one critical section per plan: implementations must hold a
/// lock on the plan (row lock, store lock) for the whole sequence.
#[async_trait]
#[automock]
pub trait PaymentPlanRepository {
    /// Returns `None` when the referenced property does not exist.
    async fn create(&self, plan: InsertPaymentPlanEntity) -> Result<Option<PaymentPlanEntity>>;
    async fn find_by_id(&self, plan_id: Uuid) -> Result<Option<PaymentPlanEntity>>;
    async fn list(&self, filter: ListPaymentPlansFilter) -> Result<Vec<PaymentPlanListingEntity>>;
    /// Deletes the plan and its ledger. Returns `false` when nothing matched.
    async fn delete(&self, plan_id: Uuid) -> Result<bool>;
    /// Re-derives `amount_paid` from the successful ledger entries and persists it.
    async fn recompute_amount_paid(&self, plan_id: Uuid) -> Result<Option<PaymentPlanEntity>>;
    /// Records `payment`, refusing it when a successful entry would push
    /// `amount_paid` past `total_amount`, then recomputes.
    async fn accept_payment(
        &self,
        plan_id: Uuid,
        payment: InsertPaymentEntity,
    ) -> Result<LedgerWriteOutcome>;
    /// Moves a ledger entry to `status`, guarding transitions into the
    /// successful set against overpayment, then recomputes.
    async fn update_payment_status(
        &self,
        payment_id: Uuid,
        status: PaymentStatus,
    ) -> Result<LedgerWriteOutcome>;
}
