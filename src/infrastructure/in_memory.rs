use anyhow::Result;
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::{
    entities::{
        payment_plans::{InsertPaymentPlanEntity, PaymentPlanEntity, PaymentPlanListingEntity},
        payments::{InsertPaymentEntity, PaymentEntity, RecentPaymentEntity},
        properties::PropertyEntity,
        users::UserEntity,
    },
    repositories::{
        payment_plans::PaymentPlanRepository, payments::PaymentRepository,
        reports::PaymentReportRepository,
    },
    value_objects::{
        enums::payment_statuses::PaymentStatus,
        payment_plans::{LedgerWriteOutcome, ListPaymentPlansFilter},
        payments::successful_total,
    },
};

#[derive(Debug, Default)]
struct StoreState {
    properties: HashMap<Uuid, PropertyEntity>,
    users: HashMap<Uuid, UserEntity>,
    plans: HashMap<Uuid, PaymentPlanEntity>,
    payments: Vec<PaymentEntity>,
}

impl StoreState {
    fn ledger(&self, plan_id: Uuid) -> impl Iterator<Item = &PaymentEntity> {
        self.payments
            .iter()
            .filter(move |payment| payment.payment_plan_id == plan_id)
    }

    fn recompute(&mut self, plan_id: Uuid) -> Option<PaymentPlanEntity> {
        let amount_paid = successful_total(self.ledger(plan_id));
        let plan = self.plans.get_mut(&plan_id)?;
        plan.amount_paid = amount_paid;
        Some(plan.clone())
    }

    fn insert_payment(&mut self, payment: InsertPaymentEntity) -> PaymentEntity {
        let recorded = PaymentEntity {
            id: Uuid::new_v4(),
            payment_plan_id: payment.payment_plan_id,
            amount: payment.amount,
            payment_date: payment.payment_date,
            method: payment.method,
            reference: payment.reference,
            status: payment.status,
        };
        self.payments.push(recorded.clone());
        recorded
    }

    fn sorted_by_date(mut payments: Vec<PaymentEntity>) -> Vec<PaymentEntity> {
        payments.sort_by_key(|payment| payment.payment_date);
        payments
    }
}

/// Store backing every repository trait with one process-local state.
///
/// Every ledger write holds the write lock from the overpayment check until
/// `amount_paid` has been recomputed, which serializes writers per plan.
#[derive(Default, Clone)]
pub struct InMemoryStore {
    state: Arc<RwLock<StoreState>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_property(&self, property: PropertyEntity) {
        let mut state = self.state.write().await;
        state.properties.insert(property.id, property);
    }

    pub async fn insert_user(&self, user: UserEntity) {
        let mut state = self.state.write().await;
        state.users.insert(user.id, user);
    }

    pub async fn payment_count(&self) -> usize {
        self.state.read().await.payments.len()
    }
}

#[async_trait]
impl PaymentPlanRepository for InMemoryStore {
    async fn create(&self, plan: InsertPaymentPlanEntity) -> Result<Option<PaymentPlanEntity>> {
        let mut state = self.state.write().await;
        if !state.properties.contains_key(&plan.property_id) {
            return Ok(None);
        }

        let created = PaymentPlanEntity {
            id: Uuid::new_v4(),
            user_id: plan.user_id,
            property_id: plan.property_id,
            plan_type: plan.plan_type,
            total_amount: plan.total_amount,
            amount_paid: plan.amount_paid,
            installments: plan.installments,
            next_due_date: plan.next_due_date,
            created_at: plan.created_at,
        };
        state.plans.insert(created.id, created.clone());
        Ok(Some(created))
    }

    async fn find_by_id(&self, plan_id: Uuid) -> Result<Option<PaymentPlanEntity>> {
        let state = self.state.read().await;
        Ok(state.plans.get(&plan_id).cloned())
    }

    async fn list(&self, filter: ListPaymentPlansFilter) -> Result<Vec<PaymentPlanListingEntity>> {
        let state = self.state.read().await;

        let mut listings: Vec<PaymentPlanListingEntity> = state
            .plans
            .values()
            .filter(|plan| filter.plan_id.is_none_or(|id| plan.id == id))
            .filter(|plan| filter.user_id.is_none_or(|id| plan.user_id == id))
            .filter_map(|plan| {
                let property = state.properties.get(&plan.property_id)?;
                Some(PaymentPlanListingEntity {
                    plan: plan.clone(),
                    property_title: property.title.clone(),
                })
            })
            .collect();

        listings.sort_by(|a, b| {
            b.plan
                .created_at
                .cmp(&a.plan.created_at)
                .then(a.plan.id.cmp(&b.plan.id))
        });
        Ok(listings)
    }

    async fn delete(&self, plan_id: Uuid) -> Result<bool> {
        let mut state = self.state.write().await;
        if state.plans.remove(&plan_id).is_none() {
            return Ok(false);
        }
        state
            .payments
            .retain(|payment| payment.payment_plan_id != plan_id);
        Ok(true)
    }

    async fn recompute_amount_paid(&self, plan_id: Uuid) -> Result<Option<PaymentPlanEntity>> {
        let mut state = self.state.write().await;
        Ok(state.recompute(plan_id))
    }

    async fn accept_payment(
        &self,
        plan_id: Uuid,
        payment: InsertPaymentEntity,
    ) -> Result<LedgerWriteOutcome> {
        let mut state = self.state.write().await;

        let Some(plan) = state.plans.get(&plan_id).cloned() else {
            return Ok(LedgerWriteOutcome::PlanNotFound);
        };

        let counted =
            PaymentStatus::from_str(&payment.status).is_some_and(|status| status.is_counted());
        if counted && !plan.admits(payment.amount) {
            return Ok(LedgerWriteOutcome::Overpayment {
                amount_paid: plan.amount_paid,
                requested: payment.amount,
                total_amount: plan.total_amount,
            });
        }

        let recorded = state.insert_payment(payment);
        match state.recompute(plan_id) {
            Some(plan) => Ok(LedgerWriteOutcome::Applied {
                plan,
                payment: recorded,
            }),
            None => Ok(LedgerWriteOutcome::PlanNotFound),
        }
    }

    async fn update_payment_status(
        &self,
        payment_id: Uuid,
        status: PaymentStatus,
    ) -> Result<LedgerWriteOutcome> {
        let mut state = self.state.write().await;

        let Some(index) = state
            .payments
            .iter()
            .position(|payment| payment.id == payment_id)
        else {
            return Ok(LedgerWriteOutcome::PaymentNotFound);
        };

        let payment = state.payments[index].clone();
        let Some(plan) = state.plans.get(&payment.payment_plan_id).cloned() else {
            return Ok(LedgerWriteOutcome::PlanNotFound);
        };

        let current = payment.current_status();
        if current.enters_counted(status) && !plan.admits(payment.amount) {
            return Ok(LedgerWriteOutcome::Overpayment {
                amount_paid: plan.amount_paid,
                requested: payment.amount,
                total_amount: plan.total_amount,
            });
        }

        state.payments[index].status = status.to_string();
        let updated = state.payments[index].clone();

        let plan = if current.changes_counted(status) {
            match state.recompute(plan.id) {
                Some(plan) => plan,
                None => return Ok(LedgerWriteOutcome::PlanNotFound),
            }
        } else {
            plan
        };

        Ok(LedgerWriteOutcome::Applied {
            plan,
            payment: updated,
        })
    }
}

#[async_trait]
impl PaymentRepository for InMemoryStore {
    async fn record(&self, payment: InsertPaymentEntity) -> Result<PaymentEntity> {
        let mut state = self.state.write().await;
        if !state.plans.contains_key(&payment.payment_plan_id) {
            anyhow::bail!("payment plan {} does not exist", payment.payment_plan_id);
        }
        Ok(state.insert_payment(payment))
    }

    async fn successful_total(&self, plan_id: Uuid) -> Result<Decimal> {
        let state = self.state.read().await;
        Ok(successful_total(state.ledger(plan_id)))
    }

    async fn find_by_id(&self, payment_id: Uuid) -> Result<Option<PaymentEntity>> {
        let state = self.state.read().await;
        Ok(state
            .payments
            .iter()
            .find(|payment| payment.id == payment_id)
            .cloned())
    }

    async fn list_by_plan(&self, plan_id: Uuid) -> Result<Vec<PaymentEntity>> {
        let state = self.state.read().await;
        Ok(StoreState::sorted_by_date(
            state.ledger(plan_id).cloned().collect(),
        ))
    }

    async fn list_successful_by_property(
        &self,
        property_id: Uuid,
        owner_id: Option<Uuid>,
    ) -> Result<Vec<PaymentEntity>> {
        let state = self.state.read().await;

        let payments = state
            .payments
            .iter()
            .filter(|payment| payment.current_status().is_counted())
            .filter(|payment| {
                state
                    .plans
                    .get(&payment.payment_plan_id)
                    .is_some_and(|plan| {
                        plan.property_id == property_id
                            && owner_id.is_none_or(|owner| plan.user_id == owner)
                    })
            })
            .cloned()
            .collect();

        Ok(StoreState::sorted_by_date(payments))
    }
}

#[async_trait]
impl PaymentReportRepository for InMemoryStore {
    async fn successful_total_all(&self) -> Result<Decimal> {
        let state = self.state.read().await;
        Ok(successful_total(&state.payments))
    }

    async fn count_by_status(&self) -> Result<Vec<(String, i64)>> {
        let state = self.state.read().await;

        let mut counts: HashMap<String, i64> = HashMap::new();
        for payment in &state.payments {
            *counts.entry(payment.status.clone()).or_default() += 1;
        }
        Ok(counts.into_iter().collect())
    }

    async fn recent_payments(&self, limit: i64) -> Result<Vec<RecentPaymentEntity>> {
        let state = self.state.read().await;

        let mut payments: Vec<&PaymentEntity> = state.payments.iter().collect();
        payments.sort_by(|a, b| b.payment_date.cmp(&a.payment_date));

        let limit = usize::try_from(limit).unwrap_or(0);
        Ok(payments
            .into_iter()
            .filter_map(|payment| {
                let plan = state.plans.get(&payment.payment_plan_id)?;
                let property = state.properties.get(&plan.property_id)?;
                Some(RecentPaymentEntity {
                    payment: payment.clone(),
                    plan_type: plan.plan_type.clone(),
                    user_id: plan.user_id,
                    username: state.users.get(&plan.user_id).map(|u| u.username.clone()),
                    property_title: property.title.clone(),
                })
            })
            .take(limit)
            .collect())
    }
}
