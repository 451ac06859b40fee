use anyhow::Result;
use async_trait::async_trait;
use diesel::{dsl::sum, prelude::*};
use rust_decimal::Decimal;
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain::{
        entities::{
            payment_plans::{InsertPaymentPlanEntity, PaymentPlanEntity, PaymentPlanListingEntity},
            payments::{InsertPaymentEntity, PaymentEntity},
        },
        repositories::payment_plans::PaymentPlanRepository,
        value_objects::{
            amounts::zero_amount,
            enums::payment_statuses::PaymentStatus,
            payment_plans::{LedgerWriteOutcome, ListPaymentPlansFilter},
        },
    },
    infrastructure::postgres::{
        postgres_connection::PgPoolSquad,
        schema::{payment_plans, payments, properties},
    },
};

pub struct PaymentPlanPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl PaymentPlanPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

/// Locks the plan row until the surrounding transaction ends.
fn lock_plan(conn: &mut PgConnection, plan_id: Uuid) -> QueryResult<Option<PaymentPlanEntity>> {
    payment_plans::table
        .find(plan_id)
        .select(PaymentPlanEntity::as_select())
        .for_update()
        .first::<PaymentPlanEntity>(conn)
        .optional()
}

pub(crate) fn sum_successful(conn: &mut PgConnection, plan_id: Uuid) -> QueryResult<Decimal> {
    let total = payments::table
        .filter(payments::payment_plan_id.eq(plan_id))
        .filter(payments::status.eq(PaymentStatus::Successful.as_str()))
        .select(sum(payments::amount))
        .first::<Option<Decimal>>(conn)?;

    Ok(total.unwrap_or_else(zero_amount))
}

/// Must run with the plan row already locked.
fn recompute_locked(conn: &mut PgConnection, plan_id: Uuid) -> QueryResult<PaymentPlanEntity> {
    let amount_paid = sum_successful(conn, plan_id)?;

    diesel::update(payment_plans::table.find(plan_id))
        .set(payment_plans::amount_paid.eq(amount_paid))
        .returning(PaymentPlanEntity::as_select())
        .get_result::<PaymentPlanEntity>(conn)
}

#[async_trait]
impl PaymentPlanRepository for PaymentPlanPostgres {
    async fn create(&self, plan: InsertPaymentPlanEntity) -> Result<Option<PaymentPlanEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let created = conn.transaction::<Option<PaymentPlanEntity>, diesel::result::Error, _>(
            |conn| {
                let property_exists = properties::table
                    .find(plan.property_id)
                    .select(properties::id)
                    .first::<Uuid>(conn)
                    .optional()?
                    .is_some();

                if !property_exists {
                    return Ok(None);
                }

                let created = diesel::insert_into(payment_plans::table)
                    .values(&plan)
                    .returning(PaymentPlanEntity::as_select())
                    .get_result::<PaymentPlanEntity>(conn)?;

                Ok(Some(created))
            },
        )?;

        Ok(created)
    }

    async fn find_by_id(&self, plan_id: Uuid) -> Result<Option<PaymentPlanEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let plan = payment_plans::table
            .find(plan_id)
            .select(PaymentPlanEntity::as_select())
            .first::<PaymentPlanEntity>(&mut conn)
            .optional()?;

        Ok(plan)
    }

    async fn list(&self, filter: ListPaymentPlansFilter) -> Result<Vec<PaymentPlanListingEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let mut query = payment_plans::table
            .inner_join(properties::table)
            .select((PaymentPlanEntity::as_select(), properties::title))
            .into_boxed();

        if let Some(plan_id) = filter.plan_id {
            query = query.filter(payment_plans::id.eq(plan_id));
        }
        if let Some(user_id) = filter.user_id {
            query = query.filter(payment_plans::user_id.eq(user_id));
        }

        let rows = query
            .order((payment_plans::created_at.desc(), payment_plans::id.asc()))
            .load::<(PaymentPlanEntity, String)>(&mut conn)?;

        Ok(rows
            .into_iter()
            .map(|(plan, property_title)| PaymentPlanListingEntity {
                plan,
                property_title,
            })
            .collect())
    }

    async fn delete(&self, plan_id: Uuid) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let deleted = conn.transaction::<usize, diesel::result::Error, _>(|conn| {
            diesel::delete(payments::table.filter(payments::payment_plan_id.eq(plan_id)))
                .execute(conn)?;
            diesel::delete(payment_plans::table.find(plan_id)).execute(conn)
        })?;

        Ok(deleted > 0)
    }

    async fn recompute_amount_paid(&self, plan_id: Uuid) -> Result<Option<PaymentPlanEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let plan = conn.transaction::<Option<PaymentPlanEntity>, diesel::result::Error, _>(
            |conn| {
                if lock_plan(conn, plan_id)?.is_none() {
                    return Ok(None);
                }
                recompute_locked(conn, plan_id).map(Some)
            },
        )?;

        Ok(plan)
    }

    async fn accept_payment(
        &self,
        plan_id: Uuid,
        payment: InsertPaymentEntity,
    ) -> Result<LedgerWriteOutcome> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let outcome = conn.transaction::<LedgerWriteOutcome, diesel::result::Error, _>(|conn| {
            let Some(plan) = lock_plan(conn, plan_id)? else {
                return Ok(LedgerWriteOutcome::PlanNotFound);
            };

            let counted = PaymentStatus::from_str(&payment.status)
                .is_some_and(|status| status.is_counted());
            if counted && !plan.admits(payment.amount) {
                return Ok(LedgerWriteOutcome::Overpayment {
                    amount_paid: plan.amount_paid,
                    requested: payment.amount,
                    total_amount: plan.total_amount,
                });
            }

            let recorded = diesel::insert_into(payments::table)
                .values(&payment)
                .returning(PaymentEntity::as_select())
                .get_result::<PaymentEntity>(conn)?;

            let plan = recompute_locked(conn, plan_id)?;

            Ok(LedgerWriteOutcome::Applied {
                plan,
                payment: recorded,
            })
        })?;

        Ok(outcome)
    }

    async fn update_payment_status(
        &self,
        payment_id: Uuid,
        status: PaymentStatus,
    ) -> Result<LedgerWriteOutcome> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let outcome = conn.transaction::<LedgerWriteOutcome, diesel::result::Error, _>(|conn| {
            let Some(plan_id) = payments::table
                .find(payment_id)
                .select(payments::payment_plan_id)
                .first::<Uuid>(conn)
                .optional()?
            else {
                return Ok(LedgerWriteOutcome::PaymentNotFound);
            };

            let Some(plan) = lock_plan(conn, plan_id)? else {
                return Ok(LedgerWriteOutcome::PlanNotFound);
            };

            // Re-read under the plan lock; a concurrent delete may have won.
            let Some(payment) = payments::table
                .find(payment_id)
                .select(PaymentEntity::as_select())
                .first::<PaymentEntity>(conn)
                .optional()?
            else {
                return Ok(LedgerWriteOutcome::PaymentNotFound);
            };

            let current = payment.current_status();
            if current.enters_counted(status) && !plan.admits(payment.amount) {
                return Ok(LedgerWriteOutcome::Overpayment {
                    amount_paid: plan.amount_paid,
                    requested: payment.amount,
                    total_amount: plan.total_amount,
                });
            }

            let updated = diesel::update(payments::table.find(payment_id))
                .set(payments::status.eq(status.as_str()))
                .returning(PaymentEntity::as_select())
                .get_result::<PaymentEntity>(conn)?;

            let plan = if current.changes_counted(status) {
                recompute_locked(conn, plan_id)?
            } else {
                plan
            };

            Ok(LedgerWriteOutcome::Applied {
                plan,
                payment: updated,
            })
        })?;

        Ok(outcome)
    }
}
