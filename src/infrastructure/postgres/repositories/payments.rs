use anyhow::Result;
use async_trait::async_trait;
use diesel::prelude::*;
use rust_decimal::Decimal;
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain::{
        entities::payments::{InsertPaymentEntity, PaymentEntity},
        repositories::payments::PaymentRepository,
        value_objects::enums::payment_statuses::PaymentStatus,
    },
    infrastructure::postgres::{
        postgres_connection::PgPoolSquad,
        repositories::payment_plans::sum_successful,
        schema::{payment_plans, payments},
    },
};

pub struct PaymentPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl PaymentPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl PaymentRepository for PaymentPostgres {
    async fn record(&self, payment: InsertPaymentEntity) -> Result<PaymentEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let recorded = diesel::insert_into(payments::table)
            .values(&payment)
            .returning(PaymentEntity::as_select())
            .get_result::<PaymentEntity>(&mut conn)?;

        Ok(recorded)
    }

    async fn successful_total(&self, plan_id: Uuid) -> Result<Decimal> {
        let mut conn = Arc::clone(&self.db_pool).get()?;
        Ok(sum_successful(&mut conn, plan_id)?)
    }

    async fn find_by_id(&self, payment_id: Uuid) -> Result<Option<PaymentEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let payment = payments::table
            .find(payment_id)
            .select(PaymentEntity::as_select())
            .first::<PaymentEntity>(&mut conn)
            .optional()?;

        Ok(payment)
    }

    async fn list_by_plan(&self, plan_id: Uuid) -> Result<Vec<PaymentEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let ledger = payments::table
            .filter(payments::payment_plan_id.eq(plan_id))
            .select(PaymentEntity::as_select())
            .order((payments::payment_date.asc(), payments::id.asc()))
            .load::<PaymentEntity>(&mut conn)?;

        Ok(ledger)
    }

    async fn list_successful_by_property(
        &self,
        property_id: Uuid,
        owner_id: Option<Uuid>,
    ) -> Result<Vec<PaymentEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let mut query = payments::table
            .inner_join(payment_plans::table)
            .filter(payment_plans::property_id.eq(property_id))
            .filter(payments::status.eq(PaymentStatus::Successful.as_str()))
            .select(PaymentEntity::as_select())
            .into_boxed();

        if let Some(owner_id) = owner_id {
            query = query.filter(payment_plans::user_id.eq(owner_id));
        }

        let ledger = query
            .order((payments::payment_date.asc(), payments::id.asc()))
            .load::<PaymentEntity>(&mut conn)?;

        Ok(ledger)
    }
}
