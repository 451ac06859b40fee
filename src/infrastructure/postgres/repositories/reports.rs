use anyhow::Result;
use async_trait::async_trait;
use diesel::{
    dsl::{count_star, sum},
    prelude::*,
};
use rust_decimal::Decimal;
use std::sync::Arc;

use crate::{
    domain::{
        entities::payments::{PaymentEntity, RecentPaymentEntity},
        repositories::reports::PaymentReportRepository,
        value_objects::{amounts::zero_amount, enums::payment_statuses::PaymentStatus},
    },
    infrastructure::postgres::{
        postgres_connection::PgPoolSquad,
        schema::{payment_plans, payments, properties, users},
    },
};

pub struct PaymentReportPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl PaymentReportPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl PaymentReportRepository for PaymentReportPostgres {
    async fn successful_total_all(&self) -> Result<Decimal> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let total = payments::table
            .filter(payments::status.eq(PaymentStatus::Successful.as_str()))
            .select(sum(payments::amount))
            .first::<Option<Decimal>>(&mut conn)?;

        Ok(total.unwrap_or_else(zero_amount))
    }

    async fn count_by_status(&self) -> Result<Vec<(String, i64)>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let rows = payments::table
            .group_by(payments::status)
            .select((payments::status, count_star()))
            .load::<(String, i64)>(&mut conn)?;

        Ok(rows)
    }

    async fn recent_payments(&self, limit: i64) -> Result<Vec<RecentPaymentEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let rows = payments::table
            .inner_join(
                payment_plans::table
                    .inner_join(properties::table)
                    .left_join(users::table),
            )
            .select((
                PaymentEntity::as_select(),
                payment_plans::plan_type,
                payment_plans::user_id,
                users::username.nullable(),
                properties::title,
            ))
            .order((payments::payment_date.desc(), payments::id.asc()))
            .limit(limit)
            .load::<(PaymentEntity, String, uuid::Uuid, Option<String>, String)>(&mut conn)?;

        Ok(rows
            .into_iter()
            .map(
                |(payment, plan_type, user_id, username, property_title)| RecentPaymentEntity {
                    payment,
                    plan_type,
                    user_id,
                    username,
                    property_title,
                },
            )
            .collect())
    }
}
