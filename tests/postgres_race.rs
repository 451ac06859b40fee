use std::{env, sync::Arc};

use chrono::Utc;
use diesel::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::json;
use uuid::Uuid;

use estate_payments::{
    application::usecases::payment_plans::{PaymentPlanError, PaymentPlanUseCase},
    domain::{
        entities::properties::PropertyEntity,
        value_objects::{
            iam::Actor,
            payment_plans::{CreatePaymentPlanModel, MakePaymentModel},
        },
    },
    infrastructure::postgres::{
        postgres_connection::{PgPoolSquad, establish_connection},
        repositories::{payment_plans::PaymentPlanPostgres, payments::PaymentPostgres},
        schema::properties,
    },
};

type PostgresPlans = PaymentPlanUseCase<PaymentPlanPostgres, PaymentPostgres>;

fn pool() -> Option<Arc<PgPoolSquad>> {
    dotenvy::dotenv().ok();
    let database_url = env::var("DATABASE_URL").ok()?;
    Some(Arc::new(establish_connection(&database_url).unwrap()))
}

fn seed_property(pool: &PgPoolSquad) -> Uuid {
    let property = PropertyEntity {
        id: Uuid::new_v4(),
        title: "Ikoyi Terrace".to_string(),
        location: Some("Lagos".to_string()),
        price: None,
        date_posted: Utc::now(),
    };
    let mut conn = pool.get().unwrap();
    diesel::insert_into(properties::table)
        .values(&property)
        .execute(&mut conn)
        .unwrap();
    property.id
}

fn drop_property(pool: &PgPoolSquad, property_id: Uuid) {
    let mut conn = pool.get().unwrap();
    diesel::delete(properties::table.find(property_id))
        .execute(&mut conn)
        .unwrap();
}

async fn race(
    plans: &Arc<PostgresPlans>,
    actor: Actor,
    plan_id: Uuid,
    callers: usize,
    amount: Decimal,
) -> usize {
    let mut handles = Vec::with_capacity(callers);
    for _ in 0..callers {
        let plans = Arc::clone(plans);
        handles.push(tokio::spawn(async move {
            plans
                .accept_payment(
                    actor,
                    plan_id,
                    MakePaymentModel {
                        amount: json!(amount.to_string()),
                        ..Default::default()
                    },
                )
                .await
        }));
    }

    let mut successes = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => successes += 1,
            Err(PaymentPlanError::Overpayment { .. }) => {}
            Err(other) => panic!("unexpected error: {:?}", other),
        }
    }
    successes
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[ignore = "needs DATABASE_URL pointing at a migrated database"]
async fn row_lock_admits_one_payment_over_half_the_balance() {
    let Some(pool) = pool() else {
        return;
    };
    let property_id = seed_property(&pool);
    let plans = Arc::new(PaymentPlanUseCase::new(
        Arc::new(PaymentPlanPostgres::new(Arc::clone(&pool))),
        Arc::new(PaymentPostgres::new(Arc::clone(&pool))),
    ));
    let owner = Actor::user(Uuid::new_v4());

    let plan = plans
        .create_plan(
            owner,
            CreatePaymentPlanModel {
                property_id,
                plan_type: "Instalment".to_string(),
                total_amount: json!("1000"),
                installments: 4,
                next_due_date: None,
            },
        )
        .await
        .unwrap();

    let successes = race(&plans, owner, plan.id, 10, dec!(500.01)).await;
    let settled = plans.get_plan(owner, plan.id).await.unwrap();
    let ledger_total = plans.successful_total(plan.id).await.unwrap();

    drop_property(&pool, property_id);

    assert_eq!(successes, 1);
    assert_eq!(settled.amount_paid, dec!(500.01));
    assert_eq!(ledger_total, settled.amount_paid);
}
