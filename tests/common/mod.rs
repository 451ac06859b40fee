#![allow(dead_code)]

use std::{env, sync::Arc};

use axum::Router;
use chrono::Utc;
use jsonwebtoken::{EncodingKey, Header, encode};
use rust_decimal::Decimal;
use uuid::Uuid;

use estate_payments::{
    application::usecases::{payment_plans::PaymentPlanUseCase, reports::ReportUseCase},
    domain::{
        entities::{properties::PropertyEntity, users::UserEntity},
        value_objects::{iam::Actor, payment_plans::CreatePaymentPlanModel},
    },
    infrastructure::{
        axum_http::{auth::AccessClaims, http_serve::api_router},
        in_memory::InMemoryStore,
    },
};

pub const JWT_SECRET: &str = "integration-test-secret-0123456789abcdef";

pub type PlanUseCase = PaymentPlanUseCase<InMemoryStore, InMemoryStore>;

pub fn set_env_vars() {
    unsafe {
        env::set_var("JWT_SECRET", JWT_SECRET);
        env::set_var("JWT_STAFF_ROLE", "staff");
    }
}

pub fn bearer(user_id: Uuid, role: &str) -> String {
    let claims = AccessClaims {
        sub: user_id.to_string(),
        role: role.to_string(),
        email: None,
        exp: 9999999999,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
    .unwrap();
    format!("Bearer {}", token)
}

pub struct TestContext {
    pub store: InMemoryStore,
    pub plans: Arc<PlanUseCase>,
    pub reports: Arc<ReportUseCase<InMemoryStore>>,
    pub owner: Uuid,
    pub staff: Uuid,
    pub property_id: Uuid,
}

impl TestContext {
    pub async fn new() -> Self {
        set_env_vars();

        let store = InMemoryStore::new();
        let owner = Uuid::new_v4();
        let staff = Uuid::new_v4();
        let property_id = Uuid::new_v4();

        store
            .insert_property(PropertyEntity {
                id: property_id,
                title: "Lekki Phase 1 Duplex".to_string(),
                location: Some("Lagos".to_string()),
                price: Some(Decimal::new(100_000, 2)),
                date_posted: Utc::now(),
            })
            .await;
        store
            .insert_user(UserEntity {
                id: owner,
                username: "tolu".to_string(),
                email: "tolu@example.com".to_string(),
            })
            .await;

        let plans = Arc::new(PaymentPlanUseCase::new(
            Arc::new(store.clone()),
            Arc::new(store.clone()),
        ));
        let reports = Arc::new(ReportUseCase::new(Arc::new(store.clone())));

        Self {
            store,
            plans,
            reports,
            owner,
            staff,
            property_id,
        }
    }

    pub fn app(&self) -> Router {
        api_router(Arc::clone(&self.plans), Arc::clone(&self.reports))
    }

    pub fn owner_actor(&self) -> Actor {
        Actor::user(self.owner)
    }

    pub fn staff_actor(&self) -> Actor {
        Actor::staff(self.staff)
    }

    /// Plan owned by `owner` with nothing paid yet.
    pub async fn plan_with_total(&self, total_amount: &str) -> Uuid {
        self.plans
            .create_plan(
                self.owner_actor(),
                CreatePaymentPlanModel {
                    property_id: self.property_id,
                    plan_type: "Instalment".to_string(),
                    total_amount: serde_json::Value::String(total_amount.to_string()),
                    installments: 4,
                    next_due_date: None,
                },
            )
            .await
            .unwrap()
            .id
    }
}
