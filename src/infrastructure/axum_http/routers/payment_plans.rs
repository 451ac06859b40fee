use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    application::usecases::payment_plans::{PaymentPlanError, PaymentPlanUseCase},
    domain::{
        repositories::{payment_plans::PaymentPlanRepository, payments::PaymentRepository},
        value_objects::{
            payment_plans::{CreatePaymentPlanModel, MakePaymentModel},
            payments::RecordPaymentModel,
        },
    },
    infrastructure::axum_http::auth::AuthUser,
};

pub fn routes<P, L>(payment_plan_usecase: Arc<PaymentPlanUseCase<P, L>>) -> Router
where
    P: PaymentPlanRepository + Send + Sync + 'static,
    L: PaymentRepository + Send + Sync + 'static,
{
    Router::new()
        .route("/payment-plans", get(list_plans).post(create_plan))
        .route("/payment-plans/", get(list_plans).post(create_plan))
        .route("/payment-plans/:plan_id", get(get_plan).delete(delete_plan))
        .route("/payment-plans/:plan_id/make-payment", post(make_payment))
        .route(
            "/payment-plans/:plan_id/payments",
            get(list_plan_payments).post(record_payment),
        )
        .with_state(payment_plan_usecase)
}

pub async fn list_plans<P, L>(
    State(payment_plan_usecase): State<Arc<PaymentPlanUseCase<P, L>>>,
    auth: AuthUser,
) -> Result<impl IntoResponse, PaymentPlanError>
where
    P: PaymentPlanRepository + Send + Sync + 'static,
    L: PaymentRepository + Send + Sync + 'static,
{
    let plans = payment_plan_usecase.list_plans(auth.actor()).await?;
    Ok((StatusCode::OK, Json(plans)))
}

pub async fn create_plan<P, L>(
    State(payment_plan_usecase): State<Arc<PaymentPlanUseCase<P, L>>>,
    auth: AuthUser,
    payload: Result<Json<CreatePaymentPlanModel>, JsonRejection>,
) -> Result<impl IntoResponse, PaymentPlanError>
where
    P: PaymentPlanRepository + Send + Sync + 'static,
    L: PaymentRepository + Send + Sync + 'static,
{
    let Json(create_plan_model) = payload?;
    let plan = payment_plan_usecase
        .create_plan(auth.actor(), create_plan_model)
        .await?;
    Ok((StatusCode::CREATED, Json(plan)))
}

pub async fn get_plan<P, L>(
    State(payment_plan_usecase): State<Arc<PaymentPlanUseCase<P, L>>>,
    auth: AuthUser,
    plan_id: Result<Path<Uuid>, PathRejection>,
) -> Result<impl IntoResponse, PaymentPlanError>
where
    P: PaymentPlanRepository + Send + Sync + 'static,
    L: PaymentRepository + Send + Sync + 'static,
{
    let Path(plan_id) = plan_id?;
    let plan = payment_plan_usecase.get_plan(auth.actor(), plan_id).await?;
    Ok((StatusCode::OK, Json(plan)))
}

pub async fn delete_plan<P, L>(
    State(payment_plan_usecase): State<Arc<PaymentPlanUseCase<P, L>>>,
    auth: AuthUser,
    plan_id: Result<Path<Uuid>, PathRejection>,
) -> Result<impl IntoResponse, PaymentPlanError>
where
    P: PaymentPlanRepository + Send + Sync + 'static,
    L: PaymentRepository + Send + Sync + 'static,
{
    let Path(plan_id) = plan_id?;
    payment_plan_usecase.delete_plan(auth.actor(), plan_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn make_payment<P, L>(
    State(payment_plan_usecase): State<Arc<PaymentPlanUseCase<P, L>>>,
    auth: AuthUser,
    plan_id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<MakePaymentModel>, JsonRejection>,
) -> Result<impl IntoResponse, PaymentPlanError>
where
    P: PaymentPlanRepository + Send + Sync + 'static,
    L: PaymentRepository + Send + Sync + 'static,
{
    let Path(plan_id) = plan_id?;
    let Json(make_payment_model) = payload?;
    let response = payment_plan_usecase
        .accept_payment(auth.actor(), plan_id, make_payment_model)
        .await?;
    Ok((StatusCode::OK, Json(response)))
}

pub async fn list_plan_payments<P, L>(
    State(payment_plan_usecase): State<Arc<PaymentPlanUseCase<P, L>>>,
    auth: AuthUser,
    plan_id: Result<Path<Uuid>, PathRejection>,
) -> Result<impl IntoResponse, PaymentPlanError>
where
    P: PaymentPlanRepository + Send + Sync + 'static,
    L: PaymentRepository + Send + Sync + 'static,
{
    let Path(plan_id) = plan_id?;
    let payments = payment_plan_usecase
        .list_plan_payments(auth.actor(), plan_id)
        .await?;
    Ok((StatusCode::OK, Json(payments)))
}

pub async fn record_payment<P, L>(
    State(payment_plan_usecase): State<Arc<PaymentPlanUseCase<P, L>>>,
    auth: AuthUser,
    plan_id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<RecordPaymentModel>, JsonRejection>,
) -> Result<impl IntoResponse, PaymentPlanError>
where
    P: PaymentPlanRepository + Send + Sync + 'static,
    L: PaymentRepository + Send + Sync + 'static,
{
    let Path(plan_id) = plan_id?;
    let Json(record_payment_model) = payload?;
    let payment = payment_plan_usecase
        .record_payment(auth.actor(), plan_id, record_payment_model)
        .await?;
    Ok((StatusCode::CREATED, Json(payment)))
}
