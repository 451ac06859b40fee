use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch},
};
use uuid::Uuid;

use crate::{
    application::usecases::payment_plans::{PaymentPlanError, PaymentPlanUseCase},
    domain::{
        repositories::{payment_plans::PaymentPlanRepository, payments::PaymentRepository},
        value_objects::payments::UpdatePaymentStatusModel,
    },
    infrastructure::axum_http::auth::AuthUser,
};

pub fn routes<P, L>(payment_plan_usecase: Arc<PaymentPlanUseCase<P, L>>) -> Router
where
    P: PaymentPlanRepository + Send + Sync + 'static,
    L: PaymentRepository + Send + Sync + 'static,
{
    Router::new()
        .route("/payments/:payment_id", get(get_payment))
        .route("/payments/:payment_id/status", patch(update_payment_status))
        .route(
            "/payments-by-property/:property_id",
            get(list_payments_by_property),
        )
        .with_state(payment_plan_usecase)
}

pub async fn get_payment<P, L>(
    State(payment_plan_usecase): State<Arc<PaymentPlanUseCase<P, L>>>,
    auth: AuthUser,
    payment_id: Result<Path<Uuid>, PathRejection>,
) -> Result<impl IntoResponse, PaymentPlanError>
where
    P: PaymentPlanRepository + Send + Sync + 'static,
    L: PaymentRepository + Send + Sync + 'static,
{
    let Path(payment_id) = payment_id?;
    let payment = payment_plan_usecase
        .get_payment(auth.actor(), payment_id)
        .await?;
    Ok((StatusCode::OK, Json(payment)))
}

pub async fn update_payment_status<P, L>(
    State(payment_plan_usecase): State<Arc<PaymentPlanUseCase<P, L>>>,
    auth: AuthUser,
    payment_id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<UpdatePaymentStatusModel>, JsonRejection>,
) -> Result<impl IntoResponse, PaymentPlanError>
where
    P: PaymentPlanRepository + Send + Sync + 'static,
    L: PaymentRepository + Send + Sync + 'static,
{
    let Path(payment_id) = payment_id?;
    let Json(update_status_model) = payload?;
    let change = payment_plan_usecase
        .update_payment_status(auth.actor(), payment_id, update_status_model)
        .await?;
    Ok((StatusCode::OK, Json(change)))
}

pub async fn list_payments_by_property<P, L>(
    State(payment_plan_usecase): State<Arc<PaymentPlanUseCase<P, L>>>,
    auth: AuthUser,
    property_id: Result<Path<Uuid>, PathRejection>,
) -> Result<impl IntoResponse, PaymentPlanError>
where
    P: PaymentPlanRepository + Send + Sync + 'static,
    L: PaymentRepository + Send + Sync + 'static,
{
    let Path(property_id) = property_id?;
    let payments = payment_plan_usecase
        .list_successful_payments_by_property(auth.actor(), property_id)
        .await?;
    Ok((StatusCode::OK, Json(payments)))
}
