use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State, rejection::QueryRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};

use crate::{
    application::usecases::{payment_plans::PaymentPlanError, reports::ReportUseCase},
    domain::{
        repositories::reports::PaymentReportRepository,
        value_objects::reports::PaymentReportQuery,
    },
    infrastructure::axum_http::auth::AuthUser,
};

pub fn routes<R>(report_usecase: Arc<ReportUseCase<R>>) -> Router
where
    R: PaymentReportRepository + Send + Sync + 'static,
{
    Router::new()
        .route("/reports/summary", get(summary))
        .with_state(report_usecase)
}

pub async fn summary<R>(
    State(report_usecase): State<Arc<ReportUseCase<R>>>,
    auth: AuthUser,
    query: Result<Query<PaymentReportQuery>, QueryRejection>,
) -> Result<impl IntoResponse, PaymentPlanError>
where
    R: PaymentReportRepository + Send + Sync + 'static,
{
    let Query(report_query) = query?;
    let report = report_usecase.summary(auth.actor(), report_query).await?;
    Ok((StatusCode::OK, Json(report)))
}
