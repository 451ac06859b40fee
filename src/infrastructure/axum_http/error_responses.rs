use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::application::usecases::payment_plans::PaymentPlanError;

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: u16,
    pub error: String,
}

impl IntoResponse for PaymentPlanError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error = match self {
            // Storage detail stays in the logs.
            PaymentPlanError::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        };

        let body = Json(ErrorResponse {
            code: status.as_u16(),
            error,
        });

        (status, body).into_response()
    }
}

impl From<JsonRejection> for PaymentPlanError {
    fn from(rejection: JsonRejection) -> Self {
        PaymentPlanError::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for PaymentPlanError {
    fn from(rejection: PathRejection) -> Self {
        PaymentPlanError::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for PaymentPlanError {
    fn from(rejection: QueryRejection) -> Self {
        PaymentPlanError::Validation(rejection.body_text())
    }
}
