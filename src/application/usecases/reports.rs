use std::sync::Arc;

use tracing::{error, info, warn};

use crate::{
    application::usecases::payment_plans::{PaymentPlanError, UseCaseResult},
    domain::{
        repositories::reports::PaymentReportRepository,
        value_objects::{
            iam::Actor,
            reports::{
                PaymentReportDto, PaymentReportQuery, PaymentStatusCountsDto, RecentPaymentDto,
            },
        },
    },
};

pub const DEFAULT_RECENT_LIMIT: i64 = 10;
pub const MAX_RECENT_LIMIT: i64 = 100;

pub struct ReportUseCase<R>
where
    R: PaymentReportRepository + Send + Sync + 'static,
{
    report_repo: Arc<R>,
}

impl<R> ReportUseCase<R>
where
    R: PaymentReportRepository + Send + Sync + 'static,
{
    pub fn new(report_repo: Arc<R>) -> Self {
        Self { report_repo }
    }

    pub async fn summary(
        &self,
        actor: Actor,
        query: PaymentReportQuery,
    ) -> UseCaseResult<PaymentReportDto> {
        let user_id = actor.user_id;
        if !actor.is_staff {
            let err = PaymentPlanError::Unauthorized;
            warn!(
                %user_id,
                status = err.status_code().as_u16(),
                "reports: summary requested by non-staff user"
            );
            return Err(err);
        }

        let limit = resolve_limit(query.limit)?;
        info!(%user_id, limit, "reports: building payment summary");

        let successful_total = self
            .report_repo
            .successful_total_all()
            .await
            .map_err(|err| {
                error!(db_error = ?err, "reports: failed to sum successful payments");
                PaymentPlanError::Internal(err)
            })?;

        let status_rows = self.report_repo.count_by_status().await.map_err(|err| {
            error!(db_error = ?err, "reports: failed to count payments by status");
            PaymentPlanError::Internal(err)
        })?;

        let recent = self
            .report_repo
            .recent_payments(limit)
            .await
            .map_err(|err| {
                error!(limit, db_error = ?err, "reports: failed to load recent payments");
                PaymentPlanError::Internal(err)
            })?;

        Ok(PaymentReportDto {
            successful_total,
            status_counts: PaymentStatusCountsDto::from_rows(status_rows),
            recent_payments: recent.into_iter().map(RecentPaymentDto::from).collect(),
        })
    }
}

fn resolve_limit(limit: Option<i64>) -> UseCaseResult<i64> {
    match limit {
        None => Ok(DEFAULT_RECENT_LIMIT),
        Some(limit) if limit <= 0 => Err(PaymentPlanError::Validation(
            "limit must be a positive integer".to_string(),
        )),
        Some(limit) => Ok(limit.min(MAX_RECENT_LIMIT)),
    }
}
