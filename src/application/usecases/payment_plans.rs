use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::domain::{
    entities::{
        payment_plans::{InsertPaymentPlanEntity, PaymentPlanEntity},
        payments::{InsertPaymentEntity, PaymentEntity},
    },
    repositories::{payment_plans::PaymentPlanRepository, payments::PaymentRepository},
    value_objects::{
        amounts::{AmountError, parse_payment_amount, parse_total_amount, zero_amount},
        enums::{
            payment_methods::PaymentMethod, payment_statuses::PaymentStatus,
            plan_types::PlanType,
        },
        iam::Actor,
        payment_plans::{
            CreatePaymentPlanModel, LedgerWriteOutcome, ListPaymentPlansFilter, MakePaymentModel,
            MakePaymentResponse, PaymentPlanDto,
        },
        payments::{
            PaymentDto, PaymentStatusChangeDto, RecordPaymentModel, UpdatePaymentStatusModel,
        },
    },
};

const MAX_REFERENCE_LEN: usize = 100;
const PAYMENT_SUCCESSFUL_MESSAGE: &str = "Payment successful.";

#[derive(Debug, Error)]
pub enum PaymentPlanError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    InvalidAmount(String),
    #[error(
        "payment exceeds total amount: {requested} requested, {amount_paid} of {total_amount} already paid"
    )]
    Overpayment {
        amount_paid: Decimal,
        requested: Decimal,
        total_amount: Decimal,
    },
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("not allowed to act on this payment plan")]
    Unauthorized,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl PaymentPlanError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            PaymentPlanError::Validation(_)
            | PaymentPlanError::InvalidAmount(_)
            | PaymentPlanError::Overpayment { .. } => StatusCode::BAD_REQUEST,
            PaymentPlanError::NotFound(_) => StatusCode::NOT_FOUND,
            PaymentPlanError::Unauthorized => StatusCode::FORBIDDEN,
            PaymentPlanError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<AmountError> for PaymentPlanError {
    fn from(value: AmountError) -> Self {
        PaymentPlanError::InvalidAmount(value.to_string())
    }
}

pub type UseCaseResult<T> = std::result::Result<T, PaymentPlanError>;

/// Owns `amount_paid`/balance derivation and the payment-acceptance protocol.
///
/// `amount_paid` is never adjusted here directly: every ledger change is
/// handed to the repository, which recomputes it from the ledger under the
/// plan lock.
pub struct PaymentPlanUseCase<P, L>
where
    P: PaymentPlanRepository + Send + Sync + 'static,
    L: PaymentRepository + Send + Sync + 'static,
{
    plan_repo: Arc<P>,
    payment_repo: Arc<L>,
}

impl<P, L> PaymentPlanUseCase<P, L>
where
    P: PaymentPlanRepository + Send + Sync + 'static,
    L: PaymentRepository + Send + Sync + 'static,
{
    pub fn new(plan_repo: Arc<P>, payment_repo: Arc<L>) -> Self {
        Self {
            plan_repo,
            payment_repo,
        }
    }

    pub async fn create_plan(
        &self,
        actor: Actor,
        model: CreatePaymentPlanModel,
    ) -> UseCaseResult<PaymentPlanDto> {
        let user_id = actor.user_id;
        let property_id = model.property_id;
        info!(%user_id, %property_id, "payment_plans: create requested");

        let plan_type = PlanType::from_str(&model.plan_type).ok_or_else(|| {
            let err = PaymentPlanError::Validation(format!(
                "plan_type must be one of Instalment, Sponsorship (got {})",
                model.plan_type
            ));
            warn!(
                %user_id,
                status = err.status_code().as_u16(),
                plan_type = %model.plan_type,
                "payment_plans: unknown plan type"
            );
            err
        })?;

        let total_amount = parse_total_amount(&model.total_amount).map_err(|err| {
            warn!(
                %user_id,
                error = %err,
                status = axum::http::StatusCode::BAD_REQUEST.as_u16(),
                "payment_plans: invalid total amount"
            );
            PaymentPlanError::from(err)
        })?;

        let installments = i32::try_from(model.installments)
            .ok()
            .filter(|installments| *installments > 0)
            .ok_or_else(|| {
                PaymentPlanError::Validation(
                    "installments must be a positive integer".to_string(),
                )
            })?;

        let insert_plan_entity = InsertPaymentPlanEntity {
            user_id,
            property_id,
            plan_type: plan_type.to_string(),
            total_amount,
            amount_paid: zero_amount(),
            installments,
            next_due_date: model.next_due_date,
            created_at: Utc::now(),
        };

        let plan = self
            .plan_repo
            .create(insert_plan_entity)
            .await
            .map_err(|err| {
                error!(
                    %user_id,
                    %property_id,
                    db_error = ?err,
                    "payment_plans: failed to create plan"
                );
                PaymentPlanError::Internal(err)
            })?
            .ok_or_else(|| {
                warn!(
                    %user_id,
                    %property_id,
                    status = axum::http::StatusCode::NOT_FOUND.as_u16(),
                    "payment_plans: property does not exist"
                );
                PaymentPlanError::NotFound("property")
            })?;

        info!(%user_id, plan_id = %plan.id, "payment_plans: plan created");
        self.load_plan_dto(plan.id).await
    }

    pub async fn get_plan(&self, actor: Actor, plan_id: Uuid) -> UseCaseResult<PaymentPlanDto> {
        let plan = self.find_plan(plan_id).await?;
        Self::ensure_access(&actor, &plan)?;
        self.load_plan_dto(plan_id).await
    }

    /// Staff see every plan, everybody else only their own. Newest first.
    pub async fn list_plans(&self, actor: Actor) -> UseCaseResult<Vec<PaymentPlanDto>> {
        let user_id = actor.user_id;
        info!(%user_id, is_staff = actor.is_staff, "payment_plans: listing plans");

        let listings = self
            .plan_repo
            .list(ListPaymentPlansFilter {
                plan_id: None,
                user_id: actor.owner_scope(),
            })
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "payment_plans: failed to list plans");
                PaymentPlanError::Internal(err)
            })?;

        let plan_count = listings.len();
        info!(%user_id, plan_count, "payment_plans: plans loaded");
        Ok(listings.into_iter().map(PaymentPlanDto::from).collect())
    }

    pub async fn delete_plan(&self, actor: Actor, plan_id: Uuid) -> UseCaseResult<()> {
        let user_id = actor.user_id;
        info!(%user_id, %plan_id, "payment_plans: delete requested");

        let plan = self.find_plan(plan_id).await?;
        Self::ensure_access(&actor, &plan)?;

        let deleted = self.plan_repo.delete(plan_id).await.map_err(|err| {
            error!(%user_id, %plan_id, db_error = ?err, "payment_plans: failed to delete plan");
            PaymentPlanError::Internal(err)
        })?;

        if !deleted {
            return Err(PaymentPlanError::NotFound("payment plan"));
        }

        info!(%user_id, %plan_id, "payment_plans: plan and its payments deleted");
        Ok(())
    }

    /// Re-derives `amount_paid` from the ledger. Safe to run at any time.
    pub async fn recompute(&self, plan_id: Uuid) -> UseCaseResult<PaymentPlanEntity> {
        let plan = self
            .plan_repo
            .recompute_amount_paid(plan_id)
            .await
            .map_err(|err| {
                error!(%plan_id, db_error = ?err, "payment_plans: failed to recompute amount paid");
                PaymentPlanError::Internal(err)
            })?
            .ok_or(PaymentPlanError::NotFound("payment plan"))?;

        info!(
            %plan_id,
            amount_paid = %plan.amount_paid,
            "payment_plans: amount paid recomputed from ledger"
        );
        Ok(plan)
    }

    /// The validated write path: look up, parse, guard, record, recompute.
    pub async fn accept_payment(
        &self,
        actor: Actor,
        plan_id: Uuid,
        model: MakePaymentModel,
    ) -> UseCaseResult<MakePaymentResponse> {
        let user_id = actor.user_id;
        info!(%user_id, %plan_id, "payment_plans: make-payment requested");

        let plan = self.find_plan(plan_id).await?;
        Self::ensure_access(&actor, &plan)?;

        let amount = parse_payment_amount(&model.amount).map_err(|err| {
            warn!(
                %user_id,
                %plan_id,
                error = %err,
                status = axum::http::StatusCode::BAD_REQUEST.as_u16(),
                "payment_plans: invalid payment amount"
            );
            PaymentPlanError::from(err)
        })?;
        let method = Self::parse_method(model.method.as_deref())?;
        let reference = Self::normalize_reference(model.reference)?;

        let insert_payment_entity = InsertPaymentEntity {
            payment_plan_id: plan_id,
            amount,
            payment_date: Utc::now(),
            method: method.to_string(),
            reference,
            status: PaymentStatus::Successful.to_string(),
        };

        let (plan, payment) = self.accept_locked(plan_id, insert_payment_entity).await?;
        let new_balance = plan.balance();

        info!(
            %user_id,
            %plan_id,
            payment_id = %payment.id,
            %amount,
            amount_paid = %plan.amount_paid,
            %new_balance,
            "payment_plans: payment accepted"
        );

        Ok(MakePaymentResponse {
            message: PAYMENT_SUCCESSFUL_MESSAGE.to_string(),
            new_balance,
        })
    }

    /// Staff ledger write for a payment whose processing outcome is known.
    /// Successful entries take the same guarded path as `accept_payment`.
    pub async fn record_payment(
        &self,
        actor: Actor,
        plan_id: Uuid,
        model: RecordPaymentModel,
    ) -> UseCaseResult<PaymentDto> {
        let user_id = actor.user_id;
        info!(%user_id, %plan_id, "payment_plans: ledger record requested");
        Self::require_staff(&actor)?;

        self.find_plan(plan_id).await?;

        let amount = parse_payment_amount(&model.amount).map_err(|err| match err {
            AmountError::NotPositive => PaymentPlanError::Validation(err.to_string()),
            other => other.into(),
        })?;
        let method = Self::parse_method(model.method.as_deref())?;
        let status = match model.status.as_deref() {
            None => PaymentStatus::Successful,
            Some(raw) => Self::parse_status(raw)?,
        };
        let reference = Self::normalize_reference(model.reference)?;

        let insert_payment_entity = InsertPaymentEntity {
            payment_plan_id: plan_id,
            amount,
            payment_date: model.payment_date.unwrap_or_else(Utc::now),
            method: method.to_string(),
            reference,
            status: status.to_string(),
        };

        let payment = if status.is_counted() {
            let (_, payment) = self.accept_locked(plan_id, insert_payment_entity).await?;
            payment
        } else {
            self.payment_repo
                .record(insert_payment_entity)
                .await
                .map_err(|err| {
                    error!(
                        %user_id,
                        %plan_id,
                        db_error = ?err,
                        "payment_plans: failed to record ledger entry"
                    );
                    PaymentPlanError::Internal(err)
                })?
        };

        info!(
            %user_id,
            %plan_id,
            payment_id = %payment.id,
            status = %status,
            "payment_plans: ledger entry recorded"
        );
        Ok(payment.into())
    }

    pub async fn update_payment_status(
        &self,
        actor: Actor,
        payment_id: Uuid,
        model: UpdatePaymentStatusModel,
    ) -> UseCaseResult<PaymentStatusChangeDto> {
        let user_id = actor.user_id;
        info!(%user_id, %payment_id, status = %model.status, "payment_plans: status change requested");
        Self::require_staff(&actor)?;

        let status = Self::parse_status(&model.status)?;

        let outcome = self
            .plan_repo
            .update_payment_status(payment_id, status)
            .await
            .map_err(|err| {
                error!(
                    %user_id,
                    %payment_id,
                    db_error = ?err,
                    "payment_plans: failed to update payment status"
                );
                PaymentPlanError::Internal(err)
            })?;

        let (plan, payment) = Self::applied_or_error(outcome)?;

        info!(
            %user_id,
            %payment_id,
            plan_id = %plan.id,
            amount_paid = %plan.amount_paid,
            "payment_plans: payment status updated"
        );

        Ok(PaymentStatusChangeDto {
            payment: payment.into(),
            amount_paid: plan.amount_paid,
            balance: plan.balance(),
        })
    }

    /// Sum of the plan's successful ledger entries, read straight from the ledger.
    pub async fn successful_total(&self, plan_id: Uuid) -> UseCaseResult<Decimal> {
        self.payment_repo
            .successful_total(plan_id)
            .await
            .map_err(|err| {
                error!(%plan_id, db_error = ?err, "payment_plans: failed to sum ledger");
                PaymentPlanError::Internal(err)
            })
    }

    pub async fn get_payment(&self, actor: Actor, payment_id: Uuid) -> UseCaseResult<PaymentDto> {
        let payment = self
            .payment_repo
            .find_by_id(payment_id)
            .await
            .map_err(|err| {
                error!(%payment_id, db_error = ?err, "payment_plans: failed to load payment");
                PaymentPlanError::Internal(err)
            })?
            .ok_or(PaymentPlanError::NotFound("payment"))?;

        let plan = self.find_plan(payment.payment_plan_id).await?;
        Self::ensure_access(&actor, &plan)?;

        Ok(payment.into())
    }

    /// Ledger of one plan ordered by payment date.
    pub async fn list_plan_payments(
        &self,
        actor: Actor,
        plan_id: Uuid,
    ) -> UseCaseResult<Vec<PaymentDto>> {
        let plan = self.find_plan(plan_id).await?;
        Self::ensure_access(&actor, &plan)?;

        let payments = self
            .payment_repo
            .list_by_plan(plan_id)
            .await
            .map_err(|err| {
                error!(%plan_id, db_error = ?err, "payment_plans: failed to list plan payments");
                PaymentPlanError::Internal(err)
            })?;

        Ok(payments.into_iter().map(PaymentDto::from).collect())
    }

    /// Successful payments on plans for `property_id`, scoped to the caller's
    /// own plans unless the caller is staff.
    pub async fn list_successful_payments_by_property(
        &self,
        actor: Actor,
        property_id: Uuid,
    ) -> UseCaseResult<Vec<PaymentDto>> {
        let user_id = actor.user_id;
        info!(%user_id, %property_id, "payment_plans: payments by property requested");

        let payments = self
            .payment_repo
            .list_successful_by_property(property_id, actor.owner_scope())
            .await
            .map_err(|err| {
                error!(
                    %user_id,
                    %property_id,
                    db_error = ?err,
                    "payment_plans: failed to list payments by property"
                );
                PaymentPlanError::Internal(err)
            })?;

        Ok(payments.into_iter().map(PaymentDto::from).collect())
    }

    async fn accept_locked(
        &self,
        plan_id: Uuid,
        insert_payment_entity: InsertPaymentEntity,
    ) -> UseCaseResult<(PaymentPlanEntity, PaymentEntity)> {
        let outcome = self
            .plan_repo
            .accept_payment(plan_id, insert_payment_entity)
            .await
            .map_err(|err| {
                error!(%plan_id, db_error = ?err, "payment_plans: failed to accept payment");
                PaymentPlanError::Internal(err)
            })?;

        Self::applied_or_error(outcome).map_err(|err| {
            warn!(
                %plan_id,
                error = %err,
                status = err.status_code().as_u16(),
                "payment_plans: payment rejected"
            );
            err
        })
    }

    fn applied_or_error(
        outcome: LedgerWriteOutcome,
    ) -> UseCaseResult<(PaymentPlanEntity, PaymentEntity)> {
        match outcome {
            LedgerWriteOutcome::Applied { plan, payment } => Ok((plan, payment)),
            LedgerWriteOutcome::PlanNotFound => Err(PaymentPlanError::NotFound("payment plan")),
            LedgerWriteOutcome::PaymentNotFound => Err(PaymentPlanError::NotFound("payment")),
            LedgerWriteOutcome::Overpayment {
                amount_paid,
                requested,
                total_amount,
            } => Err(PaymentPlanError::Overpayment {
                amount_paid,
                requested,
                total_amount,
            }),
        }
    }

    async fn find_plan(&self, plan_id: Uuid) -> UseCaseResult<PaymentPlanEntity> {
        self.plan_repo
            .find_by_id(plan_id)
            .await
            .map_err(|err| {
                error!(%plan_id, db_error = ?err, "payment_plans: failed to load plan");
                PaymentPlanError::Internal(err)
            })?
            .ok_or_else(|| {
                let err = PaymentPlanError::NotFound("payment plan");
                warn!(
                    %plan_id,
                    status = err.status_code().as_u16(),
                    "payment_plans: plan not found"
                );
                err
            })
    }

    async fn load_plan_dto(&self, plan_id: Uuid) -> UseCaseResult<PaymentPlanDto> {
        let listing = self
            .plan_repo
            .list(ListPaymentPlansFilter {
                plan_id: Some(plan_id),
                user_id: None,
            })
            .await
            .map_err(|err| {
                error!(%plan_id, db_error = ?err, "payment_plans: failed to load plan listing");
                PaymentPlanError::Internal(err)
            })?
            .into_iter()
            .next()
            .ok_or(PaymentPlanError::NotFound("payment plan"))?;

        Ok(listing.into())
    }

    fn ensure_access(actor: &Actor, plan: &PaymentPlanEntity) -> UseCaseResult<()> {
        if actor.can_access(plan.user_id) {
            return Ok(());
        }

        let err = PaymentPlanError::Unauthorized;
        warn!(
            user_id = %actor.user_id,
            plan_id = %plan.id,
            status = err.status_code().as_u16(),
            "payment_plans: caller is neither owner nor staff"
        );
        Err(err)
    }

    fn require_staff(actor: &Actor) -> UseCaseResult<()> {
        if actor.is_staff {
            return Ok(());
        }

        let err = PaymentPlanError::Unauthorized;
        warn!(
            user_id = %actor.user_id,
            status = err.status_code().as_u16(),
            "payment_plans: staff-only operation attempted"
        );
        Err(err)
    }

    fn parse_method(raw: Option<&str>) -> UseCaseResult<PaymentMethod> {
        match raw.map(str::trim).filter(|value| !value.is_empty()) {
            None => Ok(PaymentMethod::default()),
            Some(value) => PaymentMethod::from_str(value).ok_or_else(|| {
                PaymentPlanError::Validation(format!(
                    "method must be one of bank_transfer, card, cash, ussd (got {})",
                    value
                ))
            }),
        }
    }

    fn parse_status(raw: &str) -> UseCaseResult<PaymentStatus> {
        PaymentStatus::from_str(raw.trim()).ok_or_else(|| {
            PaymentPlanError::Validation(format!(
                "status must be one of pending, successful, failed (got {})",
                raw
            ))
        })
    }

    fn normalize_reference(raw: Option<String>) -> UseCaseResult<Option<String>> {
        let reference = raw
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());

        if let Some(value) = reference.as_ref() {
            if value.chars().count() > MAX_REFERENCE_LEN {
                return Err(PaymentPlanError::Validation(format!(
                    "reference must be at most {} characters",
                    MAX_REFERENCE_LEN
                )));
            }
        }

        Ok(reference)
    }
}
