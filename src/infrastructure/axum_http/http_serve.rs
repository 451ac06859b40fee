use crate::{
    application::usecases::{payment_plans::PaymentPlanUseCase, reports::ReportUseCase},
    config::config_model::DotEnvyConfig,
    domain::repositories::{
        payment_plans::PaymentPlanRepository, payments::PaymentRepository,
        reports::PaymentReportRepository,
    },
    infrastructure::{
        axum_http::{default_routers, routers},
        postgres::{
            postgres_connection::PgPoolSquad,
            repositories::{
                payment_plans::PaymentPlanPostgres, payments::PaymentPostgres,
                reports::PaymentReportPostgres,
            },
        },
    },
};
use anyhow::Result;
use axum::{
    Router,
    http::{
        Method, StatusCode,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
    routing::get,
};
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;

/// Every `/api/v1` route, independent of the storage behind the use cases.
pub fn api_router<P, L, R>(
    payment_plan_usecase: Arc<PaymentPlanUseCase<P, L>>,
    report_usecase: Arc<ReportUseCase<R>>,
) -> Router
where
    P: PaymentPlanRepository + Send + Sync + 'static,
    L: PaymentRepository + Send + Sync + 'static,
    R: PaymentReportRepository + Send + Sync + 'static,
{
    let api = Router::new()
        .merge(routers::payment_plans::routes(Arc::clone(
            &payment_plan_usecase,
        )))
        .merge(routers::payments::routes(payment_plan_usecase))
        .merge(routers::reports::routes(report_usecase))
        .route("/health-check", get(default_routers::health_check));

    Router::new()
        .nest("/api/v1", api)
        .fallback(default_routers::not_found)
}

fn timeout_layer(timeout: Duration) -> TimeoutLayer {
    TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, timeout)
}

pub async fn start(config: Arc<DotEnvyConfig>, db_pool: Arc<PgPoolSquad>) -> Result<()> {
    let payment_plan_usecase = PaymentPlanUseCase::new(
        Arc::new(PaymentPlanPostgres::new(Arc::clone(&db_pool))),
        Arc::new(PaymentPostgres::new(Arc::clone(&db_pool))),
    );
    let report_usecase =
        ReportUseCase::new(Arc::new(PaymentReportPostgres::new(Arc::clone(&db_pool))));

    let app = api_router(Arc::new(payment_plan_usecase), Arc::new(report_usecase))
        .layer(timeout_layer(Duration::from_secs(config.server.timeout)))
        .layer(RequestBodyLimitLayer::new(
            (config.server.body_limit * 1024 * 1024).try_into()?,
        ))
        .layer(
            CorsLayer::new()
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PATCH,
                    Method::DELETE,
                ])
                .allow_headers([AUTHORIZATION, CONTENT_TYPE])
                .allow_origin(Any),
        )
        .layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    let listener = TcpListener::bind(addr).await?;

    info!(port = config.server.port, "http: server is running");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "http: failed to install ctrl+c handler");
            std::future::pending::<()>().await;
        }
    };

    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("http: received ctrl+c signal"),
        _ = terminate => info!("http: received terminate signal"),
    }
}
