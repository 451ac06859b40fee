#[path = "common/mod.rs"]
mod common;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use serde_json::{Value, json};
use tower::ServiceExt; // for oneshot
use uuid::Uuid;

use common::{TestContext, bearer};

async fn send(
    app: Router,
    method: &str,
    uri: &str,
    authorization: Option<String>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(value) = authorization {
        builder = builder.header(header::AUTHORIZATION, value);
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

#[tokio::test]
async fn make_payment_returns_message_and_new_balance() {
    let ctx = TestContext::new().await;
    let plan_id = ctx.plan_with_total("1000").await;

    let (status, body) = send(
        ctx.app(),
        "POST",
        &format!("/api/v1/payment-plans/{}/make-payment", plan_id),
        Some(bearer(ctx.owner, "authenticated")),
        Some(json!({ "amount": 400 })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Payment successful.");
    assert_eq!(body["new_balance"], "600.00");
}

#[tokio::test]
async fn make_payment_rejections_are_bad_requests_with_an_error_field() {
    let ctx = TestContext::new().await;
    let plan_id = ctx.plan_with_total("1000").await;
    let uri = format!("/api/v1/payment-plans/{}/make-payment", plan_id);

    for amount in [json!(-5), json!("abc"), json!(1000.01)] {
        let (status, body) = send(
            ctx.app(),
            "POST",
            &uri,
            Some(bearer(ctx.owner, "authenticated")),
            Some(json!({ "amount": amount })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], 400);
        assert!(body["error"].is_string());
    }

    assert_eq!(ctx.store.payment_count().await, 0);
}

#[tokio::test]
async fn make_payment_with_unparseable_body_is_a_bad_request() {
    let ctx = TestContext::new().await;
    let plan_id = ctx.plan_with_total("1000").await;

    let request = Request::builder()
        .method("POST")
        .uri(format!("/api/v1/payment-plans/{}/make-payment", plan_id))
        .header(header::AUTHORIZATION, bearer(ctx.owner, "authenticated"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let response = ctx.app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn make_payment_on_unknown_plan_is_not_found() {
    let ctx = TestContext::new().await;

    let (status, body) = send(
        ctx.app(),
        "POST",
        &format!("/api/v1/payment-plans/{}/make-payment", Uuid::new_v4()),
        Some(bearer(ctx.owner, "authenticated")),
        Some(json!({ "amount": 10 })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 404);
}

#[tokio::test]
async fn make_payment_by_a_stranger_is_forbidden() {
    let ctx = TestContext::new().await;
    let plan_id = ctx.plan_with_total("1000").await;

    let (status, _) = send(
        ctx.app(),
        "POST",
        &format!("/api/v1/payment-plans/{}/make-payment", plan_id),
        Some(bearer(Uuid::new_v4(), "authenticated")),
        Some(json!({ "amount": 10 })),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn requests_without_a_token_are_unauthorized() {
    let ctx = TestContext::new().await;

    let (status, body) = send(ctx.app(), "GET", "/api/v1/payment-plans/", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 401);

    let (status, _) = send(
        ctx.app(),
        "GET",
        "/api/v1/payment-plans",
        Some("Bearer not-a-jwt".to_string()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn listing_includes_property_and_balance() {
    let ctx = TestContext::new().await;
    let plan_id = ctx.plan_with_total("1000").await;
    ctx.plans
        .accept_payment(
            ctx.owner_actor(),
            plan_id,
            estate_payments::domain::value_objects::payment_plans::MakePaymentModel {
                amount: json!("250"),
                method: Some("card".to_string()),
                reference: None,
            },
        )
        .await
        .unwrap();

    let (status, body) = send(
        ctx.app(),
        "GET",
        "/api/v1/payment-plans/",
        Some(bearer(ctx.owner, "authenticated")),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let plans = body.as_array().unwrap();
    assert_eq!(plans.len(), 1);
    assert_eq!(plans[0]["id"], plan_id.to_string());
    assert_eq!(plans[0]["property"]["title"], "Lekki Phase 1 Duplex");
    assert_eq!(plans[0]["amount_paid"], "250.00");
    assert_eq!(plans[0]["balance"], "750.00");
}

#[tokio::test]
async fn create_plan_returns_created() {
    let ctx = TestContext::new().await;

    let (status, body) = send(
        ctx.app(),
        "POST",
        "/api/v1/payment-plans",
        Some(bearer(ctx.owner, "authenticated")),
        Some(json!({
            "property_id": ctx.property_id,
            "plan_type": "Sponsorship",
            "total_amount": "2500.00",
            "installments": 5,
            "next_due_date": "2026-12-01"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["plan_type"], "Sponsorship");
    assert_eq!(body["amount_paid"], "0.00");
    assert_eq!(body["balance"], "2500.00");
    assert_eq!(body["user"], ctx.owner.to_string());
}

#[tokio::test]
async fn delete_plan_returns_no_content_then_not_found() {
    let ctx = TestContext::new().await;
    let plan_id = ctx.plan_with_total("1000").await;
    let uri = format!("/api/v1/payment-plans/{}", plan_id);

    let (status, _) = send(
        ctx.app(),
        "DELETE",
        &uri,
        Some(bearer(ctx.owner, "authenticated")),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(
        ctx.app(),
        "DELETE",
        &uri,
        Some(bearer(ctx.owner, "authenticated")),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn staff_record_and_promote_a_pending_payment() {
    let ctx = TestContext::new().await;
    let plan_id = ctx.plan_with_total("1000").await;

    let (status, payment) = send(
        ctx.app(),
        "POST",
        &format!("/api/v1/payment-plans/{}/payments", plan_id),
        Some(bearer(ctx.staff, "staff")),
        Some(json!({ "amount": "300", "method": "ussd", "status": "pending" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(payment["status"], "pending");

    let (status, change) = send(
        ctx.app(),
        "PATCH",
        &format!("/api/v1/payments/{}/status", payment["id"].as_str().unwrap()),
        Some(bearer(ctx.staff, "staff")),
        Some(json!({ "status": "successful" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(change["amount_paid"], "300.00");
    assert_eq!(change["balance"], "700.00");
    assert_eq!(change["payment"]["status"], "successful");
}

#[tokio::test]
async fn non_staff_cannot_record_payments_or_read_reports() {
    let ctx = TestContext::new().await;
    let plan_id = ctx.plan_with_total("1000").await;

    let (status, _) = send(
        ctx.app(),
        "POST",
        &format!("/api/v1/payment-plans/{}/payments", plan_id),
        Some(bearer(ctx.owner, "authenticated")),
        Some(json!({ "amount": "300" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        ctx.app(),
        "GET",
        "/api/v1/reports/summary",
        Some(bearer(ctx.owner, "authenticated")),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn report_summary_for_staff() {
    let ctx = TestContext::new().await;
    let plan_id = ctx.plan_with_total("1000").await;
    ctx.plans
        .accept_payment(
            ctx.owner_actor(),
            plan_id,
            estate_payments::domain::value_objects::payment_plans::MakePaymentModel {
                amount: json!(120),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let (status, body) = send(
        ctx.app(),
        "GET",
        "/api/v1/reports/summary?limit=5",
        Some(bearer(ctx.staff, "staff")),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["successful_total"], "120.00");
    assert_eq!(body["status_counts"]["successful"], 1);
    assert_eq!(body["recent_payments"].as_array().unwrap().len(), 1);

    let (status, _) = send(
        ctx.app(),
        "GET",
        "/api/v1/reports/summary?limit=0",
        Some(bearer(ctx.staff, "staff")),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn payments_by_property_lists_successful_payments() {
    let ctx = TestContext::new().await;
    let plan_id = ctx.plan_with_total("1000").await;
    send(
        ctx.app(),
        "POST",
        &format!("/api/v1/payment-plans/{}/make-payment", plan_id),
        Some(bearer(ctx.owner, "authenticated")),
        Some(json!({ "amount": "75.5", "reference": "TRX-77" })),
    )
    .await;

    let (status, body) = send(
        ctx.app(),
        "GET",
        &format!("/api/v1/payments-by-property/{}", ctx.property_id),
        Some(bearer(ctx.owner, "authenticated")),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let payments = body.as_array().unwrap();
    assert_eq!(payments.len(), 1);
    assert_eq!(payments[0]["amount"], "75.50");
    assert_eq!(payments[0]["reference"], "TRX-77");
}

#[tokio::test]
async fn health_check_needs_no_token() {
    let ctx = TestContext::new().await;
    let response = ctx
        .app()
        .oneshot(
            Request::builder()
                .uri("/api/v1/health-check")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn unknown_routes_fall_back_to_not_found() {
    let ctx = TestContext::new().await;
    let (status, body) = send(ctx.app(), "GET", "/api/v2/nothing", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 404);
}
