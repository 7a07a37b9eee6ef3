#![allow(clippy::unwrap_used, clippy::expect_used)]

//! `/susu/v1` routes driven through the axum router.

mod common;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use susu::{Role, SusuModule};
use tower::ServiceExt as _;

async fn app() -> (SusuModule, Router) {
    let (_db, module) = common::setup().await;
    let router = module.register_rest(Router::new());
    (module, router)
}

fn request(method: &str, uri: &str, actor: Option<i32>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(actor) = actor {
        builder = builder.header("x-actor-id", actor.to_string());
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(router: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

#[tokio::test]
async fn create_and_fetch_user() {
    let (_module, router) = app().await;

    let (status, created) = send(
        &router,
        request(
            "POST",
            "/susu/v1/users",
            Some(1),
            Some(json!({"fullName": "Akua Boateng", "phoneNumber": "0201112222", "username": "akua"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["role"], "customer");
    assert_eq!(created["audit"]["createdBy"], 1);

    let id = created["id"].as_i64().unwrap();
    let (status, fetched) = send(&router, request("GET", &format!("/susu/v1/users/{id}"), None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["username"], "akua");
}

#[tokio::test]
async fn validation_errors_are_problem_details() {
    let (_module, router) = app().await;

    let response = router
        .clone()
        .oneshot(request(
            "POST",
            "/susu/v1/users",
            None,
            Some(json!({"fullName": "  ", "phoneNumber": "0201112222", "username": "blank"})),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        susu_errors::APPLICATION_PROBLEM_JSON
    );
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let problem: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(problem["code"], "validation");
    assert_eq!(problem["errors"][0]["field"], "full_name");
}

#[tokio::test]
async fn unknown_user_is_404() {
    let (_module, router) = app().await;

    let (status, problem) = send(&router, request("GET", "/susu/v1/users/999", None, None)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(problem["code"], "not_found");
}

#[tokio::test]
async fn bad_actor_header_is_400() {
    let (_module, router) = app().await;
    let req = Request::builder()
        .uri("/susu/v1/users")
        .header("x-actor-id", "nobody")
        .body(Body::empty())
        .unwrap();

    let (status, problem) = send(&router, req).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(problem["code"], "invalid_header");
}

#[tokio::test]
async fn settings_lifecycle() {
    let (module, router) = app().await;
    let user = common::seed_user(&module, "kobby", Role::Customer).await;
    let uri = format!("/susu/v1/users/{}/settings", user.id);

    let (status, body) = send(
        &router,
        request("PUT", &uri, Some(user.id), Some(json!({"notificationMethod": "sms"}))),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["notificationMethod"], "sms");
    assert_eq!(body["audit"]["updatedBy"], user.id);

    let (status, _) = send(&router, request("DELETE", &uri, None, None)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&router, request("GET", &uri, None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["notificationMethod"], "both");
    assert_eq!(body["stored"], false);

    let (status, _) = send(&router, request("DELETE", &uri, None, None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, problem) = send(
        &router,
        request("PUT", &uri, None, Some(json!({"notificationMethod": "pigeon"}))),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(problem["errors"][0]["field"], "notification_method");
}

#[tokio::test]
async fn membership_routes() {
    let (module, router) = app().await;
    let agent = common::seed_user(&module, "agent", Role::Agent).await;
    let customer = common::seed_user(&module, "cust", Role::Customer).await;
    let business = common::seed_business(&module, agent.id, "Nima").await;
    let member_uri = format!("/susu/v1/businesses/{}/members/{}", business.id, customer.id);

    for _ in 0..2 {
        let (status, _) = send(&router, request("PUT", &member_uri, Some(agent.id), None)).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    let (_, members) = send(
        &router,
        request("GET", &format!("/susu/v1/businesses/{}/members", business.id), None, None),
    )
    .await;
    let ids: Vec<i64> = members
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![i64::from(agent.id), i64::from(customer.id)]);

    let (status, switched) = send(
        &router,
        request(
            "PUT",
            &format!("/susu/v1/users/{}/active-business", customer.id),
            Some(customer.id),
            Some(json!({"businessId": business.id})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(switched["activeBusinessId"], business.id);

    let (_, removed) = send(&router, request("DELETE", &member_uri, None, None)).await;
    assert_eq!(removed["removed"], 1);
    let (_, removed) = send(&router, request("DELETE", &member_uri, None, None)).await;
    assert_eq!(removed["removed"], 0);

    let (_, ids) = send(
        &router,
        request("GET", &format!("/susu/v1/users/{}/businesses", customer.id), None, None),
    )
    .await;
    assert_eq!(ids["businessIds"], json!([]));
}

#[tokio::test]
async fn savings_routes() {
    let (module, router) = app().await;
    let agent = common::seed_user(&module, "agent", Role::Agent).await;
    let customer = common::seed_user(&module, "cust", Role::Customer).await;
    let business = common::seed_business(&module, agent.id, "Ashaiman").await;
    let open = json!({
        "customerId": customer.id,
        "businessId": business.id,
        "dailyAmount": 200,
        "durationMonths": 1,
        "startDate": "2024-04-01",
        "commissionDays": 10
    });

    let (status, problem) = send(
        &router,
        request("POST", "/susu/v1/savings", Some(agent.id), Some(open.clone())),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(problem["errors"][0]["field"], "customer_id");

    common::link(&module, customer.id, business.id).await;
    let (status, account) = send(
        &router,
        request(
            "POST",
            "/susu/v1/savings",
            Some(agent.id),
            Some(open),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(account["endDate"], "2024-04-30");
    assert_eq!(account["totalCommission"], 600);
    assert_eq!(account["targetAmount"], 6_000);
    assert_eq!(account["status"], "not_started");
    let id = account["id"].as_i64().unwrap();

    let pay_uri = format!("/susu/v1/savings/{id}/markings/2024-04-11/pay");
    let (status, marking) = send(
        &router,
        request("POST", &pay_uri, Some(agent.id), Some(json!({"paymentMethod": "mobile_money", "paymentReference": "MM-77"}))),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(marking["status"], "paid");
    assert_eq!(marking["markedById"], agent.id);

    let (status, _) = send(
        &router,
        request("POST", &pay_uri, Some(agent.id), Some(json!({"paymentMethod": "cash"}))),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, commissions) = send(
        &router,
        request("GET", &format!("/susu/v1/savings/{id}/commissions"), None, None),
    )
    .await;
    assert_eq!(commissions[0]["commissionDate"], "2024-04-11");
    assert_eq!(commissions[0]["amount"], 200);

    let (_, markings) = send(
        &router,
        request("GET", &format!("/susu/v1/savings/{id}/markings"), None, None),
    )
    .await;
    assert_eq!(markings.as_array().unwrap().len(), 30);
    let marking_id = markings[0]["id"].as_i64().unwrap();

    let (status, _) = send(
        &router,
        request(
            "PATCH",
            &format!("/susu/v1/markings/{marking_id}/status"),
            None,
            Some(json!({"status": "skipped"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (_, fetched) = send(&router, request("GET", &format!("/susu/v1/savings/{id}"), None, None)).await;
    assert_eq!(fetched["status"], "in_progress");

    let end_uri = format!("/susu/v1/savings/{id}/end");
    let (status, ended) = send(&router, request("POST", &end_uri, Some(agent.id), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ended["status"], "completed");
    let (status, _) = send(&router, request("POST", &end_uri, Some(agent.id), None)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    let (status, _) = send(
        &router,
        request(
            "POST",
            &format!("/susu/v1/savings/{id}/markings/2024-04-12/pay"),
            Some(agent.id),
            Some(json!({"paymentMethod": "cash"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn target_savings_route() {
    let (module, router) = app().await;
    let agent = common::seed_user(&module, "agent", Role::Agent).await;
    let customer = common::seed_user(&module, "cust", Role::Customer).await;
    let business = common::seed_business(&module, agent.id, "Madina").await;
    let elsewhere = common::seed_business(&module, agent.id, "Dome").await;
    common::link(&module, customer.id, business.id).await;

    let (_, unit) = send(
        &router,
        request(
            "POST",
            &format!("/susu/v1/businesses/{}/units", elsewhere.id),
            Some(agent.id),
            Some(json!({"name": "Dome stall"})),
        ),
    )
    .await;
    let target = json!({
        "customerId": customer.id,
        "businessId": business.id,
        "targetAmount": 31_000,
        "startDate": "2024-05-01",
        "endDate": "2024-05-31"
    });

    let mut foreign = target.clone();
    foreign["unitId"] = unit["id"].clone();
    let (status, problem) = send(
        &router,
        request("POST", "/susu/v1/savings/target", Some(agent.id), Some(foreign)),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(problem["errors"][0]["field"], "unit_id");

    let (status, account) = send(
        &router,
        request("POST", "/susu/v1/savings/target", Some(agent.id), Some(target)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(account["savingsType"], "target");
    assert_eq!(account["dailyAmount"], 1_000);
    assert_eq!(account["durationMonths"], 1);
    assert_eq!(account["targetAmount"], 31_000);
}

#[tokio::test]
async fn business_and_unit_routes() {
    let (module, router) = app().await;
    let agent = common::seed_user(&module, "agent", Role::Agent).await;

    let (status, business) = send(
        &router,
        request(
            "POST",
            "/susu/v1/businesses",
            Some(agent.id),
            Some(json!({"name": "Circle Susu", "agentId": agent.id, "uniqueCode": "CIRC01"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(business["uniqueCode"], "CIRC01");
    let id = business["id"].as_i64().unwrap();

    let (status, _) = send(
        &router,
        request(
            "POST",
            "/susu/v1/businesses",
            Some(agent.id),
            Some(json!({"name": "Copy", "agentId": agent.id, "uniqueCode": "CIRC01"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let units_uri = format!("/susu/v1/businesses/{id}/units");
    let (status, unit) = send(
        &router,
        request("POST", &units_uri, Some(agent.id), Some(json!({"name": "Stall 4", "location": "Row B"}))),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(unit["businessId"], id);

    let (_, units) = send(&router, request("GET", &units_uri, None, None)).await;
    assert_eq!(units.as_array().unwrap().len(), 1);
}
