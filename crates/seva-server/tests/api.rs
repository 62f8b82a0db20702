//! Router tests driven through `tower::ServiceExt::oneshot`.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use futures::StreamExt;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use seva_auth::AuthService;
use seva_config::AuthConfig;
use seva_db::service::SevaService;
use seva_server::{AppState, router};
use seva_storage::ImageStore;
use tower::ServiceExt;

async fn app() -> (Router, Arc<SevaService>) {
    let store = Arc::new(
        SevaService::new_local(":memory:", Some(ImageStore::in_memory()))
            .await
            .unwrap(),
    );
    let auth = AuthService::new(Arc::clone(&store), AuthConfig::default());
    (router(AppState::new(Arc::clone(&store), auth)), store)
}

fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn pothole_report() -> Value {
    json!({
        "title": "Crater near the bus stop",
        "description": "Two-wheelers keep skidding",
        "category": "pothole",
        "location": "Indiranagar",
        "priority": "high",
        "ward": "Ward 8"
    })
}

#[tokio::test]
async fn complaint_returns_id_and_success() {
    let (app, store) = app().await;
    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/complaints",
            &json!({
                "title": "Garbage Not Collected",
                "description": "Bins overflowing for a week",
                "location": "Koramangala",
                "category": "garbage",
                "images": []
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));

    let id = body["id"].as_str().unwrap();
    let issue = store.get_issue(id).await.unwrap();
    assert_eq!(issue.priority.as_str(), "low");
    assert_eq!(issue.status.as_str(), "open");
}

#[tokio::test]
async fn malformed_json_is_a_400_with_error_body() {
    let (app, _) = app().await;
    let request = Request::builder()
        .method("POST")
        .uri("/api/complaints")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn legacy_status_spelling_is_rejected_by_the_api() {
    let (app, _) = app().await;
    let (status, created) = send(&app, json_request("POST", "/api/issues", &pothole_report())).await;
    assert_eq!(status, StatusCode::CREATED);
    let uri = format!("/api/issues/{}/status", created["id"].as_str().unwrap());
    let (status, body) = send(&app, json_request("POST", &uri, &json!({"status": "pending"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn assign_then_reassign_overwrites() {
    let (app, store) = app().await;
    let (_, created) = send(&app, json_request("POST", "/api/issues", &pothole_report())).await;
    let id = created["id"].as_str().unwrap().to_string();
    let uri = format!("/api/issues/{id}/assign");

    let (status, body) = send(
        &app,
        json_request("POST", &uri, &json!({"workerId": "wrk-00000001", "workerName": "Ravi Kumar"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true}));

    send(
        &app,
        json_request("POST", &uri, &json!({"workerId": "wrk-00000002", "workerName": "Arjun Patel"})),
    )
    .await;
    let issue = store.get_issue(&id).await.unwrap();
    let assignment = issue.assigned_to.unwrap();
    assert_eq!(assignment.worker_id, "wrk-00000002");
    assert_eq!(issue.status.as_str(), "assigned");
}

#[tokio::test]
async fn assigning_unknown_issue_is_404() {
    let (app, _) = app().await;
    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/issues/iss-deadbeef/assign",
            &json!({"workerId": "wrk-00000001", "workerName": "Ravi Kumar"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("iss-deadbeef"));
}

#[tokio::test]
async fn list_filters_by_status_and_limit() {
    let (app, store) = app().await;
    store.seed_sample_data().await.unwrap();

    let (status, body) = send(&app, get("/api/issues?status=open")).await;
    assert_eq!(status, StatusCode::OK);
    let issues = body.as_array().unwrap();
    assert_eq!(issues.len(), 2);
    assert!(issues.iter().all(|i| i["status"] == "open"));

    let (_, body) = send(&app, get("/api/issues?limit=1")).await;
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, _) = send(&app, get("/api/issues?status=pending")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn patch_updates_fields_and_clears_ward() {
    let (app, _) = app().await;
    let (_, created) = send(&app, json_request("POST", "/api/issues", &pothole_report())).await;
    let uri = format!("/api/issues/{}", created["id"].as_str().unwrap());

    let (status, body) = send(
        &app,
        json_request("PATCH", &uri, &json!({"priority": "urgent", "ward": null})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["priority"], "urgent");
    assert_eq!(body["ward"], Value::Null);
    assert_eq!(body["title"], "Crater near the bus stop");
}

#[tokio::test]
async fn inline_image_is_uploaded_and_linked() {
    let (app, _) = app().await;
    let mut report = pothole_report();
    report["image"] = json!({"fileName": "crater.jpg", "data": "/9j/4AAQ"});
    let (status, body) = send(&app, json_request("POST", "/api/issues", &report)).await;
    assert_eq!(status, StatusCode::CREATED);
    let url = body["images"][0].as_str().unwrap();
    assert!(url.starts_with("memory://seva/issues/"));
    assert!(url.ends_with("/crater.jpg"));

    report["image"] = json!({"fileName": "x.jpg", "data": "***"});
    let (status, _) = send(&app, json_request("POST", "/api/issues", &report)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn bearer_token_fills_reporter_and_me() {
    let (app, _) = app().await;
    let (status, session) = send(
        &app,
        json_request(
            "POST",
            "/api/auth/register",
            &json!({"email": "asha@example.org", "password": "secret-42", "displayName": "Asha"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let bearer = format!("Bearer {}", session["token"].as_str().unwrap());

    let mut request = json_request("POST", "/api/issues", &pothole_report());
    request
        .headers_mut()
        .insert(header::AUTHORIZATION, bearer.parse().unwrap());
    let (_, issue) = send(&app, request).await;
    assert_eq!(issue["reportedBy"]["name"], "Asha");
    assert_eq!(issue["reportedBy"]["email"], "asha@example.org");

    let me = Request::builder()
        .uri("/api/auth/me")
        .header(header::AUTHORIZATION, &bearer)
        .body(Body::empty())
        .unwrap();
    let (status, principal) = send(&app, me).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(principal["displayName"], "Asha");

    let sign_out = Request::builder()
        .method("POST")
        .uri("/api/auth/signout")
        .header(header::AUTHORIZATION, &bearer)
        .body(Body::empty())
        .unwrap();
    send(&app, sign_out).await;

    let me_again = Request::builder()
        .uri("/api/auth/me")
        .header(header::AUTHORIZATION, &bearer)
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, me_again).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn anonymous_reports_are_guest() {
    let (app, _) = app().await;
    let (_, issue) = send(&app, json_request("POST", "/api/issues", &pothole_report())).await;
    assert_eq!(issue["reportedBy"]["name"], "guest");
    assert_eq!(issue["reportedBy"]["userId"], Value::Null);
}

#[tokio::test]
async fn wrong_password_is_401() {
    let (app, _) = app().await;
    send(
        &app,
        json_request(
            "POST",
            "/api/auth/register",
            &json!({"email": "asha@example.org", "password": "secret-42"}),
        ),
    )
    .await;
    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/auth/signin",
            &json!({"email": "asha@example.org", "password": "not-it"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "invalid email or password");
}

#[tokio::test]
async fn dashboard_groups_seeded_data() {
    let (app, store) = app().await;
    store.seed_sample_data().await.unwrap();
    let (status, body) = send(&app, get("/api/dashboard")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["issues"]["new"].as_array().unwrap().len(), 2);
    assert_eq!(body["issues"]["ongoing"].as_array().unwrap().len(), 2);
    assert_eq!(body["workers"]["free"], 2);
    assert_eq!(body["workers"]["onBreak"], 1);
}

#[tokio::test]
async fn workers_filter_client_side() {
    let (app, store) = app().await;
    store.seed_sample_data().await.unwrap();
    let (_, body) = send(&app, get("/api/workers?status=free")).await;
    assert_eq!(body.as_array().unwrap().len(), 2);
    let (_, body) = send(&app, get("/api/workers?department=roads")).await;
    assert_eq!(body[0]["name"], "Arjun Patel");
}

#[tokio::test]
async fn stream_sends_a_snapshot_first() {
    let (app, store) = app().await;
    store.seed_sample_data().await.unwrap();
    let response = app
        .oneshot(get("/api/issues/stream?status=open"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/event-stream"
    );

    let mut body = response.into_body().into_data_stream();
    let chunk = tokio::time::timeout(Duration::from_secs(2), body.next())
        .await
        .unwrap()
        .unwrap()
        .unwrap();
    let text = String::from_utf8(chunk.to_vec()).unwrap();
    assert!(text.starts_with("event: snapshot"));
    assert!(text.contains("Broken Water Pipe"));
}
