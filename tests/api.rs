//! HTTP API tests (requires `--features server`).
#![cfg(feature = "server")]

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;
use vehicle_ledger::api::{router, AppState};
use vehicle_ledger::{ChaincodeHost, LifecycleConfig, MemoryLedger};

fn app() -> Router {
    let host = ChaincodeHost::new(MemoryLedger::new(), LifecycleConfig::default());
    router(AppState::new(host))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
    (status, serde_json::from_slice(&bytes).expect("json body"))
}

fn invoke(function: &str, args: &[&str]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/invoke")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({ "function": function, "args": args }).to_string(),
        ))
        .expect("request")
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).expect("request")
}

#[tokio::test]
async fn health_is_ok() {
    let app = app();
    let (status, body) = send(&app, get("/api/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], "OK");
}

#[tokio::test]
async fn invoke_and_read_back() {
    let app = app();

    let (status, body) = send(&app, invoke("createCar", &["1000"])).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "Active");

    let (status, _) = send(&app, invoke("transferCar", &["1000", "Rahul"])).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, get("/api/cars/1000")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["owner"], "Rahul");

    let (_, body) = send(&app, get("/api/cars/1000/history")).await;
    let versions = body["data"].as_array().expect("array");
    assert_eq!(versions.len(), 2);
    assert_eq!(versions[0]["version"], 1);
    assert_eq!(versions[1]["value"]["owner"], "Rahul");

    let (_, body) = send(&app, get("/api/cars")).await;
    assert_eq!(body["data"].as_array().expect("array").len(), 1);
}

#[tokio::test]
async fn errors_map_to_http_status() {
    let app = app();

    let (status, body) = send(&app, get("/api/cars/9999")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("9999"));

    send(&app, invoke("createCar", &["1000"])).await;
    let (status, _) = send(&app, invoke("createCar", &["1000"])).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(&app, invoke("paintCar", &["1000"])).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
