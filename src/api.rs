// REST API over the chaincode host (axum)
//
// Every route goes through `ChaincodeHost::invoke`, so HTTP callers get the
// same dispatch, validation and commit rules as the CLI.

use crate::command::{GET_CAR, GET_CAR_HISTORY, LIST_CARS};
use crate::error::{Response, INTERNAL_ERROR};
use crate::host::ChaincodeHost;
use crate::ledger::LedgerStore;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::error;

/// Shared application state
pub struct AppState<S: LedgerStore> {
    pub host: Arc<Mutex<ChaincodeHost<S>>>,
}

impl<S: LedgerStore> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            host: Arc::clone(&self.host),
        }
    }
}

impl<S: LedgerStore> AppState<S> {
    pub fn new(host: ChaincodeHost<S>) -> Self {
        Self {
            host: Arc::new(Mutex::new(host)),
        }
    }
}

/// API Response wrapper
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            error: None,
        }
    }
}

/// POST /api/invoke body
#[derive(Debug, Serialize, Deserialize)]
pub struct InvokeRequest {
    pub function: String,
    #[serde(default)]
    pub args: Vec<String>,
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// POST /api/invoke - Invoke any contract function
async fn invoke<S: LedgerStore + Send + 'static>(
    State(state): State<AppState<S>>,
    Json(request): Json<InvokeRequest>,
) -> axum::response::Response {
    let mut invocation = vec![request.function];
    invocation.extend(request.args);
    run(&state, &invocation)
}

/// GET /api/cars - All current cars
async fn list_cars<S: LedgerStore + Send + 'static>(
    State(state): State<AppState<S>>,
) -> axum::response::Response {
    run(&state, &[LIST_CARS.to_string()])
}

/// GET /api/cars/:chassis - Current record of one car
async fn get_car<S: LedgerStore + Send + 'static>(
    State(state): State<AppState<S>>,
    Path(chassis): Path<String>,
) -> axum::response::Response {
    run(&state, &[GET_CAR.to_string(), chassis])
}

/// GET /api/cars/:chassis/history - Every version, oldest first
async fn get_car_history<S: LedgerStore + Send + 'static>(
    State(state): State<AppState<S>>,
    Path(chassis): Path<String>,
) -> axum::response::Response {
    run(&state, &[GET_CAR_HISTORY.to_string(), chassis])
}

fn run<S: LedgerStore>(state: &AppState<S>, invocation: &[String]) -> axum::response::Response {
    let response = match state.host.lock() {
        Ok(mut host) => host.invoke(invocation),
        Err(_) => {
            error!("host mutex poisoned");
            Response {
                status: INTERNAL_ERROR,
                message: "ledger unavailable".to_string(),
                payload: Vec::new(),
            }
        }
    };
    into_http(response)
}

fn into_http(response: Response) -> axum::response::Response {
    let status =
        StatusCode::from_u16(response.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    if !response.is_ok() {
        let body = ApiResponse {
            success: false,
            data: serde_json::Value::Null,
            error: Some(response.message),
        };
        return (status, Json(body)).into_response();
    }

    match response.payload_json() {
        Ok(data) => (status, Json(ApiResponse::ok(data))).into_response(),
        Err(e) => {
            error!(error = %e, "payload is not JSON");
            let body = ApiResponse {
                success: false,
                data: serde_json::Value::Null,
                error: Some("payload is not JSON".to_string()),
            };
            (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
        }
    }
}

/// Build the `/api` router with CORS and request tracing.
pub fn router<S: LedgerStore + Send + 'static>(state: AppState<S>) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/invoke", post(invoke::<S>))
        .route("/cars", get(list_cars::<S>))
        .route("/cars/:chassis", get(get_car::<S>))
        .route("/cars/:chassis/history", get(get_car_history::<S>))
        .with_state(state);

    Router::new().nest("/api", api_routes).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    )
}
