//! HTTP sensor simulator.
//!
//! Serves synthetic `Reading` JSON in the shape a real grow-room sensor
//! node would produce, so a dashboard session has a live endpoint to poll:
//!
//! ```text
//! verdant serve --port 8642 &
//! verdant watch --endpoint http://127.0.0.1:8642/sensor
//! ```

use std::sync::Arc;
use std::time::Instant;

use axum::{
    Router,
    extract::{Query, State},
    response::Json,
    routing::get,
};
use log::info;
use serde::Deserialize;

use verdant_core::source::unix_millis;
use verdant_core::{AdvisoryResult, MockGenerator, Reading, RuleTable};

/// Shared server state.
struct AppState {
    generator: MockGenerator,
    rules: RuleTable,
    started: Instant,
}

#[derive(Deserialize)]
struct SensorParams {
    /// Set to `false` for the deterministic waveform (smoke tests).
    jitter: Option<bool>,
}

fn make_reading(state: &AppState, jitter: bool) -> Reading {
    if jitter {
        state.generator.reading_now()
    } else {
        state.generator.baseline_at(unix_millis())
    }
}

async fn handle_sensor(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SensorParams>,
) -> Json<Reading> {
    Json(make_reading(&state, params.jitter.unwrap_or(true)))
}

/// Current synthetic reading plus its rule-table evaluation, for quick
/// curl checks of the advice pipeline.
async fn handle_advice(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let reading = make_reading(&state, true);
    let advisory: AdvisoryResult = state.rules.evaluate(&reading);
    Json(serde_json::json!({
        "reading": reading,
        "advisory": advisory,
    }))
}

async fn handle_health(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "mode": "synthetic",
        "uptime_secs": state.started.elapsed().as_secs(),
    }))
}

async fn handle_index() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "name": "Verdant Sensor Simulator",
        "version": verdant_core::VERSION,
        "endpoints": {
            "/": "This API index",
            "/sensor": {
                "method": "GET",
                "description": "One synthetic sensor reading",
                "params": {
                    "jitter": "false for the deterministic waveform (default: true)",
                }
            },
            "/advice": "Current reading evaluated against the stock rule table",
            "/health": "Liveness check",
        },
        "examples": {
            "reading": "/sensor",
            "deterministic": "/sensor?jitter=false",
        }
    }))
}

/// Build the axum router.
fn build_router(rules: RuleTable) -> Router {
    let state = Arc::new(AppState {
        generator: MockGenerator,
        rules,
        started: Instant::now(),
    });

    Router::new()
        .route("/", get(handle_index))
        .route("/sensor", get(handle_sensor))
        .route("/advice", get(handle_advice))
        .route("/health", get(handle_health))
        .with_state(state)
}

/// Run the sensor simulator until the process is killed.
pub async fn run_server(host: &str, port: u16) {
    let app = build_router(RuleTable::default());
    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    info!("sensor simulator listening on {addr}");
    axum::serve(listener, app).await.unwrap();
}
