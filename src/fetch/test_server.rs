//! A one-route HTTP server on localhost that answers every request with a canned body.

use axum::extract::{RawQuery, State};
use axum::http::{header, StatusCode};
use axum::routing::get;
use axum::Router;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

pub(crate) const SAMPLE_RESPONSE: &str = r#"{
  "latitude": 19.4,
  "longitude": -99.1,
  "generationtime_ms": 0.5,
  "utc_offset_seconds": -21600,
  "timezone": "America/Mexico_City",
  "timezone_abbreviation": "CST",
  "hourly_units": {
    "time": "iso8601",
    "pm10": "μg/m³",
    "pm2_5": "μg/m³",
    "carbon_monoxide": "μg/m³",
    "nitrogen_dioxide": "μg/m³",
    "ozone": "μg/m³"
  },
  "hourly": {
    "time": ["2024-01-01T00:00", "2024-01-01T01:00", "2024-01-01T02:00", "2024-01-01T03:00"],
    "pm10": [40.1, null, 42.5, 43.0],
    "pm2_5": [20.0, 21.0, null, 23.0],
    "carbon_monoxide": [310.0, 305.0, 300.0, 298.0],
    "nitrogen_dioxide": [30.2, 28.4, 25.0, 24.1],
    "ozone": [12.0, 10.0, 9.0, 8.5]
  }
}"#;

#[derive(Clone)]
struct ServerState {
    status: StatusCode,
    body: &'static str,
    hits: Arc<AtomicUsize>,
    last_query: Arc<Mutex<String>>,
}

pub(crate) struct TestServer {
    pub url: String,
    hits: Arc<AtomicUsize>,
    last_query: Arc<Mutex<String>>,
}

impl TestServer {
    pub fn requests(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    /// Raw, still percent-encoded query string of the latest request.
    pub fn last_query(&self) -> String {
        self.last_query.lock().unwrap().clone()
    }
}

async fn canned(
    State(state): State<ServerState>,
    RawQuery(query): RawQuery,
) -> (StatusCode, [(header::HeaderName, &'static str); 1], &'static str) {
    *state.last_query.lock().unwrap() = query.unwrap_or_default();
    state.hits.fetch_add(1, Ordering::SeqCst);
    (
        state.status,
        [(header::CONTENT_TYPE, "application/json")],
        state.body,
    )
}

pub(crate) async fn serve(body: &'static str) -> TestServer {
    serve_with_status(StatusCode::OK, body).await
}

pub(crate) async fn serve_with_status(status: StatusCode, body: &'static str) -> TestServer {
    let state = ServerState {
        status,
        body,
        hits: Arc::new(AtomicUsize::new(0)),
        last_query: Arc::new(Mutex::new(String::new())),
    };
    let hits = state.hits.clone();
    let last_query = state.last_query.clone();

    let router = Router::new()
        .route("/v1/air-quality", get(canned))
        .with_state(state);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, router.into_make_service()).await;
    });

    TestServer {
        url: format!("http://{}/v1/air-quality", addr),
        hits,
        last_query,
    }
}
