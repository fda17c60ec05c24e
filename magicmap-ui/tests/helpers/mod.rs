//! Shared fixtures for magicmap-ui integration tests
#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{HeaderMap, Method, Request, StatusCode};
use http_body_util::BodyExt;
use magicmap_common::{MapData, MapType, TreeNode};
use magicmap_ui::services::{GenerationError, GenerationRequest, MapGenerator, StaticProbe};
use magicmap_ui::{build_router, AppState};
use serde_json::Value;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;
use tower::ServiceExt;

/// Single-connection in-memory database with the settings table
pub async fn test_db() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    magicmap_common::db::create_settings_table(&pool).await.unwrap();
    pool
}

/// Generator returning a canned answer and counting calls
pub struct MockGenerator {
    response: Mutex<Result<MapData, GenerationError>>,
    calls: AtomicUsize,
    requests: Mutex<Vec<GenerationRequest>>,
    gate: Option<Arc<Notify>>,
}

impl MockGenerator {
    pub fn new(response: Result<MapData, GenerationError>) -> Self {
        Self {
            response: Mutex::new(response),
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
            gate: None,
        }
    }

    /// Block every call until `gate` is notified
    pub fn gated(response: Result<MapData, GenerationError>, gate: Arc<Notify>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::new(response)
        }
    }

    pub fn set_response(&self, response: Result<MapData, GenerationError>) {
        *self.response.lock().unwrap() = response;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<GenerationRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl MapGenerator for MockGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<MapData, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.response.lock().unwrap().clone()
    }
}

pub struct TestApp {
    pub state: AppState,
    pub generator: Arc<MockGenerator>,
    pub probe: Arc<StaticProbe>,
}

pub async fn test_app_with(generator: MockGenerator) -> TestApp {
    let generator = Arc::new(generator);
    let probe = Arc::new(StaticProbe::new(true));
    let state = AppState::new(test_db().await, generator.clone(), probe.clone());
    TestApp {
        state,
        generator,
        probe,
    }
}

pub async fn test_app(response: Result<MapData, GenerationError>) -> TestApp {
    test_app_with(MockGenerator::new(response)).await
}

/// Send a request and return status, headers, and raw body
pub async fn send_raw(
    state: &AppState,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, HeaderMap, Vec<u8>) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = build_router(state.clone()).oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, headers, bytes.to_vec())
}

/// Send a request and parse the body as JSON (`Value::Null` when empty)
pub async fn send(
    state: &AppState,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let (status, _, bytes) = send_raw(state, method, uri, body).await;
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

pub fn photosynthesis() -> MapData {
    MapData::Tree(
        TreeNode::branch(
            "Photosynthesis",
            vec![TreeNode::branch("Sunlight", vec![]).with_emoji("☀️")],
        )
        .with_emoji("🌱"),
    )
}

/// Root with two children of two leaves each
pub fn seven_node_tree() -> MapData {
    let family = |name: &str| {
        TreeNode::branch(
            name,
            vec![
                TreeNode::leaf(format!("{name} 1")),
                TreeNode::leaf(format!("{name} 2")),
            ],
        )
    };
    MapData::Tree(TreeNode::branch("Root", vec![family("Left"), family("Right")]))
}

pub fn generate_body(text: &str, map_type: MapType) -> Value {
    serde_json::json!({ "text": text, "map_type": map_type.as_tag() })
}
