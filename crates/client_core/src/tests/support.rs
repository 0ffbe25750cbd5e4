use std::{collections::VecDeque, sync::Arc, time::Duration};

use anyhow::Result;
use async_trait::async_trait;
use axum::{
    extract::{Path, State},
    http::{header::CONTENT_TYPE, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{delete, get},
    Json, Router,
};
use reqwest::Method;
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::Mutex};

use crate::{error::ApiError, transport::JsonTransport};

/// How the fake API wraps list responses.
#[derive(Clone, Copy)]
pub(crate) enum FakeEnvelope {
    Data,
    Parties,
    Bare,
}

#[derive(Default)]
pub(crate) struct FakeApiState {
    pub(crate) base_url: String,
    pub(crate) parties: Vec<Value>,
    pub(crate) next_id: i64,
    pub(crate) echo_created: bool,
    pub(crate) config_hits: usize,
    pub(crate) created_bodies: Vec<Value>,
    pub(crate) create_content_types: Vec<Option<String>>,
    pub(crate) list_content_types: Vec<Option<String>>,
    pub(crate) cohort_headers: Vec<Option<String>>,
    pub(crate) delete_calls: Vec<i64>,
}

#[derive(Clone)]
pub(crate) struct FakeApi {
    pub(crate) envelope: FakeEnvelope,
    pub(crate) state: Arc<Mutex<FakeApiState>>,
}

impl FakeApi {
    pub(crate) fn new(envelope: FakeEnvelope, parties: Vec<Value>) -> Self {
        Self {
            envelope,
            state: Arc::new(Mutex::new(FakeApiState {
                next_id: parties.len() as i64 + 1,
                parties,
                echo_created: true,
                ..FakeApiState::default()
            })),
        }
    }

    pub(crate) async fn without_create_echo(self) -> Self {
        self.state.lock().await.echo_created = false;
        self
    }
}

fn header_text(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

async fn list_events(State(api): State<FakeApi>, headers: HeaderMap) -> Json<Value> {
    let mut state = api.state.lock().await;
    state
        .list_content_types
        .push(header_text(&headers, CONTENT_TYPE.as_str()));
    state.cohort_headers.push(header_text(&headers, "x-cohort"));
    let parties = Value::Array(state.parties.clone());
    Json(match api.envelope {
        FakeEnvelope::Data => json!({ "success": true, "data": parties }),
        FakeEnvelope::Parties => json!({ "parties": parties }),
        FakeEnvelope::Bare => parties,
    })
}

async fn create_event(
    State(api): State<FakeApi>,
    headers: HeaderMap,
    Json(mut body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let mut state = api.state.lock().await;
    state
        .create_content_types
        .push(header_text(&headers, CONTENT_TYPE.as_str()));
    state.created_bodies.push(body.clone());

    let id = state.next_id;
    state.next_id += 1;
    body["id"] = json!(id);
    state.parties.push(body.clone());

    if state.echo_created {
        (StatusCode::CREATED, Json(body))
    } else {
        (StatusCode::CREATED, Json(json!({ "success": true })))
    }
}

async fn delete_event(State(api): State<FakeApi>, Path(id): Path<i64>) -> StatusCode {
    let mut state = api.state.lock().await;
    state.delete_calls.push(id);
    let before = state.parties.len();
    state.parties.retain(|party| party["id"] != json!(id));
    if state.parties.len() == before {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::NO_CONTENT
    }
}

async fn config_document(State(api): State<FakeApi>) -> Json<Value> {
    let mut state = api.state.lock().await;
    state.config_hits += 1;
    Json(json!({
        "baseUrl": format!("{}/", state.base_url),
        "headers": { "x-cohort": "2311-FSA-ET-WEB-PT-SF" }
    }))
}

async fn slow_config_document(State(api): State<FakeApi>) -> Json<Value> {
    tokio::time::sleep(Duration::from_secs(2)).await;
    config_document(State(api)).await
}

async fn broken_body() -> impl IntoResponse {
    (StatusCode::OK, "<html>not json</html>")
}

async fn server_error() -> StatusCode {
    StatusCode::INTERNAL_SERVER_ERROR
}

async fn slow_response() -> Json<Value> {
    tokio::time::sleep(Duration::from_secs(2)).await;
    Json(json!([]))
}

pub(crate) async fn spawn_fake_api(api: FakeApi) -> Result<String> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let base_url = format!("http://{addr}");
    api.state.lock().await.base_url = base_url.clone();

    let app = Router::new()
        .route("/events", get(list_events).post(create_event))
        .route("/events/:id", delete(delete_event))
        .route("/config.json", get(config_document))
        .route("/slow-config.json", get(slow_config_document))
        .route("/broken", get(broken_body))
        .route("/fail", get(server_error))
        .route("/slow", get(slow_response))
        .with_state(api);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(base_url)
}

pub(crate) fn party_json(id: i64, name: &str, location: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "date": "2024-05-01",
        "location": location,
        "description": "Annual"
    })
}

/// Replays queued responses and records every request it receives.
#[derive(Default)]
pub(crate) struct ScriptedTransport {
    responses: Mutex<VecDeque<Result<Value, ApiError>>>,
    pub(crate) calls: Mutex<Vec<(Method, String, Option<Value>)>>,
}

impl ScriptedTransport {
    pub(crate) fn new(responses: Vec<Result<Value, ApiError>>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
            calls: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl JsonTransport for ScriptedTransport {
    async fn request(
        &self,
        path: &str,
        method: Method,
        body: Option<Value>,
    ) -> Result<Value, ApiError> {
        self.calls
            .lock()
            .await
            .push((method, path.to_string(), body));
        self.responses
            .lock()
            .await
            .pop_front()
            .unwrap_or(Err(ApiError::Config("no scripted response left".to_string())))
    }
}
