//! Tests of the HTTP client, against a stub server that listens on localhost

use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use todo_remote::client::Client;
use todo_remote::error::Action;
use todo_remote::session::{Authenticator, FileSession};
use todo_remote::traits::{BearerToken, Credentials, SessionStore, TaskApi};
use todo_remote::{Endpoints, TaskError, TaskId, TaskList};

const TOKEN: &str = "stub-token";

/// Requests received by the stub server, as (method, path, body)
#[derive(Clone, Default)]
struct StubState {
    received: Arc<Mutex<Vec<(String, String, Value)>>>,
}

impl StubState {
    fn record(&self, method: &str, path: String, body: Value) {
        self.received.lock().unwrap().push((method.to_string(), path, body));
    }

    fn received(&self) -> Vec<(String, String, Value)> {
        self.received.lock().unwrap().clone()
    }
}

fn check_auth(headers: &HeaderMap) -> Result<(), StatusCode> {
    let expected = format!("Bearer {}", TOKEN);
    match headers.get("authorization").and_then(|h| h.to_str().ok()) {
        Some(value) if value == expected => Ok(()),
        _ => Err(StatusCode::UNAUTHORIZED),
    }
}

async fn login(Json(body): Json<Value>) -> Json<Value> {
    if body["password"] == "secret1" {
        Json(json!({ "success": true, "token": TOKEN }))
    } else {
        Json(json!({ "success": false }))
    }
}

async fn list(headers: HeaderMap) -> Result<Json<Value>, StatusCode> {
    check_auth(&headers)?;
    Ok(Json(json!({ "data": [
        { "_id": "a1", "title": "Buy milk", "content": "NaN", "endDate": "2025-03-01T00:00:00.000Z", "completed": false },
        { "_id": "b2", "title": "Call the bank", "endDate": "2025-02-14T00:00:00.000Z", "completed": true, "__v": 0 },
    ]})))
}

async fn create(State(stub): State<StubState>, headers: HeaderMap, Json(body): Json<Value>) -> Result<Json<Value>, StatusCode> {
    check_auth(&headers)?;
    stub.record("POST", "/api/todo".to_string(), body.clone());
    Ok(Json(body))
}

async fn update(State(stub): State<StubState>, Path(id): Path<String>, headers: HeaderMap, Json(body): Json<Value>) -> Result<Json<Value>, StatusCode> {
    check_auth(&headers)?;
    if id == "broken" {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }
    stub.record("PATCH", format!("/api/todo/{}", id), body.clone());
    Ok(Json(body))
}

async fn delete(State(stub): State<StubState>, Path(id): Path<String>, headers: HeaderMap, Json(body): Json<Value>) -> Result<Json<Value>, StatusCode> {
    check_auth(&headers)?;
    stub.record("DELETE", format!("/api/todo/{}", id), body);
    Ok(Json(json!({ "message": "deleted" })))
}

/// Start a stub server, and return its base URL
async fn start_stub_server(stub: StubState) -> String {
    let app = Router::new()
        .route("/api/login", post(login))
        .route("/api/todo", get(list).post(create))
        .route("/api/todo/{id}", patch(update).delete(delete))
        .with_state(stub);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}/api/", listener.local_addr().unwrap());
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    base_url
}


#[tokio::test]
async fn test_login_stores_the_token() {
    let _ = env_logger::builder().is_test(true).try_init();
    let base_url = start_stub_server(StubState::default()).await;
    let dir = tempfile::tempdir().unwrap();

    let client = Arc::new(Client::new(&base_url).unwrap());
    let session = Arc::new(FileSession::with_key(&dir.path().join("session.json"), "userToken"));
    let auth = Authenticator::new(client, session.clone());

    let rejected = auth.login(&Credentials::new("someone@example.com", "wrong-password")).await;
    assert!(matches!(rejected, Err(TaskError::LoginRejected)));
    assert_eq!(session.get_token().unwrap(), None);

    auth.login(&Credentials::new("someone@example.com", "secret1")).await.unwrap();
    assert_eq!(session.get_token().unwrap(), Some(BearerToken::new(TOKEN)));

    let on_disk: Value = serde_json::from_str(&std::fs::read_to_string(session.backing_file()).unwrap()).unwrap();
    assert_eq!(on_disk, json!({ "userToken": TOKEN }));

    auth.logout().unwrap();
    assert_eq!(session.get_token().unwrap(), None);
}

#[tokio::test]
async fn test_list_tasks() {
    let _ = env_logger::builder().is_test(true).try_init();
    let base_url = start_stub_server(StubState::default()).await;
    let client = Client::new(&base_url).unwrap();

    let tasks = client.list_tasks(&BearerToken::new(TOKEN)).await.unwrap();
    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0].id().as_str(), "a1");
    assert_eq!(tasks[1].title(), "Call the bank");
    assert_eq!(tasks[1].content(), "NaN");
    assert_eq!(tasks[1].end_date().to_iso(), "2025-02-14");
    assert!(tasks[1].completed());

    let err = client.list_tasks(&BearerToken::new("expired")).await.unwrap_err();
    assert!(err.is_auth_required());
}

#[tokio::test]
async fn test_wire_format() {
    let _ = env_logger::builder().is_test(true).try_init();
    let stub = StubState::default();
    let base_url = start_stub_server(stub.clone()).await;
    let dir = tempfile::tempdir().unwrap();

    let client = Arc::new(Client::with_endpoints(&base_url, Endpoints::default()).unwrap());
    let session = Arc::new(FileSession::with_key(&dir.path().join("session.json"), "userToken"));
    session.set_token(&BearerToken::new(TOKEN)).unwrap();

    let mut list = TaskList::new(client, session);
    list.create("Write report", "NaN", "2025-03-01T00:00:00Z").await.unwrap();
    assert_eq!(list.len(), 2);

    let items = list.items();
    items[0].toggle_completed().await.unwrap();
    items[1].delete_task().await.unwrap();

    let received = stub.received();
    assert_eq!(received, vec![
        ("POST".to_string(), "/api/todo".to_string(),
            json!({ "title": "Write report", "content": "NaN", "endDate": "2025-03-01", "completed": false })),
        ("PATCH".to_string(), "/api/todo/a1".to_string(),
            json!({ "title": "Buy milk", "content": "NaN", "endDate": "2025-03-01", "completed": true })),
        ("DELETE".to_string(), "/api/todo/b2".to_string(),
            json!({ "title": "Call the bank", "content": "NaN", "endDate": "2025-02-14", "completed": true })),
    ]);
}

#[tokio::test]
async fn test_server_errors() {
    let _ = env_logger::builder().is_test(true).try_init();
    let base_url = start_stub_server(StubState::default()).await;
    let client = Client::new(&base_url).unwrap();

    let payload = todo_remote::TaskPayload::new("Broken", "NaN", todo_remote::date::EndDate::from_ymd(2025, 1, 1).unwrap(), false);
    let err = client.update_task(&BearerToken::new(TOKEN), &TaskId::from("broken"), &payload).await.unwrap_err();
    assert!(matches!(err, TaskError::Network{ action: Action::Update, .. }));

    // Nothing listens on this port
    let unreachable = Client::new("http://127.0.0.1:9/api/").unwrap();
    let err = unreachable.list_tasks(&BearerToken::new(TOKEN)).await.unwrap_err();
    assert!(matches!(err, TaskError::Network{ action: Action::Load, .. }));
}
