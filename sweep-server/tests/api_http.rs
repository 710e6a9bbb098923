//! End-to-end API behavior through the assembled router: public routes,
//! bearer-token enforcement, register/login flow.
//! Run: cargo test -p sweep-server --test api_http

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use http::{Request, StatusCode, header};
use serde_json::{Value, json};
use tower::Service;

use sweep_server::auth::JwtConfig;
use sweep_server::core::server::router;
use sweep_server::db;
use sweep_server::db::models::Severity;
use sweep_server::db::repository::{TicketRepository, UserRepository};
use sweep_server::services::classifier::{Classifier, ClassifierError};
use sweep_server::services::object_store::{ObjectStore, ObjectStoreError, StoredImage};
use sweep_server::services::TicketIntake;
use sweep_server::{AppState, Config, JwtService};

struct MemoryStore;

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn put_image(&self, _bytes: &[u8]) -> Result<StoredImage, ObjectStoreError> {
        Ok(StoredImage {
            url: "mem://obj.jpg".to_string(),
            key: "obj.jpg".to_string(),
        })
    }
}

struct FixedClassifier;

#[async_trait]
impl Classifier for FixedClassifier {
    async fn classify(&self, _image_url: &str) -> Result<Severity, ClassifierError> {
        Ok(Severity::Medium)
    }
}

fn jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "integration-test-secret-which-is-long-enough".to_string(),
        expiration_minutes: 720,
        issuer: "sweep-server".to_string(),
        audience: "sweep-clients".to_string(),
    }
}

async fn test_state() -> (tempfile::TempDir, AppState) {
    let tmp = tempfile::tempdir().unwrap();
    let database_path = tmp.path().to_str().unwrap().to_string();
    let database = db::connect(&database_path).await.unwrap();

    let tickets = TicketRepository::new(database.clone());
    let users = UserRepository::new(database.clone());
    let intake = TicketIntake::new(
        Arc::new(MemoryStore),
        Arc::new(FixedClassifier),
        tickets.clone(),
        None,
    );

    let config = Config {
        http_port: 0,
        database_path,
        object_store_url: "http://store.test".to_string(),
        object_store_token: "token".to_string(),
        classifier_url: "http://classifier.test".to_string(),
        classifier_api_key: "key".to_string(),
        webhook_url: None,
        request_timeout_ms: 1000,
        jwt: jwt_config(),
        environment: "test".to_string(),
    };

    let state = AppState {
        config,
        db: database,
        jwt: Arc::new(JwtService::with_config(jwt_config())),
        tickets,
        users,
        intake,
    };
    (tmp, state)
}

async fn send(app: &mut axum::Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = app.call(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn health_is_public() {
    let (_tmp, state) = test_state().await;
    let mut app = router(state);

    let (status, body) = send(&mut app, get_request("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn register_login_me_flow() {
    let (_tmp, state) = test_state().await;
    let mut app = router(state);

    // Register
    let (status, body) = send(
        &mut app,
        json_request(
            "POST",
            "/api/auth/register",
            json!({"username": "alice", "password": "pw123456"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "register failed: {body}");
    assert_eq!(body["username"], "alice");
    assert_eq!(body["role"], "reporter");

    // Duplicate username is a conflict
    let (status, body) = send(
        &mut app,
        json_request(
            "POST",
            "/api/auth/register",
            json!({"username": "alice", "password": "pw123456"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "E0007");

    // Wrong password is rejected with the unified message
    let (status, body) = send(
        &mut app,
        json_request(
            "POST",
            "/api/auth/login",
            json!({"username": "alice", "password": "wrong"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "E0008");

    // Correct credentials yield a token
    let (status, body) = send(
        &mut app,
        json_request(
            "POST",
            "/api/auth/login",
            json!({"username": "alice", "password": "pw123456"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {body}");
    let token = body["token"].as_str().unwrap().to_string();
    assert!(!token.is_empty());

    // Token works against an authenticated route
    let req = Request::builder()
        .method("GET")
        .uri("/api/auth/me")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&mut app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "alice");
}

#[tokio::test]
async fn authenticated_routes_reject_missing_and_bad_tokens() {
    let (_tmp, state) = test_state().await;
    let mut app = router(state);

    let (status, body) = send(&mut app, get_request("/api/auth/me")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "E3001");

    let req = Request::builder()
        .method("GET")
        .uri("/api/auth/me")
        .header(header::AUTHORIZATION, "Bearer not-a-real-token")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&mut app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "E3002");

    // Ticket mutations require auth too
    let (status, _body) = send(
        &mut app,
        json_request("POST", "/api/tickets", json!({"anything": true})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn ticket_reads_are_public_and_creation_is_authenticated() {
    let (_tmp, state) = test_state().await;
    let mut app = router(state);

    // Public read, empty list
    let (status, body) = send(&mut app, get_request("/api/tickets")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(0));

    // Register + login
    send(
        &mut app,
        json_request(
            "POST",
            "/api/auth/register",
            json!({"username": "bob", "password": "pw123456"}),
        ),
    )
    .await;
    let (_, body) = send(
        &mut app,
        json_request(
            "POST",
            "/api/auth/login",
            json!({"username": "bob", "password": "pw123456"}),
        ),
    )
    .await;
    let token = body["token"].as_str().unwrap().to_string();

    // Create a pre-classified ticket with a hosted image URL
    let req = Request::builder()
        .method("POST")
        .uri("/api/tickets")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(
            json!({
                "location": {"lat": 43.648, "lon": -79.380},
                "description": "Large pile of debris on the corner",
                "severity": 3,
                "image_url": "https://cdn.example/debris.jpg"
            })
            .to_string(),
        ))
        .unwrap();
    let (status, body) = send(&mut app, req).await;
    assert_eq!(status, StatusCode::OK, "create failed: {body}");
    assert_eq!(body["status"], "open");
    assert_eq!(body["severity"], "high");
    let id = body["id"].as_str().unwrap().to_string();

    // Publicly readable by id
    let (status, body) = send(&mut app, get_request(&format!("/api/tickets/{id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["description"], "Large pile of debris on the corner");

    // Out-of-range severity level is a validation error
    let req = Request::builder()
        .method("POST")
        .uri("/api/tickets")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(
            json!({
                "location": {"lat": 43.648, "lon": -79.380},
                "description": "bad severity",
                "severity": 9,
                "image_url": "https://cdn.example/x.jpg"
            })
            .to_string(),
        ))
        .unwrap();
    let (status, body) = send(&mut app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "E0002");
}
