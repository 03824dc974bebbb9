//! Server test utilities.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use std::sync::Arc;
use strongbox_core::config::{AppConfig, AuthConfig, MetadataConfig, ServerConfig};
use strongbox_metadata::{MetadataStore, SqliteStore};
use strongbox_server::{create_router, AppState};
use tempfile::TempDir;
use tower::ServiceExt;

/// A test server wrapper with all dependencies.
/// Note: #[allow(dead_code)] because each test file compiles common/ separately.
#[allow(dead_code)]
pub struct TestServer {
    pub router: axum::Router,
    pub state: AppState,
    _temp_dir: TempDir,
}

#[allow(dead_code)]
impl TestServer {
    /// Create a new test server backed by a temporary SQLite database.
    pub async fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");

        let db_path = temp_dir.path().join("metadata.db");
        let metadata: Arc<dyn MetadataStore> = Arc::new(
            SqliteStore::new(&db_path)
                .await
                .expect("Failed to create metadata store"),
        );

        let config = AppConfig {
            server: ServerConfig::default(),
            auth: AuthConfig::for_testing(),
            metadata: MetadataConfig::Sqlite { path: db_path },
        };

        let state = AppState::new(config, metadata);
        let router = create_router(state.clone());

        Self {
            router,
            state,
            _temp_dir: temp_dir,
        }
    }

    /// Get access to the underlying metadata store.
    pub fn metadata(&self) -> Arc<dyn MetadataStore> {
        self.state.metadata.clone()
    }
}

/// Helper to make JSON requests.
#[allow(dead_code)]
pub async fn json_request(
    router: &axum::Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
    auth_token: Option<&str>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(token) = auth_token {
        builder = builder.header("Authorization", format!("Bearer {}", token));
    }

    let body = match body {
        Some(v) => {
            builder = builder.header("Content-Type", "application/json");
            Body::from(serde_json::to_vec(&v).unwrap())
        }
        None => Body::empty(),
    };

    let request = builder.body(body).unwrap();
    let response = router.clone().oneshot(request).await.unwrap();

    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    let json: Value = if body_bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
    };

    (status, json)
}

/// Register an account and return its bearer token.
#[allow(dead_code)]
pub async fn register_user(router: &axum::Router, email: &str, password: &str) -> String {
    let (status, body) = json_request(
        router,
        "POST",
        "/auth/register",
        Some(serde_json::json!({ "email": email, "password": password })),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "registration failed: {body}");
    body["access_token"]
        .as_str()
        .expect("missing access_token")
        .to_string()
}

/// Store a metadata record for the given token and return the response body.
#[allow(dead_code)]
pub async fn create_record(
    router: &axum::Router,
    token: &str,
    file_id: &str,
    payload: &str,
) -> Value {
    let (status, body) = json_request(
        router,
        "POST",
        "/metadata",
        Some(serde_json::json!({
            "file_id": file_id,
            "encrypted_data": {
                "ciphertext": payload,
                "salt": "c2FsdA==",
                "iv": "aXYxMjM0NTY=",
            },
        })),
        Some(token),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {body}");
    body
}
