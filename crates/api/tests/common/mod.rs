//! Shared helpers for the HTTP integration tests.
//!
//! Every test builds the production router via [`build_app_router`], backed
//! by the per-test database from `#[sqlx::test]`, a temporary upload
//! directory, and a scripted [`FakeLanguageModel`].

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, OnceLock};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request, Response};
use axum::Router;
use distopia_api::auth::jwt::{generate_access_token, JwtConfig};
use distopia_api::auth::users::UserStore;
use distopia_api::config::{LlmConfig, ServerConfig};
use distopia_api::router::build_app_router;
use distopia_api::state::AppState;
use distopia_core::storage::UploadDir;
use distopia_llm::{ChatMessage, LanguageModel, LlmApiError};
use http_body_util::BodyExt;
use sqlx::PgPool;
use tempfile::TempDir;
use tower::ServiceExt;

/// Login accepted by every test app.
pub const TEST_USER: &str = "keeper";
pub const TEST_PASSWORD: &str = "lantern-42";

const TEST_JWT_SECRET: &str = "integration-test-secret";
const MULTIPART_BOUNDARY: &str = "distopia-test-boundary";

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

pub fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: TEST_JWT_SECRET.to_string(),
        access_token_expiry_mins: 60,
    }
}

/// Build a test `ServerConfig` with safe defaults rooted in `dir`.
pub fn test_config(dir: &TempDir) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:8501".to_string()],
        request_timeout_secs: 30,
        upload_dir: dir.path().join("uploads"),
        max_upload_bytes: 1024 * 1024,
        auth_users: format!("{TEST_USER}:{TEST_PASSWORD}"),
        rag_top_k: 3,
        backup_log_path: dir.path().join("backup_memory.log"),
        jwt: test_jwt_config(),
        llm: LlmConfig {
            api_key: "unused".to_string(),
            base_url: "http://127.0.0.1:9".to_string(),
            chat_model: "fake-chat".to_string(),
            embedding_model: "fake-embedding".to_string(),
        },
    }
}

/// Argon2 hashing is slow in debug builds; hash the test login once per binary.
fn test_users() -> Arc<UserStore> {
    static USERS: OnceLock<Arc<UserStore>> = OnceLock::new();
    USERS
        .get_or_init(|| {
            Arc::new(
                UserStore::from_credentials([(TEST_USER.to_string(), TEST_PASSWORD.to_string())])
                    .expect("hashing should succeed"),
            )
        })
        .clone()
}

// ---------------------------------------------------------------------------
// Test application
// ---------------------------------------------------------------------------

/// A router plus the pieces tests want to inspect afterwards.
pub struct TestApp {
    pub router: Router,
    pub llm: Arc<FakeLanguageModel>,
    pub config: ServerConfig,
    /// Keeps the upload directory alive for the test's duration.
    pub dir: TempDir,
}

impl TestApp {
    /// A fresh handle to the router; `oneshot` consumes it.
    pub fn app(&self) -> Router {
        self.router.clone()
    }

    pub fn upload_path(&self, name: &str) -> PathBuf {
        self.config.upload_dir.join(name)
    }

    /// Sorted names currently in the upload directory.
    pub fn stored_files(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(&self.config.upload_dir)
            .expect("read upload dir")
            .map(|entry| entry.expect("dir entry").file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}

/// Build the full application router with all middleware layers.
pub async fn build_test_app(pool: PgPool) -> TestApp {
    build_test_app_with(pool, FakeLanguageModel::default()).await
}

pub async fn build_test_app_with(pool: PgPool, llm: FakeLanguageModel) -> TestApp {
    let dir = tempfile::tempdir().expect("temp dir");
    let config = test_config(&dir);

    let uploads = UploadDir::new(config.upload_dir.clone());
    uploads.ensure().await.expect("upload dir");

    let llm = Arc::new(llm);
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        uploads,
        users: test_users(),
        llm: llm.clone(),
    };

    TestApp {
        router: build_app_router(state, &config),
        llm,
        config,
        dir,
    }
}

/// Bearer token for [`TEST_USER`], signed with the test secret.
pub fn auth_token() -> String {
    generate_access_token(TEST_USER, &test_jwt_config()).expect("token generation")
}

// ---------------------------------------------------------------------------
// Fake language model
// ---------------------------------------------------------------------------

/// Scripted model: 3-dimensional embeddings, a fixed reply, and call counters.
#[derive(Default)]
pub struct FakeLanguageModel {
    pub reply: Mutex<String>,
    /// When set, every call fails with a 503 from the "service".
    pub fail: AtomicBool,
    pub embed_calls: AtomicUsize,
    pub complete_calls: AtomicUsize,
    /// Messages from the most recent completion.
    pub last_messages: Mutex<Vec<ChatMessage>>,
}

impl FakeLanguageModel {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Mutex::new(reply.to_string()),
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        let llm = Self::default();
        llm.fail.store(true, Ordering::SeqCst);
        llm
    }

    pub fn embed_calls(&self) -> usize {
        self.embed_calls.load(Ordering::SeqCst)
    }

    pub fn complete_calls(&self) -> usize {
        self.complete_calls.load(Ordering::SeqCst)
    }

    pub fn last_messages(&self) -> Vec<ChatMessage> {
        self.last_messages.lock().unwrap().clone()
    }

    /// Texts mentioning "north" point one way, everything else another.
    pub fn embedding_for(text: &str) -> Vec<f32> {
        if text.to_lowercase().contains("north") {
            vec![1.0, 0.1, 0.0]
        } else {
            vec![0.0, 1.0, 0.1]
        }
    }

    fn unavailable() -> LlmApiError {
        LlmApiError::ApiError {
            status: 503,
            body: "model overloaded".to_string(),
        }
    }
}

#[async_trait]
impl LanguageModel for FakeLanguageModel {
    async fn embed(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, LlmApiError> {
        self.embed_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(Self::unavailable());
        }
        Ok(inputs.iter().map(|t| Self::embedding_for(t)).collect())
    }

    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, LlmApiError> {
        self.complete_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(Self::unavailable());
        }
        *self.last_messages.lock().unwrap() = messages.to_vec();
        Ok(self.reply.lock().unwrap().clone())
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

fn request(method: Method, uri: &str, token: Option<&str>) -> axum::http::request::Builder {
    let builder = Request::builder().method(method).uri(uri);
    match token {
        Some(token) => builder.header(AUTHORIZATION, format!("Bearer {token}")),
        None => builder,
    }
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, request(Method::GET, uri, None).body(Body::empty()).unwrap()).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, request(Method::GET, uri, Some(token)).body(Body::empty()).unwrap()).await
}

pub async fn post_json(app: Router, uri: &str, json: serde_json::Value) -> Response<Body> {
    send(
        app,
        request(Method::POST, uri, None)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
    )
    .await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    json: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(
        app,
        request(Method::POST, uri, Some(token))
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
    )
    .await
}

/// POST without a body (parameters in the query string).
pub async fn post_empty_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, request(Method::POST, uri, Some(token)).body(Body::empty()).unwrap()).await
}

pub async fn post_form(app: Router, uri: &str, form: &str) -> Response<Body> {
    send(
        app,
        request(Method::POST, uri, None)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form.to_string()))
            .unwrap(),
    )
    .await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    json: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(
        app,
        request(Method::PUT, uri, Some(token))
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
    )
    .await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, request(Method::DELETE, uri, Some(token)).body(Body::empty()).unwrap()).await
}

/// POST a single multipart `file` field.
pub async fn post_file_auth(
    app: Router,
    uri: &str,
    filename: &str,
    contents: &[u8],
    token: &str,
) -> Response<Body> {
    send(
        app,
        request(Method::POST, uri, Some(token))
            .header(
                CONTENT_TYPE,
                format!("multipart/form-data; boundary={MULTIPART_BOUNDARY}"),
            )
            .body(Body::from(multipart_body(filename, contents)))
            .unwrap(),
    )
    .await
}

pub fn multipart_body(filename: &str, contents: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{MULTIPART_BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n\
             Content-Type: application/octet-stream\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(contents);
    body.extend_from_slice(format!("\r\n--{MULTIPART_BOUNDARY}--\r\n").as_bytes());
    body
}

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response.into_body().collect().await.unwrap().to_bytes().to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = body_bytes(response).await;
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    String::from_utf8(body_bytes(response).await).unwrap()
}
