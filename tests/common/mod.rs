/*!
 * Shared fixtures for the HTTP tests
 */

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use nl_query::config::AppConfig;
use nl_query::history::InMemoryHistory;
use nl_query::llm::{LlmError, LlmManager, Translator};
use nl_query::web::{build_router, state::AppState};
use serde_json::Value;
use std::sync::Arc;
use tempfile::TempDir;
use tower::util::ServiceExt;

/// Replies to every prompt with the same completion.
pub struct StubTranslator {
    pub reply: Result<String, String>,
}

#[async_trait]
impl Translator for StubTranslator {
    async fn translate(&self, _prompt: &str) -> Result<String, LlmError> {
        self.reply.clone().map_err(LlmError::Response)
    }
}

pub struct TestApp {
    pub router: Router,
    pub history: Arc<InMemoryHistory>,
    _data_dir: TempDir,
}

/// Creates `<name>.duckdb` files populated by the given SQL, plus an app serving them.
pub fn test_app(databases: &[(&str, &str)], completion: Result<&str, &str>) -> TestApp {
    let data_dir = tempfile::tempdir().unwrap();
    for (name, sql) in databases {
        duckdb::Connection::open(data_dir.path().join(format!("{}.duckdb", name)))
            .unwrap()
            .execute_batch(sql)
            .unwrap();
    }

    let mut config = AppConfig::default();
    config.database.data_dir = data_dir.path().to_string_lossy().to_string();

    let translator = StubTranslator {
        reply: completion.map(str::to_string).map_err(str::to_string),
    };
    let history = Arc::new(InMemoryHistory::new());
    let state = AppState::new(
        config,
        LlmManager::with_translator(Box::new(translator)),
        history.clone(),
    );

    TestApp {
        router: build_router(Arc::new(state)),
        history,
        _data_dir: data_dir,
    }
}

pub const CRM: &str = "CREATE TABLE users (id INTEGER, name VARCHAR);
     INSERT INTO users VALUES (1, 'Ada'), (2, 'Grace');
     CREATE TABLE notes (id INTEGER, user_id INTEGER, body VARCHAR);";

pub async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}
