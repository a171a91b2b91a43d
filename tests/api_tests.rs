/*!
 * End-to-end tests for the JSON API
 */

mod common;

use axum::http::StatusCode;
use common::{get, post_json, send, test_app, CRM};
use serde_json::json;

#[tokio::test]
async fn lists_databases() {
    let app = test_app(&[("crm", CRM), ("analytics", "SELECT 1")], Ok("SELECT 1"));

    let (status, body) = send(&app.router, get("/databases")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "databases": ["analytics", "crm"] }));
}

#[tokio::test]
async fn columns_describe_every_table() {
    let app = test_app(&[("crm", CRM)], Ok("SELECT 1"));

    let (status, body) = send(&app.router, get("/columns?database=crm")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "columns": { "notes": ["id", "user_id", "body"], "users": ["id", "name"] } })
    );
}

#[tokio::test]
async fn columns_without_database_is_rejected() {
    let app = test_app(&[("crm", CRM)], Ok("SELECT 1"));

    for uri in ["/columns", "/columns?database="] {
        let (status, body) = send(&app.router, get(uri)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "Database name required" }));
    }
}

#[tokio::test]
async fn columns_for_unknown_database_is_a_server_error() {
    let app = test_app(&[], Ok("SELECT 1"));

    let (status, body) = send(&app.router, get("/columns?database=ghost")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("ghost"));
}

#[tokio::test]
async fn columns_with_path_in_name_is_rejected() {
    let app = test_app(&[("crm", CRM)], Ok("SELECT 1"));

    let (status, body) = send(&app.router, get("/columns?database=..%2Fcrm")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn query_returns_rows_sql_and_schema() {
    let app = test_app(&[("crm", CRM)], Ok("```sql\nSELECT id, name\nFROM users ORDER BY id;\n```"));

    let (status, body) = send(
        &app.router,
        post_json("/query", json!({ "query": "show all users", "database": "crm" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["query"], "SELECT id, name FROM users ORDER BY id");
    assert_eq!(
        body["results"],
        json!([{ "id": 1, "name": "Ada" }, { "id": 2, "name": "Grace" }])
    );
    assert_eq!(body["table_info"]["users"], json!(["id", "name"]));
    assert_eq!(app.history.len(), 1);
}

#[tokio::test]
async fn query_with_no_matches_returns_empty_results() {
    let app = test_app(&[("crm", CRM)], Ok("SELECT * FROM notes"));

    let (status, body) = send(
        &app.router,
        post_json("/query", json!({ "query": "all notes", "database": "crm" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["results"], json!([]));
}

#[tokio::test]
async fn query_without_database_is_rejected() {
    let app = test_app(&[("crm", CRM)], Ok("SELECT 1"));

    let (status, body) = send(&app.router, post_json("/query", json!({ "query": "show all users" }))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Database selection required" }));
    assert!(app.history.is_empty());
}

#[tokio::test]
async fn blank_translation_is_rejected() {
    let app = test_app(&[("crm", CRM)], Ok("   "));

    let (status, body) = send(
        &app.router,
        post_json("/query", json!({ "query": "show all users", "database": "crm" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "No SQL query generated." }));
}

#[tokio::test]
async fn execution_failure_echoes_request() {
    let app = test_app(&[("crm", CRM)], Ok("SELECT salary FROM users"));

    let (status, body) = send(
        &app.router,
        post_json("/query", json!({ "query": "salaries", "database": "crm" })),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("salary"));
    assert_eq!(body["query"], "salaries");
    assert_eq!(body["database"], "crm");
    assert!(app.history.is_empty());
}

#[tokio::test]
async fn translation_failure_is_a_server_error() {
    let app = test_app(&[("crm", CRM)], Err("API responded with status code: 401 Unauthorized"));

    let (status, body) = send(
        &app.router,
        post_json("/query", json!({ "query": "show all users", "database": "crm" })),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("401"));
    assert_eq!(body["database"], "crm");
}

#[tokio::test]
async fn malformed_body_is_rejected() {
    let app = test_app(&[("crm", CRM)], Ok("SELECT 1"));
    let request = axum::http::Request::builder()
        .method("POST")
        .uri("/query")
        .header("content-type", "application/json")
        .body(axum::body::Body::from("{not json"))
        .unwrap();

    let (status, body) = send(&app.router, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn health_reports_version() {
    let app = test_app(&[], Ok("SELECT 1"));

    let (status, body) = send(&app.router, get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(body["analytics"], json!([]));
}

#[tokio::test]
async fn health_reports_timings_per_question() {
    let app = test_app(&[("crm", CRM)], Ok("SELECT name FROM users"));
    let ask = json!({ "query": "who are the users", "database": "crm" });

    for _ in 0..2 {
        let (status, _) = send(&app.router, post_json("/query", ask.clone())).await;
        assert_eq!(status, StatusCode::OK);
    }
    // Failed requests are not timed
    send(&app.router, post_json("/query", json!({ "query": "no db" }))).await;

    let (_, body) = send(&app.router, get("/health")).await;
    let analytics = body["analytics"].as_array().unwrap();
    assert_eq!(analytics.len(), 1);
    assert_eq!(analytics[0]["query"], "who are the users");
    assert_eq!(analytics[0]["count"], 2);
    assert!(analytics[0]["avg_time_ms"].as_f64().unwrap() >= 0.0);
}

#[tokio::test]
async fn invalid_file_names_are_not_listed() {
    let app = test_app(&[("crm", CRM), ("my-db", "SELECT 1")], Ok("SELECT 1"));

    let (status, body) = send(&app.router, get("/databases")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "databases": ["crm"] }));
}

#[tokio::test]
async fn concurrent_queries_are_all_recorded() {
    let app = test_app(&[("crm", CRM)], Ok("SELECT count(*) AS n FROM users"));

    let requests = (0..8).map(|i| {
        let router = app.router.clone();
        tokio::spawn(async move {
            send(
                &router,
                post_json("/query", json!({ "query": format!("count {}", i), "database": "crm" })),
            )
            .await
        })
    });
    for handle in requests.collect::<Vec<_>>() {
        let (status, body) = handle.await.unwrap();
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["results"], json!([{ "n": 2 }]));
    }

    assert_eq!(app.history.len(), 8);
}
