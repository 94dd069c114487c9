use axum::http::StatusCode;
use base64::Engine;
use tempfile::TempDir;

use crate::state::DocsAuth;
use crate::test::{setup_server, setup_server_with_docs_auth};

fn basic(user_pass: &str) -> String {
    format!(
        "Basic {}",
        base64::engine::general_purpose::STANDARD.encode(user_pass)
    )
}

#[tokio::test]
async fn docs_open_without_configured_credentials() {
    let dir = TempDir::new().unwrap();
    let server = setup_server(&dir);

    server.get("/docs").await.assert_status_ok();
    server.get("/docs/private/api.json").await.assert_status_ok();
}

#[tokio::test]
async fn docs_require_basic_auth_when_configured() {
    let dir = TempDir::new().unwrap();
    let server = setup_server_with_docs_auth(
        &dir,
        Some(DocsAuth {
            user: "docs".to_string(),
            password: "secret".to_string(),
        }),
    );

    let response = server.get("/docs").await;
    response.assert_status(StatusCode::UNAUTHORIZED);

    let response = server
        .get("/docs")
        .authorization(&basic("docs:wrong"))
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);

    let response = server
        .get("/docs")
        .authorization(&basic("docs:secret"))
        .await;
    response.assert_status_ok();

    // The API itself stays open, only the docs are gated
    let response = server.get("/notes").await;
    response.assert_status_ok();
}
