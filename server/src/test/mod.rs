#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod docs;
mod notes;

use axum_test::TestServer;
use tempfile::TempDir;

use crate::router::setup_router;
use crate::state::{AppState, DocsAuth};

pub fn setup_server(dir: &TempDir) -> TestServer {
    setup_server_with_docs_auth(dir, None)
}

pub fn setup_server_with_docs_auth(dir: &TempDir, docs_auth: Option<DocsAuth>) -> TestServer {
    let store = noted_core::open_store(&dir.path().join("test.db")).unwrap();
    let app = setup_router(AppState::new(store, docs_auth));
    TestServer::new(app).unwrap()
}
