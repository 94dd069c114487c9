use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{json, Value};
use tempfile::TempDir;

use crate::model::note::{NotePage, NoteResponse};
use crate::test::setup_server;

// Well-formed ULID that matches no stored note
const MISSING_ID: &str = "01ARZ3NDEKTSV4RRFFQ69G5FAV";

async fn create_note(server: &TestServer, title: &str, content: &str) -> NoteResponse {
    let response = server
        .post("/notes")
        .json(&json!({ "title": title, "content": content }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let envelope = response.json::<Value>();
    serde_json::from_value(envelope["data"].clone()).unwrap()
}

#[tokio::test]
async fn note_create_returns_full_envelope() {
    let dir = TempDir::new().unwrap();
    let server = setup_server(&dir);

    let response = server
        .post("/notes")
        .json(&json!({ "title": "A", "content": "B" }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let envelope = response.json::<Value>();

    assert_eq!(envelope["success"], json!(true));
    assert_eq!(envelope["statusCode"], json!(201));
    assert_eq!(envelope["message"], json!("Note created successfully"));
    assert_eq!(envelope["data"]["title"], json!("A"));
    assert_eq!(envelope["data"]["content"], json!("B"));
    assert!(envelope["data"]["id"].is_string());
    assert!(envelope["data"]["createdAt"].is_string());
    assert!(envelope["data"]["updatedAt"].is_string());
}

#[tokio::test]
async fn note_create_empty_fields_bad_request() {
    let dir = TempDir::new().unwrap();
    let server = setup_server(&dir);

    let response = server
        .post("/notes")
        .json(&json!({ "title": "", "content": "B" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let envelope = response.json::<Value>();
    assert_eq!(envelope["success"], json!(false));
    assert_eq!(envelope["statusCode"], json!(400));
    assert!(envelope.get("data").is_none());
}

#[tokio::test]
async fn note_create_malformed_body_uses_envelope() {
    let dir = TempDir::new().unwrap();
    let server = setup_server(&dir);

    let response = server
        .post("/notes")
        .text("{\"title\": \"A\",")
        .content_type("application/json")
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let envelope = response.json::<Value>();
    assert_eq!(envelope["success"], json!(false));
    assert_eq!(envelope["statusCode"], json!(400));
    assert!(envelope["message"].is_string());
    assert!(envelope.get("data").is_none());
}

#[tokio::test]
async fn note_list_unparseable_params_use_envelope() {
    let dir = TempDir::new().unwrap();
    let server = setup_server(&dir);

    let response = server.get("/notes").add_query_param("limit", "abc").await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let envelope = response.json::<Value>();
    assert_eq!(envelope["success"], json!(false));
    assert_eq!(envelope["statusCode"], json!(400));

    let response = server
        .get("/notes")
        .add_query_param("from", "not-a-date")
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let envelope = response.json::<Value>();
    assert_eq!(envelope["success"], json!(false));
}

#[tokio::test]
async fn note_list_paginates() {
    let dir = TempDir::new().unwrap();
    let server = setup_server(&dir);

    for i in 0..3 {
        create_note(&server, &format!("note {}", i), "content").await;
    }

    let response = server
        .get("/notes")
        .add_query_param("limit", 2)
        .add_query_param("page", 1)
        .await;

    response.assert_status_ok();
    let envelope = response.json::<Value>();
    assert_eq!(envelope["message"], json!("Notes loaded successfully"));

    let page: NotePage = serde_json::from_value(envelope["data"].clone()).unwrap();
    assert_eq!(page.docs.len(), 2);
    assert_eq!(page.total_docs, 3);
    assert_eq!(page.total_pages, 2);
    assert!(page.has_next_page);
    assert_eq!(page.next_page, Some(2));
    assert!(!page.has_prev_page);
    assert_eq!(page.paging_counter, 1);
}

#[tokio::test]
async fn note_list_huge_page_number_is_empty_not_error() {
    let dir = TempDir::new().unwrap();
    let server = setup_server(&dir);
    create_note(&server, "A", "B").await;

    let response = server
        .get("/notes")
        .add_query_param("page", "18446744073709551615")
        .add_query_param("limit", 10)
        .await;

    response.assert_status_ok();
    let page: NotePage =
        serde_json::from_value(response.json::<Value>()["data"].clone()).unwrap();
    assert!(page.docs.is_empty());
    assert_eq!(page.total_docs, 1);
    assert!(!page.has_next_page);
}

#[tokio::test]
async fn note_list_search_filters() {
    let dir = TempDir::new().unwrap();
    let server = setup_server(&dir);

    create_note(&server, "groceries", "milk and eggs").await;
    create_note(&server, "standup", "discuss milk quota").await;
    create_note(&server, "ideas", "none").await;

    let response = server.get("/notes").add_query_param("search", "milk").await;

    response.assert_status_ok();
    let page: NotePage =
        serde_json::from_value(response.json::<Value>()["data"].clone()).unwrap();
    assert_eq!(page.total_docs, 2);
}

#[tokio::test]
async fn note_list_rejects_zero_limit() {
    let dir = TempDir::new().unwrap();
    let server = setup_server(&dir);

    let response = server.get("/notes").add_query_param("limit", 0).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let envelope = response.json::<Value>();
    assert_eq!(envelope["success"], json!(false));
}

#[tokio::test]
async fn note_list_inverted_range_is_empty() {
    let dir = TempDir::new().unwrap();
    let server = setup_server(&dir);
    create_note(&server, "A", "B").await;

    let response = server
        .get("/notes")
        .add_query_param("period", "range")
        .add_query_param("from", "2099-01-01T00:00:00Z")
        .add_query_param("to", "2000-01-01T00:00:00Z")
        .await;

    response.assert_status_ok();
    let page: NotePage =
        serde_json::from_value(response.json::<Value>()["data"].clone()).unwrap();
    assert_eq!(page.total_docs, 0);
    assert!(page.docs.is_empty());
}

#[tokio::test]
async fn note_get_by_id_ok() {
    let dir = TempDir::new().unwrap();
    let server = setup_server(&dir);

    let created = create_note(&server, "A", "B").await;

    let response = server.get(&format!("/notes/{}", created.id)).await;

    response.assert_status_ok();
    let envelope = response.json::<Value>();
    assert_eq!(envelope["message"], json!("Note loaded successfully"));
    assert_eq!(envelope["data"]["id"], json!(created.id));
    assert_eq!(envelope["data"]["title"], json!("A"));
}

#[tokio::test]
async fn note_get_by_id_not_found() {
    let dir = TempDir::new().unwrap();
    let server = setup_server(&dir);

    let response = server.get(&format!("/notes/{}", MISSING_ID)).await;

    response.assert_status_not_found();
    let envelope = response.json::<Value>();
    assert_eq!(envelope["success"], json!(false));
    assert_eq!(envelope["statusCode"], json!(404));
    assert_eq!(
        envelope["message"],
        json!(format!("Note with ID {} not found", MISSING_ID))
    );
}

#[tokio::test]
async fn note_get_by_malformed_id_bad_request() {
    let dir = TempDir::new().unwrap();
    let server = setup_server(&dir);

    let response = server.get("/notes/not-a-valid-id").await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let envelope = response.json::<Value>();
    assert_eq!(envelope["success"], json!(false));
}

#[tokio::test]
async fn note_delete_twice() {
    let dir = TempDir::new().unwrap();
    let server = setup_server(&dir);

    let created = create_note(&server, "A", "B").await;

    let response = server.delete(&format!("/notes/{}", created.id)).await;
    response.assert_status(StatusCode::NO_CONTENT);
    assert_eq!(response.text(), "");

    let response = server.delete(&format!("/notes/{}", created.id)).await;
    response.assert_status_not_found();
    let envelope = response.json::<Value>();
    assert_eq!(
        envelope["message"],
        json!(format!("Note with ID {} not found", created.id))
    );
}

#[tokio::test]
async fn health_endpoints() {
    let dir = TempDir::new().unwrap();
    let server = setup_server(&dir);

    let response = server.get("/").await;
    response.assert_status_ok();
    assert_eq!(response.text(), "Hello World!");

    let response = server.get("/health").await;
    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["status"], json!("ok"));
    assert!(body["timestamp"].is_i64());
}
