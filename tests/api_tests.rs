//! API tests against the full router backed by the in-memory store

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use catalog_server::{api, repository::MemoryBookStore, AppConfig, AppState};

fn app() -> Router {
    let state = AppState::new(AppConfig::default(), Arc::new(MemoryBookStore::new()));
    api::router(state)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            request = request.header("content-type", "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(request.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn clean_code() -> Value {
    json!({
        "title": "Clean Code",
        "author": "Robert C. Martin",
        "isbn": "9780132350884",
        "publicationDate": "2008-08-01",
        "genre": "Programming",
        "available": true
    })
}

#[tokio::test]
async fn test_health_check() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = send(&app, Method::GET, "/ready", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["books"], 0);
}

#[tokio::test]
async fn test_create_and_find_by_genre() {
    let app = app();
    let (status, created) = send(&app, Method::POST, "/api/books", Some(clean_code())).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_i64().expect("No book ID");
    assert_eq!(created["publicationDate"], "2008-08-01");

    let (status, found) = send(&app, Method::GET, &format!("/api/books/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found, created);

    let (status, found) = send(&app, Method::GET, "/api/books/isbn/9780132350884", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found, created);

    let (status, list) = send(&app, Method::GET, "/api/books/search/genre?genre=programming", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list, json!([created]));
}

#[tokio::test]
async fn test_duplicate_isbn_conflict() {
    let app = app();
    let mut book = clean_code();
    book["isbn"] = json!("1234567890");
    let (status, _) = send(&app, Method::POST, "/api/books", Some(book.clone())).await;
    assert_eq!(status, StatusCode::CREATED);

    book["title"] = json!("Another title");
    let (status, body) = send(&app, Method::POST, "/api/books", Some(book)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Duplicate");

    let (_, list) = send(&app, Method::GET, "/api/books", None).await;
    assert_eq!(list.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_create_validation_errors() {
    let app = app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/books",
        Some(json!({
            "title": " ",
            "author": "Someone",
            "isbn": "123",
            "genre": "g".repeat(51)
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let fields: Vec<&str> = body["fields"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["genre", "isbn", "publicationDate", "title"]);

    let (_, list) = send(&app, Method::GET, "/api/books", None).await;
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let app = app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/books")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_flow() {
    let app = app();
    let (_, created) = send(&app, Method::POST, "/api/books", Some(clean_code())).await;
    let id = created["id"].as_i64().unwrap();
    let mut other = clean_code();
    other["isbn"] = json!("9780134685991");
    send(&app, Method::POST, "/api/books", Some(other)).await;

    let (status, body) = send(
        &app,
        Method::PATCH,
        &format!("/api/books/{}/availability", id),
        Some(json!({ "available": false })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["available"], false);

    let mut update = clean_code();
    update.as_object_mut().unwrap().remove("available");
    update["title"] = json!("Clean Code (2nd printing)");
    let (status, body) = send(&app, Method::PUT, &format!("/api/books/{}", id), Some(update.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Clean Code (2nd printing)");
    assert_eq!(body["available"], false);

    update["isbn"] = json!("9780134685991");
    let (status, _) = send(&app, Method::PUT, &format!("/api/books/{}", id), Some(update)).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(&app, Method::PUT, "/api/books/999", Some(clean_code())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, list) = send(&app, Method::GET, "/api/books/available", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_availability_requires_value() {
    let app = app();
    let (_, created) = send(&app, Method::POST, "/api/books", Some(clean_code())).await;
    let uri = format!("/api/books/{}/availability", created["id"]);

    let (status, body) = send(&app, Method::PATCH, &uri, Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["fields"][0]["field"], "available");

    let (status, _) = send(&app, Method::PATCH, "/api/books/999/availability", Some(json!({ "available": true }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete() {
    let app = app();
    let (_, created) = send(&app, Method::POST, "/api/books", Some(clean_code())).await;
    let uri = format!("/api/books/{}", created["id"]);

    let (status, body) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, _) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_searches() {
    let app = app();
    send(&app, Method::POST, "/api/books", Some(clean_code())).await;

    let (status, list) = send(&app, Method::GET, "/api/books/search/author?author=MARTIN", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);

    let (_, list) = send(&app, Method::GET, "/api/books/search/title?title=code", None).await;
    assert_eq!(list.as_array().unwrap().len(), 1);

    let (status, list) = send(&app, Method::GET, "/api/books/search/title?title=tolkien", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list, json!([]));

    let (status, body) = send(&app, Method::GET, "/api/books/search/author", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BadValue");
    assert_eq!(body["code"], 18);

    let (status, _) = send(&app, Method::GET, "/api/books/isbn/0000000000", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unparseable_id_is_bad_request() {
    let app = app();
    for (method, body) in [
        (Method::GET, None),
        (Method::PUT, Some(clean_code())),
        (Method::DELETE, None),
    ] {
        let (status, body) = send(&app, method, "/api/books/abc", body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "BadValue");
    }

    let (status, body) = send(
        &app,
        Method::PATCH,
        "/api/books/abc/availability",
        Some(json!({ "available": true })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BadValue");
}

#[tokio::test]
async fn test_null_title_is_field_error() {
    let app = app();
    let mut book = clean_code();
    book["title"] = Value::Null;
    let (status, body) = send(&app, Method::POST, "/api/books", Some(book)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BadValue");
    assert_eq!(body["fields"][0]["field"], "title");
    assert_eq!(body["fields"][0]["message"], "Title is required");
}
