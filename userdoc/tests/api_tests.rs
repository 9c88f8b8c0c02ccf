//! API tests
//! Full HTTP request/response cycles through the router against the in-memory backend
use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use bson::{oid::ObjectId, Document};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::util::ServiceExt;
use userdoc::{router, state::AppState};
use userdoc_core::{
    backend::StoreBackend,
    error::DocumentStoreResult,
    query::{Expr, Query},
    repository::UserRepository,
    store::DocumentStore,
};
use userdoc_memory::InMemoryStore;

fn create_test_app() -> Router {
    let store = DocumentStore::new(InMemoryStore::new()).into_dyn();
    let repository = UserRepository::new(store, Duration::from_secs(5));

    router(AppState::new(Arc::new(repository)))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => request.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, body)
}

fn user(username: &str, expiry_date: i64) -> Value {
    json!({
        "username": username,
        "expiry_date": expiry_date,
        "outputs": ["hls", "rtmp"],
        "password": "hunter2",
    })
}

async fn seed(app: &Router, users: &[(&str, i64)]) {
    for (username, expiry_date) in users {
        let (status, _) = send(app, Method::POST, "/user", Some(user(username, *expiry_date))).await;
        assert_eq!(status, StatusCode::CREATED);
    }
}

fn usernames(page: &Value) -> Vec<&str> {
    page["records"]
        .as_array()
        .unwrap()
        .iter()
        .map(|record| record["username"].as_str().unwrap())
        .collect()
}

#[tokio::test]
async fn test_create_then_get_round_trip() {
    let app = create_test_app();

    let (status, body) = send(&app, Method::POST, "/user", Some(user("alice", 1_767_225_600))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(ObjectId::parse_str(body["user_id"].as_str().unwrap()).is_ok());

    let (status, body) = send(&app, Method::GET, "/user/alice", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, user("alice", 1_767_225_600));
}

#[tokio::test]
async fn test_create_reports_first_missing_field() {
    let app = create_test_app();

    let (status, body) = send(&app, Method::POST, "/user", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "username is required" }));

    let (status, body) = send(
        &app,
        Method::POST,
        "/user",
        Some(json!({ "username": "alice", "expiry_date": 1, "outputs": ["hls"] })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "password is required" }));

    let (status, body) = send(
        &app,
        Method::POST,
        "/user",
        Some(json!({ "username": "alice", "expiry_date": 1, "outputs": [], "password": "x" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "outputs are required" }));

    // Nothing was stored.
    let (_, page) = send(&app, Method::GET, "/users", None).await;
    assert_eq!(page["total_records"], 0);
}

#[tokio::test]
async fn test_create_treats_null_as_missing() {
    let app = create_test_app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/user",
        Some(json!({ "username": null, "expiry_date": 1, "outputs": ["a"], "password": "p" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "username is required" }));

    let (status, body) = send(
        &app,
        Method::POST,
        "/user",
        Some(json!({ "username": "alice", "expiry_date": 1, "outputs": null, "password": "p" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "outputs are required" }));
}

#[tokio::test]
async fn test_create_rejects_malformed_body() {
    let app = create_test_app();

    let request = Request::builder()
        .method(Method::POST)
        .uri("/user")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        Method::POST,
        "/user",
        Some(json!({ "username": "alice", "expiry_date": "tomorrow" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Invalid request payload" }));
}

#[tokio::test]
async fn test_get_unknown_user_is_not_found() {
    let app = create_test_app();

    let (status, body) = send(&app, Method::GET, "/user/nobody", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "User not found" }));
}

#[tokio::test]
async fn test_missing_username_segment() {
    let app = create_test_app();

    for method in [Method::GET, Method::PATCH] {
        let (status, body) = send(&app, method, "/user/", None).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "username not found" }));
    }
}

#[tokio::test]
async fn test_patch_updates_only_given_fields() {
    let app = create_test_app();
    seed(&app, &[("alice", 100)]).await;

    let (status, body) = send(
        &app,
        Method::PATCH,
        "/user/alice",
        Some(json!({ "expiry_date": 200 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "status": true, "message": "The user alice has been successfully updated!" })
    );

    let (_, body) = send(&app, Method::GET, "/user/alice", None).await;
    assert_eq!(body, user("alice", 200));
}

#[tokio::test]
async fn test_patch_unknown_user_is_not_found() {
    let app = create_test_app();

    let (status, body) = send(
        &app,
        Method::PATCH,
        "/user/nobody",
        Some(json!({ "password": "new" })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "User not found" }));
}

#[tokio::test]
async fn test_patch_rejects_unusable_bodies() {
    let app = create_test_app();
    seed(&app, &[("alice", 100)]).await;

    for body in [json!({}), json!(["password"]), json!({ "$unset": { "password": "" } })] {
        let (status, response) = send(&app, Method::PATCH, "/user/alice", Some(body)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response, json!({ "error": "Invalid request payload" }));
    }

    let (_, body) = send(&app, Method::GET, "/user/alice", None).await;
    assert_eq!(body, user("alice", 100));
}

#[tokio::test]
async fn test_patch_rejects_values_bson_cannot_hold() {
    let app = create_test_app();
    seed(&app, &[("alice", 100)]).await;

    for body in [
        json!({ "expiry_date": u64::MAX }),
        json!({ "tier": u64::MAX }),
    ] {
        let (status, response) = send(&app, Method::PATCH, "/user/alice", Some(body)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response, json!({ "error": "Invalid request payload" }));
    }
}

#[tokio::test]
async fn test_patch_type_checks_user_fields() {
    let app = create_test_app();
    seed(&app, &[("alice", 100)]).await;

    for body in [
        json!({ "expiry_date": "soon" }),
        json!({ "outputs": "hls" }),
        json!({ "username": 7 }),
        json!({ "password": null }),
    ] {
        let (status, response) = send(&app, Method::PATCH, "/user/alice", Some(body)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response, json!({ "error": "Invalid request payload" }));
    }

    // The stored record is still readable.
    let (status, body) = send(&app, Method::GET, "/user/alice", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, user("alice", 100));

    let (status, page) = send(&app, Method::GET, "/users", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(usernames(&page), vec!["alice"]);
}

#[tokio::test]
async fn test_patch_stores_extra_fields() {
    let app = create_test_app();
    seed(&app, &[("alice", 100)]).await;

    let (status, _) = send(
        &app,
        Method::PATCH,
        "/user/alice",
        Some(json!({ "tier": "gold", "outputs": ["dash"] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, page) = send(&app, Method::GET, "/users?tier=eqgold", None).await;
    assert_eq!(page["total_records"], 1);

    let (_, body) = send(&app, Method::GET, "/user/alice", None).await;
    assert_eq!(body["outputs"], json!(["dash"]));
}

#[tokio::test]
async fn test_list_defaults() {
    let app = create_test_app();
    seed(&app, &[("carol", 300), ("alice", 100), ("bob", 200)]).await;

    let (status, page) = send(&app, Method::GET, "/users", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total_records"], 3);
    assert_eq!(page["total_pages"], 1);
    // Ascending by expiry date.
    assert_eq!(usernames(&page), vec!["alice", "bob", "carol"]);
}

#[tokio::test]
async fn test_list_paginates_with_request_limit() {
    let app = create_test_app();
    seed(&app, &[("a", 1), ("b", 2), ("c", 3), ("d", 4), ("e", 5)]).await;

    let (_, page) = send(&app, Method::GET, "/users?limit=2&page=2", None).await;
    assert_eq!(page["total_records"], 5);
    assert_eq!(page["total_pages"], 3);
    assert_eq!(usernames(&page), vec!["c", "d"]);

    let (_, page) = send(&app, Method::GET, "/users?limit=2&page=9", None).await;
    assert_eq!(page["total_records"], 5);
    assert!(usernames(&page).is_empty());

    // Malformed values fall back to the defaults.
    let (status, page) = send(&app, Method::GET, "/users?limit=abc&page=0", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total_pages"], 1);
    assert_eq!(usernames(&page).len(), 5);
}

#[tokio::test]
async fn test_list_sorts_by_requested_field() {
    let app = create_test_app();
    seed(&app, &[("carol", 100), ("alice", 300), ("bob", 200)]).await;

    let (_, page) = send(&app, Method::GET, "/users?order=desc", None).await;
    assert_eq!(usernames(&page), vec!["alice", "bob", "carol"]);

    let (_, page) = send(&app, Method::GET, "/users?sortBy=username", None).await;
    assert_eq!(usernames(&page), vec!["alice", "bob", "carol"]);

    let (_, page) = send(&app, Method::GET, "/users?sortBy=username&order=desc", None).await;
    assert_eq!(usernames(&page), vec!["carol", "bob", "alice"]);
}

#[tokio::test]
async fn test_list_filters_by_prefixed_values() {
    let app = create_test_app();
    seed(&app, &[("alice", 100), ("bob", 200), ("carol", 300)]).await;

    let (_, page) = send(&app, Method::GET, "/users?username=eqbob", None).await;
    assert_eq!(page["total_records"], 1);
    assert_eq!(usernames(&page), vec!["bob"]);

    let (_, page) = send(&app, Method::GET, "/users?username=neqbob", None).await;
    assert_eq!(page["total_records"], 2);
    assert_eq!(usernames(&page), vec!["alice", "carol"]);

    let (_, page) = send(&app, Method::GET, "/users?username=gtebob&sortBy=username", None).await;
    assert_eq!(usernames(&page), vec!["bob", "carol"]);

    let (_, page) = send(&app, Method::GET, "/users?username=ltbob", None).await;
    assert_eq!(usernames(&page), vec!["alice"]);
}

#[tokio::test]
async fn test_list_filters_array_fields_by_element() {
    let app = create_test_app();
    seed(&app, &[("alice", 100), ("bob", 200)]).await;

    let (status, page) = send(&app, Method::GET, "/users?outputs=eqhls", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total_records"], 2);

    let (_, page) = send(&app, Method::GET, "/users?outputs=eqdash", None).await;
    assert_eq!(page["total_records"], 0);

    // `neq` only matches arrays with no equal element.
    let (_, page) = send(&app, Method::GET, "/users?outputs=neqhls", None).await;
    assert_eq!(page["total_records"], 0);
}

#[tokio::test]
async fn test_list_ignores_unusable_keys() {
    let app = create_test_app();
    seed(&app, &[("alice", 100), ("bob", 200)]).await;

    // No operator prefix, and a key given twice.
    let (_, page) = send(
        &app,
        Method::GET,
        "/users?username=bob&password=eqx&password=eqy",
        None,
    )
    .await;

    assert_eq!(page["total_records"], 2);
}

#[tokio::test]
async fn test_list_operands_are_strings() {
    let app = create_test_app();
    seed(&app, &[("alice", 100), ("bob", 200)]).await;

    // A string operand never matches the stored integer.
    let (_, page) = send(&app, Method::GET, "/users?expiry_date=gte100", None).await;

    assert_eq!(page["total_records"], 0);
    assert_eq!(page["total_pages"], 0);
}

#[derive(Debug)]
struct StalledStore;

#[async_trait]
impl StoreBackend for StalledStore {
    async fn insert_document(&self, _: Document, _: &str) -> DocumentStoreResult<ObjectId> {
        std::future::pending().await
    }

    async fn find_one(&self, _: Expr, _: &str) -> DocumentStoreResult<Option<Document>> {
        std::future::pending().await
    }

    async fn update_one(&self, _: Expr, _: Document, _: &str) -> DocumentStoreResult<u64> {
        std::future::pending().await
    }

    async fn query_documents(&self, _: Query, _: &str) -> DocumentStoreResult<Vec<Document>> {
        std::future::pending().await
    }

    async fn count_documents(&self, _: Option<Expr>, _: &str) -> DocumentStoreResult<u64> {
        std::future::pending().await
    }

    async fn ping(&self) -> DocumentStoreResult<()> {
        Ok(())
    }
}

#[tokio::test]
async fn test_store_timeout_is_internal_error() {
    let store = DocumentStore::new(StalledStore).into_dyn();
    let repository = UserRepository::new(store, Duration::from_millis(20));
    let app = router(AppState::new(Arc::new(repository)));

    let (status, body) = send(&app, Method::GET, "/user/alice", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "Internal Server Error" }));

    let (status, _) = send(&app, Method::POST, "/user", Some(user("alice", 1))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let (status, _) = send(&app, Method::GET, "/users", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}
