//! Router-level tests: status codes, error envelope, and response shapes.

mod support;

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use reelist::infra::http::{self, HttpState};
use support::{TestBackend, build_service};

fn router(backend: Arc<TestBackend>) -> Router {
    http::build_router(HttpState::new(build_service(backend)))
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn add_request(owner: &str, content_id: &str, content_type: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/mylist/add")
        .header("user-id", owner)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({"contentId": content_id, "contentType": content_type}).to_string(),
        ))
        .unwrap()
}

fn get_request(owner: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header("user-id", owner)
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn add_returns_created_with_record() {
    let backend = TestBackend::new();
    backend.seed_movie("m-1", "Heat");
    let app = router(backend);

    let response = app.oneshot(add_request("alice", "m-1", "movie")).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = body_json(response).await;
    assert_eq!(body["ownerId"], "alice");
    assert_eq!(body["contentId"], "m-1");
    assert_eq!(body["contentKind"], "movie");
    assert!(body["addedAt"].is_string());
}

#[tokio::test]
async fn add_without_user_id_header_is_bad_request() {
    let backend = TestBackend::new();
    let app = router(backend);

    let request = Request::builder()
        .method("POST")
        .uri("/api/mylist/add")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({"contentId": "m-1", "contentType": "movie"}).to_string(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "missing_user_id");
}

#[tokio::test]
async fn add_with_unknown_kind_is_bad_request() {
    let backend = TestBackend::new();
    let app = router(backend);

    let response = app
        .oneshot(add_request("alice", "m-1", "podcast"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "invalid_input");
}

#[tokio::test]
async fn add_of_unknown_content_is_not_found() {
    let backend = TestBackend::new();
    let app = router(backend);

    let response = app
        .oneshot(add_request("alice", "missing", "movie"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "content_not_found");
    assert!(body["error"]["hint"].is_string());
}

#[tokio::test]
async fn duplicate_add_is_conflict() {
    let backend = TestBackend::new();
    backend.seed_movie("m-1", "Heat");
    let app = router(backend);

    let response = app
        .clone()
        .oneshot(add_request("alice", "m-1", "movie"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app.oneshot(add_request("alice", "m-1", "movie")).await.unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "already_saved");
}

#[tokio::test]
async fn items_returns_page_envelope() {
    let backend = TestBackend::new();
    backend.seed_show("s-1", "The Wire");
    let app = router(backend);

    let response = app
        .clone()
        .oneshot(add_request("alice", "s-1", "tvshow"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .oneshot(get_request("alice", "/api/mylist/items?page=1&pageSize=10"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["page"], 1);
    assert_eq!(body["pageSize"], 10);
    assert_eq!(body["totalPages"], 1);
    assert_eq!(body["items"][0]["contentKind"], "tvshow");
    assert_eq!(body["items"][0]["content"]["kind"], "tvshow");
    assert_eq!(body["items"][0]["content"]["episodes"][0]["title"], "Pilot");
}

#[tokio::test]
async fn remove_round_trip() {
    let backend = TestBackend::new();
    backend.seed_movie("m-1", "Heat");
    let app = router(backend);

    let response = app
        .clone()
        .oneshot(add_request("alice", "m-1", "movie"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let request = Request::builder()
        .method("DELETE")
        .uri("/api/mylist/remove/m-1")
        .header("user-id", "alice")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["contentId"], "m-1");
    assert_eq!(body["removed"], true);

    // A second delete of the same membership is a 404.
    let request = Request::builder()
        .method("DELETE")
        .uri("/api/mylist/remove/m-1")
        .header("user-id", "alice")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn stats_returns_breakdown() {
    let backend = TestBackend::new();
    backend.seed_movie("m-1", "Heat");
    backend.seed_show("s-1", "The Wire");
    let app = router(backend);

    for (id, kind) in [("m-1", "movie"), ("s-1", "tvshow")] {
        let response = app
            .clone()
            .oneshot(add_request("alice", id, kind))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = app
        .oneshot(get_request("alice", "/api/mylist/stats"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["total"], 2);
    assert_eq!(body["byKind"]["movie"], 1);
    assert_eq!(body["byKind"]["show"], 1);
}

#[tokio::test]
async fn health_is_unauthenticated() {
    let backend = TestBackend::new();
    let app = router(backend);

    let request = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
}
