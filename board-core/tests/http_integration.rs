//! Integration test for the HTTP API over a persistent store
//!
//! Posts through the router, restarts the store from its data directory and
//! checks that a fresh router serves the same board.

use axum::body::{to_bytes, Body};
use axum::http::{HeaderName, Request, StatusCode};
use axum::Router;
use board_core::config::StoreConfig;
use board_core::http_api::{build_router, AppState};
use board_core::RecordStore;
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

const ALICE: &str = "0x00000000000000000000000000000000000000aa";

fn open_router(dir: &TempDir) -> (Router, Arc<RecordStore>) {
    let store = Arc::new(RecordStore::open(&StoreConfig::persistent(dir.path())).unwrap());
    let state = AppState::new(store.clone(), HeaderName::from_static("x-actor-id"));
    (build_router(Arc::new(state)), store)
}

async fn call(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn post(content: &str) -> Request<Body> {
    Request::post("/messages")
        .header("content-type", "application/json")
        .header("x-actor-id", ALICE)
        .body(Body::from(json!({ "content": content }).to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_board_survives_restart() {
    let dir = TempDir::new().unwrap();

    {
        let (router, store) = open_router(&dir);
        let mut events = store.subscribe();

        for (i, content) in ["first", "second", "third"].iter().enumerate() {
            let (status, body) = call(&router, post(content)).await;
            assert_eq!(status, StatusCode::CREATED);
            assert_eq!(body["index"], i as u64);
            assert_eq!(events.recv().await.unwrap().content, *content);
        }

        let (status, _) = call(&router, post("")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    let (router, store) = open_router(&dir);
    assert!(store.is_persistent());

    let (_, body) = call(&router, get("/messages/count")).await;
    assert_eq!(body["count"], 3);

    let (_, body) = call(&router, get(&format!("/authors/{}/messages", ALICE))).await;
    let contents: Vec<&str> =
        body.as_array().unwrap().iter().map(|r| r["content"].as_str().unwrap()).collect();
    assert_eq!(contents, vec!["first", "second", "third"]);

    let (status, body) = call(&router, post("fourth")).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["index"], 3);

    let (_, body) = call(&router, get("/health")).await;
    assert_eq!(body, json!({ "status": "ok", "count": 4, "persistent": true }));
}
