//! Smoke tests against a running server

use reqwest::Client;
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api";

/// Title and ISBN that do not collide with earlier runs
fn unique_book() -> Value {
    let stamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let isbn = format!("978{:010}", stamp % 10_000_000_000);
    json!({
        "title": format!("Smoke Test {}", stamp),
        "author": "Test Author",
        "isbn": isbn,
        "publishedYear": 2024
    })
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_list_books() {
    let client = Client::new();

    let response = client
        .get(format!("{}/books", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body.is_array());
}

#[tokio::test]
#[ignore]
async fn test_create_copy_and_delete_book() {
    let client = Client::new();

    let response = client
        .post(format!("{}/books", BASE_URL))
        .json(&unique_book())
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse response");
    let book_id = body["id"].as_i64().expect("No book ID");

    let response = client
        .post(format!("{}/books/{}/copies", BASE_URL, book_id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse response");
    let copy_id = body["id"].as_i64().expect("No copy ID");
    assert_eq!(body["available"], true);

    let response = client
        .put(format!("{}/books/{}/copies/{}", BASE_URL, book_id, copy_id))
        .json(&json!({ "available": false }))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let response = client
        .delete(format!("{}/books/{}", BASE_URL, book_id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 204);

    let response = client
        .get(format!("{}/books/{}", BASE_URL, book_id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_unknown_book() {
    let client = Client::new();

    let response = client
        .get(format!("{}/books/{}", BASE_URL, i64::MAX))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 404);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["timestamp"].is_string());
    assert!(body["path"].is_string());
}
