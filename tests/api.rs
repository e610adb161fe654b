//! End-to-end tests against a running server.

use reqwest::StatusCode;
use serde_json::{json, Value};
use std::time::Duration;

use crisis_corner::requests::{ItemRequest, Status};

mod common;

async fn create(client: &reqwest::Client, url: &str, name: &str, item: &str) -> String {
    let res = client
        .put(url)
        .json(&json!({ "requestorName": name, "itemRequested": item }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = res.json().await.unwrap();
    body["insertedId"].as_str().unwrap().to_string()
}

async fn list(client: &reqwest::Client, url: &str, query: &[(&str, &str)]) -> Vec<ItemRequest> {
    let res = client.get(url).query(query).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    res.json().await.unwrap()
}

#[tokio::test]
async fn test_request_lifecycle() {
    let server = common::start_server(common::test_config()).await;
    let client = common::client();
    let url = server.url();

    let id = create(&client, &url, "Jane Doe", "Flashlights").await;

    let all = list(&client, &url, &[]).await;
    let first = &all[0];
    assert_eq!(first.id.to_hex(), id);
    assert_eq!(first.requestor_name, "Jane Doe");
    assert_eq!(first.item_requested, "Flashlights");
    assert_eq!(first.status, Status::Pending);
    assert_eq!(first.created_date, first.last_edited_date);

    tokio::time::sleep(Duration::from_millis(5)).await;
    let res = client
        .patch(&url)
        .json(&json!({ "id": id, "status": "approved" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let update: Value = res.json().await.unwrap();
    assert_eq!(update["matchedCount"], 1);
    assert_eq!(update["modifiedCount"], 1);

    let approved = list(&client, &url, &[("status", "approved"), ("page", "1")]).await;
    let record = approved.iter().find(|r| r.id.to_hex() == id).unwrap();
    assert_eq!(record.status, Status::Approved);
    assert!(record.last_edited_date > first.last_edited_date);
    assert_eq!(record.created_date, first.created_date);

    assert!(list(&client, &url, &[("status", "pending")]).await.is_empty());

    server.stop().await.unwrap();
}

#[tokio::test]
async fn test_pagination_over_http() {
    let mut config = common::test_config();
    config.pagination.page_size = 2;
    let server = common::start_server(config).await;
    let client = common::client();
    let url = server.url();

    for name in ["a", "b", "c", "d", "e"] {
        create(&client, &url, name, "Water").await;
        tokio::time::sleep(Duration::from_millis(2)).await;
    }

    let names = |records: Vec<ItemRequest>| -> Vec<String> {
        records.into_iter().map(|r| r.requestor_name).collect()
    };

    assert_eq!(names(list(&client, &url, &[]).await), vec!["e", "d"]);
    assert_eq!(names(list(&client, &url, &[("page", "2")]).await), vec!["c", "b"]);
    assert_eq!(names(list(&client, &url, &[("page", "3")]).await), vec!["a"]);
    assert!(list(&client, &url, &[("page", "4")]).await.is_empty());
    assert_eq!(names(list(&client, &url, &[("page", "0")]).await), vec!["e", "d"]);
    assert_eq!(names(list(&client, &url, &[("page", "-7")]).await), vec!["e", "d"]);

    server.stop().await.unwrap();
}

#[tokio::test]
async fn test_invalid_input_responses() {
    let server = common::start_server(common::test_config()).await;
    let client = common::client();
    let url = server.url();

    let res = client
        .put(&url)
        .json(&json!({ "requestorName": "", "itemRequested": "Rope" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "INVALID_INPUT");

    let res = client
        .patch(&url)
        .json(&json!({ "id": "zzz", "status": "approved" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = client
        .patch(&url)
        .json(&json!({ "id": "65a1b2c3d4e5f60718293a4b", "status": "lost" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    assert!(list(&client, &url, &[]).await.is_empty());

    server.stop().await.unwrap();
}

#[tokio::test]
async fn test_file_store_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("requests.json");
    let mut config = common::test_config();
    config.store.uri = format!("file://{}", path.display());

    let server = common::start_server(config.clone()).await;
    let client = common::client();
    let id = create(&client, &server.url(), "Sam", "Generators").await;
    server.stop().await.unwrap();

    let server = common::start_server(config).await;
    let records = list(&client, &server.url(), &[]).await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id.to_hex(), id);
    assert_eq!(records[0].item_requested, "Generators");
    server.stop().await.unwrap();
}

#[tokio::test]
async fn test_health_and_request_id() {
    let server = common::start_server(common::test_config()).await;
    let client = common::client();

    let res = client
        .get(format!("http://{}/health", server.addr))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().contains_key("x-request-id"));
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["status"], "ok");

    server.stop().await.unwrap();
}
