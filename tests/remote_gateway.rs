use std::time::Duration;

use httpmock::prelude::*;
use scorecard_back::dao::{
    gateway::{
        DocumentKey, PersistenceGateway,
        remote::{RemoteConfig, RemoteGateway},
    },
    storage::StorageError,
};
use serde_json::json;

const SCORECARD_ID: &str = "1700000000000-abcdef";

fn gateway(server: &MockServer) -> RemoteGateway {
    RemoteGateway::new(RemoteConfig::new(server.base_url())).unwrap()
}

#[tokio::test]
async fn upload_puts_json_body_under_kind_and_id() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(PUT)
                .path(format!("/scorecard/{SCORECARD_ID}"))
                .header("content-type", "application/json")
                .json_body(json!({"scorecard_id": SCORECARD_ID}));
            then.status(200)
                .json_body(json!({"status": "Success", "message": "saved", "id": SCORECARD_ID}));
        })
        .await;

    let payload = json!({"scorecard_id": SCORECARD_ID}).to_string();
    gateway(&server)
        .upload(DocumentKey::scorecard(SCORECARD_ID), payload)
        .await
        .unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn error_envelope_is_a_rejection() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(PUT).path(format!("/scorecard/{SCORECARD_ID}"));
            then.status(200)
                .json_body(json!({"status": "Error", "message": "disk full"}));
        })
        .await;

    let err = gateway(&server)
        .upload(DocumentKey::scorecard(SCORECARD_ID), "{}".into())
        .await
        .unwrap_err();

    assert!(err.is_rejection());
    assert!(err.to_string().contains("disk full"));
}

#[tokio::test]
async fn server_errors_are_unavailable() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(PUT);
            then.status(503);
        })
        .await;

    let err = gateway(&server)
        .upload(DocumentKey::scorecard(SCORECARD_ID), "{}".into())
        .await
        .unwrap_err();

    assert!(matches!(err, StorageError::Unavailable { .. }));
}

#[tokio::test]
async fn slow_store_times_out() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(PUT);
            then.status(200)
                .delay(Duration::from_secs(3))
                .json_body(json!({"status": "Success"}));
        })
        .await;

    let store = RemoteGateway::new(
        RemoteConfig::new(server.base_url()).with_timeout(Duration::from_millis(200)),
    )
    .unwrap();
    let err = store
        .upload(DocumentKey::scorecard(SCORECARD_ID), "{}".into())
        .await
        .unwrap_err();

    assert!(!err.is_rejection());
    assert!(err.to_string().contains("timed out"));
}

#[tokio::test]
async fn download_missing_document_is_none() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/courses/0123456789abcdef");
            then.status(404);
        })
        .await;

    let data = gateway(&server)
        .download(DocumentKey::courses("0123456789abcdef"))
        .await
        .unwrap();

    assert_eq!(data, None);
}

#[tokio::test]
async fn download_returns_envelope_data() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/courses/0123456789abcdef");
            then.status(200).json_body(json!({
                "status": "Success",
                "data": {"courses": []},
                "id": "0123456789abcdef"
            }));
        })
        .await;

    let data = gateway(&server)
        .download(DocumentKey::courses("0123456789abcdef"))
        .await
        .unwrap();

    assert_eq!(data, Some(json!({"courses": []})));
}

#[tokio::test]
async fn download_with_null_data_is_none() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path(format!("/scorecard/{SCORECARD_ID}"));
            then.status(200)
                .json_body(json!({"status": "Success", "data": null}));
        })
        .await;

    let data = gateway(&server)
        .download(DocumentKey::scorecard(SCORECARD_ID))
        .await
        .unwrap();

    assert_eq!(data, None);
}

#[tokio::test]
async fn health_check_fails_only_on_server_errors() {
    let server = MockServer::start_async().await;
    let mut root = server
        .mock_async(|when, then| {
            when.method(GET).path("/");
            then.status(404);
        })
        .await;

    assert!(gateway(&server).health_check().await.is_ok());

    root.delete_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/");
            then.status(500);
        })
        .await;

    assert!(gateway(&server).health_check().await.is_err());
}

#[tokio::test]
async fn unreachable_store_is_unavailable() {
    let store = RemoteGateway::new(
        RemoteConfig::new("http://127.0.0.1:9").with_timeout(Duration::from_secs(2)),
    )
    .unwrap();

    let err = store
        .upload(DocumentKey::scorecard(SCORECARD_ID), "{}".into())
        .await
        .unwrap_err();

    assert!(matches!(err, StorageError::Unavailable { .. }));
}
