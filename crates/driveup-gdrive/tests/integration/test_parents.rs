//! Integration tests for the parents lookup

use driveup_core::ports::IRemoteFileService;
use driveup_gdrive::DriveError;
use wiremock::{
    matchers::{method, path},
    Mock, ResponseTemplate,
};

use crate::common;

#[tokio::test]
async fn test_fetch_parents_returns_ids_in_order() {
    let (server, service) = common::setup_drive_mock().await;
    common::mount_parents(&server, "file-1", &["B", "C", "D"]).await;

    let parents = service
        .fetch_parents(&common::resource_id("file-1"))
        .await
        .expect("fetch failed");

    assert_eq!(parents, vec!["B", "C", "D"]);
}

#[tokio::test]
async fn test_fetch_parents_missing_field_is_empty() {
    let (server, service) = common::setup_drive_mock().await;

    Mock::given(method("GET"))
        .and(path("/drive/v3/files/root-item"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .mount(&server)
        .await;

    let parents = service
        .fetch_parents(&common::resource_id("root-item"))
        .await
        .unwrap();
    assert!(parents.is_empty());
}

#[tokio::test]
async fn test_fetch_parents_not_found() {
    let (server, service) = common::setup_drive_mock().await;

    Mock::given(method("GET"))
        .and(path("/drive/v3/files/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "error": {
                "code": 404,
                "message": "File not found: missing."
            }
        })))
        .mount(&server)
        .await;

    let err = service
        .fetch_parents(&common::resource_id("missing"))
        .await
        .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<DriveError>(),
        Some(DriveError::NotFound(_))
    ));
    assert_eq!(err.to_string(), "Not found: File not found: missing.");
}
