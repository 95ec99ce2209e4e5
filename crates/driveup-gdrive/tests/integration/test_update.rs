//! Integration tests for metadata updates and resumable content uploads

use std::time::Duration;

use driveup_core::domain::{MetadataPatch, ParentDelta};
use driveup_core::ports::{IRemoteFileService, MediaUpload, UpdateCall};
use driveup_core::transfer::{self, ByteStream};
use driveup_gdrive::DriveError;
use tokio::io::AsyncWriteExt;
use tokio_util::sync::CancellationToken;
use wiremock::{
    matchers::{body_json, header, method, path, query_param},
    Mock, ResponseTemplate,
};

use crate::common;

fn media(data: Vec<u8>, chunk_size: u64) -> MediaUpload {
    let size = data.len() as u64;
    MediaUpload {
        stream: Box::new(std::io::Cursor::new(data)),
        chunk_size,
        size,
    }
}

// ============================================================================
// Metadata-only updates
// ============================================================================

#[tokio::test]
async fn test_metadata_update_sends_only_set_fields() {
    let (server, service) = common::setup_drive_mock().await;

    Mock::given(method("PATCH"))
        .and(path("/drive/v3/files/X"))
        .and(query_param("fields", "id,name,parents,size"))
        .and(query_param("supportsAllDrives", "true"))
        .and(header("authorization", "Bearer test-token"))
        .and(body_json(serde_json::json!({ "description": "Q3" })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(common::file_json("X", "r.pdf", &["P"], 10)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let call = UpdateCall {
        id: common::resource_id("X"),
        metadata: MetadataPatch {
            description: Some("Q3".into()),
            ..Default::default()
        },
        media: None,
        parents: None,
    };

    let file = service.update(call, CancellationToken::new()).await.unwrap();
    assert_eq!(file.id, "X");
    assert_eq!(file.name.as_deref(), Some("r.pdf"));
    assert_eq!(file.size, 10);
}

#[tokio::test]
async fn test_metadata_update_with_parent_delta() {
    let (server, service) = common::setup_drive_mock().await;

    Mock::given(method("PATCH"))
        .and(path("/drive/v3/files/X"))
        .and(query_param("addParents", "A"))
        .and(query_param("removeParents", "C,D"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(common::file_json("X", "r.pdf", &["B", "A"], 10)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let call = UpdateCall {
        id: common::resource_id("X"),
        metadata: MetadataPatch::default(),
        media: None,
        parents: Some(ParentDelta::reconcile(["B", "C", "D"], ["A", "B"])),
    };

    let file = service.update(call, CancellationToken::new()).await.unwrap();
    assert_eq!(file.parents, vec!["B", "A"]);
}

#[tokio::test]
async fn test_metadata_update_forbidden() {
    let (server, service) = common::setup_drive_mock().await;

    Mock::given(method("PATCH"))
        .and(path("/drive/v3/files/X"))
        .respond_with(ResponseTemplate::new(403).set_body_json(serde_json::json!({
            "error": {
                "code": 403,
                "message": "The user does not have sufficient permissions for this file."
            }
        })))
        .mount(&server)
        .await;

    let call = UpdateCall {
        id: common::resource_id("X"),
        metadata: MetadataPatch {
            name: Some("new.pdf".into()),
            ..Default::default()
        },
        media: None,
        parents: None,
    };

    let err = service
        .update(call, CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<DriveError>(),
        Some(DriveError::Forbidden(_))
    ));
    assert!(err.to_string().contains("sufficient permissions"));
}

#[tokio::test]
async fn test_update_with_cancelled_token_sends_nothing() {
    let (server, service) = common::setup_drive_mock().await;

    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let cancel = CancellationToken::new();
    cancel.cancel();

    let call = UpdateCall {
        id: common::resource_id("X"),
        metadata: MetadataPatch::default(),
        media: None,
        parents: None,
    };

    let err = service.update(call, cancel).await.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<DriveError>(),
        Some(DriveError::Cancelled)
    ));
}

// ============================================================================
// Content uploads
// ============================================================================

#[tokio::test]
async fn test_upload_single_chunk() {
    let (server, service) = common::setup_drive_mock().await;

    Mock::given(method("PATCH"))
        .and(path("/upload/drive/v3/files/X"))
        .and(query_param("uploadType", "resumable"))
        .and(header("x-upload-content-type", "application/pdf"))
        .and(header("x-upload-content-length", "1000"))
        .and(body_json(serde_json::json!({
            "name": "report.pdf",
            "mimeType": "application/pdf"
        })))
        .respond_with(ResponseTemplate::new(200).insert_header(
            "Location",
            format!("{}{}", server.uri(), common::SESSION_PATH),
        ))
        .expect(1)
        .mount(&server)
        .await;
    common::mount_chunk_complete(
        &server,
        "bytes 0-999/1000",
        common::file_json("X", "report.pdf", &["P"], 1000),
    )
    .await;

    let call = UpdateCall {
        id: common::resource_id("X"),
        metadata: MetadataPatch {
            name: Some("report.pdf".into()),
            mime_type: Some("application/pdf".into()),
            ..Default::default()
        },
        media: Some(media(common::content(1000), 8 * 1024 * 1024)),
        parents: None,
    };

    let file = service.update(call, CancellationToken::new()).await.unwrap();
    assert_eq!(file.size, 1000);
    assert_eq!(file.name.as_deref(), Some("report.pdf"));
}

#[tokio::test]
async fn test_upload_multiple_chunks() {
    let (server, service) = common::setup_drive_mock().await;

    common::mount_upload_session(&server, "X").await;
    common::mount_chunk_incomplete(&server, "bytes 0-262143/*", "bytes=0-262143").await;
    common::mount_chunk_complete(
        &server,
        "bytes 262144-307199/307200",
        common::file_json("X", "big.bin", &["P"], 307_200),
    )
    .await;

    // Chunk size below the minimum is raised to 256 KiB
    let call = UpdateCall {
        id: common::resource_id("X"),
        metadata: MetadataPatch::default(),
        media: Some(media(common::content(307_200), 1024)),
        parents: None,
    };

    let file = service.update(call, CancellationToken::new()).await.unwrap();
    assert_eq!(file.size, 307_200);
}

#[tokio::test]
async fn test_upload_resends_unpersisted_tail() {
    let (server, service) = common::setup_drive_mock().await;

    common::mount_upload_session(&server, "X").await;
    common::mount_chunk_incomplete(&server, "bytes 0-262143/*", "bytes=0-131071").await;
    common::mount_chunk_complete(
        &server,
        "bytes 131072-307199/307200",
        common::file_json("X", "big.bin", &["P"], 307_200),
    )
    .await;

    let call = UpdateCall {
        id: common::resource_id("X"),
        metadata: MetadataPatch::default(),
        media: Some(media(common::content(307_200), 262_144)),
        parents: None,
    };

    let file = service.update(call, CancellationToken::new()).await.unwrap();
    assert_eq!(file.size, 307_200);
}

#[tokio::test]
async fn test_upload_without_progress_fails() {
    let (server, service) = common::setup_drive_mock().await;

    common::mount_upload_session(&server, "X").await;
    common::mount_chunk_incomplete(&server, "bytes 0-262143/*", "bytes=0-131071").await;
    // The resent tail is answered with the same committed offset
    common::mount_chunk_incomplete(&server, "bytes 131072-307199/307200", "bytes=0-131071").await;

    let call = UpdateCall {
        id: common::resource_id("X"),
        metadata: MetadataPatch::default(),
        media: Some(media(common::content(307_200), 262_144)),
        parents: None,
    };

    let err = tokio::time::timeout(
        Duration::from_secs(5),
        service.update(call, CancellationToken::new()),
    )
    .await
    .expect("upload must not loop on a stuck session")
    .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<DriveError>(),
        Some(DriveError::InvalidResponse(_))
    ));
}

#[tokio::test]
async fn test_upload_malformed_range_is_invalid() {
    let (server, service) = common::setup_drive_mock().await;

    common::mount_upload_session(&server, "X").await;
    common::mount_chunk_incomplete(&server, "bytes 0-262143/*", "bytes=0-garbage").await;

    let call = UpdateCall {
        id: common::resource_id("X"),
        metadata: MetadataPatch::default(),
        media: Some(media(common::content(307_200), 262_144)),
        parents: None,
    };

    let err = service
        .update(call, CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<DriveError>(),
        Some(DriveError::InvalidResponse(_))
    ));
}

#[tokio::test]
async fn test_upload_ending_on_chunk_boundary_finalizes_empty() {
    let (server, service) = common::setup_drive_mock().await;

    common::mount_upload_session(&server, "X").await;
    common::mount_chunk_incomplete(&server, "bytes 0-262143/*", "bytes=0-262143").await;
    common::mount_chunk_complete(
        &server,
        "bytes */262144",
        common::file_json("X", "exact.bin", &["P"], 262_144),
    )
    .await;

    let call = UpdateCall {
        id: common::resource_id("X"),
        metadata: MetadataPatch::default(),
        media: Some(media(common::content(262_144), 262_144)),
        parents: None,
    };

    let file = service.update(call, CancellationToken::new()).await.unwrap();
    assert_eq!(file.size, 262_144);
}

#[tokio::test]
async fn test_upload_empty_file() {
    let (server, service) = common::setup_drive_mock().await;

    common::mount_upload_session(&server, "X").await;
    common::mount_chunk_complete(&server, "bytes */0", common::file_json("X", "empty", &[], 0))
        .await;

    let call = UpdateCall {
        id: common::resource_id("X"),
        metadata: MetadataPatch::default(),
        media: Some(media(Vec::new(), 262_144)),
        parents: None,
    };

    let file = service.update(call, CancellationToken::new()).await.unwrap();
    assert_eq!(file.size, 0);
}

#[tokio::test]
async fn test_upload_carries_parent_delta_on_session() {
    let (server, service) = common::setup_drive_mock().await;

    Mock::given(method("PATCH"))
        .and(path("/upload/drive/v3/files/X"))
        .and(query_param("uploadType", "resumable"))
        .and(query_param("addParents", "A"))
        .and(query_param("removeParents", "C"))
        .respond_with(ResponseTemplate::new(200).insert_header(
            "Location",
            format!("{}{}", server.uri(), common::SESSION_PATH),
        ))
        .expect(1)
        .mount(&server)
        .await;
    common::mount_chunk_complete(
        &server,
        "bytes 0-9/10",
        common::file_json("X", "a.txt", &["B", "A"], 10),
    )
    .await;

    let call = UpdateCall {
        id: common::resource_id("X"),
        metadata: MetadataPatch::default(),
        media: Some(media(common::content(10), 262_144)),
        parents: Some(ParentDelta::reconcile(["B", "C"], ["A", "B"])),
    };

    let file = service.update(call, CancellationToken::new()).await.unwrap();
    assert_eq!(file.parents, vec!["B", "A"]);
}

#[tokio::test]
async fn test_upload_session_without_location_is_invalid() {
    let (server, service) = common::setup_drive_mock().await;

    Mock::given(method("PATCH"))
        .and(path("/upload/drive/v3/files/X"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let call = UpdateCall {
        id: common::resource_id("X"),
        metadata: MetadataPatch::default(),
        media: Some(media(common::content(10), 262_144)),
        parents: None,
    };

    let err = service
        .update(call, CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<DriveError>(),
        Some(DriveError::InvalidResponse(_))
    ));
}

#[tokio::test]
async fn test_stalled_stream_times_out_and_cancels() {
    let (server, service) = common::setup_drive_mock().await;
    common::mount_upload_session(&server, "X").await;

    // The writer half stays open so the reader blocks after the first bytes
    let (mut writer, reader) = tokio::io::duplex(64);
    writer.write_all(b"first bytes").await.unwrap();

    let source: ByteStream = Box::new(reader);
    let (stream, handle) = transfer::compose(source, None, 1000, Duration::from_millis(200));

    let call = UpdateCall {
        id: common::resource_id("X"),
        metadata: MetadataPatch::default(),
        media: Some(MediaUpload {
            stream,
            chunk_size: 262_144,
            size: 1000,
        }),
        parents: None,
    };

    let result = service.update(call, handle.cancellation_token()).await;

    assert!(result.is_err());
    assert!(handle.timed_out());
    assert!(handle.cancellation_token().is_cancelled());
    assert_eq!(handle.bytes_transferred(), 11);
    drop(writer);
}
