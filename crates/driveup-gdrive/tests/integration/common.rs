//! Shared test helpers for Drive API integration tests
//!
//! Each helper mounts the mock endpoints a scenario needs on a wiremock
//! server. The client is always configured with `test-token`.

use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use driveup_core::domain::ResourceId;
use driveup_gdrive::client::DriveClient;
use driveup_gdrive::provider::DriveFileService;

/// Path of the upload session handed out by [`mount_upload_session`]
pub const SESSION_PATH: &str = "/upload/session/abc";

/// Starts a mock server and returns a service pointing at it
pub async fn setup_drive_mock() -> (MockServer, DriveFileService) {
    let server = MockServer::start().await;
    let client = DriveClient::with_base_url("test-token", server.uri()).unwrap();
    (server, DriveFileService::new(client))
}

pub fn resource_id(id: &str) -> ResourceId {
    ResourceId::new(id.to_string()).unwrap()
}

/// A file resource body as returned by `fields=id,name,parents,size`
pub fn file_json(id: &str, name: &str, parents: &[&str], size: u64) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "name": name,
        "parents": parents,
        "size": size.to_string()
    })
}

/// Mounts `GET /drive/v3/files/{id}?fields=parents`
pub async fn mount_parents(server: &MockServer, id: &str, parents: &[&str]) {
    Mock::given(method("GET"))
        .and(path(format!("/drive/v3/files/{}", id)))
        .and(query_param("fields", "parents"))
        .and(query_param("supportsAllDrives", "true"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "parents": parents })),
        )
        .expect(1)
        .mount(server)
        .await;
}

/// Mounts the resumable session start for `id`, answering with a Location
pub async fn mount_upload_session(server: &MockServer, id: &str) {
    Mock::given(method("PATCH"))
        .and(path(format!("/upload/drive/v3/files/{}", id)))
        .and(query_param("uploadType", "resumable"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Location", format!("{}{}", server.uri(), SESSION_PATH)),
        )
        .expect(1)
        .mount(server)
        .await;
}

/// Mounts one chunk PUT answered with `308` and a `Range` header
pub async fn mount_chunk_incomplete(server: &MockServer, content_range: &str, range: &str) {
    Mock::given(method("PUT"))
        .and(path(SESSION_PATH))
        .and(header("content-range", content_range))
        .respond_with(ResponseTemplate::new(308).insert_header("Range", range))
        .expect(1)
        .mount(server)
        .await;
}

/// Mounts the final chunk PUT answered with the file resource
pub async fn mount_chunk_complete(
    server: &MockServer,
    content_range: &str,
    body: serde_json::Value,
) {
    Mock::given(method("PUT"))
        .and(path(SESSION_PATH))
        .and(header("content-range", content_range))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(server)
        .await;
}

/// Deterministic test content of `len` bytes
pub fn content(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}
