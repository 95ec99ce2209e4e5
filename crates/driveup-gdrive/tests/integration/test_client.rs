//! Integration tests for the HTTP client configuration

use driveup_gdrive::client::{check_status, DriveClient};
use reqwest::{Method, StatusCode};
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

#[tokio::test]
async fn test_client_does_not_follow_redirects() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/upload/session/abc"))
        .respond_with(
            ResponseTemplate::new(308)
                .insert_header("Location", format!("{}/elsewhere", server.uri()))
                .insert_header("Range", "bytes=0-99"),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/elsewhere"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = DriveClient::with_base_url("test-token", server.uri())
        .expect("client should build");
    let response = client
        .request(Method::PUT, "/upload/session/abc")
        .body(vec![0u8; 100])
        .send()
        .await
        .unwrap();

    let response = check_status(response).await.unwrap();
    assert_eq!(response.status(), StatusCode::PERMANENT_REDIRECT);
    assert_eq!(response.headers()["range"], "bytes=0-99");
}
