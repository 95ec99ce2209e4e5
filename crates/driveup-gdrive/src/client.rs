//! Google Drive API client
//!
//! Provides a typed HTTP client for the Drive v3 REST API. Handles the
//! authentication header, endpoint construction and error status mapping.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use driveup_gdrive::client::DriveClient;
//! use driveup_gdrive::files;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let client = DriveClient::new("access-token-here")?;
//! let parents = files::get_parents(&client, "1a2B3c4D5e6F").await?;
//! println!("parents: {}", parents.join(","));
//! # Ok(())
//! # }
//! ```

use std::future::Future;

use reqwest::redirect::Policy;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::DriveError;

/// Base URL for Google APIs
pub const DRIVE_BASE_URL: &str = "https://www.googleapis.com";

// ============================================================================
// DriveClient
// ============================================================================

/// HTTP client for Drive API calls
///
/// Wraps `reqwest::Client` with the bearer token and base URL. Redirects
/// are disabled because the resumable upload protocol answers intermediate
/// chunks with `308 Resume Incomplete`, which must reach the caller.
#[derive(Debug, Clone)]
pub struct DriveClient {
    /// The underlying HTTP client
    client: Client,
    /// Base URL for API requests
    base_url: String,
    /// OAuth2 access token
    access_token: String,
}

impl DriveClient {
    /// Creates a new DriveClient with the given access token
    pub fn new(access_token: impl Into<String>) -> Result<Self, DriveError> {
        Self::with_base_url(access_token, DRIVE_BASE_URL)
    }

    /// Creates a new DriveClient with a custom base URL (useful for testing)
    ///
    /// Fails if the HTTP client cannot be built, e.g. when no TLS backend
    /// is available.
    pub fn with_base_url(
        access_token: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self, DriveError> {
        let client = Client::builder().redirect(Policy::none()).build()?;
        let base_url: String = base_url.into();

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            access_token: access_token.into(),
        })
    }

    /// Returns a reference to the current access token
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// Returns the base URL for API requests
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Creates an authenticated request builder for the given method and path
    ///
    /// Automatically prepends the base URL and adds the Authorization header.
    ///
    /// # Arguments
    /// * `method` - HTTP method
    /// * `path` - API path relative to base URL (e.g., "/drive/v3/files/abc")
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        self.client
            .request(method, &url)
            .bearer_auth(&self.access_token)
    }

    /// Creates an authenticated request builder for an absolute URL
    ///
    /// Used for upload session URIs returned by the API.
    pub fn request_url(&self, method: Method, url: &str) -> RequestBuilder {
        self.client
            .request(method, url)
            .bearer_auth(&self.access_token)
    }
}

// ============================================================================
// Response helpers
// ============================================================================

/// Passes successful responses through and maps error statuses
///
/// `308 Resume Incomplete` is treated as success since it is part of the
/// resumable upload protocol.
pub async fn check_status(response: Response) -> Result<Response, DriveError> {
    let status = response.status();
    if status.is_success() || status == StatusCode::PERMANENT_REDIRECT {
        return Ok(response);
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "unable to read error body".to_string());
    debug!(status = status.as_u16(), "Drive API returned error status");
    Err(DriveError::from_status(status, &body))
}

/// Checks the status and decodes a JSON body
pub async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, DriveError> {
    let response = check_status(response).await?;
    response.json::<T>().await.map_err(|e| {
        if e.is_decode() {
            DriveError::InvalidResponse(e.to_string())
        } else {
            DriveError::Network(e)
        }
    })
}

/// Races `fut` against `cancel`
///
/// Returns [`DriveError::Cancelled`] as soon as the token is cancelled,
/// dropping the in-flight future.
pub async fn cancellable<F, T>(cancel: &CancellationToken, fut: F) -> Result<T, DriveError>
where
    F: Future<Output = Result<T, DriveError>>,
{
    tokio::select! {
        biased;
        () = cancel.cancelled() => Err(DriveError::Cancelled),
        result = fut => result,
    }
}
