//! Integration tests for driveup-gdrive
//!
//! Uses wiremock to simulate the Drive v3 API and verifies end-to-end
//! behavior of the HTTP client, the parents lookup, metadata updates and
//! resumable uploads.

mod common;

mod test_client;
mod test_parents;
mod test_update;
