//! Update command - Update a Drive file's metadata, content and parents
//!
//! Provides the `driveup update` CLI command which:
//! 1. Builds an update request from the flags and configuration
//! 2. Creates the Drive client and local adapters
//! 3. Runs the UpdateFileUseCase
//! 4. Displays the result (status lines or JSON)

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use driveup_core::config::{Config, ACCESS_TOKEN_ENV};
use driveup_core::domain::{ResourceId, UpdateRequest};
use driveup_core::usecases::{UpdateFileUseCase, UpdateReport};
use driveup_gdrive::client::DriveClient;
use driveup_gdrive::provider::DriveFileService;
use tracing::info;

use crate::local::{ExtensionMimeResolver, LocalFileSource};
use crate::output::{get_formatter, OutputFormat};
use crate::sink::ConsoleSink;

/// Update command with clap options
#[derive(Debug, Args)]
pub struct UpdateCommand {
    /// ID of the file to update
    pub id: String,

    /// Local file whose content replaces the remote content
    #[arg(short, long, visible_alias = "path")]
    pub file: Option<PathBuf>,

    /// New file name (defaults to the local file's name when uploading)
    #[arg(long)]
    pub name: Option<String>,

    /// New description; an empty value clears it
    #[arg(long)]
    pub description: Option<String>,

    /// MIME type (inferred from the name when uploading)
    #[arg(long)]
    pub mime: Option<String>,

    /// Parent folder ID; repeat or comma-separate to set several
    #[arg(short, long = "parent", value_delimiter = ',')]
    pub parents: Vec<String>,

    /// Upload chunk size in bytes
    #[arg(long)]
    pub chunksize: Option<u64>,

    /// Seconds without upload progress before giving up (0 disables)
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Do not show upload progress
    #[arg(long)]
    pub no_progress: bool,
}

impl UpdateCommand {
    /// Execute the update command
    pub async fn execute(&self, config: &Config, format: OutputFormat) -> Result<()> {
        let formatter = get_formatter(format);

        // Step 1: Build the request
        let request = self.build_request(config)?;

        // Step 2: Create adapters
        let token = config.access_token().with_context(|| {
            format!(
                "No access token configured. Set {} or drive.access_token",
                ACCESS_TOKEN_ENV
            )
        })?;
        let client = DriveClient::with_base_url(token, &config.drive.api_base_url)
            .context("Failed to create Drive client")?;
        let sink = Arc::new(ConsoleSink::new(format, !self.no_progress));

        let use_case = UpdateFileUseCase::new(
            Arc::new(DriveFileService::new(client)),
            Arc::new(LocalFileSource::new()),
            Arc::new(ExtensionMimeResolver::new()),
            sink.clone(),
        );

        info!(id = %self.id, "Running update");

        // Step 3: Run
        let result = use_case.execute(request).await;
        sink.finish();
        let report = result?;

        // Step 4: Display results
        match format {
            OutputFormat::Json => formatter.print_json(&report_json(&report)),
            OutputFormat::Human if report.bytes_per_second.is_none() => {
                formatter.success(&format!("Updated {}", report.file.id));
            }
            _ => {}
        }

        Ok(())
    }

    /// Maps flags, with config fallbacks, to an `UpdateRequest`
    ///
    /// Empty `--name` and `--mime` values count as not given.
    fn build_request(&self, config: &Config) -> Result<UpdateRequest> {
        let id = ResourceId::new(self.id.clone()).context("Invalid file ID")?;

        let mut request = UpdateRequest::new(id)
            .with_chunk_size(self.chunksize.unwrap_or(config.upload.chunk_size))
            .with_timeout(
                self.timeout
                    .map(Duration::from_secs)
                    .unwrap_or_else(|| config.upload.timeout()),
            )
            .with_parents(self.parents.iter().filter(|p| !p.is_empty()));

        if let Some(path) = &self.file {
            request = request.with_path(path);
        }
        if let Some(name) = self.name.as_deref().filter(|n| !n.is_empty()) {
            request = request.with_name(name);
        }
        if let Some(description) = &self.description {
            request = request.with_description(description);
        }
        if let Some(mime) = self.mime.as_deref().filter(|m| !m.is_empty()) {
            request = request.with_mime_type(mime);
        }

        Ok(request)
    }
}

/// JSON rendering of a finished update
fn report_json(report: &UpdateReport) -> serde_json::Value {
    serde_json::json!({
        "id": report.file.id,
        "name": report.file.name,
        "parents": report.file.parents,
        "size": report.file.size,
        "bytes_per_second": report.bytes_per_second,
        "elapsed_ms": report.elapsed.as_millis() as u64,
    })
}
