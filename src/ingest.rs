//! Media ingestion.
//!
//! Copies an uploaded container file verbatim into the job directory. The
//! only validation is the extension filter the original upload widget
//! applied; content is never inspected.

use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::{DubError, Result};
use crate::job::JobContext;

/// Container extensions accepted for upload.
pub const ALLOWED_EXTENSIONS: &[&str] = &["mp4", "mov", "avi"];

/// Copy `source` into the job directory, overwriting any previous upload.
///
/// Returns the path of the ingested copy.
pub fn ingest_video(job: &JobContext, source: &Path) -> Result<PathBuf> {
    if !source.exists() {
        return Err(DubError::FileNotFound(source.display().to_string()));
    }

    let extension = source
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
        .unwrap_or_default();

    if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(DubError::UnsupportedFormat(format!(
            "'{}' is not an accepted video container (expected one of: {})",
            source.display(),
            ALLOWED_EXTENSIONS.join(", ")
        )));
    }

    let destination = job.source_video(&extension);
    std::fs::copy(source, &destination)?;
    info!(
        "Ingested {} -> {}",
        source.display(),
        destination.display()
    );

    Ok(destination)
}
