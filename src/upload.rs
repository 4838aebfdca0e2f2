//! Upload storage - sanitized, collision-free file names

use std::path::{Path, PathBuf};

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("filename is empty after sanitizing")]
    EmptyFilename,

    #[error("failed to store upload: {0}")]
    Io(#[from] std::io::Error),
}

/// Reduce a client-supplied filename to a safe basename.
///
/// Path separators become word breaks, whitespace runs become `_`, and
/// anything outside `[A-Za-z0-9_.-]` is dropped. Leading/trailing dots and
/// underscores are trimmed so the result can never be `..` or hidden.
pub fn sanitize_filename(raw: &str) -> String {
    let spaced: String = raw
        .chars()
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();

    let joined = spaced.split_whitespace().collect::<Vec<_>>().join("_");

    joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect::<String>()
        .trim_matches(|c| c == '.' || c == '_')
        .to_string()
}

/// Write-only sink for uploaded scans
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Store `bytes` under a sanitized name with a random suffix.
    ///
    /// Returns the stored file name (relative to the upload directory).
    pub async fn save(&self, original_name: &str, bytes: &[u8]) -> Result<String, UploadError> {
        let clean = sanitize_filename(original_name);
        if clean.is_empty() {
            return Err(UploadError::EmptyFilename);
        }

        let stored = unique_name(&clean);
        tokio::fs::create_dir_all(&self.dir).await?;
        tokio::fs::write(self.dir.join(&stored), bytes).await?;

        tracing::debug!("Stored upload {} ({} bytes)", stored, bytes.len());
        Ok(stored)
    }
}

fn unique_name(clean: &str) -> String {
    let suffix = &Uuid::new_v4().simple().to_string()[..8];
    match clean.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{}_{}.{}", stem, suffix, ext),
        _ => format!("{}_{}", clean, suffix),
    }
}
