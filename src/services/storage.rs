//! Raw upload storage on disk.

use std::path::{Path, PathBuf};

use tracing::debug;

/// Writes uploaded bytes into a single directory, keyed by filename.
#[derive(Debug, Clone)]
pub struct UploadStorage {
    dir: PathBuf,
}

impl UploadStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Where an upload named `filename` is stored.
    pub fn path_for(&self, filename: &str) -> PathBuf {
        self.dir.join(sanitize_filename(filename))
    }

    /// Write `bytes` for `filename`, replacing any earlier upload of the same name.
    pub async fn save(&self, filename: &str, bytes: &[u8]) -> std::io::Result<PathBuf> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.path_for(filename);
        tokio::fs::write(&path, bytes).await?;
        debug!("Stored {} bytes at {}", bytes.len(), path.display());
        Ok(path)
    }
}

/// Sanitize a client-supplied name for use as a single path component.
pub fn sanitize_filename(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\0' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    let trimmed = sanitized.trim().trim_matches('_');
    if trimmed.is_empty() || trimmed.chars().all(|c| c == '.') {
        return "upload".to_string();
    }

    // Keep the extension when truncating long names
    if trimmed.chars().count() > 150 {
        let (stem, ext) = match trimmed.rsplit_once('.') {
            Some((stem, ext)) if ext.len() <= 10 => (stem, Some(ext)),
            _ => (trimmed, None),
        };
        let stem: String = stem.chars().take(140).collect();
        return match ext {
            Some(ext) => format!("{}.{}", stem, ext),
            None => stem,
        };
    }

    trimmed.to_string()
}
