//! Document analysis orchestration.
//!
//! Runs the pipeline behind `POST /analyze` once the caller is authenticated:
//! validate the extension, extract text, call the analysis provider, store
//! the raw bytes, then insert the document row. Nothing is written unless the
//! provider call succeeds.

use thiserror::Error;
use tracing::{info, warn};

use super::storage::UploadStorage;
use crate::extract::{self, SUPPORTED_EXTENSIONS};
use crate::llm::{AnalysisClient, AnalysisError};
use crate::models::{Document, NewDocument};
use crate::repository::{DbError, DocumentRepository};

/// Errors from the analysis pipeline.
#[derive(Debug, Error)]
pub enum AnalyzeError {
    #[error(
        "Unsupported file type: {0} (expected one of: {exts})",
        exts = SUPPORTED_EXTENSIONS.join(", ")
    )]
    UnsupportedFileType(String),

    #[error("Analysis service error: {0}")]
    Analysis(#[from] AnalysisError),

    #[error("Failed to store upload: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] DbError),
}

/// An uploaded file plus the caller's analysis options.
#[derive(Debug, Clone, Default)]
pub struct Upload {
    pub filename: String,
    pub bytes: Vec<u8>,
    pub prompt: String,
    pub analysis_type: Option<String>,
}

/// Service that turns an upload into a persisted, analyzed document.
#[derive(Clone)]
pub struct AnalysisService {
    client: AnalysisClient,
    storage: UploadStorage,
    documents: DocumentRepository,
}

impl AnalysisService {
    pub fn new(
        client: AnalysisClient,
        storage: UploadStorage,
        documents: DocumentRepository,
    ) -> Self {
        Self {
            client,
            storage,
            documents,
        }
    }

    /// Run the full pipeline for one upload.
    pub async fn analyze_upload(&self, upload: Upload) -> Result<Document, AnalyzeError> {
        if !extract::is_supported(&upload.filename) {
            return Err(AnalyzeError::UnsupportedFileType(upload.filename));
        }

        let text = extract_blocking(&upload).await;

        let result = self
            .client
            .analyze(&upload.prompt, &text, upload.analysis_type.as_deref())
            .await
            .map_err(|e| {
                warn!("Analysis of {} failed: {}", upload.filename, e);
                e
            })?;

        let path = self.storage.save(&upload.filename, &upload.bytes).await?;

        let created = self
            .documents
            .create(&NewDocument {
                filename: upload.filename.clone(),
                path: path.display().to_string(),
                prompt: Some(upload.prompt),
                analysis_type: upload.analysis_type,
                result: Some(result),
            })
            .await;

        let doc = match created {
            Ok(doc) => doc,
            Err(e) => {
                warn!("Failed to record {}: {}", upload.filename, e);
                if let Err(rm) = tokio::fs::remove_file(&path).await {
                    warn!("Failed to remove {}: {}", path.display(), rm);
                }
                return Err(e.into());
            }
        };

        info!("Stored analyzed document {} ({})", doc.id, doc.filename);
        Ok(doc)
    }
}

/// Run text extraction off the async runtime.
async fn extract_blocking(upload: &Upload) -> String {
    let bytes = upload.bytes.clone();
    let filename = upload.filename.clone();
    match tokio::task::spawn_blocking(move || extract::extract_text(&bytes, &filename)).await {
        Ok(text) => text,
        Err(e) => {
            warn!("Extraction task failed for {}: {}", upload.filename, e);
            String::from_utf8_lossy(&upload.bytes).into_owned()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::AnalysisConfig;
    use crate::repository::test_support::setup_test_db;

    fn service_with_endpoint(
        ctx: &crate::repository::DbContext,
        uploads: &std::path::Path,
        endpoint: &str,
    ) -> AnalysisService {
        let client = AnalysisClient::new(
            AnalysisConfig::default()
                .with_endpoint(endpoint)
                .with_timeout_secs(2),
        )
        .unwrap();
        AnalysisService::new(client, UploadStorage::new(uploads), ctx.documents())
    }

    #[tokio::test]
    async fn test_unsupported_extension_writes_nothing() {
        let (ctx, dir) = setup_test_db().await;
        let uploads = dir.path().join("uploads");
        let service = service_with_endpoint(&ctx, &uploads, "http://127.0.0.1:9/never");

        let err = service
            .analyze_upload(Upload {
                filename: "photo.png".to_string(),
                bytes: b"png".to_vec(),
                ..Default::default()
            })
            .await
            .unwrap_err();

        assert!(matches!(err, AnalyzeError::UnsupportedFileType(_)));
        assert!(!uploads.exists());
        assert_eq!(ctx.documents().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_upstream_failure_writes_nothing() {
        let (ctx, dir) = setup_test_db().await;
        let uploads = dir.path().join("uploads");

        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let service = service_with_endpoint(&ctx, &uploads, &format!("http://{}/v1", addr));

        let err = service
            .analyze_upload(Upload {
                filename: "notes.txt".to_string(),
                bytes: b"hello".to_vec(),
                prompt: "Summarize".to_string(),
                analysis_type: None,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, AnalyzeError::Analysis(_)));
        assert!(!uploads.join("notes.txt").exists());
        assert_eq!(ctx.documents().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_failed_insert_removes_stored_upload() {
        use axum::{routing::post, Json, Router};

        let router = Router::new().route(
            "/v1/chat/completions",
            post(|| async {
                Json(serde_json::json!({
                    "choices": [{"message": {"role": "assistant", "content": "fine"}}]
                }))
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        // No schema, so the document insert fails after the upload is saved
        let dir = tempfile::TempDir::new().unwrap();
        let ctx = crate::repository::DbContext::from_sqlite_path(&dir.path().join("bare.db"));
        let uploads = dir.path().join("uploads");
        let service = service_with_endpoint(
            &ctx,
            &uploads,
            &format!("http://{}/v1/chat/completions", addr),
        );

        let err = service
            .analyze_upload(Upload {
                filename: "notes.txt".to_string(),
                bytes: b"hello".to_vec(),
                prompt: "Summarize".to_string(),
                analysis_type: None,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, AnalyzeError::Database(_)));
        assert!(!uploads.join("notes.txt").exists());
    }
}
