//! Document analysis upload and retrieval.

use axum::extract::{Multipart, Path, State};
use axum::Json;

use super::super::auth::AuthUser;
use super::super::error::ApiError;
use super::super::AppState;
use crate::llm::{Preset, PRESETS};
use crate::models::Document;
use crate::services::Upload;

/// Analyze an uploaded file (multipart fields `file`, `prompt`, `analysis_type`).
pub async fn analyze_document(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<Document>, ApiError> {
    let upload = read_upload(multipart).await?;
    tracing::info!(
        "User {} requested analysis of {} ({} bytes)",
        user.username,
        upload.filename,
        upload.bytes.len()
    );

    let doc = state.analysis.analyze_upload(upload).await?;
    Ok(Json(doc))
}

async fn read_upload(mut multipart: Multipart) -> Result<Upload, ApiError> {
    let mut file: Option<(String, Vec<u8>)> = None;
    let mut prompt = String::new();
    let mut analysis_type = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let filename = field
                    .file_name()
                    .map(str::to_string)
                    .filter(|f| !f.trim().is_empty())
                    .ok_or_else(|| ApiError::BadRequest("file has no filename".to_string()))?;
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(e.to_string()))?;
                file = Some((filename, bytes.to_vec()));
            }
            "prompt" => {
                prompt = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(e.to_string()))?;
            }
            "analysis_type" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(e.to_string()))?;
                analysis_type = Some(value.trim().to_string()).filter(|v| !v.is_empty());
            }
            _ => {}
        }
    }

    let (filename, bytes) =
        file.ok_or_else(|| ApiError::BadRequest("missing file field".to_string()))?;

    Ok(Upload {
        filename,
        bytes,
        prompt,
        analysis_type,
    })
}

pub async fn list_documents(
    _user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<Document>>, ApiError> {
    Ok(Json(state.db.documents().list().await?))
}

pub async fn get_document(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Document>, ApiError> {
    state
        .db
        .documents()
        .get(&id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound("Document"))
}

/// Built-in analysis presets.
pub async fn list_presets() -> Json<&'static [Preset]> {
    Json(PRESETS)
}
