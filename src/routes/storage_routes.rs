//! Ruta de subida al almacenamiento de objetos
//!
//! Un solo endpoint de upload compartido por fotos y documentos de
//! camiones, documentos de subcontratistas y pólizas de seguro. El cuerpo
//! son los bytes crudos; el path destino viaja como query param.

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::header::CONTENT_TYPE,
    http::HeaderMap,
    routing::post,
    Json, Router,
};
use serde::Deserialize;

use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_storage_router() -> Router<AppState> {
    Router::new().route("/upload", post(upload_object))
}

#[derive(Debug, Deserialize)]
struct UploadParams {
    path: String,
}

async fn upload_object(
    State(state): State<AppState>,
    Query(params): Query<UploadParams>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<serde_json::Value>, AppError> {
    if params.path.trim().is_empty() {
        return Err(AppError::BadRequest("Upload path is required".to_string()));
    }
    if body.is_empty() {
        return Err(AppError::BadRequest("Upload body is empty".to_string()));
    }

    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("application/octet-stream");

    let url = state
        .storage
        .upload(&params.path, content_type, body.to_vec())
        .await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "url": url
    })))
}
