//! Rutas de la lista de espera
//!
//! Anotarse es público (formulario de la landing); listar y borrar son
//! operaciones de operador y van detrás del middleware de autenticación.

use axum::{
    extract::{Path, State},
    routing::{delete, get, post},
    Json, Router,
};

use crate::dto::common::ApiResponse;
use crate::dto::waitlist_dto::JoinWaitlistRequest;
use crate::models::waitlist::WaitlistEntry;
use crate::state::AppState;
use crate::utils::errors::AppError;
use validator::Validate;

/// Rutas de operador: se montan con el middleware de autenticación
pub fn create_waitlist_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_waitlist))
        .route("/:id", delete(delete_waitlist_entry))
}

/// Ruta pública de alta
pub fn create_waitlist_join_router() -> Router<AppState> {
    Router::new().route("/join", post(join_waitlist))
}

async fn join_waitlist(
    State(state): State<AppState>,
    Json(request): Json<JoinWaitlistRequest>,
) -> Result<Json<ApiResponse<WaitlistEntry>>, AppError> {
    request.validate()?;
    let entry = state.waitlist().join(&request.email).await?;
    Ok(Json(ApiResponse::success_with_message(
        entry,
        "Added to the waitlist".to_string(),
    )))
}

async fn list_waitlist(
    State(state): State<AppState>,
) -> Result<Json<Vec<WaitlistEntry>>, AppError> {
    Ok(Json(state.waitlist().list().await?))
}

async fn delete_waitlist_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    state.waitlist().delete(&id).await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Waitlist entry deleted successfully"
    })))
}
