//! Rutas de subcontratistas

use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};

use crate::dto::common::ApiResponse;
use crate::dto::subcontractor_dto::{CreateSubcontractorRequest, UpdateSubcontractorRequest};
use crate::models::subcontractor::Subcontractor;
use crate::state::AppState;
use crate::utils::errors::{not_found_error, AppError};
use crate::views::{self, ListQuery};

pub fn create_subcontractor_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_subcontractor).get(list_subcontractors))
        .route(
            "/:id",
            get(get_subcontractor)
                .put(update_subcontractor)
                .delete(delete_subcontractor),
        )
}

async fn create_subcontractor(
    State(state): State<AppState>,
    Json(request): Json<CreateSubcontractorRequest>,
) -> Result<Json<ApiResponse<Subcontractor>>, AppError> {
    let fields = request.validated_fields()?;
    let subcontractor = state.subcontractors().create(fields).await?;
    Ok(Json(ApiResponse::success_with_message(
        subcontractor,
        "Subcontractor registered successfully".to_string(),
    )))
}

async fn list_subcontractors(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Subcontractor>>, AppError> {
    let subcontractors = state.subcontractors().list().await?;
    Ok(Json(views::apply(subcontractors, &query)))
}

async fn get_subcontractor(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Subcontractor>, AppError> {
    let subcontractor = state
        .subcontractors()
        .find_by_id(&id)
        .await?
        .ok_or_else(|| not_found_error("subcontractor", &id))?;
    Ok(Json(subcontractor))
}

async fn update_subcontractor(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateSubcontractorRequest>,
) -> Result<Json<ApiResponse<Subcontractor>>, AppError> {
    let fields = request.validated_fields()?;
    let subcontractor = state.subcontractors().update(&id, fields).await?;
    Ok(Json(ApiResponse::success_with_message(
        subcontractor,
        "Subcontractor updated successfully".to_string(),
    )))
}

/// Referencia débil desde los camiones: borrar acá no cascadea
async fn delete_subcontractor(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    state.subcontractors().delete(&id).await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Subcontractor deleted successfully"
    })))
}
