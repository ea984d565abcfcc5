//! Rutas de camiones
//!
//! Sin DELETE: los camiones se archivan cambiando `status`, nunca se
//! eliminan. El listado acepta los parámetros `view`, `search`, `sort_by`
//! y `sort_dir` y corre la misma composición que las pantallas.

use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use axum::extract::Extension;

use crate::dto::common::ApiResponse;
use crate::dto::truck_dto::{CreateTruckRequest, UpdateTruckRequest};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::truck::Truck;
use crate::state::AppState;
use crate::utils::errors::{not_found_error, AppError};
use crate::views::truck_view;
use crate::views::ListQuery;

pub fn create_truck_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_truck).get(list_trucks))
        .route("/:id", get(get_truck).put(update_truck))
}

async fn create_truck(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<CreateTruckRequest>,
) -> Result<Json<ApiResponse<Truck>>, AppError> {
    let fields = request.validated_fields(&user.uid)?;
    let truck = state.trucks().create(fields).await?;
    Ok(Json(ApiResponse::success_with_message(
        truck,
        "Truck registered successfully".to_string(),
    )))
}

async fn list_trucks(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Truck>>, AppError> {
    let trucks = state.trucks().list().await?;
    Ok(Json(truck_view::compose(trucks, &query)))
}

async fn get_truck(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Truck>, AppError> {
    let truck = state
        .trucks()
        .find_by_id(&id)
        .await?
        .ok_or_else(|| not_found_error("truck", &id))?;
    Ok(Json(truck))
}

async fn update_truck(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateTruckRequest>,
) -> Result<Json<ApiResponse<Truck>>, AppError> {
    let fields = request.validated_fields()?;
    let truck = state.trucks().update(&id, fields).await?;
    Ok(Json(ApiResponse::success_with_message(
        truck,
        "Truck updated successfully".to_string(),
    )))
}
