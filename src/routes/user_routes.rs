//! Rutas privilegiadas de usuarios
//!
//! Todo el router va detrás del gate de admin; un claim insuficiente se
//! rechaza antes de llegar acá.

use axum::{
    extract::{Path, Query, State},
    routing::{get, post, put},
    Json, Router,
};

use crate::dto::common::ApiResponse;
use crate::dto::user_dto::{CreateUserRequest, SyncUsersResponse, UpdateUserRoleRequest};
use crate::models::user::User;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::views::{self, ListQuery};

pub fn create_user_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/:uid/role", put(update_user_role))
        .route("/sync", post(sync_users))
}

async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<User>>, AppError> {
    let users = state.user_directory().list_users().await?;
    Ok(Json(views::apply(users, &query)))
}

async fn create_user(
    State(state): State<AppState>,
    Json(request): Json<CreateUserRequest>,
) -> Result<Json<ApiResponse<User>>, AppError> {
    request.validated()?;
    let user = state.user_directory().create_user(&request).await?;
    Ok(Json(ApiResponse::success_with_message(
        user,
        "User created successfully".to_string(),
    )))
}

async fn update_user_role(
    State(state): State<AppState>,
    Path(uid): Path<String>,
    Json(request): Json<UpdateUserRoleRequest>,
) -> Result<Json<ApiResponse<User>>, AppError> {
    request.validated()?;
    let user = state
        .user_directory()
        .update_user_role(&uid, &request.role)
        .await?;
    Ok(Json(ApiResponse::success_with_message(
        user,
        "User role updated successfully".to_string(),
    )))
}

async fn sync_users(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<SyncUsersResponse>>, AppError> {
    let synced = state.user_directory().sync_users().await?;
    Ok(Json(ApiResponse::success(SyncUsersResponse { synced })))
}
