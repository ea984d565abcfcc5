//! Routers de la API
//!
//! Composición del router completo: un router por entidad anidado bajo
//! `/api/...`, autenticación JWT en todo lo que no es público y gate de
//! admin sobre las operaciones privilegiadas de usuarios.

pub mod storage_routes;
pub mod subcontractor_routes;
pub mod truck_routes;
pub mod user_routes;
pub mod waitlist_routes;

use axum::middleware::{from_fn, from_fn_with_state};
use axum::{response::Json, routing::get, Router};
use serde_json::json;

use crate::middleware::auth::{admin_only_middleware, auth_middleware};
use crate::middleware::cors::{cors_middleware, cors_middleware_with_origins};
use crate::state::AppState;

/// Armar el router completo de la aplicación
pub fn build_router(state: AppState) -> Router {
    let require_auth = from_fn_with_state(state.clone(), auth_middleware);

    let trucks = truck_routes::create_truck_router().route_layer(require_auth.clone());
    let subcontractors =
        subcontractor_routes::create_subcontractor_router().route_layer(require_auth.clone());
    let users = user_routes::create_user_router()
        .route_layer(from_fn(admin_only_middleware))
        .route_layer(require_auth.clone());
    let storage = storage_routes::create_storage_router().route_layer(require_auth.clone());
    let waitlist = waitlist_routes::create_waitlist_join_router()
        .merge(waitlist_routes::create_waitlist_router().route_layer(require_auth));

    let cors = if state.config.is_development() {
        cors_middleware()
    } else {
        cors_middleware_with_origins(state.config.cors_origins.clone())
    };

    Router::new()
        .route("/health", get(health))
        .nest("/api/trucks", trucks)
        .nest("/api/subcontractors", subcontractors)
        .nest("/api/users", users)
        .nest("/api/storage", storage)
        .nest("/api/waitlist", waitlist)
        .layer(cors)
        .with_state(state)
}

/// Endpoint de prueba simple
async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "service": "fleet-admin",
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
