//! Middleware de autenticación JWT
//!
//! Este módulo maneja la autenticación JWT, extracción de tokens
//! y verificación de usuarios autenticados. Los claims de rol los emite el
//! proveedor de identidad; un cambio de rol recién se ve acá cuando el
//! cliente refresca su token.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
    Extension,
};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::{config::environment::EnvironmentConfig, state::AppState, utils::errors::AppError};

/// Claims del JWT
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// uid de la cuenta en el proveedor de identidad
    pub sub: String,
    pub role: String,
    pub admin: bool,
    pub exp: usize,
    pub iat: usize,
}

/// Usuario autenticado que se inyecta en las requests
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub uid: String,
    pub role: String,
    pub admin: bool,
}

/// Middleware de autenticación JWT
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    // Extraer token del header Authorization
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|auth_str| auth_str.to_str().ok())
        .and_then(|auth_str| auth_str.strip_prefix("Bearer "))
        .ok_or_else(|| AppError::Unauthorized("Authorization token required".to_string()))?;

    // Decodificar y validar JWT
    let token_data = decode::<Claims>(
        auth_header,
        &DecodingKey::from_secret(state.config.jwt_secret.as_ref()),
        &Validation::default(),
    )
    .map_err(|_| AppError::Unauthorized("Invalid token".to_string()))?;

    let claims = token_data.claims;
    let authenticated_user = AuthenticatedUser {
        uid: claims.sub,
        role: claims.role,
        admin: claims.admin,
    };

    // Inyectar usuario autenticado en las extensions
    request.extensions_mut().insert(authenticated_user);

    Ok(next.run(request).await)
}

/// Middleware para verificar permisos de admin
pub async fn admin_only_middleware(
    Extension(user): Extension<AuthenticatedUser>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if !user.admin {
        return Err(AppError::Forbidden(
            "Administrator permissions required".to_string(),
        ));
    }

    Ok(next.run(request).await)
}

/// Función para generar JWT token
pub fn generate_jwt_token(
    uid: &str,
    role: &str,
    admin: bool,
    config: &EnvironmentConfig,
) -> Result<String, AppError> {
    let now = chrono::Utc::now();
    let expires_at = now + chrono::Duration::seconds(config.jwt_expiration as i64);

    let claims = Claims {
        sub: uid.to_string(),
        role: role.to_string(),
        admin,
        exp: expires_at.timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    let encoding_key = EncodingKey::from_secret(config.jwt_secret.as_ref());

    encode(&Header::default(), &claims, &encoding_key)
        .map_err(|e| AppError::Jwt(format!("Error generating JWT: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_token_round_trips_claims() {
        let config = EnvironmentConfig::for_tests();
        let token = generate_jwt_token("u1", "admin", true, &config).unwrap();

        let decoded = decode::<Claims>(
            &token,
            &DecodingKey::from_secret(config.jwt_secret.as_ref()),
            &Validation::default(),
        )
        .unwrap();

        assert_eq!(decoded.claims.sub, "u1");
        assert_eq!(decoded.claims.role, "admin");
        assert!(decoded.claims.admin);
    }
}
