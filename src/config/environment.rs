//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno y variables de configuración.
//! La configuración se construye una sola vez en el arranque y se inyecta a
//! través de `AppState`; no hay singletons a nivel de módulo.

use std::env;

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_expiration: u64,
    pub cors_origins: Vec<String>,
    // Proveedor de identidad (llamadas privilegiadas)
    pub identity_base_url: String,
    pub identity_api_key: String,
    // Almacenamiento de objetos
    pub storage_upload_url: String,
    pub storage_public_url: String,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            environment: env::var("ENVIRONMENT").expect("ENVIRONMENT must be set"),
            port: env::var("PORT")
                .expect("PORT must be set")
                .parse()
                .expect("PORT must be a valid number"),
            host: env::var("HOST").expect("HOST must be set"),
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            jwt_secret: env::var("JWT_SECRET").expect("JWT_SECRET must be set"),
            jwt_expiration: env::var("JWT_EXPIRATION")
                .expect("JWT_EXPIRATION must be set")
                .parse()
                .expect("JWT_EXPIRATION must be a valid number"),
            cors_origins: env::var("CORS_ORIGINS")
                .expect("CORS_ORIGINS must be set")
                .split(',')
                .map(|s| s.trim().to_string())
                .collect(),
            identity_base_url: env::var("IDENTITY_BASE_URL")
                .expect("IDENTITY_BASE_URL must be set"),
            identity_api_key: env::var("IDENTITY_API_KEY")
                .expect("IDENTITY_API_KEY must be set"),
            storage_upload_url: env::var("STORAGE_UPLOAD_URL")
                .expect("STORAGE_UPLOAD_URL must be set"),
            storage_public_url: env::var("STORAGE_PUBLIC_URL")
                .expect("STORAGE_PUBLIC_URL must be set"),
        }
    }
}

impl EnvironmentConfig {
    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Verificar si estamos en modo producción
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Obtener la URL del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Configuración fija para tests: sin variables de entorno
    pub fn for_tests() -> Self {
        Self {
            environment: "test".to_string(),
            port: 0,
            host: "127.0.0.1".to_string(),
            database_url: String::new(),
            jwt_secret: "test-secret".to_string(),
            jwt_expiration: 3600,
            cors_origins: vec!["http://localhost:5173".to_string()],
            identity_base_url: "http://identity.test".to_string(),
            identity_api_key: "test-key".to_string(),
            storage_upload_url: "http://storage.test/upload".to_string(),
            storage_public_url: "http://storage.test/public".to_string(),
        }
    }
}
