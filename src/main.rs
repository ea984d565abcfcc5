use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use dotenvy::dotenv;
use tokio::signal;
use tracing::{error, info};

use fleet_admin::clients::identity::HttpIdentityProvider;
use fleet_admin::clients::storage::StorageClient;
use fleet_admin::config::environment::EnvironmentConfig;
use fleet_admin::routes::build_router;
use fleet_admin::state::AppState;
use fleet_admin::store::postgres::PgDocumentStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    info!("🚚 Fleet Admin - Backend de administración de flota");
    info!("===================================================");

    let config = EnvironmentConfig::default();

    // Inicializar el almacén documental
    let store = match PgDocumentStore::connect(&config.database_url).await {
        Ok(store) => Arc::new(store),
        Err(e) => {
            error!("❌ Error conectando al almacén documental: {}", e);
            return Err(anyhow::anyhow!("Error de base de datos: {}", e));
        }
    };

    // Clientes de servicios externos
    let identity = Arc::new(HttpIdentityProvider::new(
        config.identity_base_url.clone(),
        config.identity_api_key.clone(),
    ));
    let storage = StorageClient::new(
        config.storage_upload_url.clone(),
        config.storage_public_url.clone(),
    );

    // Crear router de la API
    let port = config.port;
    let app_state = AppState::new(store, identity, storage, config);
    let app = build_router(app_state);

    let addr: SocketAddr = format!("0.0.0.0:{}", port).parse()?;

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health - Endpoint de prueba");
    info!("🚛 Endpoints - Trucks:");
    info!("   POST /api/trucks - Registrar camión");
    info!("   GET  /api/trucks - Listar camiones (view/search/sort)");
    info!("   GET  /api/trucks/:id - Obtener camión");
    info!("   PUT  /api/trucks/:id - Actualizar camión");
    info!("   (sin DELETE: los camiones se archivan por status)");
    info!("🤝 Endpoints - Subcontractors:");
    info!("   POST /api/subcontractors - Registrar subcontratista");
    info!("   GET  /api/subcontractors - Listar subcontratistas");
    info!("   GET  /api/subcontractors/:id - Obtener subcontratista");
    info!("   PUT  /api/subcontractors/:id - Actualizar subcontratista");
    info!("   DELETE /api/subcontractors/:id - Eliminar subcontratista");
    info!("👤 Endpoints - Users (solo admin):");
    info!("   GET  /api/users - Listar cuentas del proveedor");
    info!("   POST /api/users - Crear cuenta");
    info!("   PUT  /api/users/:uid/role - Cambiar rol");
    info!("   POST /api/users/sync - Reconciliar espejo de usuarios");
    info!("📋 Endpoints - Waitlist:");
    info!("   POST /api/waitlist/join - Anotarse (público)");
    info!("   GET  /api/waitlist - Listar entradas");
    info!("   DELETE /api/waitlist/:id - Borrar entrada");
    info!("📦 Endpoints - Storage:");
    info!("   POST /api/storage/upload - Subir foto o documento");

    // Iniciar servidor con apagado graceful
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| {
            error!("❌ Error del servidor: {}", e);
            e
        })?;

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
