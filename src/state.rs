//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum. Los handles del almacén, del proveedor de
//! identidad y del storage se construyen una vez en el arranque y viven
//! acá; los repositorios se arman sobre el handle inyectado.

use std::sync::Arc;

use crate::clients::identity::IdentityProvider;
use crate::clients::storage::StorageClient;
use crate::config::environment::EnvironmentConfig;
use crate::repositories::subcontractor_repository::SubcontractorRepository;
use crate::repositories::truck_repository::TruckRepository;
use crate::repositories::user_repository::UserRepository;
use crate::repositories::waitlist_repository::WaitlistRepository;
use crate::services::user_directory_service::UserDirectoryService;
use crate::store::DocumentStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub identity: Arc<dyn IdentityProvider>,
    pub storage: StorageClient,
    pub config: EnvironmentConfig,
}

impl AppState {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        identity: Arc<dyn IdentityProvider>,
        storage: StorageClient,
        config: EnvironmentConfig,
    ) -> Self {
        Self {
            store,
            identity,
            storage,
            config,
        }
    }

    pub fn trucks(&self) -> TruckRepository {
        TruckRepository::new(self.store.clone())
    }

    pub fn subcontractors(&self) -> SubcontractorRepository {
        SubcontractorRepository::new(self.store.clone())
    }

    pub fn users(&self) -> UserRepository {
        UserRepository::new(self.store.clone())
    }

    pub fn waitlist(&self) -> WaitlistRepository {
        WaitlistRepository::new(self.store.clone())
    }

    pub fn user_directory(&self) -> UserDirectoryService {
        UserDirectoryService::new(self.identity.clone(), self.users())
    }
}
