//! Soporte compartido de los tests de integración: estado de aplicación
//! sobre el almacén en memoria y un proveedor de identidad simulado.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use fleet_admin::clients::identity::{IdentityProvider, ProviderAccount};
use fleet_admin::clients::storage::StorageClient;
use fleet_admin::config::environment::EnvironmentConfig;
use fleet_admin::state::AppState;
use fleet_admin::store::memory::MemoryStore;
use fleet_admin::utils::errors::{AppError, AppResult};

/// Proveedor de identidad en memoria para los tests
pub struct MockIdentityProvider {
    accounts: Mutex<HashMap<String, ProviderAccount>>,
    next_uid: AtomicUsize,
}

impl MockIdentityProvider {
    pub fn new() -> Self {
        Self {
            accounts: Mutex::new(HashMap::new()),
            next_uid: AtomicUsize::new(1),
        }
    }

    pub async fn seed(&self, account: ProviderAccount) {
        self.accounts
            .lock()
            .await
            .insert(account.uid.clone(), account);
    }

    pub async fn account(&self, uid: &str) -> Option<ProviderAccount> {
        self.accounts.lock().await.get(uid).cloned()
    }
}

#[async_trait]
impl IdentityProvider for MockIdentityProvider {
    async fn list_accounts(&self) -> AppResult<Vec<ProviderAccount>> {
        let accounts = self.accounts.lock().await;
        let mut listed: Vec<ProviderAccount> = accounts.values().cloned().collect();
        listed.sort_by(|a, b| a.uid.cmp(&b.uid));
        Ok(listed)
    }

    async fn create_account(
        &self,
        email: &str,
        _password: &str,
        display_name: &str,
    ) -> AppResult<ProviderAccount> {
        let uid = format!("uid-{}", self.next_uid.fetch_add(1, Ordering::SeqCst));
        let account = ProviderAccount {
            uid: uid.clone(),
            email: email.to_string(),
            display_name: display_name.to_string(),
            photo_url: String::new(),
            role: "user".to_string(),
            admin: false,
            providers: vec!["password".to_string()],
            creation_time: Some(chrono::Utc::now()),
            last_sign_in_time: None,
        };
        self.accounts
            .lock()
            .await
            .insert(uid, account.clone());
        Ok(account)
    }

    async fn set_role_claims(&self, uid: &str, role: &str, admin: bool) -> AppResult<()> {
        let mut accounts = self.accounts.lock().await;
        let account = accounts
            .get_mut(uid)
            .ok_or_else(|| AppError::NotFound(format!("account '{}' not found", uid)))?;
        account.role = role.to_string();
        account.admin = admin;
        Ok(())
    }
}

/// Estado de aplicación de test: almacén en memoria, proveedor simulado
pub fn test_state(identity: Arc<MockIdentityProvider>) -> AppState {
    let config = EnvironmentConfig::for_tests();
    let storage = StorageClient::new(
        config.storage_upload_url.clone(),
        config.storage_public_url.clone(),
    );
    AppState::new(Arc::new(MemoryStore::new()), identity, storage, config)
}
