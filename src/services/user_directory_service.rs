//! Directorio de usuarios
//!
//! Capa privilegiada sobre el proveedor de identidad. El rol vive duplicado
//! (claim del proveedor + documento espejo en el almacén); todo cambio es
//! un update en dos fases: primero el claim, después el espejo. `sync_users`
//! es el job de reconciliación documentado: re-espeja todas las cuentas.

use std::sync::Arc;

use crate::clients::identity::{IdentityProvider, ProviderAccount};
use crate::dto::user_dto::CreateUserRequest;
use crate::models::user::{role_is_admin, User};
use crate::repositories::user_repository::UserRepository;
use crate::utils::errors::AppResult;

pub struct UserDirectoryService {
    provider: Arc<dyn IdentityProvider>,
    users: UserRepository,
}

fn account_to_user(account: &ProviderAccount) -> User {
    User {
        uid: account.uid.clone(),
        email: account.email.clone(),
        display_name: account.display_name.clone(),
        photo_url: account.photo_url.clone(),
        role: account.role.clone(),
        admin: account.admin,
        providers: account.providers.clone(),
        creation_time: account.creation_time,
        last_sign_in_time: account.last_sign_in_time,
        updated_at: None,
    }
}

impl UserDirectoryService {
    pub fn new(provider: Arc<dyn IdentityProvider>, users: UserRepository) -> Self {
        Self { provider, users }
    }

    /// Cuentas tal como las conoce el proveedor, en la forma de record de
    /// usuario que consumen las pantallas
    pub async fn list_users(&self) -> AppResult<Vec<User>> {
        let accounts = self.provider.list_accounts().await.map_err(|e| {
            tracing::error!("Error listing provider accounts: {}", e);
            e
        })?;
        Ok(accounts.iter().map(account_to_user).collect())
    }

    /// Crear la cuenta en el proveedor, fijar su claim de rol y escribir el
    /// espejo en el almacén
    pub async fn create_user(&self, request: &CreateUserRequest) -> AppResult<User> {
        let account = self
            .provider
            .create_account(&request.email, &request.password, &request.display_name)
            .await
            .map_err(|e| {
                tracing::error!("Error creating provider account: {}", e);
                e
            })?;

        let admin = role_is_admin(&request.role);
        self.provider
            .set_role_claims(&account.uid, &request.role, admin)
            .await
            .map_err(|e| {
                tracing::error!("Error setting role claims for new account: {}", e);
                e
            })?;

        let mirrored = ProviderAccount {
            role: request.role.clone(),
            admin,
            ..account
        };
        self.users.mirror_account(&mirrored).await
    }

    /// Cambio de rol en dos fases: claim del proveedor, después espejo.
    /// El claim nuevo recién se ve en el cliente tras refrescar el token.
    pub async fn update_user_role(&self, uid: &str, role: &str) -> AppResult<User> {
        let admin = role_is_admin(role);
        self.provider
            .set_role_claims(uid, role, admin)
            .await
            .map_err(|e| {
                tracing::error!("Error setting role claims: {}", e);
                e
            })?;

        self.users.set_role(uid, role).await
    }

    /// Job de reconciliación: espejar en bloque todas las cuentas del
    /// proveedor; devuelve cuántas quedaron sincronizadas
    pub async fn sync_users(&self) -> AppResult<usize> {
        let accounts = self.provider.list_accounts().await.map_err(|e| {
            tracing::error!("Error listing provider accounts for sync: {}", e);
            e
        })?;

        let mut synced = 0;
        for account in &accounts {
            self.users.mirror_account(account).await?;
            synced += 1;
        }
        tracing::info!("User sync finished: {} accounts mirrored", synced);
        Ok(synced)
    }
}
