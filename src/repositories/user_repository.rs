//! Repositorio de usuarios
//!
//! El documento de usuario es el espejo en el almacén de la cuenta del
//! proveedor de identidad; el id del documento es el uid de la cuenta.
//! Todo escritor mantiene `role` y `admin` consistentes entre sí.

use std::sync::Arc;

use serde_json::json;

use crate::clients::identity::ProviderAccount;
use crate::models::user::{role_is_admin, User};
use crate::store::timestamp::encode_native;
use crate::store::{Document, DocumentStore, FieldBag, USERS};
use crate::utils::errors::AppResult;

#[derive(Clone)]
pub struct UserRepository {
    store: Arc<dyn DocumentStore>,
}

impl UserRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    fn map_document(doc: &Document) -> AppResult<User> {
        User::from_document(&doc.id, &doc.fields)
    }

    pub async fn list(&self) -> AppResult<Vec<User>> {
        let docs = self.store.list(USERS).await.map_err(|e| {
            tracing::error!("Error listing users: {}", e);
            e
        })?;
        docs.iter().map(Self::map_document).collect()
    }

    pub async fn find_by_uid(&self, uid: &str) -> AppResult<Option<User>> {
        let doc = self.store.get(USERS, uid).await.map_err(|e| {
            tracing::error!("Error finding user: {}", e);
            e
        })?;
        doc.as_ref().map(Self::map_document).transpose()
    }

    /// Espejar una cuenta del proveedor en el almacén (crea o actualiza)
    pub async fn mirror_account(&self, account: &ProviderAccount) -> AppResult<User> {
        let mut fields = FieldBag::new();
        fields.insert("email".into(), json!(account.email));
        fields.insert("displayName".into(), json!(account.display_name));
        fields.insert("photoUrl".into(), json!(account.photo_url));
        fields.insert("role".into(), json!(account.role));
        fields.insert("admin".into(), json!(role_is_admin(&account.role)));
        fields.insert("providers".into(), json!(account.providers));
        if let Some(creation_time) = account.creation_time {
            fields.insert("creationTime".into(), encode_native(creation_time));
        }
        if let Some(last_sign_in) = account.last_sign_in_time {
            fields.insert("lastSignInTime".into(), encode_native(last_sign_in));
        }

        self.store.upsert(USERS, &account.uid, fields).await.map_err(|e| {
            tracing::error!("Error mirroring user account: {}", e);
            e
        })?;
        self.read_back(&account.uid).await
    }

    /// Espejar un cambio de rol; `admin` se deriva del rol, nunca se fija suelto
    pub async fn set_role(&self, uid: &str, role: &str) -> AppResult<User> {
        let mut fields = FieldBag::new();
        fields.insert("role".into(), json!(role));
        fields.insert("admin".into(), json!(role_is_admin(role)));

        self.store.upsert(USERS, uid, fields).await.map_err(|e| {
            tracing::error!("Error updating user role: {}", e);
            e
        })?;
        self.read_back(uid).await
    }

    async fn read_back(&self, uid: &str) -> AppResult<User> {
        let doc = self.store.get(USERS, uid).await?.ok_or_else(|| {
            crate::utils::errors::not_found_error("user", uid)
        })?;
        Self::map_document(&doc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;
    use chrono::{TimeZone, Utc};

    fn account(uid: &str, role: &str) -> ProviderAccount {
        ProviderAccount {
            uid: uid.to_string(),
            email: format!("{}@fleet.co.th", uid),
            display_name: uid.to_uppercase(),
            photo_url: String::new(),
            role: role.to_string(),
            admin: role_is_admin(role),
            providers: vec!["password".to_string()],
            creation_time: Utc.timestamp_opt(1_700_000_000, 0).single(),
            last_sign_in_time: None,
        }
    }

    #[tokio::test]
    async fn test_mirror_account_writes_consistent_role_pair() {
        let repo = UserRepository::new(Arc::new(MemoryStore::new()));
        let user = repo.mirror_account(&account("u1", "admin")).await.unwrap();

        assert_eq!(user.uid, "u1");
        assert_eq!(user.role, "admin");
        assert!(user.admin);
        assert!(user.creation_time.is_some());
        assert_eq!(user.providers, vec!["password".to_string()]);
    }

    #[tokio::test]
    async fn test_set_role_keeps_admin_flag_in_sync() {
        let repo = UserRepository::new(Arc::new(MemoryStore::new()));
        repo.mirror_account(&account("u1", "admin")).await.unwrap();

        let updated = repo.set_role("u1", "partner").await.unwrap();
        assert_eq!(updated.role, "partner");
        assert!(!updated.admin);

        let updated = repo.set_role("u1", "admin").await.unwrap();
        assert!(updated.admin);
    }

    #[tokio::test]
    async fn test_mirror_is_idempotent_per_uid() {
        let repo = UserRepository::new(Arc::new(MemoryStore::new()));
        repo.mirror_account(&account("u1", "user")).await.unwrap();
        repo.mirror_account(&account("u1", "user")).await.unwrap();
        assert_eq!(repo.list().await.unwrap().len(), 1);
    }
}
