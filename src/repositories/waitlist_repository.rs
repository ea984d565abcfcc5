//! Repositorio de la lista de espera

use std::sync::Arc;

use serde_json::json;

use crate::models::waitlist::WaitlistEntry;
use crate::store::{Document, DocumentStore, FieldBag, WAITLIST};
use crate::utils::errors::AppResult;

#[derive(Clone)]
pub struct WaitlistRepository {
    store: Arc<dyn DocumentStore>,
}

impl WaitlistRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    fn map_document(doc: &Document) -> AppResult<WaitlistEntry> {
        WaitlistEntry::from_document(&doc.id, &doc.fields)
    }

    pub async fn list(&self) -> AppResult<Vec<WaitlistEntry>> {
        let docs = self.store.list(WAITLIST).await.map_err(|e| {
            tracing::error!("Error listing waitlist: {}", e);
            e
        })?;
        docs.iter().map(Self::map_document).collect()
    }

    pub async fn join(&self, email: &str) -> AppResult<WaitlistEntry> {
        let mut fields = FieldBag::new();
        fields.insert("email".into(), json!(email));

        let id = self.store.insert(WAITLIST, fields).await.map_err(|e| {
            tracing::error!("Error joining waitlist: {}", e);
            e
        })?;

        let doc = self.store.get(WAITLIST, &id).await?.ok_or_else(|| {
            crate::utils::errors::not_found_error("waitlist entry", &id)
        })?;
        Self::map_document(&doc)
    }

    /// Un operador puede borrar entradas individualmente
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        self.store.delete(WAITLIST, id).await.map_err(|e| {
            tracing::error!("Error deleting waitlist entry: {}", e);
            e
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;
    use crate::utils::errors::AppError;

    #[tokio::test]
    async fn test_join_list_delete_flow() {
        let repo = WaitlistRepository::new(Arc::new(MemoryStore::new()));

        let entry = repo.join("driver@example.com").await.unwrap();
        assert_eq!(entry.email, "driver@example.com");
        assert!(entry.created_at.is_some());

        assert_eq!(repo.list().await.unwrap().len(), 1);

        repo.delete(&entry.id).await.unwrap();
        assert!(repo.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let repo = WaitlistRepository::new(Arc::new(MemoryStore::new()));
        let err = repo.delete("nope").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
