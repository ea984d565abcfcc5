//! Repositorio de subcontratistas

use std::sync::Arc;

use crate::models::subcontractor::Subcontractor;
use crate::store::{Document, DocumentStore, FieldBag, SUBCONTRACTORS};
use crate::utils::errors::AppResult;

#[derive(Clone)]
pub struct SubcontractorRepository {
    store: Arc<dyn DocumentStore>,
}

impl SubcontractorRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    fn map_document(doc: &Document) -> AppResult<Subcontractor> {
        Subcontractor::from_document(&doc.id, &doc.fields)
    }

    pub async fn list(&self) -> AppResult<Vec<Subcontractor>> {
        let docs = self.store.list(SUBCONTRACTORS).await.map_err(|e| {
            tracing::error!("Error listing subcontractors: {}", e);
            e
        })?;
        docs.iter().map(Self::map_document).collect()
    }

    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<Subcontractor>> {
        let doc = self.store.get(SUBCONTRACTORS, id).await.map_err(|e| {
            tracing::error!("Error finding subcontractor: {}", e);
            e
        })?;
        doc.as_ref().map(Self::map_document).transpose()
    }

    pub async fn create(&self, fields: FieldBag) -> AppResult<Subcontractor> {
        let id = self.store.insert(SUBCONTRACTORS, fields).await.map_err(|e| {
            tracing::error!("Error creating subcontractor: {}", e);
            e
        })?;
        self.read_back(&id).await
    }

    pub async fn update(&self, id: &str, fields: FieldBag) -> AppResult<Subcontractor> {
        self.store.update(SUBCONTRACTORS, id, fields).await.map_err(|e| {
            tracing::error!("Error updating subcontractor: {}", e);
            e
        })?;
        self.read_back(id).await
    }

    /// Borrar el subcontratista. Los camiones que lo referencian conservan
    /// su `subcontractorId`: referencia débil, sin cascada.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        self.store.delete(SUBCONTRACTORS, id).await.map_err(|e| {
            tracing::error!("Error deleting subcontractor: {}", e);
            e
        })
    }

    async fn read_back(&self, id: &str) -> AppResult<Subcontractor> {
        let doc = self.store.get(SUBCONTRACTORS, id).await?.ok_or_else(|| {
            crate::utils::errors::not_found_error("subcontractor", id)
        })?;
        Self::map_document(&doc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;
    use serde_json::json;

    #[tokio::test]
    async fn test_create_update_get_flow() {
        let repo = SubcontractorRepository::new(Arc::new(MemoryStore::new()));

        let mut fields = FieldBag::new();
        fields.insert("type".into(), json!("individual"));
        fields.insert("name".into(), json!("Somchai Transport"));
        fields.insert("idCardNumber".into(), json!("1101702034515"));
        fields.insert("documents".into(), json!([]));

        let created = repo.create(fields).await.unwrap();
        assert_eq!(created.subcontractor_type, "individual");
        assert_eq!(created.id_card_number, "1101702034515");
        assert!(created.documents.is_empty());

        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        let mut patch = FieldBag::new();
        patch.insert("documents".into(), json!(["https://cdn/contract.pdf"]));
        repo.update(&created.id, patch).await.unwrap();

        let fetched = repo.find_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(fetched.documents.len(), 1);
        assert!(fetched.updated_at.unwrap() > fetched.created_at.unwrap());
    }

    #[tokio::test]
    async fn test_delete_then_find_is_none() {
        let repo = SubcontractorRepository::new(Arc::new(MemoryStore::new()));
        let created = repo.create(FieldBag::new()).await.unwrap();
        repo.delete(&created.id).await.unwrap();
        assert!(repo.find_by_id(&created.id).await.unwrap().is_none());
    }
}
