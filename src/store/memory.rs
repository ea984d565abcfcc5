//! Almacén documental en memoria
//!
//! Implementación para tests y desarrollo local. Mantiene los documentos en
//! un mapa por colección y serializa sus timestamps en la forma de wrapper
//! de epoch-segundos, de modo que el camino completo ejercita el
//! decodificador multi-forma igual que el almacén real.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use tokio::sync::{broadcast, RwLock};
use uuid::Uuid;

use super::timestamp::encode_epoch_seconds;
use super::{ChangeFeed, Document, DocumentStore, FieldBag};
use crate::utils::errors::{AppError, AppResult};

#[derive(Debug, Clone)]
struct StoredDoc {
    fields: FieldBag,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

pub struct MemoryStore {
    collections: RwLock<HashMap<String, HashMap<String, StoredDoc>>>,
    changes: Arc<ChangeFeed>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            collections: RwLock::new(HashMap::new()),
            changes: Arc::new(ChangeFeed::new()),
        }
    }

    fn to_document(id: &str, doc: &StoredDoc) -> Document {
        let mut fields = doc.fields.clone();
        fields.insert("createdAt".to_string(), encode_epoch_seconds(doc.created_at));
        fields.insert("updatedAt".to_string(), encode_epoch_seconds(doc.updated_at));
        Document {
            id: id.to_string(),
            fields,
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn list(&self, collection: &str) -> AppResult<Vec<Document>> {
        let collections = self.collections.read().await;
        let mut docs: Vec<(&String, &StoredDoc)> = collections
            .get(collection)
            .map(|c| c.iter().collect())
            .unwrap_or_default();
        docs.sort_by(|a, b| b.1.created_at.cmp(&a.1.created_at));
        Ok(docs
            .into_iter()
            .map(|(id, doc)| Self::to_document(id, doc))
            .collect())
    }

    async fn get(&self, collection: &str, id: &str) -> AppResult<Option<Document>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|c| c.get(id))
            .map(|doc| Self::to_document(id, doc)))
    }

    async fn insert(&self, collection: &str, fields: FieldBag) -> AppResult<String> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();
        let mut collections = self.collections.write().await;
        collections.entry(collection.to_string()).or_default().insert(
            id.clone(),
            StoredDoc {
                fields,
                created_at: now,
                updated_at: now,
            },
        );
        drop(collections);
        self.changes.notify(collection);
        Ok(id)
    }

    async fn insert_unique(
        &self,
        collection: &str,
        unique_field: &str,
        fields: FieldBag,
    ) -> AppResult<String> {
        let candidate = fields.get(unique_field).cloned().unwrap_or(Value::Null);
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        // chequeo e inserción bajo el mismo write lock: sin ventana de carrera
        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection.to_string()).or_default();
        if docs
            .values()
            .any(|doc| doc.fields.get(unique_field) == Some(&candidate))
        {
            return Err(AppError::Conflict(format!(
                "{} with {} '{}' already exists",
                collection, unique_field, candidate
            )));
        }
        docs.insert(
            id.clone(),
            StoredDoc {
                fields,
                created_at: now,
                updated_at: now,
            },
        );
        drop(collections);
        self.changes.notify(collection);
        Ok(id)
    }

    async fn update(&self, collection: &str, id: &str, fields: FieldBag) -> AppResult<()> {
        let mut collections = self.collections.write().await;
        let doc = collections
            .get_mut(collection)
            .and_then(|c| c.get_mut(id))
            .ok_or_else(|| {
                AppError::NotFound(format!("{} with id '{}' not found", collection, id))
            })?;
        for (key, value) in fields {
            doc.fields.insert(key, value);
        }
        doc.updated_at = Utc::now();
        drop(collections);
        self.changes.notify(collection);
        Ok(())
    }

    async fn upsert(&self, collection: &str, id: &str, fields: FieldBag) -> AppResult<()> {
        let now = Utc::now();
        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection.to_string()).or_default();
        match docs.get_mut(id) {
            Some(doc) => {
                for (key, value) in fields {
                    doc.fields.insert(key, value);
                }
                doc.updated_at = now;
            }
            None => {
                docs.insert(
                    id.to_string(),
                    StoredDoc {
                        fields,
                        created_at: now,
                        updated_at: now,
                    },
                );
            }
        }
        drop(collections);
        self.changes.notify(collection);
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> AppResult<()> {
        let mut collections = self.collections.write().await;
        let removed = collections
            .get_mut(collection)
            .and_then(|c| c.remove(id))
            .is_some();
        drop(collections);
        if !removed {
            return Err(AppError::NotFound(format!(
                "{} with id '{}' not found",
                collection, id
            )));
        }
        self.changes.notify(collection);
        Ok(())
    }

    async fn find_eq(&self, collection: &str, field: &str, value: &Value) -> AppResult<Vec<Document>> {
        let collections = self.collections.read().await;
        let mut docs: Vec<(&String, &StoredDoc)> = collections
            .get(collection)
            .map(|c| {
                c.iter()
                    .filter(|(_, doc)| doc.fields.get(field) == Some(value))
                    .collect()
            })
            .unwrap_or_default();
        docs.sort_by(|a, b| b.1.created_at.cmp(&a.1.created_at));
        Ok(docs
            .into_iter()
            .map(|(id, doc)| Self::to_document(id, doc))
            .collect())
    }

    fn changes(&self, collection: &str) -> broadcast::Receiver<()> {
        self.changes.subscribe(collection)
    }
}
