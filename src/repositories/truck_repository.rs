//! Repositorio de camiones
//!
//! Lectura one-shot y suscripción en vivo producen exactamente la misma
//! forma de record (mismo mapper), de modo que cualquiera de las dos puede
//! sustituir a la otra sin cambiar a los consumidores.

use std::sync::Arc;

use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;

use crate::models::truck::Truck;
use crate::store::{Document, DocumentStore, FieldBag, TRUCKS};
use crate::utils::errors::AppResult;

#[derive(Clone)]
pub struct TruckRepository {
    store: Arc<dyn DocumentStore>,
}

impl TruckRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    fn map_document(doc: &Document) -> AppResult<Truck> {
        Truck::from_document(&doc.id, &doc.fields)
    }

    /// Listar todos los camiones, más recientes primero
    pub async fn list(&self) -> AppResult<Vec<Truck>> {
        let docs = self.store.list(TRUCKS).await.map_err(|e| {
            tracing::error!("Error listing trucks: {}", e);
            e
        })?;
        docs.iter().map(Self::map_document).collect()
    }

    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<Truck>> {
        let doc = self.store.get(TRUCKS, id).await.map_err(|e| {
            tracing::error!("Error finding truck: {}", e);
            e
        })?;
        doc.as_ref().map(Self::map_document).transpose()
    }

    /// Crear con unicidad de matrícula garantizada por el almacén;
    /// un duplicado es Conflict y no deja nada escrito
    pub async fn create(&self, fields: FieldBag) -> AppResult<Truck> {
        let id = self
            .store
            .insert_unique(TRUCKS, "licensePlate", fields)
            .await
            .map_err(|e| {
                tracing::error!("Error creating truck: {}", e);
                e
            })?;
        self.read_back(&id).await
    }

    /// Merge parcial; refresca updatedAt
    pub async fn update(&self, id: &str, fields: FieldBag) -> AppResult<Truck> {
        self.store.update(TRUCKS, id, fields).await.map_err(|e| {
            tracing::error!("Error updating truck: {}", e);
            e
        })?;
        self.read_back(id).await
    }

    async fn read_back(&self, id: &str) -> AppResult<Truck> {
        let doc = self.store.get(TRUCKS, id).await?.ok_or_else(|| {
            crate::utils::errors::not_found_error("truck", id)
        })?;
        Self::map_document(&doc)
    }

    /// Suscripción en vivo a la lista: cada cambio remoto entrega la lista
    /// completa recalculada, nunca un delta. Soltar el handle corta la tarea.
    pub async fn watch_list(&self) -> AppResult<TruckListSubscription> {
        // suscribirse antes del snapshot inicial: una escritura entre medio
        // produce un tick pendiente en vez de perderse
        let mut changes = self.store.changes(TRUCKS);
        let initial = self.list().await?;
        let (tx, rx) = watch::channel(initial);

        let repo = self.clone();
        let task = tokio::spawn(async move {
            loop {
                match changes.recv().await {
                    Ok(()) | Err(broadcast::error::RecvError::Lagged(_)) => {
                        match repo.list().await {
                            Ok(trucks) => {
                                if tx.send(trucks).is_err() {
                                    break;
                                }
                            }
                            Err(e) => {
                                tracing::error!("Error refreshing truck subscription: {}", e);
                            }
                        }
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });

        Ok(TruckListSubscription { receiver: rx, task })
    }
}

/// Handle de la suscripción en vivo; se limpia sola al soltarse
pub struct TruckListSubscription {
    receiver: watch::Receiver<Vec<Truck>>,
    task: JoinHandle<()>,
}

impl TruckListSubscription {
    /// Snapshot actual de la lista
    pub fn current(&self) -> Vec<Truck> {
        self.receiver.borrow().clone()
    }

    /// Esperar el próximo reemplazo completo de la lista
    pub async fn changed(&mut self) -> AppResult<Vec<Truck>> {
        self.receiver.changed().await.map_err(|_| {
            crate::utils::errors::internal_error("truck subscription closed")
        })?;
        Ok(self.receiver.borrow().clone())
    }
}

impl Drop for TruckListSubscription {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;
    use serde_json::json;

    fn fields(plate: &str, brand: &str) -> FieldBag {
        let mut bag = FieldBag::new();
        bag.insert("licensePlate".into(), json!(plate));
        bag.insert("brand".into(), json!(brand));
        bag
    }

    #[tokio::test]
    async fn test_create_and_find_round_trip() {
        let repo = TruckRepository::new(Arc::new(MemoryStore::new()));
        let created = repo.create(fields("กก-1234", "Isuzu")).await.unwrap();

        assert_eq!(created.license_plate, "กก-1234");
        assert!(created.created_at.is_some());

        let found = repo.find_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(found, created);
    }

    #[tokio::test]
    async fn test_find_missing_is_none() {
        let repo = TruckRepository::new(Arc::new(MemoryStore::new()));
        assert!(repo.find_by_id("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_plate_is_conflict() {
        let repo = TruckRepository::new(Arc::new(MemoryStore::new()));
        repo.create(fields("กก-1234", "Isuzu")).await.unwrap();

        let err = repo.create(fields("กก-1234", "Hino")).await.unwrap_err();
        assert!(matches!(err, crate::utils::errors::AppError::Conflict(_)));
        assert_eq!(repo.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_refreshes_updated_at() {
        let repo = TruckRepository::new(Arc::new(MemoryStore::new()));
        let created = repo.create(fields("กก-1234", "Isuzu")).await.unwrap();

        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        let mut patch = FieldBag::new();
        patch.insert("status".into(), json!("maintenance"));
        let updated = repo.update(&created.id, patch).await.unwrap();

        assert_eq!(updated.status, "maintenance");
        assert_eq!(updated.brand, "Isuzu");
        assert!(updated.updated_at.unwrap() > created.created_at.unwrap());
    }

    #[tokio::test]
    async fn test_watch_list_pushes_full_replacement() {
        let repo = TruckRepository::new(Arc::new(MemoryStore::new()));
        repo.create(fields("กก-1111", "Isuzu")).await.unwrap();

        let mut subscription = repo.watch_list().await.unwrap();
        assert_eq!(subscription.current().len(), 1);

        repo.create(fields("กก-2222", "Hino")).await.unwrap();
        let pushed = subscription.changed().await.unwrap();
        assert_eq!(pushed.len(), 2);

        // misma forma de record que la lectura one-shot
        let listed = repo.list().await.unwrap();
        assert_eq!(pushed, listed);
    }
}
