//! Almacén de documentos
//!
//! Este módulo define el seam hacia la base de datos documental: cuatro
//! colecciones lógicas (trucks, subcontractors, users, waitlist), cada una
//! un mapa de id opaco a field-bag JSON. El almacén no impone schema; las
//! garantías de forma viven en los mappers y en los schemas de validación.
//!
//! El handle se construye una sola vez en el arranque y se inyecta vía
//! `AppState`; no hay singletons a nivel de módulo.

pub mod memory;
pub mod postgres;
pub mod timestamp;

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::broadcast;

use crate::utils::errors::AppResult;

/// Colección de camiones
pub const TRUCKS: &str = "trucks";
/// Colección de subcontratistas
pub const SUBCONTRACTORS: &str = "subcontractors";
/// Colección de usuarios (espejo del proveedor de identidad)
pub const USERS: &str = "users";
/// Colección de lista de espera
pub const WAITLIST: &str = "waitlist";

/// Field-bag: documento crudo tal como lo devuelve el almacén
pub type FieldBag = serde_json::Map<String, Value>;

/// Documento con su id opaco
#[derive(Debug, Clone)]
pub struct Document {
    pub id: String,
    pub fields: FieldBag,
}

/// Operaciones del almacén documental.
///
/// Los timestamps de servidor (`createdAt` / `updatedAt`) los asigna la
/// implementación en insert/update y los inyecta en el field-bag devuelto;
/// cada implementación puede serializarlos en cualquiera de las formas que
/// entiende [`timestamp::decode_timestamp`].
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Listar todos los documentos, ordenados por fecha de creación descendente
    async fn list(&self, collection: &str) -> AppResult<Vec<Document>>;

    /// Obtener un documento por id; None si no existe
    async fn get(&self, collection: &str, id: &str) -> AppResult<Option<Document>>;

    /// Insertar un documento nuevo con timestamps de servidor; devuelve el id
    async fn insert(&self, collection: &str, fields: FieldBag) -> AppResult<String>;

    /// Insertar con unicidad sobre `unique_field` garantizada por el almacén.
    /// Un duplicado produce `AppError::Conflict`, nunca un insert parcial.
    async fn insert_unique(
        &self,
        collection: &str,
        unique_field: &str,
        fields: FieldBag,
    ) -> AppResult<String>;

    /// Merge parcial de campos sobre un documento existente; refresca `updatedAt`
    async fn update(&self, collection: &str, id: &str, fields: FieldBag) -> AppResult<()>;

    /// Escribir un documento con id conocido (crea o reemplaza campos por merge)
    async fn upsert(&self, collection: &str, id: &str, fields: FieldBag) -> AppResult<()>;

    /// Eliminar un documento; eliminar uno inexistente es NotFound
    async fn delete(&self, collection: &str, id: &str) -> AppResult<()>;

    /// Filtrado por igualdad sobre un campo del field-bag
    async fn find_eq(&self, collection: &str, field: &str, value: &Value) -> AppResult<Vec<Document>>;

    /// Señal de cambios de una colección: cada escritura exitosa publica un tick
    fn changes(&self, collection: &str) -> broadcast::Receiver<()>;
}

/// Feed de cambios por colección, compartido por las implementaciones del
/// almacén. Un tick por escritura; los suscriptores re-listan la colección
/// completa (no hay semántica de delta).
pub struct ChangeFeed {
    senders: Mutex<HashMap<String, broadcast::Sender<()>>>,
}

impl ChangeFeed {
    pub fn new() -> Self {
        Self {
            senders: Mutex::new(HashMap::new()),
        }
    }

    pub fn subscribe(&self, collection: &str) -> broadcast::Receiver<()> {
        let mut senders = self.senders.lock().expect("change feed lock poisoned");
        senders
            .entry(collection.to_string())
            .or_insert_with(|| broadcast::channel(64).0)
            .subscribe()
    }

    pub fn notify(&self, collection: &str) {
        let senders = self.senders.lock().expect("change feed lock poisoned");
        if let Some(sender) = senders.get(collection) {
            // sin suscriptores el send falla; no es un error
            let _ = sender.send(());
        }
    }
}

impl Default for ChangeFeed {
    fn default() -> Self {
        Self::new()
    }
}
