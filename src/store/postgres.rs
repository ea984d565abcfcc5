//! Almacén documental sobre PostgreSQL
//!
//! Una sola tabla `documents` con payload JSONB por colección. La unicidad de
//! matrícula se garantiza con un índice único parcial en el propio almacén,
//! no con un chequeo read-then-write en la aplicación.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::PgPool;
use tokio::sync::broadcast;
use uuid::Uuid;

use super::timestamp::encode_native;
use super::{ChangeFeed, Document, DocumentStore, FieldBag};
use crate::utils::errors::{AppError, AppResult};

const SCHEMA: [&str; 2] = [
    r#"
    CREATE TABLE IF NOT EXISTS documents (
        collection  TEXT NOT NULL,
        id          TEXT NOT NULL,
        data        JSONB NOT NULL,
        created_at  TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at  TIMESTAMPTZ NOT NULL DEFAULT now(),
        PRIMARY KEY (collection, id)
    )
    "#,
    r#"
    CREATE UNIQUE INDEX IF NOT EXISTS idx_trucks_license_plate
        ON documents ((data->>'licensePlate'))
        WHERE collection = 'trucks'
    "#,
];

#[derive(sqlx::FromRow)]
struct DocumentRow {
    id: String,
    data: Value,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl DocumentRow {
    fn into_document(self) -> Document {
        let mut fields = match self.data {
            Value::Object(map) => map,
            _ => serde_json::Map::new(),
        };
        // las columnas son la fuente de verdad de los timestamps
        fields.insert("createdAt".to_string(), encode_native(self.created_at));
        fields.insert("updatedAt".to_string(), encode_native(self.updated_at));
        Document {
            id: self.id,
            fields,
        }
    }
}

pub struct PgDocumentStore {
    pool: PgPool,
    changes: Arc<ChangeFeed>,
}

impl PgDocumentStore {
    /// Conectar y asegurar el schema de la tabla de documentos
    pub async fn connect(database_url: &str) -> AppResult<Self> {
        let pool = PgPool::connect(database_url)
            .await
            .map_err(AppError::Database)?;
        let store = Self::new(pool);
        store.ensure_schema().await?;
        Ok(store)
    }

    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            changes: Arc::new(ChangeFeed::new()),
        }
    }

    async fn ensure_schema(&self) -> AppResult<()> {
        for statement in SCHEMA {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(AppError::Database)?;
        }
        Ok(())
    }

    fn log_and_wrap(operation: &str, collection: &str, e: sqlx::Error) -> AppError {
        log::error!("store {} failed on '{}': {}", operation, collection, e);
        AppError::Database(e)
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn list(&self, collection: &str) -> AppResult<Vec<Document>> {
        let rows = sqlx::query_as::<_, DocumentRow>(
            r#"
            SELECT id, data, created_at, updated_at
            FROM documents
            WHERE collection = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(collection)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| Self::log_and_wrap("list", collection, e))?;

        Ok(rows.into_iter().map(DocumentRow::into_document).collect())
    }

    async fn get(&self, collection: &str, id: &str) -> AppResult<Option<Document>> {
        let row = sqlx::query_as::<_, DocumentRow>(
            r#"
            SELECT id, data, created_at, updated_at
            FROM documents
            WHERE collection = $1 AND id = $2
            "#,
        )
        .bind(collection)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| Self::log_and_wrap("get", collection, e))?;

        Ok(row.map(DocumentRow::into_document))
    }

    async fn insert(&self, collection: &str, fields: FieldBag) -> AppResult<String> {
        let id = Uuid::new_v4().to_string();
        sqlx::query(
            r#"
            INSERT INTO documents (collection, id, data)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(collection)
        .bind(&id)
        .bind(Value::Object(fields))
        .execute(&self.pool)
        .await
        .map_err(|e| Self::log_and_wrap("insert", collection, e))?;

        self.changes.notify(collection);
        Ok(id)
    }

    async fn insert_unique(
        &self,
        collection: &str,
        unique_field: &str,
        fields: FieldBag,
    ) -> AppResult<String> {
        let candidate = fields
            .get(unique_field)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let id = Uuid::new_v4().to_string();

        let result = sqlx::query(
            r#"
            INSERT INTO documents (collection, id, data)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(collection)
        .bind(&id)
        .bind(Value::Object(fields))
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => {
                self.changes.notify(collection);
                Ok(id)
            }
            // violación del índice único parcial: duplicado, nada quedó escrito
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Err(AppError::Conflict(format!(
                    "{} with {} '{}' already exists",
                    collection, unique_field, candidate
                )))
            }
            Err(e) => Err(Self::log_and_wrap("insert_unique", collection, e)),
        }
    }

    async fn update(&self, collection: &str, id: &str, fields: FieldBag) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE documents
            SET data = data || $3, updated_at = now()
            WHERE collection = $1 AND id = $2
            "#,
        )
        .bind(collection)
        .bind(id)
        .bind(Value::Object(fields))
        .execute(&self.pool)
        .await
        .map_err(|e| Self::log_and_wrap("update", collection, e))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "{} with id '{}' not found",
                collection, id
            )));
        }
        self.changes.notify(collection);
        Ok(())
    }

    async fn upsert(&self, collection: &str, id: &str, fields: FieldBag) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO documents (collection, id, data)
            VALUES ($1, $2, $3)
            ON CONFLICT (collection, id)
            DO UPDATE SET data = documents.data || EXCLUDED.data, updated_at = now()
            "#,
        )
        .bind(collection)
        .bind(id)
        .bind(Value::Object(fields))
        .execute(&self.pool)
        .await
        .map_err(|e| Self::log_and_wrap("upsert", collection, e))?;

        self.changes.notify(collection);
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| Self::log_and_wrap("delete", collection, e))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "{} with id '{}' not found",
                collection, id
            )));
        }
        self.changes.notify(collection);
        Ok(())
    }

    async fn find_eq(&self, collection: &str, field: &str, value: &Value) -> AppResult<Vec<Document>> {
        let rows = sqlx::query_as::<_, DocumentRow>(
            r#"
            SELECT id, data, created_at, updated_at
            FROM documents
            WHERE collection = $1 AND data -> $2 = $3
            ORDER BY created_at DESC
            "#,
        )
        .bind(collection)
        .bind(field)
        .bind(value)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| Self::log_and_wrap("find_eq", collection, e))?;

        Ok(rows.into_iter().map(DocumentRow::into_document).collect())
    }

    // Señal en proceso: este backend es el único escritor del almacén
    fn changes(&self, collection: &str) -> broadcast::Receiver<()> {
        self.changes.subscribe(collection)
    }
}
