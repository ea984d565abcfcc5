//! Normalización de timestamps almacenados
//!
//! Los documentos históricos traen las fechas en tres formas distintas:
//! string RFC3339, wrapper de epoch-segundos ({"seconds": .., "nanoseconds": ..})
//! y accessor de milisegundos ({"millis": ..} o un entero). La forma se decide
//! aquí, en la frontera del adaptador del almacén, como unión etiquetada; una
//! forma no reconocida es un error de normalización, no un pass-through.

use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use crate::utils::errors::{AppError, AppResult};

/// Forma serializada de un timestamp del almacén
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StoredTimestamp {
    /// Fecha nativa serializada como string RFC3339
    Native(DateTime<Utc>),
    /// Wrapper de epoch-segundos con nanosegundos opcionales
    EpochSeconds { seconds: i64, nanoseconds: u32 },
    /// Milisegundos desde epoch
    EpochMillis(i64),
}

impl StoredTimestamp {
    /// Convertir a fecha; None si los valores quedan fuera del rango de chrono
    pub fn to_datetime(self) -> Option<DateTime<Utc>> {
        match self {
            StoredTimestamp::Native(dt) => Some(dt),
            StoredTimestamp::EpochSeconds { seconds, nanoseconds } => {
                Utc.timestamp_opt(seconds, nanoseconds).single()
            }
            StoredTimestamp::EpochMillis(millis) => Utc.timestamp_millis_opt(millis).single(),
        }
    }
}

/// Decodificar un valor JSON de timestamp a su forma etiquetada.
///
/// Null decodifica a None. Cualquier forma no reconocida es un error; las
/// cuatro formas que codifican el mismo instante decodifican al mismo valor.
pub fn decode_stored(value: &Value) -> AppResult<Option<StoredTimestamp>> {
    match value {
        Value::Null => Ok(None),

        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .map(|dt| Some(StoredTimestamp::Native(dt.with_timezone(&Utc))))
            .map_err(|_| {
                AppError::Normalization(format!("unreadable timestamp string '{}'", s))
            }),

        Value::Number(n) => n
            .as_i64()
            .map(|millis| Some(StoredTimestamp::EpochMillis(millis)))
            .ok_or_else(|| {
                AppError::Normalization(format!("non-integer timestamp number '{}'", n))
            }),

        Value::Object(map) => {
            if let Some(seconds) = map.get("seconds").and_then(Value::as_i64) {
                let nanoseconds = map
                    .get("nanoseconds")
                    .or_else(|| map.get("nanos"))
                    .and_then(Value::as_u64)
                    .unwrap_or(0) as u32;
                return Ok(Some(StoredTimestamp::EpochSeconds { seconds, nanoseconds }));
            }
            if let Some(millis) = map.get("millis").and_then(Value::as_i64) {
                return Ok(Some(StoredTimestamp::EpochMillis(millis)));
            }
            Err(AppError::Normalization(format!(
                "unrecognized timestamp object with keys {:?}",
                map.keys().collect::<Vec<_>>()
            )))
        }

        other => Err(AppError::Normalization(format!(
            "unrecognized timestamp value '{}'",
            other
        ))),
    }
}

/// Decodificar directo a fecha
pub fn decode_timestamp(value: &Value) -> AppResult<Option<DateTime<Utc>>> {
    match decode_stored(value)? {
        None => Ok(None),
        Some(stored) => stored
            .to_datetime()
            .map(Some)
            .ok_or_else(|| AppError::Normalization("timestamp out of range".to_string())),
    }
}

/// Leer y decodificar un campo de timestamp de un field-bag; ausente = None
pub fn timestamp_field(
    fields: &serde_json::Map<String, Value>,
    key: &str,
) -> AppResult<Option<DateTime<Utc>>> {
    match fields.get(key) {
        None => Ok(None),
        Some(value) => decode_timestamp(value),
    }
}

/// Codificar como string RFC3339 (forma nativa)
pub fn encode_native(dt: DateTime<Utc>) -> Value {
    Value::String(dt.to_rfc3339())
}

/// Codificar como wrapper de epoch-segundos
pub fn encode_epoch_seconds(dt: DateTime<Utc>) -> Value {
    serde_json::json!({
        "seconds": dt.timestamp(),
        "nanoseconds": dt.timestamp_subsec_nanos(),
    })
}
