//! Modelos del sistema
//!
//! Este módulo contiene los records tipados de cada entidad y su mapper
//! desde el field-bag crudo del almacén. Todo campo ausente recibe un
//! default explícito; los campos tipo enum se llevan como String y un valor
//! corrupto ya presente pasa sin tocar (solo la ausencia se defaultea).

pub mod subcontractor;
pub mod truck;
pub mod user;
pub mod waitlist;

use rust_decimal::Decimal;
use serde_json::Value;

use crate::store::FieldBag;

/// Campo string con default ""
pub(crate) fn str_field(fields: &FieldBag, key: &str) -> String {
    fields
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Campo string con default declarado (enums)
pub(crate) fn str_field_or(fields: &FieldBag, key: &str, default: &str) -> String {
    match fields.get(key) {
        Some(Value::String(s)) => s.clone(),
        _ => default.to_string(),
    }
}

/// Campo lista de strings con default []
pub(crate) fn list_field(fields: &FieldBag, key: &str) -> Vec<String> {
    fields
        .get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Numérico opcional: ausente, null o no-numérico es None
pub(crate) fn opt_f64_field(fields: &FieldBag, key: &str) -> Option<f64> {
    fields.get(key).and_then(Value::as_f64)
}

/// Decimal opcional: acepta número o string numérico
pub(crate) fn opt_decimal_field(fields: &FieldBag, key: &str) -> Option<Decimal> {
    match fields.get(key) {
        Some(Value::Number(n)) => n.as_f64().and_then(Decimal::from_f64_retain),
        Some(Value::String(s)) => s.parse().ok(),
        _ => None,
    }
}

/// Campo booleano con default false
pub(crate) fn bool_field(fields: &FieldBag, key: &str) -> bool {
    fields.get(key).and_then(Value::as_bool).unwrap_or(false)
}
