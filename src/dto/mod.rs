//! DTOs de la API
//!
//! Requests de creación/edición con sus schemas de validación declarativos.
//! La validación junta todos los errores de campo antes de reportar; nunca
//! corta en el primero.

pub mod common;
pub mod subcontractor_dto;
pub mod truck_dto;
pub mod user_dto;
pub mod waitlist_dto;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use validator::ValidationError;

/// Entrada numérica de formulario: los campos de capacidad llegan como
/// número o como string (string vacío = sin valor).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum NumericInput {
    Number(f64),
    Text(String),
}

impl NumericInput {
    /// Normalizar a valor opcional; Err si el texto no parsea a número
    pub fn normalized(&self) -> Result<Option<f64>, ValidationError> {
        match self {
            NumericInput::Number(n) => Ok(Some(*n)),
            NumericInput::Text(s) if s.trim().is_empty() => Ok(None),
            NumericInput::Text(s) => s.trim().parse::<f64>().map(Some).map_err(|_| {
                let mut error = ValidationError::new("number");
                error.message = Some("Value must be a number".into());
                error.add_param("value".into(), &s.to_string());
                error
            }),
        }
    }
}

/// Fecha de formulario: RFC3339 completo o "YYYY-MM-DD"
pub(crate) fn parse_date_input(value: &str) -> Result<DateTime<Utc>, ValidationError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        if let Some(dt) = date.and_hms_opt(0, 0, 0) {
            return Ok(DateTime::from_naive_utc_and_offset(dt, Utc));
        }
    }
    let mut error = ValidationError::new("date");
    error.message = Some("Date must be YYYY-MM-DD or RFC3339".into());
    error.add_param("value".into(), &value.to_string());
    Err(error)
}
