//! Utilidades del sistema
//!
//! Este módulo contiene utilidades para manejo de errores y validación
//! de datos de flota.

pub mod errors;
pub mod validation;
