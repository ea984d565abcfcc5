//! Acceso a datos por entidad
//!
//! Cada repositorio envuelve el handle del almacén y pasa todo resultado
//! exitoso por el mapper de su entidad. Ante un fallo del almacén se loguea
//! y se relanza sin tocar: sin retry, sin fallback; la presentación del
//! error es del caller.

pub mod subcontractor_repository;
pub mod truck_repository;
pub mod user_repository;
pub mod waitlist_repository;
