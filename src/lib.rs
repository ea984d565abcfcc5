//! Backend de administración de flota
//!
//! CRUD de camiones, subcontratistas, usuarios y lista de espera sobre un
//! almacén documental, con el proveedor de identidad y el almacenamiento de
//! objetos como servicios externos inyectados.

pub mod clients;
pub mod config;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;
pub mod utils;
pub mod views;
