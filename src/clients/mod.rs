//! Clientes HTTP de servicios externos
//!
//! El proveedor de identidad y el almacenamiento de objetos son cajas
//! negras detrás de estos clientes; se construyen una vez en el arranque
//! y se inyectan vía `AppState`.

pub mod identity;
pub mod storage;

pub use identity::{HttpIdentityProvider, IdentityProvider, ProviderAccount};
pub use storage::StorageClient;
