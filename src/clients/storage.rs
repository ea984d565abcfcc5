//! Cliente del almacenamiento de objetos
//!
//! Contrato mínimo con el servicio: subir bytes a un path y recibir una URL
//! pública resoluble, y leer de vuelta por esa URL. Sin versionado ni
//! garantía de borrado.

use reqwest::Client;

use crate::utils::errors::{AppError, AppResult};

#[derive(Clone)]
pub struct StorageClient {
    client: Client,
    upload_base_url: String,
    public_base_url: String,
}

impl StorageClient {
    pub fn new(upload_base_url: String, public_base_url: String) -> Self {
        Self {
            client: Client::new(),
            upload_base_url,
            public_base_url,
        }
    }

    fn wrap(operation: &str, e: reqwest::Error) -> AppError {
        log::error!("storage {} failed: {}", operation, e);
        AppError::ExternalApi(format!("storage {}: {}", operation, e))
    }

    /// URL pública de un path; el path va URL-encoded por segmento completo
    pub fn public_url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.public_base_url.trim_end_matches('/'),
            urlencoding::encode(path)
        )
    }

    /// Subir bytes al path dado; devuelve la URL pública resultante
    pub async fn upload(&self, path: &str, content_type: &str, bytes: Vec<u8>) -> AppResult<String> {
        let response = self
            .client
            .put(format!(
                "{}/{}",
                self.upload_base_url.trim_end_matches('/'),
                urlencoding::encode(path)
            ))
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await
            .map_err(|e| Self::wrap("upload", e))?;

        let status = response.status();
        if !status.is_success() {
            log::error!("storage upload returned HTTP {}", status);
            return Err(AppError::ExternalApi(format!("storage upload: HTTP {}", status)));
        }
        Ok(self.public_url(path))
    }

    /// Leer los bytes detrás de una URL pública
    pub async fn fetch(&self, url: &str) -> AppResult<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Self::wrap("fetch", e))?;

        let status = response.status();
        if !status.is_success() {
            log::error!("storage fetch returned HTTP {}", status);
            return Err(AppError::ExternalApi(format!("storage fetch: HTTP {}", status)));
        }
        response
            .bytes()
            .await
            .map(|b| b.to_vec())
            .map_err(|e| Self::wrap("fetch", e))
    }
}
