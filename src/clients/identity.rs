//! Cliente del proveedor de identidad
//!
//! Las cuentas y sus claims viven en el proveedor; este cliente expone las
//! llamadas privilegiadas (listar, crear, fijar claims de rol) como RPC
//! opacas. Un cambio de claim recién se ve en el cliente cuando el token
//! se refresca; eso es contrato del proveedor, no de este módulo.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::utils::errors::{AppError, AppResult};

/// Cuenta tal como la devuelve el proveedor
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderAccount {
    pub uid: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub photo_url: String,
    #[serde(default = "default_role")]
    pub role: String,
    #[serde(default)]
    pub admin: bool,
    #[serde(default)]
    pub providers: Vec<String>,
    pub creation_time: Option<DateTime<Utc>>,
    pub last_sign_in_time: Option<DateTime<Utc>>,
}

fn default_role() -> String {
    "user".to_string()
}

/// Operaciones privilegiadas contra el proveedor de identidad
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn list_accounts(&self) -> AppResult<Vec<ProviderAccount>>;

    async fn create_account(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> AppResult<ProviderAccount>;

    /// Fijar el claim de rol de una cuenta; `admin` debe derivarse del rol
    async fn set_role_claims(&self, uid: &str, role: &str, admin: bool) -> AppResult<()>;
}

/// Cliente HTTP contra el servicio de administración del proveedor
pub struct HttpIdentityProvider {
    client: Client,
    base_url: String,
    api_key: String,
}

impl HttpIdentityProvider {
    pub fn new(base_url: String, api_key: String) -> Self {
        Self {
            client: Client::new(),
            base_url,
            api_key,
        }
    }

    fn wrap(operation: &str, e: reqwest::Error) -> AppError {
        log::error!("identity provider {} failed: {}", operation, e);
        AppError::ExternalApi(format!("identity provider {}: {}", operation, e))
    }

    fn check_status(operation: &str, response: reqwest::Response) -> AppResult<reqwest::Response> {
        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            log::warn!("identity provider {} rejected: {}", operation, status);
            return Err(AppError::Forbidden(
                "The identity provider rejected the privileged call".to_string(),
            ));
        }
        if !status.is_success() {
            log::error!("identity provider {} returned HTTP {}", operation, status);
            return Err(AppError::ExternalApi(format!(
                "identity provider {}: HTTP {}",
                operation, status
            )));
        }
        Ok(response)
    }
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    async fn list_accounts(&self) -> AppResult<Vec<ProviderAccount>> {
        let response = self
            .client
            .get(format!("{}/accounts", self.base_url))
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| Self::wrap("list_accounts", e))?;

        Self::check_status("list_accounts", response)?
            .json()
            .await
            .map_err(|e| Self::wrap("list_accounts", e))
    }

    async fn create_account(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> AppResult<ProviderAccount> {
        let response = self
            .client
            .post(format!("{}/accounts", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&json!({
                "email": email,
                "password": password,
                "displayName": display_name,
            }))
            .send()
            .await
            .map_err(|e| Self::wrap("create_account", e))?;

        Self::check_status("create_account", response)?
            .json()
            .await
            .map_err(|e| Self::wrap("create_account", e))
    }

    async fn set_role_claims(&self, uid: &str, role: &str, admin: bool) -> AppResult<()> {
        let response = self
            .client
            .put(format!("{}/accounts/{}/claims", self.base_url, uid))
            .bearer_auth(&self.api_key)
            .json(&json!({ "role": role, "admin": admin }))
            .send()
            .await
            .map_err(|e| Self::wrap("set_role_claims", e))?;

        Self::check_status("set_role_claims", response)?;
        Ok(())
    }
}
