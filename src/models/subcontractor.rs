//! Modelo de Subcontractor
//!
//! Individuos o empresas que aportan camiones a la flota. El campo de
//! identificación activo depende del tipo: cédula nacional para
//! individuos, NIT para empresas.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{list_field, str_field, str_field_or};
use crate::store::timestamp::timestamp_field;
use crate::store::FieldBag;
use crate::utils::errors::AppResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subcontractor {
    pub id: String,
    /// "individual" o "company"
    #[serde(rename = "type")]
    pub subcontractor_type: String,
    pub name: String,
    pub contact_person: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub id_card_number: String,
    pub tax_id: String,
    pub status: String,
    pub documents: Vec<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Subcontractor {
    pub fn from_document(id: &str, fields: &FieldBag) -> AppResult<Self> {
        Ok(Self {
            id: id.to_string(),
            subcontractor_type: str_field_or(fields, "type", "individual"),
            name: str_field(fields, "name"),
            contact_person: str_field(fields, "contactPerson"),
            phone: str_field(fields, "phone"),
            email: str_field(fields, "email"),
            address: str_field(fields, "address"),
            id_card_number: str_field(fields, "idCardNumber"),
            tax_id: str_field(fields, "taxId"),
            status: str_field_or(fields, "status", "active"),
            documents: list_field(fields, "documents"),
            created_at: timestamp_field(fields, "createdAt")?,
            updated_at: timestamp_field(fields, "updatedAt")?,
        })
    }
}
