//! Modelo de Waitlist

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::str_field;
use crate::store::timestamp::timestamp_field;
use crate::store::FieldBag;
use crate::utils::errors::AppResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaitlistEntry {
    pub id: String,
    pub email: String,
    pub created_at: Option<DateTime<Utc>>,
}

impl WaitlistEntry {
    pub fn from_document(id: &str, fields: &FieldBag) -> AppResult<Self> {
        Ok(Self {
            id: id.to_string(),
            email: str_field(fields, "email"),
            created_at: timestamp_field(fields, "createdAt")?,
        })
    }
}
