//! Modelo de User
//!
//! Espejo en el almacén de las cuentas del proveedor de identidad. El rol
//! vive duplicado: claim `admin`/`role` en el proveedor y campos en el
//! documento; todo escritor debe mantener ambos consistentes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{bool_field, list_field, str_field, str_field_or};
use crate::store::timestamp::timestamp_field;
use crate::store::FieldBag;
use crate::utils::errors::AppResult;

/// El boolean admin se deriva siempre del rol, nunca se setea suelto
pub fn role_is_admin(role: &str) -> bool {
    role == "admin"
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub uid: String,
    pub email: String,
    pub display_name: String,
    pub photo_url: String,
    pub role: String,
    pub admin: bool,
    pub providers: Vec<String>,
    pub creation_time: Option<DateTime<Utc>>,
    pub last_sign_in_time: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn from_document(uid: &str, fields: &FieldBag) -> AppResult<Self> {
        Ok(Self {
            uid: uid.to_string(),
            email: str_field(fields, "email"),
            display_name: str_field(fields, "displayName"),
            photo_url: str_field(fields, "photoUrl"),
            role: str_field_or(fields, "role", "user"),
            admin: bool_field(fields, "admin"),
            providers: list_field(fields, "providers"),
            creation_time: timestamp_field(fields, "creationTime")?,
            last_sign_in_time: timestamp_field(fields, "lastSignInTime")?,
            updated_at: timestamp_field(fields, "updatedAt")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_field_bag_gets_full_defaults() {
        let user = User::from_document("u1", &FieldBag::new()).unwrap();
        assert_eq!(user.uid, "u1");
        assert_eq!(user.role, "user");
        assert!(!user.admin);
        assert_eq!(user.email, "");
        assert_eq!(user.providers, Vec::<String>::new());
        assert_eq!(user.creation_time, None);
    }

    #[test]
    fn test_role_is_admin_only_for_admin() {
        assert!(role_is_admin("admin"));
        assert!(!role_is_admin("partner"));
        assert!(!role_is_admin("user"));
        assert!(!role_is_admin(""));
    }

    #[test]
    fn test_maps_provider_mirror_fields() {
        let fields: FieldBag = json!({
            "email": "ops@fleet.co.th",
            "displayName": "Ops",
            "photoUrl": "https://cdn/ops.png",
            "role": "admin",
            "admin": true,
            "providers": ["password", "google.com"],
            "creationTime": {"seconds": 1700000000, "nanoseconds": 0},
            "lastSignInTime": {"millis": 1706745600123i64}
        })
        .as_object()
        .unwrap()
        .clone();

        let user = User::from_document("u2", &fields).unwrap();
        assert_eq!(user.role, "admin");
        assert!(user.admin);
        assert_eq!(user.providers.len(), 2);
        assert!(user.creation_time.is_some());
        assert!(user.last_sign_in_time.is_some());
    }
}
