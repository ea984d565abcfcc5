//! DTOs de operaciones privilegiadas de usuarios

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors};

use crate::utils::validation::{validate_one_of, USER_ROLES};

/// Request para crear una cuenta en el proveedor de identidad
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[validate(email)]
    pub email: String,

    #[validate(length(min = 6, max = 100))]
    pub password: String,

    #[validate(length(min = 1, max = 100))]
    pub display_name: String,

    pub role: String,
}

impl CreateUserRequest {
    pub fn validated(&self) -> Result<(), ValidationErrors> {
        let mut errors = match self.validate() {
            Ok(()) => ValidationErrors::new(),
            Err(e) => e,
        };
        if let Err(e) = validate_one_of("role", &self.role, &USER_ROLES) {
            errors.add("role", e);
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Request para cambiar el rol de una cuenta
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateUserRoleRequest {
    pub role: String,
}

impl UpdateUserRoleRequest {
    pub fn validated(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Err(e) = validate_one_of("role", &self.role, &USER_ROLES) {
            errors.add("role", e);
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Resultado del job de reconciliación de usuarios
#[derive(Debug, Serialize)]
pub struct SyncUsersResponse {
    pub synced: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_user_role_membership() {
        let request = CreateUserRequest {
            email: "ops@fleet.co.th".into(),
            password: "secret1".into(),
            display_name: "Ops".into(),
            role: "partner".into(),
        };
        assert!(request.validated().is_ok());

        let request = CreateUserRequest {
            role: "superuser".into(),
            ..request
        };
        assert!(request.validated().is_err());
    }

    #[test]
    fn test_update_role_membership() {
        assert!(UpdateUserRoleRequest { role: "admin".into() }.validated().is_ok());
        assert!(UpdateUserRoleRequest { role: "".into() }.validated().is_err());
    }
}
