//! Schema de validación del formulario de subcontratistas
//!
//! El campo de identificación exigido depende del tipo: cédula nacional
//! para individuos, NIT para empresas; ambos usan el mismo dígito
//! verificador. El campo inactivo queda opcional y sin chequear.

use serde::Deserialize;
use serde_json::json;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::store::FieldBag;
use crate::utils::validation::{
    validate_one_of, validate_thai_id, SUBCONTRACTOR_STATUSES, SUBCONTRACTOR_TYPES,
};

fn default_type() -> String {
    "individual".to_string()
}

fn default_status() -> String {
    "active".to_string()
}

/// Refinamiento condicional sobre el objeto completo: el error se cuelga
/// del campo de identificación que corresponde al tipo.
fn check_conditional_id(
    errors: &mut ValidationErrors,
    subcontractor_type: &str,
    id_card_number: Option<&str>,
    tax_id: Option<&str>,
) {
    match subcontractor_type {
        "individual" => {
            let value = id_card_number.map(str::trim).unwrap_or_default();
            if let Err(e) = validate_thai_id(value) {
                errors.add("id_card_number", e);
            }
        }
        "company" => {
            let value = tax_id.map(str::trim).unwrap_or_default();
            if let Err(e) = validate_thai_id(value) {
                errors.add("tax_id", e);
            }
        }
        // la membresía del tipo ya se reportó aparte
        _ => {}
    }
}

/// Request para registrar un subcontratista
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubcontractorRequest {
    #[serde(rename = "type", default = "default_type")]
    pub subcontractor_type: String,

    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,

    #[serde(default)]
    pub contact_person: String,

    #[validate(length(min = 1, message = "Phone is required"))]
    pub phone: String,

    #[validate(email)]
    pub email: Option<String>,

    #[serde(default)]
    pub address: String,

    pub id_card_number: Option<String>,
    pub tax_id: Option<String>,

    #[serde(default = "default_status")]
    pub status: String,

    #[serde(default)]
    pub documents: Vec<String>,
}

impl CreateSubcontractorRequest {
    pub fn validated_fields(&self) -> Result<FieldBag, ValidationErrors> {
        let mut errors = match self.validate() {
            Ok(()) => ValidationErrors::new(),
            Err(e) => e,
        };

        if let Err(e) = validate_one_of("type", &self.subcontractor_type, &SUBCONTRACTOR_TYPES) {
            errors.add("type", e);
        }
        if let Err(e) = validate_one_of("status", &self.status, &SUBCONTRACTOR_STATUSES) {
            errors.add("status", e);
        }
        check_conditional_id(
            &mut errors,
            &self.subcontractor_type,
            self.id_card_number.as_deref(),
            self.tax_id.as_deref(),
        );

        if !errors.is_empty() {
            return Err(errors);
        }

        let mut fields = FieldBag::new();
        fields.insert("type".into(), json!(self.subcontractor_type));
        fields.insert("name".into(), json!(self.name));
        fields.insert("contactPerson".into(), json!(self.contact_person));
        fields.insert("phone".into(), json!(self.phone));
        fields.insert("email".into(), json!(self.email.as_deref().unwrap_or_default()));
        fields.insert("address".into(), json!(self.address));
        fields.insert(
            "idCardNumber".into(),
            json!(self.id_card_number.as_deref().unwrap_or_default()),
        );
        fields.insert("taxId".into(), json!(self.tax_id.as_deref().unwrap_or_default()));
        fields.insert("status".into(), json!(self.status));
        fields.insert("documents".into(), json!(self.documents));
        Ok(fields)
    }
}

/// Request de edición: merge parcial; el dígito verificador se chequea
/// solo sobre los campos presentes
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSubcontractorRequest {
    #[serde(rename = "type")]
    pub subcontractor_type: Option<String>,

    pub name: Option<String>,
    pub contact_person: Option<String>,
    pub phone: Option<String>,

    #[validate(email)]
    pub email: Option<String>,

    pub address: Option<String>,

    #[validate(custom = "crate::utils::validation::validate_thai_id")]
    pub id_card_number: Option<String>,

    #[validate(custom = "crate::utils::validation::validate_thai_id")]
    pub tax_id: Option<String>,

    pub status: Option<String>,
    pub documents: Option<Vec<String>>,
}

impl UpdateSubcontractorRequest {
    pub fn validated_fields(&self) -> Result<FieldBag, ValidationErrors> {
        let mut errors = match self.validate() {
            Ok(()) => ValidationErrors::new(),
            Err(e) => e,
        };

        if let Some(t) = self.subcontractor_type.as_deref() {
            if let Err(e) = validate_one_of("type", t, &SUBCONTRACTOR_TYPES) {
                errors.add("type", e);
            }
        }
        if let Some(s) = self.status.as_deref() {
            if let Err(e) = validate_one_of("status", s, &SUBCONTRACTOR_STATUSES) {
                errors.add("status", e);
            }
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        let mut fields = FieldBag::new();
        if let Some(v) = &self.subcontractor_type {
            fields.insert("type".into(), json!(v));
        }
        if let Some(v) = &self.name {
            fields.insert("name".into(), json!(v));
        }
        if let Some(v) = &self.contact_person {
            fields.insert("contactPerson".into(), json!(v));
        }
        if let Some(v) = &self.phone {
            fields.insert("phone".into(), json!(v));
        }
        if let Some(v) = &self.email {
            fields.insert("email".into(), json!(v));
        }
        if let Some(v) = &self.address {
            fields.insert("address".into(), json!(v));
        }
        if let Some(v) = &self.id_card_number {
            fields.insert("idCardNumber".into(), json!(v));
        }
        if let Some(v) = &self.tax_id {
            fields.insert("taxId".into(), json!(v));
        }
        if let Some(v) = &self.status {
            fields.insert("status".into(), json!(v));
        }
        if let Some(v) = &self.documents {
            fields.insert("documents".into(), json!(v));
        }
        Ok(fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_id() -> String {
        // 12 dígitos + dígito verificador calculado
        let body = "110170203451";
        let sum: u32 = body
            .chars()
            .filter_map(|c| c.to_digit(10))
            .enumerate()
            .map(|(i, d)| d * (13 - i as u32))
            .sum();
        format!("{}{}", body, (11 - sum % 11) % 10)
    }

    #[test]
    fn test_individual_requires_valid_id_card() {
        let request: CreateSubcontractorRequest = serde_json::from_value(json!({
            "type": "individual",
            "name": "Somchai Transport",
            "phone": "021234567"
        }))
        .unwrap();
        let errors = request.validated_fields().unwrap_err();
        assert!(errors.field_errors().contains_key("id_card_number"));
        assert!(!errors.field_errors().contains_key("tax_id"));
    }

    #[test]
    fn test_company_requires_valid_tax_id() {
        let request: CreateSubcontractorRequest = serde_json::from_value(json!({
            "type": "company",
            "name": "Thai Freight Co",
            "phone": "021234567",
            "idCardNumber": "not-checked-here"
        }))
        .unwrap();
        let errors = request.validated_fields().unwrap_err();
        assert!(errors.field_errors().contains_key("tax_id"));
        // el campo inactivo queda sin chequear
        assert!(!errors.field_errors().contains_key("id_card_number"));
    }

    #[test]
    fn test_valid_individual_produces_fields() {
        let request: CreateSubcontractorRequest = serde_json::from_value(json!({
            "type": "individual",
            "name": "Somchai Transport",
            "contactPerson": "Somchai",
            "phone": "021234567",
            "idCardNumber": valid_id()
        }))
        .unwrap();

        let fields = request.validated_fields().unwrap();
        assert_eq!(fields.get("type"), Some(&json!("individual")));
        assert_eq!(fields.get("documents"), Some(&json!([])));
        assert_eq!(fields.get("status"), Some(&json!("active")));
        assert_eq!(fields.get("taxId"), Some(&json!("")));
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        let request: CreateSubcontractorRequest = serde_json::from_value(json!({
            "type": "cooperative",
            "name": "X",
            "phone": "1"
        }))
        .unwrap();
        let errors = request.validated_fields().unwrap_err();
        assert!(errors.field_errors().contains_key("type"));
    }

    #[test]
    fn test_update_checks_present_id_fields_only() {
        let request: UpdateSubcontractorRequest = serde_json::from_value(json!({
            "idCardNumber": "1234567890123"
        }))
        .unwrap();
        assert!(request.validated_fields().is_err());

        let request: UpdateSubcontractorRequest = serde_json::from_value(json!({
            "phone": "029999999"
        }))
        .unwrap();
        let fields = request.validated_fields().unwrap();
        assert_eq!(fields.len(), 1);
    }
}
