//! Schema de validación del formulario de camiones
//!
//! La validación junta todos los errores de campo y, si no hay ninguno,
//! entrega el field-bag normalizado listo para persistir. La cota de los
//! numéricos de capacidad se afirma en un solo paso.

use serde::Deserialize;
use serde_json::json;
use validator::{Validate, ValidationError, ValidationErrors};

use super::{parse_date_input, NumericInput};
use crate::store::FieldBag;
use crate::utils::validation::{
    validate_capacity, validate_non_negative, validate_one_of, validate_seats, OWNERSHIP_KINDS,
};

/// Cotas por campo de los numéricos de capacidad
pub const ENGINE_CAPACITY_MAX: f64 = 20_000.0;
pub const FUEL_CAPACITY_MAX: f64 = 1_000.0;
pub const MAX_LOAD_WEIGHT_MAX: f64 = 100_000.0;

fn default_ownership() -> String {
    "own".to_string()
}

fn default_status() -> String {
    "active".to_string()
}

/// Asientos: string opcional; vacío cuenta como ausente
fn validate_seats_input(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Ok(());
    }
    validate_seats(value)
}

/// Sub-formulario de seguro
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsuranceInput {
    #[serde(default)]
    pub policy_id: String,
    #[serde(default)]
    pub policy_number: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub coverage_type: String,
    pub premium: Option<NumericInput>,
    pub start_date: Option<String>,
    pub expiry_date: Option<String>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub documents: Vec<String>,
}

impl InsuranceInput {
    fn normalized(&self, errors: &mut ValidationErrors) -> serde_json::Value {
        let premium = match self.premium.as_ref().map(NumericInput::normalized) {
            None => None,
            Some(Ok(value)) => {
                if let Some(v) = value {
                    if let Err(e) = validate_non_negative(v) {
                        errors.add("insurance.premium", e);
                    }
                }
                value
            }
            Some(Err(e)) => {
                errors.add("insurance.premium", e);
                None
            }
        };

        let start_date = normalized_date(errors, "insurance.start_date", self.start_date.as_deref());
        let expiry_date = normalized_date(errors, "insurance.expiry_date", self.expiry_date.as_deref());

        json!({
            "policyId": self.policy_id,
            "policyNumber": self.policy_number,
            "company": self.company,
            "coverageType": self.coverage_type,
            "premium": premium,
            "startDate": start_date,
            "expiryDate": expiry_date,
            "notes": self.notes,
            "documents": self.documents,
        })
    }
}

fn normalized_date(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: Option<&str>,
) -> Option<String> {
    let value = value?.trim();
    if value.is_empty() {
        return None;
    }
    match parse_date_input(value) {
        Ok(dt) => Some(dt.to_rfc3339()),
        Err(e) => {
            errors.add(field, e);
            None
        }
    }
}

/// Cota única: normaliza la entrada y valida no-negativo + máximo una vez
fn bounded_capacity(
    errors: &mut ValidationErrors,
    field: &'static str,
    input: &Option<NumericInput>,
    max: f64,
) -> Option<f64> {
    let input = input.as_ref()?;
    match input.normalized() {
        Err(e) => {
            errors.add(field, e);
            None
        }
        Ok(None) => None,
        Ok(Some(value)) => match validate_capacity(field, value, max) {
            Ok(()) => Some(value),
            Err(e) => {
                errors.add(field, e);
                None
            }
        },
    }
}

/// Request para registrar un camión
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTruckRequest {
    #[serde(default = "default_ownership")]
    pub ownership: String,

    pub subcontractor_id: Option<String>,

    #[validate(custom = "crate::utils::validation::validate_license_plate")]
    pub license_plate: String,

    #[serde(default)]
    pub province: String,

    #[validate(custom = "crate::utils::validation::validate_vin")]
    pub vin: String,

    #[validate(custom = "crate::utils::validation::validate_engine_number")]
    pub engine_number: String,

    #[serde(default = "default_status")]
    #[validate(custom = "crate::utils::validation::validate_truck_status")]
    pub status: String,

    #[serde(default)]
    pub brand: String,

    #[serde(default)]
    pub model: String,

    #[validate(custom = "crate::utils::validation::validate_year")]
    pub year: String,

    #[serde(default)]
    pub color: String,

    #[serde(default)]
    pub truck_type: String,

    #[validate(custom = "validate_seats_input")]
    pub seats: Option<String>,

    pub engine_capacity: Option<NumericInput>,
    pub fuel_capacity: Option<NumericInput>,
    pub max_load_weight: Option<NumericInput>,

    #[serde(default)]
    pub photo_front_url: String,
    #[serde(default)]
    pub photo_back_url: String,
    #[serde(default)]
    pub photo_left_url: String,
    #[serde(default)]
    pub photo_right_url: String,

    #[serde(default)]
    pub registration_doc_url: String,
    #[serde(default)]
    pub insurance_doc_url: String,

    #[serde(default)]
    pub photos: Vec<String>,

    pub insurance: Option<InsuranceInput>,
}

impl CreateTruckRequest {
    /// Validar todo el formulario y producir el field-bag listo para el almacén
    pub fn validated_fields(&self, created_by: &str) -> Result<FieldBag, ValidationErrors> {
        let mut errors = match self.validate() {
            Ok(()) => ValidationErrors::new(),
            Err(e) => e,
        };

        if let Err(e) = validate_one_of("ownership", &self.ownership, &OWNERSHIP_KINDS) {
            errors.add("ownership", e);
        }
        if self.ownership == "subcontractor"
            && self
                .subcontractor_id
                .as_deref()
                .map(str::trim)
                .unwrap_or_default()
                .is_empty()
        {
            let mut error = ValidationError::new("required");
            error.message = Some("Subcontractor is required for subcontractor-owned trucks".into());
            errors.add("subcontractor_id", error);
        }

        let engine_capacity =
            bounded_capacity(&mut errors, "engine_capacity", &self.engine_capacity, ENGINE_CAPACITY_MAX);
        let fuel_capacity =
            bounded_capacity(&mut errors, "fuel_capacity", &self.fuel_capacity, FUEL_CAPACITY_MAX);
        let max_load_weight =
            bounded_capacity(&mut errors, "max_load_weight", &self.max_load_weight, MAX_LOAD_WEIGHT_MAX);

        let insurance = self
            .insurance
            .as_ref()
            .map(|input| input.normalized(&mut errors));

        if !errors.is_empty() {
            return Err(errors);
        }

        let mut fields = FieldBag::new();
        fields.insert("ownership".into(), json!(self.ownership));
        fields.insert(
            "subcontractorId".into(),
            json!(self.subcontractor_id.as_deref().unwrap_or_default()),
        );
        fields.insert("licensePlate".into(), json!(self.license_plate));
        fields.insert("province".into(), json!(self.province));
        fields.insert("vin".into(), json!(self.vin));
        fields.insert("engineNumber".into(), json!(self.engine_number));
        fields.insert("status".into(), json!(self.status));
        fields.insert("brand".into(), json!(self.brand));
        fields.insert("model".into(), json!(self.model));
        fields.insert("year".into(), json!(self.year));
        fields.insert("color".into(), json!(self.color));
        fields.insert("truckType".into(), json!(self.truck_type));
        fields.insert("seats".into(), json!(self.seats.as_deref().unwrap_or_default()));
        fields.insert("engineCapacity".into(), json!(engine_capacity));
        fields.insert("fuelCapacity".into(), json!(fuel_capacity));
        fields.insert("maxLoadWeight".into(), json!(max_load_weight));
        fields.insert("photoFrontUrl".into(), json!(self.photo_front_url));
        fields.insert("photoBackUrl".into(), json!(self.photo_back_url));
        fields.insert("photoLeftUrl".into(), json!(self.photo_left_url));
        fields.insert("photoRightUrl".into(), json!(self.photo_right_url));
        fields.insert("registrationDocUrl".into(), json!(self.registration_doc_url));
        fields.insert("insuranceDocUrl".into(), json!(self.insurance_doc_url));
        fields.insert("photos".into(), json!(self.photos));
        if let Some(insurance) = insurance {
            fields.insert("insurance".into(), insurance);
        }
        fields.insert("createdBy".into(), json!(created_by));
        Ok(fields)
    }
}

/// Request para editar un camión: merge parcial, solo los campos presentes
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTruckRequest {
    pub ownership: Option<String>,
    pub subcontractor_id: Option<String>,

    #[validate(custom = "crate::utils::validation::validate_license_plate")]
    pub license_plate: Option<String>,

    pub province: Option<String>,

    #[validate(custom = "crate::utils::validation::validate_vin")]
    pub vin: Option<String>,

    #[validate(custom = "crate::utils::validation::validate_engine_number")]
    pub engine_number: Option<String>,

    #[validate(custom = "crate::utils::validation::validate_truck_status")]
    pub status: Option<String>,

    pub brand: Option<String>,
    pub model: Option<String>,

    #[validate(custom = "crate::utils::validation::validate_year")]
    pub year: Option<String>,

    pub color: Option<String>,
    pub truck_type: Option<String>,

    #[validate(custom = "validate_seats_input")]
    pub seats: Option<String>,

    pub engine_capacity: Option<NumericInput>,
    pub fuel_capacity: Option<NumericInput>,
    pub max_load_weight: Option<NumericInput>,

    pub photo_front_url: Option<String>,
    pub photo_back_url: Option<String>,
    pub photo_left_url: Option<String>,
    pub photo_right_url: Option<String>,

    pub registration_doc_url: Option<String>,
    pub insurance_doc_url: Option<String>,

    pub photos: Option<Vec<String>>,

    pub insurance: Option<InsuranceInput>,
}

impl UpdateTruckRequest {
    pub fn validated_fields(&self) -> Result<FieldBag, ValidationErrors> {
        let mut errors = match self.validate() {
            Ok(()) => ValidationErrors::new(),
            Err(e) => e,
        };

        if let Some(ownership) = self.ownership.as_deref() {
            if let Err(e) = validate_one_of("ownership", ownership, &OWNERSHIP_KINDS) {
                errors.add("ownership", e);
            }
            if ownership == "subcontractor"
                && self
                    .subcontractor_id
                    .as_deref()
                    .map(str::trim)
                    .unwrap_or_default()
                    .is_empty()
            {
                let mut error = ValidationError::new("required");
                error.message =
                    Some("Subcontractor is required for subcontractor-owned trucks".into());
                errors.add("subcontractor_id", error);
            }
        }

        let engine_capacity =
            bounded_capacity(&mut errors, "engine_capacity", &self.engine_capacity, ENGINE_CAPACITY_MAX);
        let fuel_capacity =
            bounded_capacity(&mut errors, "fuel_capacity", &self.fuel_capacity, FUEL_CAPACITY_MAX);
        let max_load_weight =
            bounded_capacity(&mut errors, "max_load_weight", &self.max_load_weight, MAX_LOAD_WEIGHT_MAX);

        let insurance = self
            .insurance
            .as_ref()
            .map(|input| input.normalized(&mut errors));

        if !errors.is_empty() {
            return Err(errors);
        }

        let mut fields = FieldBag::new();
        if let Some(v) = &self.ownership {
            fields.insert("ownership".into(), json!(v));
        }
        if let Some(v) = &self.subcontractor_id {
            fields.insert("subcontractorId".into(), json!(v));
        }
        if let Some(v) = &self.license_plate {
            fields.insert("licensePlate".into(), json!(v));
        }
        if let Some(v) = &self.province {
            fields.insert("province".into(), json!(v));
        }
        if let Some(v) = &self.vin {
            fields.insert("vin".into(), json!(v));
        }
        if let Some(v) = &self.engine_number {
            fields.insert("engineNumber".into(), json!(v));
        }
        if let Some(v) = &self.status {
            fields.insert("status".into(), json!(v));
        }
        if let Some(v) = &self.brand {
            fields.insert("brand".into(), json!(v));
        }
        if let Some(v) = &self.model {
            fields.insert("model".into(), json!(v));
        }
        if let Some(v) = &self.year {
            fields.insert("year".into(), json!(v));
        }
        if let Some(v) = &self.color {
            fields.insert("color".into(), json!(v));
        }
        if let Some(v) = &self.truck_type {
            fields.insert("truckType".into(), json!(v));
        }
        if let Some(v) = &self.seats {
            fields.insert("seats".into(), json!(v));
        }
        if self.engine_capacity.is_some() {
            fields.insert("engineCapacity".into(), json!(engine_capacity));
        }
        if self.fuel_capacity.is_some() {
            fields.insert("fuelCapacity".into(), json!(fuel_capacity));
        }
        if self.max_load_weight.is_some() {
            fields.insert("maxLoadWeight".into(), json!(max_load_weight));
        }
        if let Some(v) = &self.photo_front_url {
            fields.insert("photoFrontUrl".into(), json!(v));
        }
        if let Some(v) = &self.photo_back_url {
            fields.insert("photoBackUrl".into(), json!(v));
        }
        if let Some(v) = &self.photo_left_url {
            fields.insert("photoLeftUrl".into(), json!(v));
        }
        if let Some(v) = &self.photo_right_url {
            fields.insert("photoRightUrl".into(), json!(v));
        }
        if let Some(v) = &self.registration_doc_url {
            fields.insert("registrationDocUrl".into(), json!(v));
        }
        if let Some(v) = &self.insurance_doc_url {
            fields.insert("insuranceDocUrl".into(), json!(v));
        }
        if let Some(v) = &self.photos {
            fields.insert("photos".into(), json!(v));
        }
        if let Some(insurance) = insurance {
            fields.insert("insurance".into(), insurance);
        }
        Ok(fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_request() -> CreateTruckRequest {
        serde_json::from_value(json!({
            "licensePlate": "กก-1234",
            "province": "Bangkok",
            "vin": "MP1TFR86JGT000123",
            "engineNumber": "4JJ1E12345",
            "year": "2021",
            "brand": "Isuzu",
            "model": "FRR90",
            "status": "active"
        }))
        .unwrap()
    }

    #[test]
    fn test_valid_request_produces_normalized_fields() {
        let fields = valid_request().validated_fields("u1").unwrap();
        assert_eq!(fields.get("licensePlate"), Some(&json!("กก-1234")));
        assert_eq!(fields.get("ownership"), Some(&json!("own")));
        assert_eq!(fields.get("seats"), Some(&json!("")));
        assert_eq!(fields.get("engineCapacity"), Some(&json!(null)));
        assert_eq!(fields.get("photos"), Some(&json!([])));
        assert_eq!(fields.get("createdBy"), Some(&json!("u1")));
    }

    #[test]
    fn test_errors_are_collected_not_short_circuited() {
        let request: CreateTruckRequest = serde_json::from_value(json!({
            "licensePlate": "abc-1234",
            "vin": "SHORT",
            "engineNumber": "12",
            "year": "20",
            "status": "bogus",
            "seats": "99"
        }))
        .unwrap();

        let errors = request.validated_fields("u1").unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("license_plate"));
        assert!(fields.contains_key("vin"));
        assert!(fields.contains_key("engine_number"));
        assert!(fields.contains_key("year"));
        assert!(fields.contains_key("status"));
        assert!(fields.contains_key("seats"));
    }

    #[test]
    fn test_capacity_accepts_string_or_number() {
        let mut request = valid_request();
        request.engine_capacity = Some(NumericInput::Text("5193".into()));
        request.fuel_capacity = Some(NumericInput::Number(200.0));
        request.max_load_weight = Some(NumericInput::Text("".into()));

        let fields = request.validated_fields("u1").unwrap();
        assert_eq!(fields.get("engineCapacity"), Some(&json!(5193.0)));
        assert_eq!(fields.get("fuelCapacity"), Some(&json!(200.0)));
        assert_eq!(fields.get("maxLoadWeight"), Some(&json!(null)));
    }

    #[test]
    fn test_capacity_bounds_are_enforced_once() {
        let mut request = valid_request();
        request.fuel_capacity = Some(NumericInput::Number(1001.0));
        let errors = request.validated_fields("u1").unwrap_err();
        let fuel_errors = &errors.field_errors()["fuel_capacity"];
        assert_eq!(fuel_errors.len(), 1);

        let mut request = valid_request();
        request.fuel_capacity = Some(NumericInput::Number(-3.0));
        assert!(request.validated_fields("u1").is_err());
    }

    #[test]
    fn test_subcontractor_ownership_requires_reference() {
        let mut request = valid_request();
        request.ownership = "subcontractor".to_string();
        let errors = request.validated_fields("u1").unwrap_err();
        assert!(errors.field_errors().contains_key("subcontractor_id"));

        request.subcontractor_id = Some("s1".to_string());
        assert!(request.validated_fields("u1").is_ok());
    }

    #[test]
    fn test_insurance_dates_are_normalized() {
        let mut request = valid_request();
        request.insurance = Some(
            serde_json::from_value(json!({
                "policyNumber": "123/2567",
                "company": "Viriyah",
                "premium": "18500.5",
                "startDate": "2024-02-01",
                "expiryDate": "2025-02-01"
            }))
            .unwrap(),
        );

        let fields = request.validated_fields("u1").unwrap();
        let insurance = fields.get("insurance").unwrap();
        assert_eq!(insurance["policyNumber"], json!("123/2567"));
        assert_eq!(insurance["premium"], json!(18500.5));
        assert!(insurance["startDate"].as_str().unwrap().starts_with("2024-02-01"));
    }

    #[test]
    fn test_update_only_emits_present_fields() {
        let request: UpdateTruckRequest = serde_json::from_value(json!({
            "status": "sold",
            "fuelCapacity": 180
        }))
        .unwrap();

        let fields = request.validated_fields().unwrap();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields.get("status"), Some(&json!("sold")));
        assert_eq!(fields.get("fuelCapacity"), Some(&json!(180.0)));
    }
}
