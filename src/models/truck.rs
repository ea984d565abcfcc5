//! Modelo de Truck
//!
//! Record tipado del camión y su mapper desde el field-bag del almacén.
//! Los camiones nunca se eliminan: se archivan cambiando `status`.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{list_field, opt_decimal_field, opt_f64_field, str_field, str_field_or};
use crate::store::timestamp::timestamp_field;
use crate::store::FieldBag;
use crate::utils::errors::AppResult;

/// Sub-record de póliza de seguro del camión
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Insurance {
    pub policy_id: String,
    pub policy_number: String,
    pub company: String,
    pub coverage_type: String,
    pub premium: Option<Decimal>,
    pub start_date: Option<DateTime<Utc>>,
    pub expiry_date: Option<DateTime<Utc>>,
    pub notes: String,
    pub documents: Vec<String>,
}

impl Insurance {
    fn from_fields(fields: &FieldBag) -> AppResult<Self> {
        Ok(Self {
            policy_id: str_field(fields, "policyId"),
            policy_number: str_field(fields, "policyNumber"),
            company: str_field(fields, "company"),
            coverage_type: str_field(fields, "coverageType"),
            premium: opt_decimal_field(fields, "premium"),
            start_date: timestamp_field(fields, "startDate")?,
            expiry_date: timestamp_field(fields, "expiryDate")?,
            notes: str_field(fields, "notes"),
            documents: list_field(fields, "documents"),
        })
    }

    fn empty() -> Self {
        Self {
            policy_id: String::new(),
            policy_number: String::new(),
            company: String::new(),
            coverage_type: String::new(),
            premium: None,
            start_date: None,
            expiry_date: None,
            notes: String::new(),
            documents: Vec::new(),
        }
    }
}

/// Truck completo tal como lo consumen las pantallas de flota
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Truck {
    pub id: String,
    /// "own" o "subcontractor"
    pub ownership: String,
    /// Referencia débil al subcontratista; sin cascada
    pub subcontractor_id: String,
    pub license_plate: String,
    pub province: String,
    pub vin: String,
    pub engine_number: String,
    pub status: String,
    pub brand: String,
    pub model: String,
    pub year: String,
    pub color: String,
    pub truck_type: String,
    pub seats: String,
    pub engine_capacity: Option<f64>,
    pub fuel_capacity: Option<f64>,
    pub max_load_weight: Option<f64>,
    pub photo_front_url: String,
    pub photo_back_url: String,
    pub photo_left_url: String,
    pub photo_right_url: String,
    pub registration_doc_url: String,
    pub insurance_doc_url: String,
    /// Lista genérica de fotos, legado de los primeros formularios
    pub photos: Vec<String>,
    pub insurance: Insurance,
    pub created_by: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Truck {
    /// Mapper: field-bag crudo + id -> record con defaults aplicados.
    /// Nunca falla por campos ausentes; el único camino de error es un
    /// timestamp en forma no reconocida.
    pub fn from_document(id: &str, fields: &FieldBag) -> AppResult<Self> {
        let insurance = match fields.get("insurance").and_then(serde_json::Value::as_object) {
            Some(nested) => Insurance::from_fields(nested)?,
            None => Insurance::empty(),
        };

        Ok(Self {
            id: id.to_string(),
            ownership: str_field_or(fields, "ownership", "own"),
            subcontractor_id: str_field(fields, "subcontractorId"),
            license_plate: str_field(fields, "licensePlate"),
            province: str_field(fields, "province"),
            vin: str_field(fields, "vin"),
            engine_number: str_field(fields, "engineNumber"),
            status: str_field_or(fields, "status", "active"),
            brand: str_field(fields, "brand"),
            model: str_field(fields, "model"),
            year: str_field(fields, "year"),
            color: str_field(fields, "color"),
            truck_type: str_field(fields, "truckType"),
            seats: str_field(fields, "seats"),
            engine_capacity: opt_f64_field(fields, "engineCapacity"),
            fuel_capacity: opt_f64_field(fields, "fuelCapacity"),
            max_load_weight: opt_f64_field(fields, "maxLoadWeight"),
            photo_front_url: str_field(fields, "photoFrontUrl"),
            photo_back_url: str_field(fields, "photoBackUrl"),
            photo_left_url: str_field(fields, "photoLeftUrl"),
            photo_right_url: str_field(fields, "photoRightUrl"),
            registration_doc_url: str_field(fields, "registrationDocUrl"),
            insurance_doc_url: str_field(fields, "insuranceDocUrl"),
            photos: list_field(fields, "photos"),
            insurance,
            created_by: str_field(fields, "createdBy"),
            created_at: timestamp_field(fields, "createdAt")?,
            updated_at: timestamp_field(fields, "updatedAt")?,
        })
    }

    pub fn is_subcontractor_owned(&self) -> bool {
        self.ownership == "subcontractor"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_field_bag_gets_full_defaults() {
        let truck = Truck::from_document("t1", &FieldBag::new()).unwrap();

        assert_eq!(truck.id, "t1");
        assert_eq!(truck.ownership, "own");
        assert_eq!(truck.status, "active");
        assert_eq!(truck.license_plate, "");
        assert_eq!(truck.subcontractor_id, "");
        assert_eq!(truck.year, "");
        assert_eq!(truck.seats, "");
        assert_eq!(truck.engine_capacity, None);
        assert_eq!(truck.fuel_capacity, None);
        assert_eq!(truck.max_load_weight, None);
        assert_eq!(truck.photos, Vec::<String>::new());
        assert_eq!(truck.insurance.documents, Vec::<String>::new());
        assert_eq!(truck.insurance.premium, None);
        assert_eq!(truck.created_at, None);
        assert_eq!(truck.updated_at, None);
    }

    #[test]
    fn test_corrupt_status_passes_through_unchanged() {
        let mut fields = FieldBag::new();
        fields.insert("status".to_string(), json!("bogus"));
        let truck = Truck::from_document("t1", &fields).unwrap();
        // solo la ausencia se defaultea, no los valores inválidos ya presentes
        assert_eq!(truck.status, "bogus");
    }

    #[test]
    fn test_full_field_bag_maps_every_field() {
        let fields: FieldBag = json!({
            "ownership": "subcontractor",
            "subcontractorId": "s9",
            "licensePlate": "กก-1234",
            "province": "Bangkok",
            "vin": "MP1TFR86JGT000123",
            "engineNumber": "4JJ1E12345",
            "status": "maintenance",
            "brand": "Isuzu",
            "model": "FRR90",
            "year": "2021",
            "color": "white",
            "truckType": "box",
            "seats": "3",
            "engineCapacity": 5193.0,
            "fuelCapacity": 200.0,
            "maxLoadWeight": 9500.0,
            "photoFrontUrl": "https://cdn/front.jpg",
            "photoBackUrl": "https://cdn/back.jpg",
            "photoLeftUrl": "https://cdn/left.jpg",
            "photoRightUrl": "https://cdn/right.jpg",
            "registrationDocUrl": "https://cdn/reg.pdf",
            "insuranceDocUrl": "https://cdn/ins.pdf",
            "photos": ["https://cdn/old1.jpg"],
            "insurance": {
                "policyId": "P-01",
                "policyNumber": "123/2567",
                "company": "Viriyah",
                "coverageType": "class1",
                "premium": 18500.50,
                "notes": "renovada",
                "documents": ["https://cdn/policy.pdf"]
            },
            "createdBy": "u1",
            "createdAt": {"seconds": 1706745600, "nanoseconds": 0},
            "updatedAt": "2024-02-01T10:00:00+00:00"
        })
        .as_object()
        .unwrap()
        .clone();

        let truck = Truck::from_document("t2", &fields).unwrap();
        assert!(truck.is_subcontractor_owned());
        assert_eq!(truck.subcontractor_id, "s9");
        assert_eq!(truck.brand, "Isuzu");
        assert_eq!(truck.seats, "3");
        assert_eq!(truck.engine_capacity, Some(5193.0));
        assert_eq!(truck.insurance.company, "Viriyah");
        assert_eq!(truck.insurance.documents.len(), 1);
        assert!(truck.created_at.is_some());
        assert!(truck.updated_at.is_some());
    }

    #[test]
    fn test_malformed_timestamp_is_an_error() {
        let mut fields = FieldBag::new();
        fields.insert("createdAt".to_string(), json!({"weird": true}));
        assert!(Truck::from_document("t1", &fields).is_err());
    }
}
