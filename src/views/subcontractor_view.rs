//! Vista de lista de subcontratistas

use super::{ListRecord, SortValue};
use crate::models::subcontractor::Subcontractor;

impl ListRecord for Subcontractor {
    fn search_fields(&self) -> Vec<&str> {
        vec![&self.name, &self.contact_person, &self.phone, &self.email]
    }

    fn sort_value(&self, key: &str) -> SortValue {
        match key {
            "name" => SortValue::Text(self.name.clone()),
            "contactPerson" => SortValue::Text(self.contact_person.clone()),
            "phone" => SortValue::Text(self.phone.clone()),
            "email" => SortValue::Text(self.email.clone()),
            "type" => SortValue::Text(self.subcontractor_type.clone()),
            "status" => SortValue::Text(self.status.clone()),
            "createdAt" => self
                .created_at
                .map(|dt| SortValue::Number(dt.timestamp_millis() as f64))
                .unwrap_or(SortValue::Missing),
            _ => SortValue::Missing,
        }
    }
}
