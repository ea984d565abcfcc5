//! Vista de la lista de espera

use super::{ListRecord, SortValue};
use crate::models::waitlist::WaitlistEntry;

impl ListRecord for WaitlistEntry {
    fn search_fields(&self) -> Vec<&str> {
        vec![&self.email]
    }

    fn sort_value(&self, key: &str) -> SortValue {
        match key {
            "email" => SortValue::Text(self.email.clone()),
            "createdAt" => self
                .created_at
                .map(|dt| SortValue::Number(dt.timestamp_millis() as f64))
                .unwrap_or(SortValue::Missing),
            _ => SortValue::Missing,
        }
    }
}
