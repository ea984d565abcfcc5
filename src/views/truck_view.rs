//! Vista de lista de camiones
//!
//! Única entidad con partición por propiedad, aplicada antes de la
//! búsqueda: own excluye los camiones de subcontratista, subcontractor
//! deja solo esos, all no filtra.

use super::{apply, ListQuery, ListRecord, SortValue};
use crate::models::truck::Truck;

/// Selector de vista de la pantalla de camiones
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TruckPartition {
    Own,
    Subcontractor,
    All,
}

impl TruckPartition {
    /// Un valor desconocido o ausente cae en `All` (sin filtro)
    pub fn from_param(value: Option<&str>) -> Self {
        match value {
            Some("own") => TruckPartition::Own,
            Some("subcontractor") => TruckPartition::Subcontractor,
            _ => TruckPartition::All,
        }
    }

    pub fn matches(self, truck: &Truck) -> bool {
        match self {
            TruckPartition::Own => !truck.is_subcontractor_owned(),
            TruckPartition::Subcontractor => truck.is_subcontractor_owned(),
            TruckPartition::All => true,
        }
    }
}

impl ListRecord for Truck {
    fn search_fields(&self) -> Vec<&str> {
        vec![
            &self.license_plate,
            &self.brand,
            &self.model,
            &self.province,
        ]
    }

    fn sort_value(&self, key: &str) -> SortValue {
        match key {
            "licensePlate" => SortValue::Text(self.license_plate.clone()),
            "brand" => SortValue::Text(self.brand.clone()),
            "model" => SortValue::Text(self.model.clone()),
            "province" => SortValue::Text(self.province.clone()),
            "status" => SortValue::Text(self.status.clone()),
            "year" => SortValue::Text(self.year.clone()),
            "engineCapacity" => self
                .engine_capacity
                .map(SortValue::Number)
                .unwrap_or(SortValue::Missing),
            "fuelCapacity" => self
                .fuel_capacity
                .map(SortValue::Number)
                .unwrap_or(SortValue::Missing),
            "maxLoadWeight" => self
                .max_load_weight
                .map(SortValue::Number)
                .unwrap_or(SortValue::Missing),
            "createdAt" => self
                .created_at
                .map(|dt| SortValue::Number(dt.timestamp_millis() as f64))
                .unwrap_or(SortValue::Missing),
            _ => SortValue::Missing,
        }
    }
}

/// Composición completa de la pantalla: partición -> búsqueda -> orden
pub fn compose(trucks: Vec<Truck>, query: &ListQuery) -> Vec<Truck> {
    let partition = TruckPartition::from_param(query.view.as_deref());
    let partitioned = trucks
        .into_iter()
        .filter(|truck| partition.matches(truck))
        .collect();
    apply(partitioned, query)
}
