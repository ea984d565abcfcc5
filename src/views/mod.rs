//! Vistas de lista derivadas
//!
//! Composición pura de filtros sobre records ya leídos: partición, búsqueda
//! y orden, en ese orden. Sin autoridad sobre el estado persistido; los
//! endpoints de listado corren la misma composición del lado del servidor
//! con los parámetros `view`, `search`, `sort_by` y `sort_dir`.

pub mod subcontractor_view;
pub mod truck_view;
pub mod user_view;
pub mod waitlist_view;

use std::cmp::Ordering;

use serde::Deserialize;

/// Valor de un campo de orden. `Missing` compara igual a todo.
#[derive(Debug, Clone, PartialEq)]
pub enum SortValue {
    Text(String),
    Number(f64),
    Missing,
}

impl SortValue {
    /// Comparación genérica menor-que/mayor-que sobre strings y números;
    /// un campo ausente (o una mezcla de tipos) compara igual
    fn compare(&self, other: &SortValue) -> Ordering {
        match (self, other) {
            (SortValue::Text(a), SortValue::Text(b)) => a.cmp(b),
            (SortValue::Number(a), SortValue::Number(b)) => {
                a.partial_cmp(b).unwrap_or(Ordering::Equal)
            }
            _ => Ordering::Equal,
        }
    }
}

/// Dirección de orden activa
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

/// Estado de orden de una pantalla de lista: una sola clave activa con su
/// dirección. Seleccionar la misma clave otra vez invierte la dirección;
/// seleccionar otra clave arranca ascendente.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSelection {
    pub key: Option<String>,
    pub direction: SortDirection,
}

impl SortSelection {
    pub fn none() -> Self {
        Self {
            key: None,
            direction: SortDirection::Asc,
        }
    }

    pub fn toggle(&mut self, key: &str) {
        if self.key.as_deref() == Some(key) {
            self.direction = self.direction.flipped();
        } else {
            self.key = Some(key.to_string());
            self.direction = SortDirection::Asc;
        }
    }
}

/// Record que participa en una vista de lista
pub trait ListRecord {
    /// Campos fijos contra los que corre la búsqueda por substring
    fn search_fields(&self) -> Vec<&str>;

    /// Valor del campo de orden pedido; clave desconocida es `Missing`
    fn sort_value(&self, key: &str) -> SortValue;
}

/// Parámetros de lista aceptados por los endpoints
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    /// Partición de camiones: own / subcontractor / all
    pub view: Option<String>,
    pub search: Option<String>,
    pub sort_by: Option<String>,
    pub sort_dir: Option<SortDirection>,
}

/// Búsqueda case-insensitive por substring sobre los campos fijos de la
/// entidad; query vacía deja pasar todo
pub fn search<R: ListRecord>(records: Vec<R>, query: &str) -> Vec<R> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return records;
    }
    records
        .into_iter()
        .filter(|record| {
            record
                .search_fields()
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
        })
        .collect()
}

/// Orden estable por la clave activa; empates y claves ausentes conservan
/// el orden de llegada
pub fn sort<R: ListRecord>(records: &mut [R], key: &str, direction: SortDirection) {
    records.sort_by(|a, b| {
        let ordering = a.sort_value(key).compare(&b.sort_value(key));
        match direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
}

/// Búsqueda + orden según los parámetros; la partición (solo camiones) se
/// aplica antes de llamar acá
pub fn apply<R: ListRecord>(records: Vec<R>, query: &ListQuery) -> Vec<R> {
    let mut records = match query.search.as_deref() {
        Some(q) => search(records, q),
        None => records,
    };
    if let Some(key) = query.sort_by.as_deref() {
        sort(
            &mut records,
            key,
            query.sort_dir.unwrap_or(SortDirection::Asc),
        );
    }
    records
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Row {
        name: &'static str,
        weight: Option<f64>,
    }

    impl ListRecord for Row {
        fn search_fields(&self) -> Vec<&str> {
            vec![self.name]
        }

        fn sort_value(&self, key: &str) -> SortValue {
            match key {
                "name" => SortValue::Text(self.name.to_string()),
                "weight" => self
                    .weight
                    .map(SortValue::Number)
                    .unwrap_or(SortValue::Missing),
                _ => SortValue::Missing,
            }
        }
    }

    fn rows() -> Vec<Row> {
        vec![
            Row { name: "hino", weight: Some(2.0) },
            Row { name: "isuzu", weight: None },
            Row { name: "fuso", weight: Some(1.0) },
        ]
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let found = search(rows(), "ISU");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "isuzu");
    }

    #[test]
    fn test_empty_search_passes_everything() {
        assert_eq!(search(rows(), "").len(), 3);
        assert_eq!(search(rows(), "   ").len(), 3);
    }

    #[test]
    fn test_toggle_same_key_yields_exact_reverse() {
        let mut selection = SortSelection::none();
        selection.toggle("name");
        assert_eq!(selection.direction, SortDirection::Asc);

        let mut asc = rows();
        sort(&mut asc, &selection.key.clone().unwrap(), selection.direction);
        let asc_names: Vec<_> = asc.iter().map(|r| r.name).collect();
        assert_eq!(asc_names, vec!["fuso", "hino", "isuzu"]);

        selection.toggle("name");
        assert_eq!(selection.direction, SortDirection::Desc);

        let mut desc = rows();
        sort(&mut desc, &selection.key.clone().unwrap(), selection.direction);
        let desc_names: Vec<_> = desc.iter().map(|r| r.name).collect();
        let mut reversed = asc_names.clone();
        reversed.reverse();
        assert_eq!(desc_names, reversed);
    }

    #[test]
    fn test_toggle_other_key_resets_to_ascending() {
        let mut selection = SortSelection::none();
        selection.toggle("name");
        selection.toggle("name");
        assert_eq!(selection.direction, SortDirection::Desc);

        selection.toggle("weight");
        assert_eq!(selection.key.as_deref(), Some("weight"));
        assert_eq!(selection.direction, SortDirection::Asc);
    }

    #[test]
    fn test_missing_sort_key_compares_equal_and_stays_stable() {
        // isuzu no tiene peso: compara igual y conserva su posición relativa
        let mut records = vec![
            Row { name: "isuzu", weight: None },
            Row { name: "fuso", weight: Some(1.0) },
        ];
        sort(&mut records, "weight", SortDirection::Asc);
        let names: Vec<_> = records.iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["isuzu", "fuso"]);

        // clave desconocida: todo compara igual, el orden de llegada queda
        let mut records = rows();
        sort(&mut records, "unknown", SortDirection::Desc);
        let names: Vec<_> = records.iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["hino", "isuzu", "fuso"]);
    }

    #[test]
    fn test_apply_runs_search_then_sort() {
        let query = ListQuery {
            view: None,
            search: Some("u".into()),
            sort_by: Some("name".into()),
            sort_dir: Some(SortDirection::Desc),
        };
        let result = apply(rows(), &query);
        let names: Vec<_> = result.iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["isuzu", "fuso"]);
    }
}
