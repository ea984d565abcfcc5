//! Vista de lista de usuarios

use super::{ListRecord, SortValue};
use crate::models::user::User;

impl ListRecord for User {
    fn search_fields(&self) -> Vec<&str> {
        vec![&self.email, &self.display_name, &self.role]
    }

    fn sort_value(&self, key: &str) -> SortValue {
        match key {
            "email" => SortValue::Text(self.email.clone()),
            "displayName" => SortValue::Text(self.display_name.clone()),
            "role" => SortValue::Text(self.role.clone()),
            "creationTime" => self
                .creation_time
                .map(|dt| SortValue::Number(dt.timestamp_millis() as f64))
                .unwrap_or(SortValue::Missing),
            "lastSignInTime" => self
                .last_sign_in_time
                .map(|dt| SortValue::Number(dt.timestamp_millis() as f64))
                .unwrap_or(SortValue::Missing),
            _ => SortValue::Missing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::FieldBag;
    use crate::views::{apply, ListQuery};
    use serde_json::json;

    #[test]
    fn test_search_by_role() {
        let admin: FieldBag = json!({ "email": "a@x.com", "role": "admin" })
            .as_object()
            .unwrap()
            .clone();
        let partner: FieldBag = json!({ "email": "b@x.com", "role": "partner" })
            .as_object()
            .unwrap()
            .clone();
        let users = vec![
            User::from_document("u1", &admin).unwrap(),
            User::from_document("u2", &partner).unwrap(),
        ];

        let query = ListQuery {
            search: Some("ADMIN".into()),
            ..ListQuery::default()
        };
        let found = apply(users, &query);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].uid, "u1");
    }
}
