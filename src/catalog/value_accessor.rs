use std::borrow::Cow;

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{CsvError, CsvResult};

/// Field access on a record: given a field name, return its value or fail.
///
/// Failures are returned as [`CsvError::MissingField`] and are fatal for the
/// current write session.
pub trait ValueAccessor {
    fn get_value(&self, field_name: &str) -> CsvResult<Cow<'_, Value>>;
}

impl ValueAccessor for Map<String, Value> {
    fn get_value(&self, field_name: &str) -> CsvResult<Cow<'_, Value>> {
        self.get(field_name)
            .map(Cow::Borrowed)
            .ok_or_else(|| CsvError::missing_field(field_name))
    }
}

impl ValueAccessor for IndexMap<String, Value> {
    fn get_value(&self, field_name: &str) -> CsvResult<Cow<'_, Value>> {
        self.get(field_name)
            .map(Cow::Borrowed)
            .ok_or_else(|| CsvError::missing_field(field_name))
    }
}

impl ValueAccessor for Value {
    fn get_value(&self, field_name: &str) -> CsvResult<Cow<'_, Value>> {
        match self {
            Value::Object(map) => map.get_value(field_name),
            _ => Err(CsvError::missing_field(field_name)),
        }
    }
}

impl<T: ValueAccessor + ?Sized> ValueAccessor for &T {
    fn get_value(&self, field_name: &str) -> CsvResult<Cow<'_, Value>> {
        (**self).get_value(field_name)
    }
}

/// Convert typed records into JSON objects usable as accessor-backed rows.
///
/// Struct fields keep their declaration order, so a parent struct embedded
/// with `#[serde(flatten)]` as the first field lists its fields first.
pub fn to_records<T: Serialize>(items: &[T]) -> CsvResult<Vec<Value>> {
    items
        .iter()
        .map(|item| serde_json::to_value(item).map_err(CsvError::from))
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use serde_json::json;

    #[test]
    fn object_returns_borrowed_value() {
        let record = json!({"name": "Ana", "age": null});
        assert_eq!(*record.get_value("name").unwrap(), json!("Ana"));
        assert_eq!(*record.get_value("age").unwrap(), Value::Null);
        assert!(matches!(record.get_value("name").unwrap(), Cow::Borrowed(_)));
    }

    #[test]
    fn absent_key_is_missing_field() {
        let record = json!({"name": "Ana"});
        match record.get_value("email") {
            Err(CsvError::MissingField { field }) => assert_eq!(field, "email"),
            other => panic!("expected MissingField, got {other:?}"),
        }
    }

    #[test]
    fn non_object_record_has_no_fields() {
        assert!(matches!(json!([1, 2]).get_value("x"), Err(CsvError::MissingField { .. })));
        assert!(matches!(json!(3).get_value("x"), Err(CsvError::MissingField { .. })));
    }

    #[test]
    fn index_map_records_are_accessible() {
        let mut record = IndexMap::new();
        record.insert("k".to_string(), json!(7));
        assert_eq!(*record.get_value("k").unwrap(), json!(7));
        assert!(record.get_value("nope").is_err());
    }

    #[derive(Serialize)]
    struct Base {
        id: u32,
    }

    #[derive(Serialize)]
    struct Person {
        #[serde(flatten)]
        base: Base,
        name: String,
        nickname: Option<String>,
        scores: BTreeMap<String, u32>,
    }

    #[test]
    fn to_records_keeps_declaration_order() {
        let people = vec![Person {
            base: Base { id: 1 },
            name: "Ana".into(),
            nickname: None,
            scores: BTreeMap::from([("math".to_string(), 9)]),
        }];

        let records = to_records(&people).unwrap();
        let keys: Vec<_> = records[0].as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["id", "name", "nickname", "scores"]);
        assert_eq!(*records[0].get_value("nickname").unwrap(), Value::Null);
        assert_eq!(*records[0].get_value("scores").unwrap(), json!({"math": 9}));
    }
}
