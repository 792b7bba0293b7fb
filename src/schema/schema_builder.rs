use indexmap::{IndexMap, IndexSet};
use serde_json::Value;
use tracing::{debug, trace};

use crate::{
    catalog::{FieldCatalog, FieldDescriptor, JsonShape, MapColumnSpec, ValueAccessor},
    error::{CsvError, CsvResult},
    schema::{Column, Schema},
};

/// Keys found per map field while scanning the records.
type EncounteredKeys = IndexMap<String, IndexSet<String>>;

/// Resolves a [`FieldCatalog`] into the [`Schema`] of one write session.
pub struct SchemaBuilder;

impl SchemaBuilder {
    /// Whether building a schema for this catalog has to read the records.
    ///
    /// True as soon as one active map column is not static. Declaring the
    /// keys with `include_null` on every map column avoids the scan.
    pub fn needs_scan(catalog: &FieldCatalog) -> bool {
        catalog
            .active()
            .any(|field| field.is_map_column() && !field.is_static_map())
    }

    pub fn build<R: ValueAccessor>(catalog: &FieldCatalog, records: &[R]) -> CsvResult<Schema> {
        let fields: Vec<&FieldDescriptor> = catalog.active().collect();
        let mut columns: Vec<Column> = fields
            .iter()
            .map(|field| Column::from_descriptor(field))
            .collect();

        let scan_fields: Vec<&str> = fields
            .iter()
            .filter(|field| field.is_map_column() && !field.is_static_map())
            .map(|field| field.name.as_str())
            .collect();

        let scanned = !scan_fields.is_empty();
        let encountered = if scanned {
            Self::scan_keys(&scan_fields, records)?
        } else {
            EncounteredKeys::new()
        };

        for (column, field) in columns.iter_mut().zip(&fields) {
            let Some(spec) = &field.map else { continue };

            let keys = if spec.is_static() {
                spec.declared_keys()
            } else {
                let found = encountered.get(&field.name).cloned().unwrap_or_default();
                Self::resolve_dynamic_keys(spec, found)
            };

            trace!(field = %field.name, keys = keys.len(), "resolved map column keys");
            column.set_resolved_keys(keys);
        }

        let schema = Schema::new(columns);
        debug!(
            columns = schema.len(),
            cells = schema.cell_count(),
            scanned,
            records = if scanned { records.len() } else { 0 },
            "schema resolved"
        );
        Ok(schema)
    }

    /// Single pass over the records collecting, per field, the map keys in
    /// first-encounter order.
    fn scan_keys<R: ValueAccessor>(
        fields: &[&str],
        records: &[R],
    ) -> CsvResult<EncounteredKeys> {
        let mut encountered: EncounteredKeys = fields
            .iter()
            .map(|field| (field.to_string(), IndexSet::new()))
            .collect();

        for record in records {
            for field in fields {
                let value = record.get_value(field)?;
                let keys = match &*value {
                    Value::Null => continue,
                    Value::Object(map) => map.keys(),
                    other => return Err(CsvError::schema(*field, JsonShape::of_value(other))),
                };

                if let Some(seen) = encountered.get_mut(*field) {
                    for key in keys {
                        if !seen.contains(key) {
                            seen.insert(key.clone());
                        }
                    }
                }
            }
        }

        Ok(encountered)
    }

    /// Declared keys present in the records, in declared order. Without a
    /// non-empty declared key, the declared blanks followed by every
    /// encountered key.
    fn resolve_dynamic_keys(
        spec: &MapColumnSpec,
        encountered: IndexSet<String>,
    ) -> IndexSet<String> {
        let mut keys = spec.declared_keys();
        if spec.has_declared_keys() {
            keys.retain(|key| encountered.contains(key));
        } else {
            keys.extend(encountered);
        }
        keys
    }
}

#[cfg(test)]
mod tests {
    use std::{borrow::Cow, cell::Cell};

    use super::*;
    use serde_json::json;

    fn keys_of(schema: &Schema, field: &str) -> Vec<String> {
        schema.column(field).unwrap().resolved_keys().iter().cloned().collect()
    }

    /// Record wrapper that counts how many times a field was read.
    struct Counted<'a> {
        inner: Value,
        reads: &'a Cell<usize>,
    }

    impl ValueAccessor for Counted<'_> {
        fn get_value(&self, field_name: &str) -> CsvResult<Cow<'_, Value>> {
            self.reads.set(self.reads.get() + 1);
            self.inner.get_value(field_name)
        }
    }

    #[test]
    fn ignored_fields_are_dropped_and_order_kept() {
        let catalog = FieldCatalog::new()
            .field(FieldDescriptor::new("id"))
            .field(FieldDescriptor::new("password").ignored())
            .field(FieldDescriptor::new("name").renamed("Name"));

        let schema = SchemaBuilder::build::<Value>(&catalog, &[]).unwrap();
        assert_eq!(schema.headers(), vec!["id", "Name"]);
        assert!(!SchemaBuilder::needs_scan(&catalog));
    }

    #[test]
    fn static_map_uses_declared_keys_without_reading_records() {
        let catalog = FieldCatalog::new()
            .field(FieldDescriptor::new("name"))
            .field(
                FieldDescriptor::new("tags")
                    .map_column(MapColumnSpec::with_keys(["z", "a", "m"], true)),
            );

        let reads = Cell::new(0);
        let records = vec![
            Counted { inner: json!({"name": "A", "tags": {"q": 1}}), reads: &reads },
            // would fail if scanned: not a map, and no such field
            Counted { inner: json!({"name": "B", "tags": [1, 2]}), reads: &reads },
            Counted { inner: json!({"name": "C"}), reads: &reads },
        ];

        assert!(!SchemaBuilder::needs_scan(&catalog));
        let schema = SchemaBuilder::build(&catalog, &records).unwrap();
        assert_eq!(keys_of(&schema, "tags"), vec!["z", "a", "m"]);
        assert_eq!(reads.get(), 0);
    }

    #[test]
    fn dynamic_map_collects_keys_in_first_encounter_order() {
        let catalog = FieldCatalog::new()
            .field(FieldDescriptor::new("tags").map_column(MapColumnSpec::dynamic()));
        let records = vec![
            json!({"tags": {"a": 1, "b": 2}}),
            json!({"tags": null}),
            json!({"tags": {"b": 3, "c": 4}}),
        ];

        assert!(SchemaBuilder::needs_scan(&catalog));
        let schema = SchemaBuilder::build(&catalog, &records).unwrap();
        assert_eq!(keys_of(&schema, "tags"), vec!["a", "b", "c"]);
    }

    #[test]
    fn declared_keys_without_include_null_intersect_in_declared_order() {
        let catalog = FieldCatalog::new().field(
            FieldDescriptor::new("m").map_column(MapColumnSpec::with_keys(["x", "y", "z"], false)),
        );
        let records = vec![json!({"m": {"w": 0, "z": 1}}), json!({"m": {"y": 2}})];

        let schema = SchemaBuilder::build(&catalog, &records).unwrap();
        assert_eq!(keys_of(&schema, "m"), vec!["y", "z"]);
    }

    #[test]
    fn empty_declared_key_is_kept_as_a_column() {
        let catalog = FieldCatalog::new()
            .field(FieldDescriptor::new("s").map_column(MapColumnSpec::with_keys(["a", ""], true)))
            .field(FieldDescriptor::new("d").map_column(MapColumnSpec::with_keys([""], true)));
        let records = vec![json!({"s": {"a": 1}, "d": {"a": 2}})];

        let schema = SchemaBuilder::build(&catalog, &records).unwrap();
        assert_eq!(keys_of(&schema, "s"), vec!["a", ""]);
        assert_eq!(keys_of(&schema, "d"), vec!["", "a"]);
        assert_eq!(schema.headers(), vec!["a", "", "", "a"]);
    }

    #[test]
    fn scan_reads_each_dynamic_field_once_per_record() {
        let catalog = FieldCatalog::new()
            .field(FieldDescriptor::new("name"))
            .field(FieldDescriptor::new("a").map_column(MapColumnSpec::dynamic()))
            .field(FieldDescriptor::new("b").map_column(MapColumnSpec::with_keys(["k"], true)))
            .field(FieldDescriptor::new("c").map_column(MapColumnSpec::with_keys(["k"], false)));

        let reads = Cell::new(0);
        let records: Vec<_> = (0..4)
            .map(|i| Counted {
                inner: json!({"name": i, "a": {"k": i}, "b": null, "c": {"k": i}}),
                reads: &reads,
            })
            .collect();

        SchemaBuilder::build(&catalog, &records).unwrap();
        // only "a" and "c" are scanned
        assert_eq!(reads.get(), 8);
    }

    #[test]
    fn empty_records_leave_dynamic_maps_without_keys() {
        let catalog = FieldCatalog::new()
            .field(FieldDescriptor::new("id"))
            .field(FieldDescriptor::new("tags").map_column(MapColumnSpec::dynamic()));

        let schema = SchemaBuilder::build::<Value>(&catalog, &[]).unwrap();
        assert!(keys_of(&schema, "tags").is_empty());
        assert_eq!(schema.cell_count(), 1);
    }

    #[test]
    fn non_map_value_in_dynamic_column_is_schema_error() {
        let catalog = FieldCatalog::new()
            .field(FieldDescriptor::new("tags").map_column(MapColumnSpec::dynamic()));
        let records = vec![json!({"tags": {"a": 1}}), json!({"tags": "oops"})];

        match SchemaBuilder::build(&catalog, &records) {
            Err(CsvError::Schema { field, found }) => {
                assert_eq!(field, "tags");
                assert_eq!(found, JsonShape::String);
            }
            other => panic!("expected schema error, got {other:?}"),
        }
    }

    #[test]
    fn missing_field_during_scan_propagates() {
        let catalog = FieldCatalog::new()
            .field(FieldDescriptor::new("tags").map_column(MapColumnSpec::dynamic()));
        let records = vec![json!({"other": 1})];

        assert!(matches!(
            SchemaBuilder::build(&catalog, &records),
            Err(CsvError::MissingField { .. })
        ));
    }

    #[test]
    fn ignored_map_column_is_never_scanned() {
        let catalog = FieldCatalog::new()
            .field(FieldDescriptor::new("id"))
            .field(FieldDescriptor::new("tags").map_column(MapColumnSpec::dynamic()).ignored());
        let records = vec![json!({"id": 1, "tags": 5})];

        assert!(!SchemaBuilder::needs_scan(&catalog));
        let schema = SchemaBuilder::build(&catalog, &records).unwrap();
        assert_eq!(schema.headers(), vec!["id"]);
    }
}
