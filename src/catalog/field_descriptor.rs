use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

fn default_include_null() -> bool {
    true
}

/// Marks a field as a map column: each key of the map becomes its own column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapColumnSpec {
    /// Possible keys of the map, in output order. Empty means "discover the
    /// keys from the records".
    #[serde(default)]
    pub keys: Vec<String>,
    /// Keep every declared key as a column even if no record carries it.
    /// When false the declared keys are intersected with the keys found.
    #[serde(default = "default_include_null")]
    pub include_null: bool,
}

impl Default for MapColumnSpec {
    fn default() -> Self {
        Self { keys: Vec::new(), include_null: true }
    }
}

impl MapColumnSpec {
    /// A map column whose keys are discovered from the records.
    pub fn dynamic() -> Self {
        Self::default()
    }

    pub fn with_keys<I, S>(keys: I, include_null: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
            include_null,
        }
    }

    /// Declared keys with duplicates collapsed, first occurrence wins. Empty
    /// strings are kept as keys.
    pub fn declared_keys(&self) -> IndexSet<String> {
        self.keys.iter().cloned().collect()
    }

    /// At least one non-empty key was declared. A list of empty strings
    /// leaves the map dynamic.
    pub fn has_declared_keys(&self) -> bool {
        self.keys.iter().any(|key| !key.is_empty())
    }

    /// Static maps take their keys straight from the declaration and never
    /// need a pass over the records.
    pub fn is_static(&self) -> bool {
        self.has_declared_keys() && self.include_null
    }
}

/// Metadata of one record field as seen by the writer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Name used to fetch the value from a record.
    pub name: String,
    /// Header override; the field name is used when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rename: Option<String>,
    #[serde(default)]
    pub ignore: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map: Option<MapColumnSpec>,
}

impl FieldDescriptor {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            rename: None,
            ignore: false,
            map: None,
        }
    }

    pub fn renamed(mut self, display_name: &str) -> Self {
        self.rename = Some(display_name.to_string());
        self
    }

    pub fn ignored(mut self) -> Self {
        self.ignore = true;
        self
    }

    pub fn map_column(mut self, spec: MapColumnSpec) -> Self {
        self.map = Some(spec);
        self
    }

    pub fn display_name(&self) -> &str {
        self.rename.as_deref().unwrap_or(&self.name)
    }

    pub fn is_map_column(&self) -> bool {
        self.map.is_some()
    }

    pub fn is_static_map(&self) -> bool {
        self.map.as_ref().is_some_and(MapColumnSpec::is_static)
    }
}
