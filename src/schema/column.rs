use indexmap::IndexSet;

use crate::catalog::FieldDescriptor;

/// How a column expands into cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// One cell holding the formatted value.
    Scalar,
    /// One cell per resolved key of a map-valued field.
    MapColumn,
}

/// One logical output field of the schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub field_name: String,
    pub display_name: String,
    pub kind: ColumnKind,
    resolved_keys: IndexSet<String>,
}

impl Column {
    pub fn scalar(field_name: &str, display_name: &str) -> Self {
        Self {
            field_name: field_name.to_string(),
            display_name: display_name.to_string(),
            kind: ColumnKind::Scalar,
            resolved_keys: IndexSet::new(),
        }
    }

    pub fn map_column(
        field_name: &str,
        display_name: &str,
        resolved_keys: IndexSet<String>,
    ) -> Self {
        Self {
            field_name: field_name.to_string(),
            display_name: display_name.to_string(),
            kind: ColumnKind::MapColumn,
            resolved_keys,
        }
    }

    /// Project a descriptor to a column with no keys resolved yet.
    pub(crate) fn from_descriptor(descriptor: &FieldDescriptor) -> Self {
        if descriptor.is_map_column() {
            Self::map_column(&descriptor.name, descriptor.display_name(), IndexSet::new())
        } else {
            Self::scalar(&descriptor.name, descriptor.display_name())
        }
    }

    pub(crate) fn set_resolved_keys(&mut self, keys: IndexSet<String>) {
        self.resolved_keys = keys;
    }

    pub fn is_map_column(&self) -> bool {
        self.kind == ColumnKind::MapColumn
    }

    /// Keys expanded into cells, in output order. Always empty for scalars.
    pub fn resolved_keys(&self) -> &IndexSet<String> {
        &self.resolved_keys
    }

    /// Number of cells this column contributes to every row.
    pub fn cell_count(&self) -> usize {
        match self.kind {
            ColumnKind::Scalar => 1,
            ColumnKind::MapColumn => self.resolved_keys.len(),
        }
    }

    /// Header cells of this column: the display name for scalars, the keys
    /// for map columns.
    pub fn headers(&self) -> Vec<&str> {
        match self.kind {
            ColumnKind::Scalar => vec![self.display_name.as_str()],
            ColumnKind::MapColumn => self.resolved_keys.iter().map(String::as_str).collect(),
        }
    }
}
