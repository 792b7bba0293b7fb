use crate::schema::Column;

/// The resolved, ordered list of output columns for one write session.
///
/// Built by [`crate::schema::SchemaBuilder`]; read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    columns: Vec<Column>,
}

impl Schema {
    pub(crate) fn new(columns: Vec<Column>) -> Self {
        Self { columns }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, field_name: &str) -> Option<&Column> {
        self.columns.iter().find(|col| col.field_name == field_name)
    }

    /// Number of logical columns (a map column counts once).
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Number of cells in the header and in every row.
    pub fn cell_count(&self) -> usize {
        self.columns.iter().map(Column::cell_count).sum()
    }

    /// Header cells in output order.
    pub fn headers(&self) -> Vec<&str> {
        self.columns.iter().flat_map(Column::headers).collect()
    }
}
