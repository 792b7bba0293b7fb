use crate::{
    catalog::ValueAccessor,
    error::CsvResult,
    schema::{ColumnKind, Schema},
    writer::{ValueFormatter, WriterConfig},
};

/// Turns one record into its cells, in schema order.
pub struct RowRenderer;

impl RowRenderer {
    /// Render every cell of `record`.
    ///
    /// The result always holds `schema.cell_count()` cells. Nothing is
    /// returned if any cell fails.
    pub fn render<R: ValueAccessor + ?Sized>(
        record: &R,
        schema: &Schema,
        config: &WriterConfig,
    ) -> CsvResult<Vec<String>> {
        let mut cells = Vec::with_capacity(schema.cell_count());

        for column in schema.columns() {
            let value = record.get_value(&column.field_name)?;
            match column.kind {
                ColumnKind::Scalar => cells.push(ValueFormatter::format_scalar(
                    &value,
                    &config.null_value,
                    &config.list_separator,
                )),
                ColumnKind::MapColumn => cells.extend(ValueFormatter::format_map_cells(
                    &column.field_name,
                    &value,
                    column.resolved_keys(),
                    &config.null_value,
                )?),
            }
        }

        Ok(cells)
    }

    /// Render `record` and join its cells with the configured delimiter.
    pub fn render_line<R: ValueAccessor + ?Sized>(
        record: &R,
        schema: &Schema,
        config: &WriterConfig,
    ) -> CsvResult<String> {
        Ok(Self::render(record, schema, config)?.join(&config.delimiter))
    }
}
