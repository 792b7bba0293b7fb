use std::io::{self, Write};

use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::debug;

use crate::{
    catalog::{FieldCatalog, ValueAccessor},
    error::{CsvError, CsvResult},
    schema::{Schema, SchemaBuilder},
    writer::{WriteIterator, WriterConfig},
};

/// Entry point of a write session.
///
/// A `CsvWriter` pairs a [`FieldCatalog`] with a [`WriterConfig`]. Every call
/// that produces output resolves a fresh [`Schema`] for the records it is
/// given, so the same writer can be reused for several collections.
///
/// Records and an output sink can be stored on the writer with
/// [`with_records`](Self::with_records) and [`with_sink`](Self::with_sink);
/// the methods relying on them fail with [`CsvError::MissingData`] or
/// [`CsvError::MissingSink`] when they were never set.
pub struct CsvWriter<'a, R, W = io::Sink> {
    catalog: FieldCatalog,
    config: WriterConfig,
    records: Option<&'a [R]>,
    sink: Option<W>,
}

impl<'a, R: ValueAccessor> CsvWriter<'a, R, io::Sink> {
    pub fn new(catalog: FieldCatalog) -> Self {
        Self::with_config(catalog, WriterConfig::default())
    }

    pub fn with_config(catalog: FieldCatalog, config: WriterConfig) -> Self {
        Self {
            catalog,
            config,
            records: None,
            sink: None,
        }
    }
}

impl<'a, R: ValueAccessor, W> CsvWriter<'a, R, W> {
    pub fn with_records(mut self, records: &'a [R]) -> Self {
        self.records = Some(records);
        self
    }

    pub fn with_sink<S>(self, sink: S) -> CsvWriter<'a, R, S> {
        CsvWriter {
            catalog: self.catalog,
            config: self.config,
            records: self.records,
            sink: Some(sink),
        }
    }

    pub fn catalog(&self) -> &FieldCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &WriterConfig {
        &self.config
    }

    fn stored_records(&self) -> CsvResult<&'a [R]> {
        self.records.ok_or(CsvError::MissingData)
    }

    /// Resolve the schema `records` would be written with.
    pub fn schema_for(&self, records: &[R]) -> CsvResult<Schema> {
        SchemaBuilder::build(&self.catalog, records)
    }

    /// The whole document for the stored records.
    pub fn csv(&self) -> CsvResult<String> {
        self.csv_from(self.stored_records()?)
    }

    /// The whole document for `records`: header (when configured) followed
    /// by every row.
    pub fn csv_from(&self, records: &[R]) -> CsvResult<String> {
        self.csv_with_header(records, self.config.include_header)
    }

    pub fn csv_with_header(&self, records: &[R], include_header: bool) -> CsvResult<String> {
        let mut it = self.write_iterator_from(records)?;
        let mut csv = if include_header { it.header() } else { String::new() };
        csv.push_str(&it.remaining()?);
        Ok(csv)
    }

    /// Iterator over the stored records.
    pub fn write_iterator(&self) -> CsvResult<WriteIterator<'a, R>> {
        self.write_iterator_from(self.stored_records()?)
    }

    pub fn write_iterator_from<'r>(&self, records: &'r [R]) -> CsvResult<WriteIterator<'r, R>> {
        let schema = self.schema_for(records)?;
        Ok(WriteIterator::new(schema, records, self.config.clone()))
    }

    /// Iterator whose `write_*` methods go to `sink`.
    pub fn write_iterator_to<'r, S: Write>(
        &self,
        sink: S,
        records: &'r [R],
    ) -> CsvResult<WriteIterator<'r, R, S>> {
        let schema = self.schema_for(records)?;
        Ok(WriteIterator::with_sink(schema, records, self.config.clone(), sink))
    }

    /// Write the whole document for `records` into `sink` and flush it.
    /// Returns the number of rows written.
    pub fn write_csv_to<S: Write>(&self, sink: S, records: &[R]) -> CsvResult<usize> {
        Self::write_session(&self.catalog, &self.config, sink, records)
    }

    /// Same bytes as [`write_csv_to`](Self::write_csv_to), into an async
    /// sink.
    pub async fn write_csv_async<A>(&self, sink: &mut A, records: &[R]) -> CsvResult<usize>
    where
        A: AsyncWrite + Unpin,
    {
        let mut it = self.write_iterator_from(records)?;
        if self.config.include_header {
            sink.write_all(it.header().as_bytes()).await?;
        }

        let mut written = 0;
        while let Some(row) = it.render_next() {
            let row = row?;
            if written > 0 {
                sink.write_all(self.config.line_separator.as_bytes()).await?;
            }
            sink.write_all(row.as_bytes()).await?;
            written += 1;
        }
        sink.flush().await?;

        debug!(rows = written, "csv written to async sink");
        Ok(written)
    }

    fn write_session<S: Write>(
        catalog: &FieldCatalog,
        config: &WriterConfig,
        sink: S,
        records: &[R],
    ) -> CsvResult<usize> {
        let schema = SchemaBuilder::build(catalog, records)?;
        let mut it = WriteIterator::with_sink(schema, records, config.clone(), sink);
        if config.include_header {
            it.write_header()?;
        }
        let written = it.write_remaining()?;
        it.flush()?;
        Ok(written)
    }
}

impl<R: ValueAccessor, W: Write> CsvWriter<'_, R, W> {
    /// Write the stored records into the stored sink.
    pub fn write_csv(&mut self) -> CsvResult<usize> {
        let sink = self.sink.as_mut().ok_or(CsvError::MissingSink)?;
        let records = self.records.ok_or(CsvError::MissingData)?;
        Self::write_session(&self.catalog, &self.config, sink, records)
    }

    /// Give the stored sink back, if any.
    pub fn into_sink(self) -> Option<W> {
        self.sink
    }
}
