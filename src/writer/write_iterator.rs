use std::{
    io::{self, Write},
    slice,
};

use tracing::debug;

use crate::{
    catalog::ValueAccessor,
    error::{CsvError, CsvResult},
    schema::Schema,
    writer::{RowRenderer, WriterConfig},
};

/// Forward-only, single-pass rendering of a record slice against a resolved
/// schema.
///
/// Rows can be pulled one at a time with [`next_row`](Self::next_row), all at
/// once with [`remaining`](Self::remaining), or pushed to the optional sink
/// with the `write_*` methods. The iterator is not restartable: once every
/// record has been consumed it stays exhausted.
pub struct WriteIterator<'a, R, W = io::Sink> {
    schema: Schema,
    config: WriterConfig,
    records: slice::Iter<'a, R>,
    sink: Option<W>,
    total_rows: usize,
}

impl<'a, R: ValueAccessor> WriteIterator<'a, R, io::Sink> {
    /// Iterator without an output sink; the `write_*` methods fail with
    /// [`CsvError::MissingSink`].
    pub fn new(schema: Schema, records: &'a [R], config: WriterConfig) -> Self {
        Self {
            schema,
            config,
            records: records.iter(),
            sink: None,
            total_rows: records.len(),
        }
    }
}

impl<'a, R: ValueAccessor, W> WriteIterator<'a, R, W> {
    pub fn with_sink(schema: Schema, records: &'a [R], config: WriterConfig, sink: W) -> Self {
        Self {
            schema,
            config,
            records: records.iter(),
            sink: Some(sink),
            total_rows: records.len(),
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn config(&self) -> &WriterConfig {
        &self.config
    }

    /// Number of records backing this iterator, consumed or not.
    pub fn total_rows(&self) -> usize {
        self.total_rows
    }

    pub fn has_next(&self) -> bool {
        !self.records.as_slice().is_empty()
    }

    /// Header line: one cell per scalar column and one per resolved map key,
    /// terminated by the line separator. Does not advance the iterator.
    pub fn header(&self) -> String {
        let mut header = self.schema.headers().join(&self.config.delimiter);
        header.push_str(&self.config.line_separator);
        header
    }

    /// Render the next record, terminated by the line separator.
    pub fn next_row(&mut self) -> CsvResult<String> {
        let mut row = self.render_next().ok_or(CsvError::Exhausted)??;
        row.push_str(&self.config.line_separator);
        Ok(row)
    }

    /// Next record joined by the delimiter, without line separator.
    pub(crate) fn render_next(&mut self) -> Option<CsvResult<String>> {
        self.records
            .next()
            .map(|record| RowRenderer::render_line(record, &self.schema, &self.config))
    }

    /// Render every record not consumed yet. Rows are separated by the line
    /// separator with none after the last one. Leaves the iterator
    /// exhausted.
    pub fn remaining(&mut self) -> CsvResult<String> {
        let mut rows = Vec::with_capacity(self.records.len());
        while let Some(row) = self.render_next() {
            rows.push(row?);
        }
        Ok(rows.join(&self.config.line_separator))
    }

    /// Give the sink back, if any.
    pub fn into_sink(self) -> Option<W> {
        self.sink
    }
}

impl<R: ValueAccessor, W: Write> WriteIterator<'_, R, W> {
    pub fn write_header(&mut self) -> CsvResult<()> {
        let header = self.header();
        let sink = self.sink.as_mut().ok_or(CsvError::MissingSink)?;
        sink.write_all(header.as_bytes())?;
        Ok(())
    }

    pub fn write_next(&mut self) -> CsvResult<()> {
        if self.sink.is_none() {
            return Err(CsvError::MissingSink);
        }
        let row = self.next_row()?;
        if let Some(sink) = self.sink.as_mut() {
            sink.write_all(row.as_bytes())?;
        }
        Ok(())
    }

    /// Write what [`remaining`](Self::remaining) would return, one row at a
    /// time. Returns the number of rows written.
    pub fn write_remaining(&mut self) -> CsvResult<usize> {
        let sink = self.sink.as_mut().ok_or(CsvError::MissingSink)?;

        let mut written = 0;
        for record in self.records.by_ref() {
            let row = RowRenderer::render_line(record, &self.schema, &self.config)?;
            if written > 0 {
                sink.write_all(self.config.line_separator.as_bytes())?;
            }
            sink.write_all(row.as_bytes())?;
            written += 1;
        }

        debug!(rows = written, total = self.total_rows, "rows written");
        Ok(written)
    }

    pub fn flush(&mut self) -> CsvResult<()> {
        let sink = self.sink.as_mut().ok_or(CsvError::MissingSink)?;
        sink.flush()?;
        Ok(())
    }
}

impl<R: ValueAccessor, W> Iterator for WriteIterator<'_, R, W> {
    type Item = CsvResult<String>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.has_next() {
            Some(self.next_row())
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.records.size_hint()
    }
}

impl<R: ValueAccessor, W> ExactSizeIterator for WriteIterator<'_, R, W> {}
