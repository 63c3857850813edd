// trcfilter - core/export.rs
//
// CSV report writing and JSON run-summary serialisation.
// Core layer: writes to any Write trait object; the app layer owns files.

use crate::core::model::{OutputRow, TableKind};
use crate::util::error::ExportError;
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};

/// CSV writer for one report table.
///
/// Writes the fixed header row on construction; afterwards accepts rows in
/// the order the classifier emits them, which mirrors input line order.
pub struct TableCsv<W: Write> {
    table: TableKind,
    path: PathBuf,
    writer: csv::Writer<W>,
    rows_written: u64,
}

impl<W: Write> TableCsv<W> {
    /// Open a table report on `writer` and emit the header row.
    /// `path` is kept only as context for error messages.
    pub fn new(table: TableKind, writer: W, path: &Path) -> Result<Self, ExportError> {
        let mut writer = csv::Writer::from_writer(writer);
        writer
            .write_record(table.headers())
            .map_err(|e| ExportError::Csv {
                path: path.to_path_buf(),
                source: e,
            })?;

        Ok(Self {
            table,
            path: path.to_path_buf(),
            writer,
            rows_written: 0,
        })
    }

    /// Append one classified row.
    pub fn write_row(&mut self, row: &OutputRow) -> Result<(), ExportError> {
        debug_assert_eq!(row.table, self.table, "row routed to the wrong table");
        self.writer
            .write_record(&row.values)
            .map_err(|e| ExportError::Csv {
                path: self.path.clone(),
                source: e,
            })?;
        self.rows_written += 1;
        Ok(())
    }

    pub fn table(&self) -> TableKind {
        self.table
    }

    pub fn rows_written(&self) -> u64 {
        self.rows_written
    }

    /// Flush and close the report.
    pub fn finish(mut self) -> Result<u64, ExportError> {
        self.writer.flush().map_err(|e| ExportError::Io {
            path: self.path.clone(),
            source: e,
        })?;
        Ok(self.rows_written)
    }
}

/// Serialise a run summary as pretty-printed JSON.
pub fn write_summary_json<W: Write, S: Serialize>(
    summary: &S,
    writer: W,
    path: &Path,
) -> Result<(), ExportError> {
    serde_json::to_writer_pretty(writer, summary).map_err(|e| ExportError::Json {
        path: path.to_path_buf(),
        source: e,
    })
}
