use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::app::ports::TableSink;
use crate::domain::FlatRow;
use crate::error::Result;

/// Writes the finalized table as comma-delimited text with a header row
pub struct CsvTableWriter {
    path: PathBuf,
}

impl CsvTableWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Serialize rows to any writer. Null dates and names become empty fields.
pub fn write_rows<W: Write>(writer: W, rows: &[FlatRow]) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new().has_headers(false).from_writer(writer);
    wtr.write_record(crate::constants::COLUMNS)?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Serialize at most `limit` leading rows, with the header
pub fn write_preview<W: Write>(writer: W, rows: &[FlatRow], limit: usize) -> Result<()> {
    write_rows(writer, &rows[..limit.min(rows.len())])
}

impl TableSink for CsvTableWriter {
    fn write_table(&self, rows: &[FlatRow]) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let file = fs::File::create(&self.path)?;
        write_rows(file, rows)?;
        info!("Wrote {} rows to {}", rows.len(), self.path.display());
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
