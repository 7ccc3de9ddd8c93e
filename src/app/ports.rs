use crate::domain::FlatRow;
use crate::error::Result;

/// Destination for the finalized table
pub trait TableSink {
    fn write_table(&self, rows: &[FlatRow]) -> Result<()>;

    /// Human-readable description of where rows go
    fn describe(&self) -> String;
}
