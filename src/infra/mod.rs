pub mod csv_table_writer;

pub use csv_table_writer::{write_preview, CsvTableWriter};
