use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{info, instrument};

use crate::domain::RawCustomer;
use crate::error::{EtlError, Result};

/// Deserialize a JSON array of nested customer records
pub fn read_customers<R: Read>(reader: R) -> Result<Vec<RawCustomer>> {
    let customers: Vec<RawCustomer> = serde_json::from_reader(reader)?;
    Ok(customers)
}

/// Open and fully read the customer order records at `path`
#[instrument]
pub fn load_customers(path: &Path) -> Result<Vec<RawCustomer>> {
    let file = File::open(path).map_err(|source| EtlError::MissingSource {
        path: path.to_path_buf(),
        source,
    })?;
    let customers = read_customers(BufReader::new(file))?;
    info!("Loaded {} customer records from {}", customers.len(), path.display());
    Ok(customers)
}
