use metrics::counter;
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, info, instrument};

use crate::error::{EtlError, Result};

/// Customer identifiers granted VIP status
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VipIds {
    ids: HashSet<i64>,
}

impl VipIds {
    /// Membership test. An absent customer id is never a VIP.
    pub fn contains(&self, customer_id: Option<i64>) -> bool {
        customer_id.is_some_and(|id| self.ids.contains(&id))
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl FromIterator<i64> for VipIds {
    fn from_iter<I: IntoIterator<Item = i64>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}

/// Parse one identifier per line. Lines that are not purely decimal digits
/// once trimmed are skipped, as are lines that cannot be read.
pub fn load_vip_ids<R: BufRead>(reader: R) -> VipIds {
    let mut skipped = 0u64;
    let ids: VipIds = reader
        .lines()
        .filter_map(|line| {
            let parsed = line.ok().and_then(|l| parse_vip_line(&l));
            if parsed.is_none() {
                skipped += 1;
            }
            parsed
        })
        .collect();

    counter!("etl_vip_ids_loaded_total").increment(ids.len() as u64);
    counter!("etl_vip_lines_skipped_total").increment(skipped);
    debug!("Skipped {} malformed VIP lines", skipped);
    ids
}

fn parse_vip_line(line: &str) -> Option<i64> {
    let trimmed = line.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    trimmed.parse::<i64>().ok()
}

/// Open and fully read the VIP list at `path`
#[instrument]
pub fn read_vip_file(path: &Path) -> Result<VipIds> {
    let file = File::open(path).map_err(|source| EtlError::MissingSource {
        path: path.to_path_buf(),
        source,
    })?;
    let ids = load_vip_ids(BufReader::new(file));
    info!("Loaded {} VIP identifiers from {}", ids.len(), path.display());
    Ok(ids)
}
