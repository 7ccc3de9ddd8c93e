//! Table finalization: fill defaults, enforce column types, sort, report
//! diagnostics and drop incomplete rows. Each stage takes and returns the
//! whole row sequence so it can be exercised on its own.

use tracing::{info, instrument};

use crate::constants;
use crate::domain::FlatRow;
use crate::error::{EtlError, Result};
use crate::pipeline::processing::quality_gate::Diagnostics;

/// The finished table and the diagnostics computed just before the final drop
#[derive(Debug, Clone)]
pub struct FinalizedTable {
    pub rows: Vec<FlatRow>,
    pub diagnostics: Diagnostics,
}

/// Missing order and product ids become 0. Missing registration dates stay null.
pub fn fill_defaults(rows: Vec<FlatRow>) -> Vec<FlatRow> {
    rows.into_iter()
        .map(|mut row| {
            row.order_id.get_or_insert(0);
            row.product_id.get_or_insert(0);
            row
        })
        .collect()
}

/// Check every row fits the declared column types. Values should already be
/// well-typed at this point, so any failure is fatal.
pub fn enforce_types(rows: Vec<FlatRow>) -> Result<Vec<FlatRow>> {
    for (index, row) in rows.iter().enumerate() {
        let missing_int = [
            ("customer_id", row.customer_id),
            ("order_id", row.order_id),
            ("product_id", row.product_id),
        ]
        .into_iter()
        .find(|(_, value)| value.is_none());

        if let Some((column, _)) = missing_int {
            return Err(EtlError::TypeEnforcement {
                row: index,
                column,
                reason: "absent value in integer column".to_string(),
            });
        }

        if !constants::is_known_category(&row.category) {
            return Err(EtlError::TypeEnforcement {
                row: index,
                column: "category",
                reason: format!("'{}' is not a known category", row.category),
            });
        }
    }
    Ok(rows)
}

/// Stable sort by (customer_id, order_id, product_id) ascending
pub fn sort_rows(mut rows: Vec<FlatRow>) -> Vec<FlatRow> {
    rows.sort_by_key(FlatRow::sort_key);
    rows
}

/// Remove rows with a null order_id, product_id or product_name.
///
/// Ids have already been defaulted by [`fill_defaults`], so in a finalized
/// pipeline only the product_name check removes anything.
pub fn drop_incomplete(rows: Vec<FlatRow>) -> Vec<FlatRow> {
    rows.into_iter()
        .filter(|row| {
            row.order_id.is_some()
                && row.product_id.is_some()
                && row.product_name.as_deref().is_some_and(|name| !name.trim().is_empty())
        })
        .collect()
}

/// Run every finalization stage in order
#[instrument(skip_all, fields(rows = rows.len()))]
pub fn finalize(rows: Vec<FlatRow>) -> Result<FinalizedTable> {
    let rows = fill_defaults(rows);
    let rows = enforce_types(rows)?;
    let rows = sort_rows(rows);

    let diagnostics = Diagnostics::assess(&rows);
    diagnostics.report();

    let before = rows.len();
    let rows = drop_incomplete(rows);
    info!("Finalized table with {} rows ({} incomplete rows dropped)", rows.len(), before - rows.len());

    Ok(FinalizedTable { rows, diagnostics })
}
