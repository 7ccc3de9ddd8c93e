use serde::Serialize;
use tracing::{info, instrument};

use crate::app::ports::TableSink;
use crate::config::InputConfig;
use crate::domain::RawCustomer;
use crate::error::Result;
use crate::pipeline::ingestion::{self, VipIds};
use crate::pipeline::processing::{finalize, FinalizedTable, FlattenStats, RecordFlattener};
use crate::pipeline::processing::quality_gate::QualityIssueKind;

/// Outcome of one extraction run
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    pub vip_ids_loaded: usize,
    pub flatten: FlattenStats,
    pub table: FinalizedTable,
    /// Where the table was written, if a sink was configured
    pub output: Option<String>,
}

/// Counts suitable for printing at the end of a run
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionSummary {
    pub vip_ids_loaded: usize,
    pub customers: usize,
    pub candidate_items: usize,
    pub dropped_missing_product_id: usize,
    pub dropped_zero_price: usize,
    pub final_rows: usize,
    pub quality_issues: Vec<(QualityIssueKind, usize)>,
    pub output: Option<String>,
}

impl ExtractionResult {
    pub fn summary(&self) -> ExtractionSummary {
        ExtractionSummary {
            vip_ids_loaded: self.vip_ids_loaded,
            customers: self.flatten.customers,
            candidate_items: self.flatten.items,
            dropped_missing_product_id: self.flatten.dropped_missing_product_id,
            dropped_zero_price: self.flatten.dropped_zero_price,
            final_rows: self.table.rows.len(),
            quality_issues: QualityIssueKind::ALL
                .iter()
                .map(|kind| (*kind, self.table.diagnostics.count(*kind)))
                .collect(),
            output: self.output.clone(),
        }
    }
}

/// Flatten and finalize in-memory records. No I/O happens here.
pub fn transform(customers: &[RawCustomer], vip_ids: &VipIds) -> Result<(FinalizedTable, FlattenStats)> {
    let (rows, stats) = RecordFlattener::new(vip_ids).flatten(customers);
    let table = finalize(rows)?;
    Ok((table, stats))
}

/// Loads both sources, runs the transformation and hands the table to the sink
pub struct ExtractUseCase {
    output: Option<Box<dyn TableSink>>,
}

impl ExtractUseCase {
    pub fn new(output: Box<dyn TableSink>) -> Self {
        Self { output: Some(output) }
    }

    /// A run that computes the table and diagnostics but persists nothing
    pub fn without_output() -> Self {
        Self { output: None }
    }

    #[instrument(skip_all, fields(orders = %input.orders_path.display(), vip = %input.vip_path.display()))]
    pub fn run(&self, input: &InputConfig) -> Result<ExtractionResult> {
        // Both sources are read in full and closed before processing starts
        let vip_ids = ingestion::read_vip_file(&input.vip_path)?;
        let customers = ingestion::load_customers(&input.orders_path)?;

        let (table, flatten) = transform(&customers, &vip_ids)?;

        let output = match &self.output {
            Some(sink) => {
                sink.write_table(&table.rows)?;
                Some(sink.describe())
            }
            None => None,
        };

        info!("Extraction complete: {} rows", table.rows.len());

        Ok(ExtractionResult {
            vip_ids_loaded: vip_ids.len(),
            flatten,
            table,
            output,
        })
    }
}
