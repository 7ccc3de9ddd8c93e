use metrics::counter;
use serde::Serialize;
use std::fmt;
use tracing::{info, warn};

use crate::domain::FlatRow;

/// Known data-quality red flags in a flat table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum QualityIssueKind {
    /// Zero total_item_price alongside a positive quantity
    ZeroTotalWithQuantity,
    /// total_order_value_percentage below zero
    NegativeOrderPercentage,
    /// unit_price or item_quantity not strictly positive
    NonPositivePriceOrQuantity,
    /// registration_date could not be parsed
    MissingRegistrationDate,
}

impl QualityIssueKind {
    pub const ALL: [QualityIssueKind; 4] = [
        QualityIssueKind::ZeroTotalWithQuantity,
        QualityIssueKind::NegativeOrderPercentage,
        QualityIssueKind::NonPositivePriceOrQuantity,
        QualityIssueKind::MissingRegistrationDate,
    ];

    pub fn matches(&self, row: &FlatRow) -> bool {
        match self {
            QualityIssueKind::ZeroTotalWithQuantity => {
                row.total_item_price == 0.0 && row.item_quantity > 0
            }
            QualityIssueKind::NegativeOrderPercentage => row.total_order_value_percentage < 0.0,
            QualityIssueKind::NonPositivePriceOrQuantity => {
                row.unit_price <= 0.0 || row.item_quantity <= 0
            }
            QualityIssueKind::MissingRegistrationDate => row.registration_date.is_none(),
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            QualityIssueKind::ZeroTotalWithQuantity => "zero_total_with_quantity",
            QualityIssueKind::NegativeOrderPercentage => "negative_order_percentage",
            QualityIssueKind::NonPositivePriceOrQuantity => "non_positive_price_or_quantity",
            QualityIssueKind::MissingRegistrationDate => "missing_registration_date",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            QualityIssueKind::ZeroTotalWithQuantity => {
                "Rows with zero total_item_price and non-zero item_quantity"
            }
            QualityIssueKind::NegativeOrderPercentage => {
                "Rows with negative total_order_value_percentage"
            }
            QualityIssueKind::NonPositivePriceOrQuantity => {
                "Rows with zero or negative unit_price or item_quantity"
            }
            QualityIssueKind::MissingRegistrationDate => "Rows with missing registration_date",
        }
    }
}

/// One tagged subset of offending rows
#[derive(Debug, Clone, PartialEq)]
pub struct QualityFinding {
    pub kind: QualityIssueKind,
    pub rows: Vec<FlatRow>,
}

/// Read-only report of the rows matching each quality rule. Subsets may overlap.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostics {
    pub findings: Vec<QualityFinding>,
}

impl Diagnostics {
    /// Evaluate every rule against the table without altering it
    pub fn assess(rows: &[FlatRow]) -> Self {
        let findings = QualityIssueKind::ALL
            .iter()
            .map(|kind| QualityFinding {
                kind: *kind,
                rows: rows.iter().filter(|row| kind.matches(row)).cloned().collect(),
            })
            .collect();
        Self { findings }
    }

    pub fn finding(&self, kind: QualityIssueKind) -> Option<&QualityFinding> {
        self.findings.iter().find(|f| f.kind == kind)
    }

    pub fn count(&self, kind: QualityIssueKind) -> usize {
        self.finding(kind).map(|f| f.rows.len()).unwrap_or(0)
    }

    pub fn is_clean(&self) -> bool {
        self.findings.iter().all(|f| f.rows.is_empty())
    }

    /// Emit the findings to the log
    pub fn report(&self) {
        for finding in &self.findings {
            let count = finding.rows.len() as u64;
            counter!("etl_quality_issues_total", "kind" => finding.kind.tag()).increment(count);
            if finding.rows.is_empty() {
                info!(kind = finding.kind.tag(), "{}: none", finding.kind.description());
                continue;
            }
            warn!(kind = finding.kind.tag(), count, "{}", finding.kind.description());
            for row in &finding.rows {
                info!(kind = finding.kind.tag(), "{}", format_row(row));
            }
        }
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for finding in &self.findings {
            writeln!(f, "[{}] {}: {}", finding.kind.tag(), finding.kind.description(), finding.rows.len())?;
            for row in &finding.rows {
                writeln!(f, "    {}", format_row(row))?;
            }
        }
        Ok(())
    }
}

fn format_row(row: &FlatRow) -> String {
    fn opt<T: fmt::Display>(value: &Option<T>) -> String {
        value.as_ref().map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
    }

    format!(
        "customer={} order={} product={} name={:?} price={} qty={} total={} pct={} registered={}",
        opt(&row.customer_id),
        opt(&row.order_id),
        opt(&row.product_id),
        row.product_name.as_deref().unwrap_or(""),
        row.unit_price,
        row.item_quantity,
        row.total_item_price,
        row.total_order_value_percentage,
        opt(&row.registration_date),
    )
}
