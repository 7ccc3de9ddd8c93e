// Pipeline processing: field cleaning, flattening, finalization and quality diagnostics

pub mod finalize;
pub mod flatten;
pub mod normalize;
pub mod quality_gate;

pub use finalize::{finalize, FinalizedTable};
pub use flatten::{FlattenStats, RecordFlattener};
