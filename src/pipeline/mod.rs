// Data processing pipeline: ingestion of the two sources, then processing into the flat table

pub mod ingestion;
pub mod processing;
