// Pipeline ingestion: VIP identifier list and nested customer order records

pub mod records;
pub mod vip_ids;

pub use records::{load_customers, read_customers};
pub use vip_ids::{load_vip_ids, read_vip_file, VipIds};
