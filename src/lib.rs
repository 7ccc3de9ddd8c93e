pub mod config;
pub mod constants;
pub mod domain;
pub mod error;
pub mod logging;
pub mod pipeline;

// Application use cases and the infrastructure adapters they write through
pub mod app;
pub mod infra;
