//! ledgersheet-cli: batch orchestration, pipelines, configuration and logging for the `ledgersheet` binary

pub mod batch;
pub mod config;
pub mod logging;
pub mod pipelines;

pub use batch::{discover_pdfs, run_batch, BatchReport, FileOutcome, Pipeline};
pub use config::{load_config, Config};
pub use pipelines::{OutputFormat, TablePipeline, TransactionPipeline};
