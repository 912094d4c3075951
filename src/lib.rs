// s2inventory - split daily Sentinel-2 inventories by acquisition date
//
// Pipeline for one run:
// - Resolve yesterday's inventory manifest for a collection
// - Download and partition its listing files on a bounded worker pool
// - Merge the per-file groupings by date
// - Write one header-less CSV object per date

pub mod config;
pub mod emit;
pub mod error;
pub mod init;
pub mod inventory;
pub mod pipeline;
pub mod pool;
pub mod storage;

pub use error::{ErrorCode, Result, SplitError};
pub use init::{init_stores, init_tracing};
pub use pipeline::{split_days, RunSummary, SplitDaysRequest};
pub use storage::ObjectStore;
