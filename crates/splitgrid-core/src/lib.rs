pub mod config;
pub mod types;

pub use config::{PartitionOptions, SplitConfig, DEFAULT_RUNTIME_LOG};
pub use types::*;
