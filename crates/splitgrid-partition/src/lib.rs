//! splitgrid partitioner — balanced test-file groups for parallel workers.
//!
//! Given the candidate files, a group count and a [`GroupBy`] mode, the
//! partitioner produces exactly that many disjoint groups whose union is the
//! input. It is a pure, synchronous function of its inputs and of the
//! read-only collaborators it is handed.
//!
//! # Components
//!
//! - **`weight`** — Weight-source chain (runtime history, file size, uniform)
//! - **`partitioner`** — LPT and round-robin assignment
//! - **`runtime_log`** — `file:seconds` runtime history
//! - **`file_size`** — File sizes from filesystem metadata
//!
//! [`GroupBy`]: splitgrid_core::GroupBy

pub mod error;
pub mod file_size;
pub mod partitioner;
pub mod runtime_log;
pub mod weight;

pub use error::{PartitionError, PartitionResult};
pub use file_size::{FileSizes, FsFileSizes};
pub use partitioner::{Partitioner, Plan, partition, plan};
pub use runtime_log::{RuntimeHistory, RuntimeLog};
pub use weight::{Weights, chain, select_weights};
