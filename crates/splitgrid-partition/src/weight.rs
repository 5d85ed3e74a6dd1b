//! Weight-source selection.
//!
//! Each [`GroupBy`] mode maps to an ordered chain of weight sources. The
//! first source in the chain that accepts the candidate files decides every
//! weight for the whole call; sources are never mixed per file.

use splitgrid_core::{GroupBy, WeightSource};
use tracing::{debug, info};

use crate::error::{PartitionError, PartitionResult};
use crate::file_size::FileSizes;
use crate::runtime_log::RuntimeHistory;

/// Weights chosen for one partitioning call, parallel to the input files.
#[derive(Debug, Clone, PartialEq)]
pub struct Weights {
    pub source: WeightSource,
    pub values: Vec<f64>,
}

/// The sources tried for `group_by`, in order.
pub fn chain(group_by: GroupBy) -> &'static [WeightSource] {
    match group_by {
        GroupBy::Balanced => &[WeightSource::RuntimeHistory, WeightSource::FileSize],
        GroupBy::Runtime => &[WeightSource::RuntimeHistory],
        GroupBy::Filesize => &[WeightSource::FileSize],
        GroupBy::Found => &[WeightSource::Uniform],
    }
}

/// Pick a weight source for `files` and compute every weight with it.
pub fn select_weights(
    files: &[String],
    group_by: GroupBy,
    history: Option<&dyn RuntimeHistory>,
    sizes: &dyn FileSizes,
) -> PartitionResult<Weights> {
    for &source in chain(group_by) {
        let values = match source {
            WeightSource::RuntimeHistory => runtime_weights(files, history),
            WeightSource::FileSize => Some(size_weights(files, sizes)?),
            WeightSource::Uniform => Some(vec![1.0; files.len()]),
        };
        match values {
            Some(values) => {
                info!(%source, mode = %group_by, files = files.len(), "selected weight source");
                return Ok(Weights { source, values });
            }
            None => debug!(%source, "weight source declined"),
        }
    }

    Err(PartitionError::config(format!(
        "group-by {group_by} needs runtime history, but none is recorded for the {} candidate file(s)",
        files.len()
    )))
}

/// Declines when no history is configured or no candidate has an entry.
/// Files without an entry weigh 0.
fn runtime_weights(files: &[String], history: Option<&dyn RuntimeHistory>) -> Option<Vec<f64>> {
    let history = history?;
    let recorded: Vec<Option<f64>> = files.iter().map(|f| history.lookup(f)).collect();
    let known = recorded.iter().filter(|w| w.is_some()).count();
    if known == 0 {
        return None;
    }
    debug!(known, unknown = files.len() - known, "runtime history coverage");
    Some(recorded.into_iter().map(|w| sanitize(w.unwrap_or(0.0))).collect())
}

fn size_weights(files: &[String], sizes: &dyn FileSizes) -> PartitionResult<Vec<f64>> {
    files
        .iter()
        .map(|file| {
            sizes
                .size_of(file)
                .map(|bytes| bytes as f64)
                .map_err(|source| PartitionError::FileAccess {
                    file: file.clone(),
                    source,
                })
        })
        .collect()
}

// Weights are never negative.
fn sanitize(weight: f64) -> f64 {
    if weight.is_finite() && weight > 0.0 { weight } else { 0.0 }
}
