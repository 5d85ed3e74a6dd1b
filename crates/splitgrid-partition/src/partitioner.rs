//! Partitioner — splits test files into balanced groups.
//!
//! Weighted sources use Longest-Processing-Time first: files are sorted by
//! descending weight (stable, so ties keep input order) and each goes to
//! the least-loaded group, lowest index on ties. When every file weighs the
//! same, load ties go to the group holding fewer files first. Uniform weights deal files
//! out round-robin in input order. Either way, every group is sorted
//! lexically before it is returned.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use splitgrid_core::{Group, GroupBy, PartitionOptions, WeightSource};
use tracing::{debug, info, warn};

use crate::error::{PartitionError, PartitionResult};
use crate::file_size::{FileSizes, FsFileSizes};
use crate::runtime_log::{RuntimeHistory, RuntimeLog};
use crate::weight::select_weights;

/// The outcome of one partitioning call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub source: WeightSource,
    pub groups: Vec<Group>,
}

impl Plan {
    /// Keep only the groups with the given one-based numbers, in the order
    /// first asked for. Repeats are ignored; an empty selection keeps every
    /// group.
    pub fn select(&self, numbers: &[usize]) -> PartitionResult<Vec<Group>> {
        if numbers.is_empty() {
            return Ok(self.groups.clone());
        }
        let mut seen = HashSet::new();
        numbers
            .iter()
            .filter(|&&n| seen.insert(n))
            .map(|&n| {
                n.checked_sub(1)
                    .and_then(|i| self.groups.get(i))
                    .cloned()
                    .ok_or_else(|| {
                        PartitionError::config(format!(
                            "group {n} does not exist (have {} groups)",
                            self.groups.len()
                        ))
                    })
            })
            .collect()
    }
}

/// Partitions files using injected size and history collaborators.
pub struct Partitioner<'a> {
    sizes: &'a dyn FileSizes,
    history: Option<&'a dyn RuntimeHistory>,
}

impl<'a> Partitioner<'a> {
    pub fn new(sizes: &'a dyn FileSizes) -> Self {
        Self {
            sizes,
            history: None,
        }
    }

    pub fn with_history(mut self, history: &'a dyn RuntimeHistory) -> Self {
        self.history = Some(history);
        self
    }

    /// Split `files` into exactly `group_count` groups.
    pub fn plan(
        &self,
        files: &[String],
        group_count: usize,
        group_by: GroupBy,
    ) -> PartitionResult<Plan> {
        check_group_count(group_count)?;

        let weights = select_weights(files, group_by, self.history, self.sizes)?;
        let mut groups = match weights.source {
            WeightSource::Uniform => assign_round_robin(files, &weights.values, group_count),
            WeightSource::RuntimeHistory | WeightSource::FileSize => {
                assign_longest_first(files, &weights.values, group_count)
            }
        };

        for group in &mut groups {
            group.files.sort();
        }

        let empty = groups.iter().filter(|g| g.is_empty()).count();
        if empty > 0 && !files.is_empty() {
            warn!(empty, group_count, files = files.len(), "more groups than files");
        }
        info!(
            source = %weights.source,
            groups = group_count,
            files = files.len(),
            makespan = splitgrid_core::makespan(&groups),
            "partitioned test files"
        );

        Ok(Plan {
            source: weights.source,
            groups,
        })
    }
}

/// Partition `files` with the filesystem and the configured runtime log.
pub fn plan(files: &[String], options: &PartitionOptions) -> PartitionResult<Plan> {
    check_group_count(options.group_count)?;

    let history = if options.group_by.reads_runtime_log() {
        RuntimeLog::load(options.runtime_log_path())?
    } else {
        None
    };
    let sizes = FsFileSizes::new();

    let mut partitioner = Partitioner::new(&sizes);
    if let Some(history) = &history {
        partitioner = partitioner.with_history(history);
    }
    partitioner.plan(files, options.group_count, options.group_by)
}

/// Partition `files` into `options.group_count` groups.
pub fn partition(files: &[String], options: &PartitionOptions) -> PartitionResult<Vec<Group>> {
    Ok(plan(files, options)?.groups)
}

fn check_group_count(group_count: usize) -> PartitionResult<()> {
    if group_count == 0 {
        return Err(PartitionError::config("group count must be at least 1"));
    }
    Ok(())
}

fn empty_groups(group_count: usize) -> Vec<Group> {
    (0..group_count).map(Group::new).collect()
}

fn assign_round_robin(files: &[String], weights: &[f64], group_count: usize) -> Vec<Group> {
    let mut groups = empty_groups(group_count);
    for (i, (file, weight)) in files.iter().zip(weights).enumerate() {
        let group = &mut groups[i % group_count];
        group.files.push(file.clone());
        group.load += weight;
    }
    groups
}

fn assign_longest_first(files: &[String], weights: &[f64], group_count: usize) -> Vec<Group> {
    let mut order: Vec<usize> = (0..files.len()).collect();
    // `sort_by` is stable: equal weights stay in input order.
    order.sort_by(|&a, &b| weights[b].total_cmp(&weights[a]));

    // With all weights equal, loads can stay tied forever (all zero), so
    // ties also look at the file count to keep cardinalities balanced.
    let uniform = weights.windows(2).all(|w| w[0] == w[1]);

    let mut groups = empty_groups(group_count);
    for i in order {
        // `min_by` keeps the lowest index among equal minimums.
        let target = groups
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| {
                let by_load = a.load.total_cmp(&b.load);
                if uniform { by_load.then(a.len().cmp(&b.len())) } else { by_load }
            })
            .map_or(0, |(idx, _)| idx);
        let group = &mut groups[target];
        group.files.push(files[i].clone());
        group.load += weights[i];
        debug!(file = %files[i], weight = weights[i], group = target, load = group.load, "assigned");
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io;

    fn names(prefix: &str, count: usize) -> Vec<String> {
        (0..count).map(|i| format!("{prefix}{i}")).collect()
    }

    fn constant_size(_: &str) -> io::Result<u64> {
        Ok(100)
    }

    fn cardinalities(groups: &[Group]) -> Vec<usize> {
        groups.iter().map(Group::len).collect()
    }

    #[test]
    fn zero_groups_is_rejected() {
        let p = Partitioner::new(&constant_size);
        let err = p.plan(&names("f", 3), 0, GroupBy::Balanced).unwrap_err();
        assert!(matches!(err, PartitionError::Configuration(_)));
    }

    #[test]
    fn no_files_gives_empty_groups() {
        let p = Partitioner::new(&constant_size);
        let plan = p.plan(&[], 3, GroupBy::Balanced).unwrap();
        assert_eq!(plan.groups.len(), 3);
        assert!(plan.groups.iter().all(Group::is_empty));
        assert_eq!(
            plan.groups.iter().map(|g| g.index).collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
    }

    #[test]
    fn more_groups_than_files_leaves_trailing_groups_empty() {
        let p = Partitioner::new(&constant_size);
        let plan = p.plan(&names("f", 2), 5, GroupBy::Balanced).unwrap();
        assert_eq!(cardinalities(&plan.groups), vec![1, 1, 0, 0, 0]);
    }

    #[test]
    fn equal_weights_favour_lower_indices() {
        let p = Partitioner::new(&constant_size);
        let plan = p.plan(&names("f", 8), 3, GroupBy::Filesize).unwrap();
        assert_eq!(cardinalities(&plan.groups), vec![3, 3, 2]);

        let plan = p.plan(&names("f", 10), 4, GroupBy::Filesize).unwrap();
        assert_eq!(cardinalities(&plan.groups), vec![3, 3, 2, 2]);
    }

    #[test]
    fn all_zero_history_is_still_cardinality_balanced() {
        let history: HashMap<String, f64> = names("f", 7).into_iter().map(|f| (f, 0.0)).collect();
        let p = Partitioner::new(&constant_size).with_history(&history);
        let plan = p.plan(&names("f", 7), 3, GroupBy::Balanced).unwrap();
        assert_eq!(plan.source, WeightSource::RuntimeHistory);
        assert_eq!(cardinalities(&plan.groups), vec![3, 2, 2]);
    }

    #[test]
    fn runtime_history_trace() {
        let files = names("x", 8);
        let mut history: HashMap<String, f64> = HashMap::new();
        history.insert("x0".into(), 10.0);
        for i in 1..8 {
            history.insert(format!("x{i}"), i as f64);
        }

        let p = Partitioner::new(&constant_size).with_history(&history);
        let plan = p.plan(&files, 2, GroupBy::Balanced).unwrap();

        assert_eq!(plan.groups[0].files, vec!["x0", "x1", "x3", "x5"]);
        assert_eq!(plan.groups[1].files, vec!["x2", "x4", "x6", "x7"]);
        assert_eq!(plan.groups[0].load, 19.0);
        assert_eq!(plan.groups[1].load, 19.0);
    }

    #[test]
    fn zero_weight_files_go_to_lowest_index_on_tied_load() {
        let files: Vec<String> = ["a", "b", "c", "d", "e"].map(String::from).into();
        let sizes = |f: &str| -> io::Result<u64> { Ok(if f == "a" || f == "b" { 5 } else { 0 }) };
        let p = Partitioner::new(&sizes);
        let plan = p.plan(&files, 2, GroupBy::Filesize).unwrap();
        assert_eq!(plan.groups[0].files, vec!["a", "c", "d", "e"]);
        assert_eq!(plan.groups[1].files, vec!["b"]);
        assert_eq!(plan.groups[0].load, 5.0);
        assert_eq!(plan.groups[1].load, 5.0);
    }

    #[test]
    fn missing_history_entries_follow_plain_tie_break() {
        let history: HashMap<String, f64> = [("f0".to_string(), 3.0)].into();
        let p = Partitioner::new(&constant_size).with_history(&history);
        let plan = p.plan(&names("f", 4), 2, GroupBy::Balanced).unwrap();
        assert_eq!(plan.source, WeightSource::RuntimeHistory);
        // f0 lands in group 0, the zero-weight rest fill the empty group 1.
        assert_eq!(plan.groups[0].files, vec!["f0"]);
        assert_eq!(plan.groups[1].files, vec!["f1", "f2", "f3"]);
    }

    #[test]
    fn found_mode_deals_round_robin() {
        let files: Vec<String> = ["file1", "file2", "file3", "file4"].map(String::from).into();
        let p = Partitioner::new(&constant_size);
        let plan = p.plan(&files, 2, GroupBy::Found).unwrap();
        assert_eq!(plan.source, WeightSource::Uniform);
        assert_eq!(plan.groups[0].files, vec!["file1", "file3"]);
        assert_eq!(plan.groups[1].files, vec!["file2", "file4"]);
    }

    #[test]
    fn found_mode_sorts_within_groups() {
        let files: Vec<String> = "qwertyuiopasdfghjklzxcvbnm".chars().map(String::from).collect();
        let p = Partitioner::new(&constant_size);
        let plan = p.plan(&files, 2, GroupBy::Found).unwrap();
        for group in &plan.groups {
            let mut sorted = group.files.clone();
            sorted.sort();
            assert_eq!(group.files, sorted);
        }
        assert_eq!(cardinalities(&plan.groups), vec![13, 13]);
    }

    #[test]
    fn lpt_load_spread_is_bounded_by_largest_weight() {
        let weights = [37u64, 5, 91, 12, 12, 64, 3, 28, 50, 7, 19, 44, 1];
        let files = names("t", weights.len());
        let lookup: HashMap<String, u64> =
            files.iter().cloned().zip(weights.iter().copied()).collect();
        let sizes = move |f: &str| -> io::Result<u64> { Ok(lookup[f]) };

        let p = Partitioner::new(&sizes);
        for n in 1..=6 {
            let plan = p.plan(&files, n, GroupBy::Filesize).unwrap();
            let loads: Vec<f64> = plan.groups.iter().map(|g| g.load).collect();
            let max = loads.iter().copied().fold(f64::MIN, f64::max);
            let min = loads.iter().copied().fold(f64::MAX, f64::min);
            assert!(max - min <= 91.0, "n={n} loads={loads:?}");

            let mut all: Vec<String> = plan.groups.iter().flat_map(|g| g.files.clone()).collect();
            all.sort();
            let mut expected = files.clone();
            expected.sort();
            assert_eq!(all, expected);
        }
    }

    #[test]
    fn identical_inputs_give_identical_plans() {
        let history: HashMap<String, f64> =
            [("a".to_string(), 2.0), ("b".to_string(), 2.0), ("c".to_string(), 1.0)].into();
        let files: Vec<String> = ["c", "b", "a", "d"].map(String::from).into();
        let p = Partitioner::new(&constant_size).with_history(&history);
        let first = p.plan(&files, 2, GroupBy::Balanced).unwrap();
        let second = p.plan(&files, 2, GroupBy::Balanced).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn select_picks_one_based_groups() {
        let p = Partitioner::new(&constant_size);
        let plan = p.plan(&names("f", 6), 3, GroupBy::Found).unwrap();

        let picked = plan.select(&[3, 1]).unwrap();
        assert_eq!(picked.iter().map(|g| g.index).collect::<Vec<_>>(), vec![2, 0]);
        assert_eq!(plan.select(&[]).unwrap().len(), 3);
        assert!(plan.select(&[0]).is_err());

        let picked = plan.select(&[2, 2, 1, 2]).unwrap();
        assert_eq!(picked.iter().map(|g| g.index).collect::<Vec<_>>(), vec![1, 0]);
        assert!(plan.select(&[4]).is_err());
    }
}
