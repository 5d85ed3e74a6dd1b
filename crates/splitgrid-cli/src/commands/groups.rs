use std::fmt::Write as _;
use std::path::Path;

use serde::Serialize;
use splitgrid_core::{Group, SplitConfig, WeightSource};
use splitgrid_discover::{DiscoverOptions, find_files};

use crate::{GroupsArgs, OutputFormat};

/// Environment variable a worker reads to learn which group it runs.
pub const ENV_NUMBER_VAR: &str = "TEST_ENV_NUMBER";

#[derive(Debug, Serialize)]
struct GroupsReport<'a> {
    source: WeightSource,
    groups: Vec<GroupView<'a>>,
}

#[derive(Debug, Serialize)]
struct GroupView<'a> {
    number: usize,
    env_number: String,
    load: f64,
    files: &'a [String],
}

pub fn groups(config_path: &Path, args: &GroupsArgs) -> anyhow::Result<()> {
    let config = SplitConfig::from_file_or_default(config_path)?;

    let mut options = config.partition_options(args.groups, default_group_count());
    if let Some(group_by) = args.group_by {
        options.group_by = group_by;
    }
    if let Some(path) = &args.runtime_log {
        options.runtime_log = Some(path.clone());
    }

    let discover = DiscoverOptions::from_config(
        config.discover.as_ref(),
        args.pattern.as_deref(),
        args.exclude_pattern.as_deref(),
    )?;
    let files = find_files(&args.paths, &discover)?;

    let plan = splitgrid_partition::plan(&files, &options)?;
    let selected = plan.select(&args.only_group)?;

    match args.format {
        OutputFormat::Json => println!("{}", render_json(plan.source, &selected, args.first_is_1)?),
        OutputFormat::Text => print!("{}", render_text(plan.source, &selected, args.first_is_1)),
    }

    Ok(())
}

/// Worker count when neither the flag nor the config sets one.
fn default_group_count() -> usize {
    std::thread::available_parallelism().map_or(1, |n| n.get())
}

fn render_text(source: WeightSource, groups: &[Group], first_is_1: bool) -> String {
    let mut out = String::new();
    for group in groups {
        let _ = writeln!(
            out,
            "# group {} ({ENV_NUMBER_VAR}={:?}, {} files, load {} by {source})",
            group.index + 1,
            group.env_number(first_is_1),
            group.len(),
            group.load,
        );
        for file in &group.files {
            let _ = writeln!(out, "{file}");
        }
    }
    out
}

fn render_json(source: WeightSource, groups: &[Group], first_is_1: bool) -> anyhow::Result<String> {
    let report = GroupsReport {
        source,
        groups: groups
            .iter()
            .map(|g| GroupView {
                number: g.index + 1,
                env_number: g.env_number(first_is_1),
                load: g.load,
                files: &g.files,
            })
            .collect(),
    };
    Ok(serde_json::to_string_pretty(&report)?)
}
