use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use splitgrid_core::GroupBy;

mod commands;

#[derive(Parser)]
#[command(
    name = "splitgrid",
    about = "splitgrid — split a test suite into balanced groups for parallel workers",
    version,
    propagate_version = true,
)]
struct Cli {
    /// Configuration file (ignored when missing)
    #[arg(short, long, global = true, default_value = "splitgrid.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Discover test files and print them split into groups.
    ///
    /// Weighting defaults to recorded runtimes, falling back to file size
    /// when the runtime log has nothing for the discovered files.
    Groups(GroupsArgs),
    /// Generate a splitgrid.toml scaffold
    Init {
        #[arg(short, long, default_value = ".")]
        path: PathBuf,
    },
    /// Inspect or update the runtime log
    Runtime {
        #[command(subcommand)]
        action: RuntimeAction,
    },
}

#[derive(Args)]
pub struct GroupsArgs {
    /// Test files or directories (default: current directory)
    #[arg(default_value = ".")]
    pub paths: Vec<PathBuf>,
    /// Number of groups (default: config, then available CPUs)
    #[arg(short = 'n', long)]
    pub groups: Option<usize>,
    /// Weighting: balanced, runtime, filesize or found
    #[arg(long)]
    pub group_by: Option<GroupBy>,
    /// Runtime log to read durations from
    #[arg(long)]
    pub runtime_log: Option<PathBuf>,
    /// Regex a walked file must match
    #[arg(short, long)]
    pub pattern: Option<String>,
    /// Regex of files to leave out
    #[arg(long)]
    pub exclude_pattern: Option<String>,
    /// Only print these groups (1-based, comma separated)
    #[arg(long, value_delimiter = ',')]
    pub only_group: Vec<usize>,
    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
    /// Number the first group "1" instead of ""
    #[arg(long)]
    pub first_is_1: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One header line per group followed by its files
    Text,
    /// The weight source and groups as JSON
    Json,
}

#[derive(Subcommand)]
enum RuntimeAction {
    /// List recorded durations
    Show {
        #[arg(long)]
        runtime_log: Option<PathBuf>,
    },
    /// Record the duration of one test file
    Record {
        file: String,
        seconds: f64,
        #[arg(long)]
        runtime_log: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("splitgrid=info".parse()?)
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Groups(args) => commands::groups::groups(&cli.config, &args),
        Commands::Init { path } => commands::init::init(&path),
        Commands::Runtime { action } => match action {
            RuntimeAction::Show { runtime_log } => {
                commands::runtime::show(&cli.config, runtime_log.as_deref())
            }
            RuntimeAction::Record { file, seconds, runtime_log } => {
                commands::runtime::record(&cli.config, &file, seconds, runtime_log.as_deref())
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_rejects_unknown_values() {
        let cli = Cli::try_parse_from(["splitgrid", "groups", "--format", "json"]).unwrap();
        match cli.command {
            Commands::Groups(args) => assert_eq!(args.format, OutputFormat::Json),
            _ => panic!("expected groups command"),
        }

        assert!(Cli::try_parse_from(["splitgrid", "groups", "--format", "yaml"]).is_err());
    }

    #[test]
    fn test_format_defaults_to_text() {
        let cli = Cli::try_parse_from(["splitgrid", "groups", "test"]).unwrap();
        match cli.command {
            Commands::Groups(args) => assert_eq!(args.format, OutputFormat::Text),
            _ => panic!("expected groups command"),
        }
    }
}
