//! Command-line argument parsing with clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use lgexpire::RetentionRule;

/// Expire rotated glog-style log files.
#[derive(Parser, Debug, Clone)]
#[command(name = "lgexpire")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format.
    #[arg(short, long, value_enum, default_value_t = Format::Table, global = true)]
    pub format: Format,

    /// Configuration file (JSON).
    #[arg(short, long, env = "LGEXPIRE_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Format {
    /// Human-readable table format.
    #[default]
    Table,
    /// JSON output for scripting.
    Json,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Delete the log files the retention rules do not keep.
    Run(RunArgs),

    /// Show which log files a run would delete, without deleting them.
    Plan(SelectionArgs),

    /// Show how file names are parsed.
    Parse {
        /// File names or paths to parse.
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Write a sample configuration file.
    InitConfig {
        /// Path to write the config to; stdout if omitted.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}

/// Which directory, programs and rules a pass uses.
///
/// Every flag given here overrides the matching field of the config file.
#[derive(Args, Debug, Clone, Default)]
pub struct SelectionArgs {
    /// Directory holding the log files.
    #[arg(short, long)]
    pub dir: Option<PathBuf>,

    /// Program whose logs are expired (repeatable).
    #[arg(short, long = "program", value_name = "PROGRAM")]
    pub programs: Vec<String>,

    /// Retention rule as `level=LEVEL,count=N,age=DURATION` (repeatable).
    ///
    /// Every key is optional, e.g. `count=10` or `level=ERROR,age=7days`.
    #[arg(short, long = "rule", value_name = "RULE")]
    pub rules: Vec<RetentionRule>,
}

/// Arguments for the run command.
#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Directory, programs and rules.
    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Log what would be removed without removing anything.
    #[arg(long)]
    pub dry_run: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_run_with_overrides() {
        let cli = Cli::parse_from([
            "lgexpire",
            "run",
            "--dir",
            "/var/log/app",
            "-p",
            "app",
            "--program",
            "worker",
            "--rule",
            "count=5",
            "-r",
            "level=ERROR,age=7days",
            "--dry-run",
        ]);

        let Commands::Run(args) = cli.command else {
            panic!("expected run command");
        };
        assert_eq!(args.selection.dir, Some(PathBuf::from("/var/log/app")));
        assert_eq!(args.selection.programs, vec!["app", "worker"]);
        assert_eq!(
            args.selection.rules,
            vec![
                RetentionRule::new().with_max_count(5),
                RetentionRule::new()
                    .with_level("ERROR")
                    .with_max_age(Duration::from_secs(7 * 86_400)),
            ]
        );
        assert!(args.dry_run);
    }

    #[test]
    fn rejects_malformed_rule() {
        let result = Cli::try_parse_from(["lgexpire", "plan", "--rule", "count=many"]);
        assert!(result.is_err());

        let result = Cli::try_parse_from(["lgexpire", "plan", "--rule", "level=TRACE"]);
        assert!(result.is_err());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::parse_from(["lgexpire", "plan", "--format", "json", "--config", "/etc/lgexpire.json"]);
        assert_eq!(cli.format, Format::Json);
        assert_eq!(cli.config, Some(PathBuf::from("/etc/lgexpire.json")));
        assert!(matches!(cli.command, Commands::Plan(_)));
    }

    #[test]
    fn parse_requires_files() {
        assert!(Cli::try_parse_from(["lgexpire", "parse"]).is_err());
    }

    #[test]
    fn init_config_defaults_to_stdout() {
        let cli = Cli::parse_from(["lgexpire", "init-config"]);
        assert!(matches!(
            cli.command,
            Commands::InitConfig {
                output: None,
                force: false
            }
        ));
    }
}
