//! lgexpire CLI binary entrypoint.

use std::io;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use lgexpire_cli::cli::{Cli, Commands};
use lgexpire_cli::commands::{InitConfigCommand, ParseCommand, PlanCommand, RunCommand};
use lgexpire_cli::output::OutputFormat;
use lgexpire_cli::CliError;

fn main() -> ExitCode {
    if let Err(e) = init_tracing() {
        eprintln!("Failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr so JSON output on stdout stays parseable.
fn init_tracing() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(
            EnvFilter::from_default_env()
                .add_directive("lgexpire=info".parse()?)
                .add_directive("lgexpire_cli=info".parse()?),
        )
        .try_init()?;
    Ok(())
}

fn run(cli: Cli) -> Result<(), CliError> {
    let format = OutputFormat::new(cli.format);
    let config = cli.config.as_deref();
    let mut stdout = io::stdout().lock();

    match cli.command {
        Commands::Run(args) => {
            let cmd = RunCommand::new(config);
            cmd.execute(&mut stdout, &format, &args)?;
        }
        Commands::Plan(args) => {
            let cmd = PlanCommand::new(config);
            cmd.execute(&mut stdout, &format, &args)?;
        }
        Commands::Parse { files } => {
            let cmd = ParseCommand::new();
            cmd.execute(&mut stdout, &format, &files)?;
        }
        Commands::InitConfig { output, force } => {
            let cmd = InitConfigCommand::new(force);
            cmd.execute(&mut stdout, output.as_deref())?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lgexpire_cli::cli::Format;

    #[test]
    fn cli_parses_run() {
        let cli = Cli::parse_from(["lgexpire", "run", "-p", "app"]);
        assert!(matches!(cli.command, Commands::Run(_)));
    }

    #[test]
    fn cli_respects_format_flag() {
        let cli = Cli::parse_from(["lgexpire", "--format", "json", "parse", "a"]);
        assert_eq!(cli.format, Format::Json);
    }

    #[test]
    fn run_without_programs_fails() {
        let cli = Cli::parse_from(["lgexpire", "plan", "--dir", "/nonexistent"]);
        assert!(run(cli).is_err());
    }

    #[test]
    fn run_parse_command() {
        let cli = Cli::parse_from(["lgexpire", "parse", "app.host.user.log.INFO.20160101-000000.1"]);
        assert!(run(cli).is_ok());
    }
}
