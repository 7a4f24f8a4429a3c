use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "orcabind CLI - compile typed job descriptions into ORCA input and inspect ORCA result documents.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compile a TOML job description into engine input text.
    Compile(CompileArgs),
    /// Write the input, run the engine and summarize its results.
    Run(RunArgs),
    /// Decode a result document and print a summary.
    Inspect(InspectArgs),
}

/// Arguments shared by every command that reads a job file.
#[derive(Args, Debug)]
pub struct JobArgs {
    /// Path to the TOML job description.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub job: PathBuf,

    /// Override a section field, e.g. `--set scf.maxiter=200` or `--set scf.diis.start=0.1`.
    #[arg(long = "set", value_name = "SECTION.FIELD=VALUE")]
    pub set_values: Vec<String>,
}

/// Arguments for the `compile` subcommand.
#[derive(Args, Debug)]
pub struct CompileArgs {
    #[command(flatten)]
    pub job: JobArgs,

    /// Write the input here instead of standard output.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

/// Arguments for the `run` subcommand.
#[derive(Args, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub job: JobArgs,

    /// Path to the engine executable.
    #[arg(long, env = "ORCA_EXE", default_value = "orca", value_name = "PATH")]
    pub engine: PathBuf,

    /// Directory the engine runs in. Defaults to the job file's directory.
    #[arg(short, long, value_name = "DIR")]
    pub workdir: Option<PathBuf>,

    /// Drop result records of unknown type instead of failing.
    #[arg(long)]
    pub skip_unknown: bool,
}

/// Arguments for the `inspect` subcommand.
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// A `<basename>.property.json` document.
    #[arg(long, value_name = "PATH", required_unless_present = "gbw")]
    pub property: Option<PathBuf>,

    /// A `<basename>.json` wavefunction document.
    #[arg(long, value_name = "PATH")]
    pub gbw: Option<PathBuf>,

    /// Drop result records of unknown type instead of failing.
    #[arg(long)]
    pub skip_unknown: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_compile_with_overrides() {
        let cli = Cli::try_parse_from([
            "orcabind", "-vv", "compile", "--job", "job.toml", "--set", "scf.maxiter=200",
            "--output", "job.inp",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        let Commands::Compile(args) = cli.command else {
            panic!("expected the compile command");
        };
        assert_eq!(args.job.job, PathBuf::from("job.toml"));
        assert_eq!(args.job.set_values, vec!["scf.maxiter=200".to_string()]);
        assert_eq!(args.output, Some(PathBuf::from("job.inp")));
    }

    #[test]
    fn inspect_needs_a_document() {
        assert!(Cli::try_parse_from(["orcabind", "inspect"]).is_err());
        assert!(Cli::try_parse_from(["orcabind", "inspect", "--gbw", "job.json"]).is_ok());
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["orcabind", "-q", "-v", "inspect", "--gbw", "x.json"]).is_err());
    }
}
