use crate::cli::RunArgs;
use crate::commands::inspect::{decode_options, summarize_properties};
use crate::config::load_job;
use crate::error::{CliError, Result};
use orcabind::engine::{Progress, ProgressReporter, ProcessRunner};
use orcabind::workflows::Calculation;
use std::path::Path;
use tracing::info;

pub fn run(args: RunArgs) -> Result<()> {
    let job_path = &args.job.job;
    let (job, document) = load_job(job_path, &args.job.set_values)?;

    let basename = match job.basename {
        Some(name) => name,
        None => job_path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .map(str::to_string)
            .ok_or_else(|| {
                CliError::Argument(format!("Cannot derive a basename from {:?}", job_path))
            })?,
    };
    let workdir = match &args.workdir {
        Some(dir) => dir.clone(),
        None => job_path
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf(),
    };

    let calculation = Calculation::new(basename, workdir, document)?
        .with_decode_options(decode_options(args.skip_unknown));
    let runner = ProcessRunner::from_executable(&args.engine)?;
    let reporter = ProgressReporter::with_callback(Box::new(|event| match event {
        Progress::InputWritten { path } => println!("Wrote input {}", path.display()),
        Progress::EngineStarted { basename } => println!("Running engine on '{basename}'..."),
        Progress::EngineFinished { success } => {
            println!("Engine finished ({}).", if success { "ok" } else { "failed" })
        }
    }));

    info!("Invoking the calculation workflow...");
    calculation.run_with_progress(&runner, &reporter)?;

    let results = calculation.load_properties()?;
    print!("{}", summarize_properties(&results));
    Ok(())
}
