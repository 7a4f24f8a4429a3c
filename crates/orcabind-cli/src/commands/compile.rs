use crate::cli::CompileArgs;
use crate::config::load_job;
use crate::error::Result;
use std::fs;
use tracing::info;

pub fn run(args: CompileArgs) -> Result<()> {
    info!("Loading job description from {:?}", &args.job.job);
    let (_, document) = load_job(&args.job.job, &args.job.set_values)?;
    let text = document.compile();

    match &args.output {
        Some(path) => {
            fs::write(path, &text)?;
            info!(path = %path.display(), bytes = text.len(), "Input written.");
            println!("Input written to {}", path.display());
        }
        None => print!("{text}"),
    }
    Ok(())
}
