use super::config::{RunnerConfig, RunnerConfigBuilder};
use super::error::EngineError;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::{debug, instrument, warn};

/// One engine invocation: an input file inside a working directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunRequest<'a> {
    pub working_dir: &'a Path,
    /// Input file name, relative to `working_dir`.
    pub input_file: &'a Path,
    pub basename: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    pub success: bool,
    pub exit_code: Option<i32>,
    /// Where standard output was captured, if it was.
    pub output_file: Option<PathBuf>,
}

/// Executes the engine on a prepared input file.
///
/// Implementations must not return before the engine has finished writing its
/// result documents into the working directory.
pub trait EngineRunner {
    fn run(&self, request: &RunRequest<'_>) -> Result<RunOutcome, EngineError>;
}

/// Runs the engine as a child process and waits for it to exit.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    config: RunnerConfig,
}

impl ProcessRunner {
    pub fn new(config: RunnerConfig) -> Self {
        Self { config }
    }

    /// A runner for `executable` with default settings.
    pub fn from_executable(executable: impl Into<PathBuf>) -> Result<Self, EngineError> {
        Ok(Self::new(
            RunnerConfigBuilder::new().executable(executable).build()?,
        ))
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }
}

impl EngineRunner for ProcessRunner {
    #[instrument(skip_all, fields(basename = request.basename))]
    fn run(&self, request: &RunRequest<'_>) -> Result<RunOutcome, EngineError> {
        let program = self.config.executable.display().to_string();
        let mut command = Command::new(&self.config.executable);
        command
            .arg(request.input_file)
            .args(&self.config.arguments)
            .current_dir(request.working_dir)
            .stdin(Stdio::null());
        for (name, value) in &self.config.environment {
            command.env(name, value);
        }

        let output_file = if self.config.capture_output {
            let path = request
                .working_dir
                .join(format!("{}.out", request.basename));
            command.stdout(Stdio::from(File::create(&path)?));
            Some(path)
        } else {
            None
        };

        debug!(program = %program, input = %request.input_file.display(), "Launching engine.");
        let status = command
            .status()
            .map_err(|source| EngineError::Launch { program, source })?;

        if !status.success() {
            warn!(exit_code = ?status.code(), "Engine exited with a failure status.");
        }
        Ok(RunOutcome {
            success: status.success(),
            exit_code: status.code(),
            output_file,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn missing_executable_is_a_launch_error() {
        let dir = tempdir().unwrap();
        let runner = ProcessRunner::from_executable("/nonexistent/orcabind-engine").unwrap();
        let request = RunRequest {
            working_dir: dir.path(),
            input_file: Path::new("job.inp"),
            basename: "job",
        };
        let err = runner.run(&request).unwrap_err();
        assert!(matches!(err, EngineError::Launch { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn captures_standard_output_next_to_the_input() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("job.inp"), "echo finished\n").unwrap();
        let runner = ProcessRunner::from_executable("sh").unwrap();
        let request = RunRequest {
            working_dir: dir.path(),
            input_file: Path::new("job.inp"),
            basename: "job",
        };

        let outcome = runner.run(&request).unwrap();

        assert!(outcome.success);
        assert_eq!(outcome.exit_code, Some(0));
        let output = outcome.output_file.unwrap();
        assert_eq!(output, dir.path().join("job.out"));
        assert_eq!(fs::read_to_string(output).unwrap(), "finished\n");
    }

    #[cfg(unix)]
    #[test]
    fn failing_runs_report_their_exit_code() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("job.inp"), "exit 3\n").unwrap();
        let config = RunnerConfigBuilder::new()
            .executable("sh")
            .capture_output(false)
            .build()
            .unwrap();
        let request = RunRequest {
            working_dir: dir.path(),
            input_file: Path::new("job.inp"),
            basename: "job",
        };

        let outcome = ProcessRunner::new(config).run(&request).unwrap();

        assert!(!outcome.success);
        assert_eq!(outcome.exit_code, Some(3));
        assert_eq!(outcome.output_file, None);
    }
}
