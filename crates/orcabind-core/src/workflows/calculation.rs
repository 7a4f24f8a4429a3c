use crate::core::document::ConfigDocument;
use crate::core::results::{
    DecodeError, DecodeOptions, GbwResults, PropertyResults, ResultNode, load_document,
};
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::runner::{EngineRunner, RunOutcome, RunRequest};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, instrument};

#[derive(Debug, Error)]
pub enum CalculationError {
    #[error("Invalid basename '{0}': expected a non-empty file stem without path separators")]
    InvalidBasename(String),

    #[error("Failed to write input file '{path}': {source}")]
    WriteInput {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("Engine run '{basename}' did not terminate normally (exit code {exit_code:?})")]
    RunFailed {
        basename: String,
        exit_code: Option<i32>,
    },

    #[error("Failed to decode '{path}': {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: DecodeError,
    },
}

/// One engine calculation: a compiled input document and the files the run
/// reads and writes inside `working_dir`, all named after `basename`.
#[derive(Debug, Clone)]
pub struct Calculation {
    basename: String,
    working_dir: PathBuf,
    document: ConfigDocument,
    decode_options: DecodeOptions,
}

impl Calculation {
    pub fn new(
        basename: impl Into<String>,
        working_dir: impl Into<PathBuf>,
        document: ConfigDocument,
    ) -> Result<Self, CalculationError> {
        let basename = basename.into();
        let trimmed = basename.trim();
        if trimmed.is_empty() || trimmed.contains(['/', '\\']) || trimmed != basename {
            return Err(CalculationError::InvalidBasename(basename));
        }
        Ok(Self {
            basename,
            working_dir: working_dir.into(),
            document,
            decode_options: DecodeOptions::default(),
        })
    }

    pub fn with_decode_options(mut self, options: DecodeOptions) -> Self {
        self.decode_options = options;
        self
    }

    pub fn basename(&self) -> &str {
        &self.basename
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    pub fn document(&self) -> &ConfigDocument {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut ConfigDocument {
        &mut self.document
    }

    fn file(&self, suffix: &str) -> PathBuf {
        self.working_dir.join(format!("{}{}", self.basename, suffix))
    }

    pub fn input_path(&self) -> PathBuf {
        self.file(".inp")
    }

    pub fn output_path(&self) -> PathBuf {
        self.file(".out")
    }

    pub fn property_path(&self) -> PathBuf {
        self.file(".property.json")
    }

    /// The JSON export of the `.gbw` wavefunction file.
    pub fn gbw_json_path(&self) -> PathBuf {
        self.file(".json")
    }

    /// Compiles the document into `<basename>.inp`, creating the working
    /// directory if needed.
    #[instrument(skip_all, fields(basename = %self.basename))]
    pub fn write_input(&self) -> Result<PathBuf, CalculationError> {
        let path = self.input_path();
        let write = || -> io::Result<()> {
            fs::create_dir_all(&self.working_dir)?;
            self.document.write_to_path(&path)
        };
        write().map_err(|source| CalculationError::WriteInput {
            path: path.clone(),
            source,
        })?;
        info!(path = %path.display(), "Wrote engine input.");
        Ok(path)
    }

    pub fn run(&self, runner: &impl EngineRunner) -> Result<RunOutcome, CalculationError> {
        self.run_with_progress(runner, &ProgressReporter::new())
    }

    /// Writes the input, runs the engine and checks its exit status.
    ///
    /// # Errors
    ///
    /// Fails if the input cannot be written, the runner cannot launch the
    /// engine, or the engine reports an unsuccessful exit.
    #[instrument(skip_all, name = "calculation", fields(basename = %self.basename))]
    pub fn run_with_progress(
        &self,
        runner: &impl EngineRunner,
        reporter: &ProgressReporter,
    ) -> Result<RunOutcome, CalculationError> {
        let input_path = self.write_input()?;
        reporter.report(Progress::InputWritten {
            path: input_path.clone(),
        });

        let input_file = input_path
            .file_name()
            .map(Path::new)
            .unwrap_or(input_path.as_path());
        let request = RunRequest {
            working_dir: &self.working_dir,
            input_file,
            basename: &self.basename,
        };

        reporter.report(Progress::EngineStarted {
            basename: self.basename.clone(),
        });
        info!("Starting engine run.");
        let outcome = runner.run(&request)?;
        reporter.report(Progress::EngineFinished {
            success: outcome.success,
        });

        if !outcome.success {
            return Err(CalculationError::RunFailed {
                basename: self.basename.clone(),
                exit_code: outcome.exit_code,
            });
        }
        info!(exit_code = ?outcome.exit_code, "Engine run finished.");
        Ok(outcome)
    }

    pub fn load_properties(&self) -> Result<PropertyResults, CalculationError> {
        self.load(self.property_path(), "property")
    }

    pub fn load_gbw(&self) -> Result<GbwResults, CalculationError> {
        self.load(self.gbw_json_path(), "gbw")
    }

    #[instrument(skip_all, fields(basename = %self.basename, document = kind))]
    fn load<T: ResultNode>(&self, path: PathBuf, kind: &'static str) -> Result<T, CalculationError> {
        let node = load_document(&path, &self.decode_options)
            .map_err(|source| CalculationError::Decode { path: path.clone(), source })?;
        info!(path = %path.display(), "Loaded result document.");
        Ok(node)
    }
}
