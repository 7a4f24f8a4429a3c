use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid environment variable name '{0}'")]
    InvalidEnvironmentName(String),
}

/// How the engine executable is launched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerConfig {
    pub executable: PathBuf,
    /// Passed after the input file name.
    pub arguments: Vec<String>,
    pub environment: Vec<(String, String)>,
    /// Redirect standard output into `<basename>.out` in the working directory.
    pub capture_output: bool,
}

#[derive(Debug, Default)]
pub struct RunnerConfigBuilder {
    executable: Option<PathBuf>,
    arguments: Vec<String>,
    environment: Vec<(String, String)>,
    capture_output: Option<bool>,
}

impl RunnerConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn executable(mut self, path: impl Into<PathBuf>) -> Self {
        self.executable = Some(path.into());
        self
    }

    pub fn argument(mut self, argument: impl Into<String>) -> Self {
        self.arguments.push(argument.into());
        self
    }

    pub fn env(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.environment.push((name.into(), value.into()));
        self
    }

    pub fn capture_output(mut self, capture: bool) -> Self {
        self.capture_output = Some(capture);
        self
    }

    pub fn build(self) -> Result<RunnerConfig, ConfigError> {
        let executable = self
            .executable
            .ok_or(ConfigError::MissingParameter("executable"))?;
        if let Some((name, _)) = self
            .environment
            .iter()
            .find(|(name, _)| name.is_empty() || name.contains('='))
        {
            return Err(ConfigError::InvalidEnvironmentName(name.clone()));
        }
        Ok(RunnerConfig {
            executable,
            arguments: self.arguments,
            environment: self.environment,
            capture_output: self.capture_output.unwrap_or(true),
        })
    }
}
