use super::config::ConfigError;
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid runner configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to launch engine executable '{program}': {source}")]
    Launch {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("I/O error while preparing the engine run: {0}")]
    Io(#[from] io::Error),
}
