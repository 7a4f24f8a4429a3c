use orcabind::core::results::DecodeError;
use orcabind::core::sections::SectionError;
use orcabind::core::structure::StructureError;
use orcabind::core::tokens::TokenError;
use orcabind::engine::EngineError;
use orcabind::workflows::CalculationError;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Calculation(#[from] CalculationError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("Failed to decode result document: {0}")]
    Decode(#[from] DecodeError),

    #[error("Invalid token: {0}")]
    Token(#[from] TokenError),

    #[error("Invalid section field: {0}")]
    Section(#[from] SectionError),

    #[error("Invalid structure: {0}")]
    Structure(#[from] StructureError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse file '{path}': {source}", path = path.display())]
    FileParsing {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid argument: {0}")]
    Argument(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
