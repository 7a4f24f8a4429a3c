use thiserror::Error;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Expected a JSON object at '{path}'")]
    NotAnObject { path: String },

    #[error("Field '{field}' has the wrong type: expected {expected}")]
    TypeMismatch {
        field: String,
        expected: &'static str,
    },

    #[error("Field '{field}' violates its constraint: {reason}")]
    ConstraintViolation { field: String, reason: String },

    #[error("Element '{element}' has no '{tag_field}' discriminator")]
    MissingDiscriminator {
        element: String,
        tag_field: String,
    },

    #[error("Unknown variant '{tag}' at '{element}'")]
    UnknownVariant { element: String, tag: String },
}
