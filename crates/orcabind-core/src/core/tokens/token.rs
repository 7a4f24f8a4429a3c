use super::TokenError;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// An atomic keyword of the engine's directive line (a "simple input" word).
///
/// A token renders either as its bare text (`b3lyp`) or, once parameterized,
/// as `text(parameter)` (`cpcm(water)`). Equality, hashing and ordering all
/// go through the lowercased rendered text, the same form the directive line
/// prints, so `Opt` and `opt` are the same token regardless of how they were
/// built.
#[derive(Debug, Clone)]
pub struct Token {
    text: String,
    parameter: Option<Box<Token>>,
    parameterizable: bool,
}

impl Token {
    /// Creates a plain, non-parameterizable token. Surrounding whitespace is trimmed.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into().trim().to_string(),
            parameter: None,
            parameterizable: false,
        }
    }

    /// Creates a token that accepts exactly one parameter through [`Token::call`].
    pub fn parameterizable(text: impl Into<String>) -> Self {
        Self {
            parameterizable: true,
            ..Self::new(text)
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn parameter(&self) -> Option<&Token> {
        self.parameter.as_deref()
    }

    /// Whether [`Token::call`] would currently accept an argument.
    pub fn is_parameterizable(&self) -> bool {
        self.parameterizable && self.parameter.is_none()
    }

    /// Combines this token with an argument, e.g. a solvation model with a solvent.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::TypeMismatch`] if this token is not parameterizable
    /// or already carries a parameter.
    pub fn call(&self, argument: impl Into<Token>) -> Result<Token, TokenError> {
        let argument = argument.into();
        if !self.is_parameterizable() {
            return Err(TokenError::TypeMismatch {
                token: self.render(),
                argument: argument.render(),
            });
        }
        Ok(Token {
            text: self.text.clone(),
            parameter: Some(Box::new(argument)),
            parameterizable: false,
        })
    }

    pub fn render(&self) -> String {
        match &self.parameter {
            Some(parameter) => format!("{}({})", self.text, parameter.render()),
            None => self.text.clone(),
        }
    }

    /// The lowercased rendered text that identifies this token.
    pub(crate) fn identity(&self) -> String {
        self.render().to_lowercase()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.identity() == other.identity()
    }
}

impl Eq for Token {}

impl Hash for Token {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identity().hash(state);
    }
}

impl PartialOrd for Token {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Token {
    fn cmp(&self, other: &Self) -> Ordering {
        self.identity().cmp(&other.identity())
    }
}

impl From<&str> for Token {
    fn from(text: &str) -> Self {
        Token::new(text)
    }
}

impl From<String> for Token {
    fn from(text: String) -> Self {
        Token::new(text)
    }
}
