//! Diagnostics for parse, dispatch, and argument-coercion failures.
//!
//! A single positioned [`ParseError`] covers all four failure classes
//! (lexical, structural, resolution, argument). The first diagnostic
//! aborts an `interpret()` pass - there is no best-effort recovery.

use thiserror::Error;

use crate::actuator::ActuatorError;
use crate::position::Position;

/// A positioned diagnostic, rendered as `name:(line:col): message` or
/// `(line:col): message` when no instruction name is available.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", render(.pos, .name, .message))]
pub struct ParseError {
    pub pos: Position,
    pub name: Option<String>,
    pub message: String,
}

impl ParseError {
    /// Build a diagnostic with no instruction-name context.
    pub fn new(pos: Position, message: impl Into<String>) -> Self {
        Self {
            pos,
            name: None,
            message: message.into(),
        }
    }

    /// Build a diagnostic carrying the raw instruction/method name.
    pub fn named(pos: Position, message: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            pos,
            name: Some(name.into()),
            message: message.into(),
        }
    }

    /// Attach an instruction name for context, unless one is already set.
    pub fn with_name(mut self, name: &str) -> Self {
        if self.name.is_none() {
            self.name = Some(name.to_string());
        }
        self
    }
}

fn render(pos: &Position, name: &Option<String>, message: &str) -> String {
    match name {
        Some(name) => format!("{name}:{pos}: {message}"),
        None => format!("{pos}: {message}"),
    }
}

/// Any failure raised while interpreting a script.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Actuator(#[from] ActuatorError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Attach an instruction name to a parse diagnostic that lacks one;
    /// other failure classes pass through unchanged.
    pub fn with_name(self, name: &str) -> Self {
        match self {
            Error::Parse(err) => Error::Parse(err.with_name(name)),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_without_name() {
        let err = ParseError::new(Position::new(4, 7), "Not enough args");
        assert_eq!(err.to_string(), "(4:7): Not enough args");
    }

    #[test]
    fn test_render_with_name() {
        let err = ParseError::named(Position::new(1, 1), "does not exist", "clikc");
        assert_eq!(err.to_string(), "clikc:(1:1): does not exist");
    }

    #[test]
    fn test_with_name_does_not_override() {
        let err = ParseError::named(Position::first(), "msg", "click").with_name("paste");
        assert_eq!(err.name.as_deref(), Some("click"));

        let err = ParseError::new(Position::first(), "msg").with_name("paste");
        assert_eq!(err.name.as_deref(), Some("paste"));
    }
}
