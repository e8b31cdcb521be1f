//! Parser infrastructure errors.
//!
//! Malformed source is not an error: it becomes a syntax-error issue.
//! These variants cover the parser itself failing.

use super::error_code::{self, StratguardErrorCode};

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("failed to load grammar for {language}: {message}")]
    GrammarLoad { language: String, message: String },

    #[error("parser produced no tree for {name}")]
    NoTree { name: String },
}

impl StratguardErrorCode for ParseError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::GrammarLoad { .. } => error_code::GRAMMAR_LOAD_FAILED,
            Self::NoTree { .. } => error_code::PARSER_FAILED,
        }
    }
}
