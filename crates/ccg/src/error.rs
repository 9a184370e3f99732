//! Error types for CCG operations.
//!
//! Rule and unification failures inside the search are ordinary outcomes
//! and never surface here; these errors only cover the crate boundary.

use thiserror::Error;

/// Errors that can occur when preparing input for the recognizer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CcgError {
    /// Word not found in lexicon.
    #[error("Unknown word: '{word}'")]
    UnknownWord { word: String },

    /// Empty sentence.
    #[error("Cannot categorize empty sentence")]
    EmptySentence,

    /// Malformed category notation.
    #[error("Invalid category notation at {position}: {message}")]
    Notation { position: usize, message: String },

    /// Every variable token has been handed out.
    #[error("Variable tokens exhausted")]
    VariablesExhausted,

    /// Search configuration could not be read.
    #[error("Invalid search configuration: {message}")]
    Config { message: String },
}
