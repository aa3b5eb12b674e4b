//! Error handling for CycleKit
//!
//! Provides the error types shared across the workspace:
//! - G-Code errors (malformed fragments found while tokenizing)
//! - Core errors (cycle lookup, plane selection, serialization)
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// G-Code error type
///
/// Describes a fragment of a line that could not be turned into a token.
/// The tokenizer never fails; these are collected alongside the command.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GcodeError {
    /// A word letter without a parsable number after it
    #[error("Malformed value for '{letter}' at column {column}: '{text}'")]
    MalformedNumber {
        /// The word letter.
        letter: char,
        /// The text that followed the letter.
        text: String,
        /// Zero-based column of the letter in the upper-cased line.
        column: usize,
    },

    /// A character that is neither a word, whitespace nor a comment
    #[error("Unexpected character '{character}' at column {column}")]
    UnexpectedCharacter {
        /// The offending character.
        character: char,
        /// Zero-based column in the upper-cased line.
        column: usize,
    },

    /// A parenthesized comment that is never closed
    #[error("Unterminated comment starting at column {column}")]
    UnterminatedComment {
        /// Zero-based column of the opening parenthesis.
        column: usize,
    },
}

/// Core error type
#[derive(Error, Debug)]
pub enum CoreError {
    /// A G-code number that is not a canned cycle
    #[error("G{0} is not a canned cycle code")]
    NotACycle(u32),

    /// A cycle name that could not be resolved
    #[error("Unknown cycle type: {0}")]
    UnknownCycleName(String),

    /// A plane code outside G17-G19
    #[error("Invalid plane selection: G{0}")]
    InvalidPlane(u32),

    /// Tokenizer diagnostic promoted to an error
    #[error("G-Code error: {0}")]
    Gcode(#[from] GcodeError),

    /// JSON serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
