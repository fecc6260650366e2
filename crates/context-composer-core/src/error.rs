//! Error types for context composition.

use thiserror::Error;

/// Precondition violations detected while building fragments or lexicons.
///
/// Composition itself never fails once fragments exist; these errors are
/// raised at the boundary where retrieved records enter the core.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ComposeError {
    #[error("retrieved record {index} has no text payload")]
    MissingText { index: usize },

    #[error("retrieved record {index} has a non-string provenance: {found}")]
    InvalidProvenance { index: usize, found: String },

    #[error("invalid cue lexicon: {0}")]
    InvalidLexicon(String),
}

/// Result type alias using [`ComposeError`].
pub type Result<T> = std::result::Result<T, ComposeError>;
