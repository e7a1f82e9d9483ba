use lemmapack_types::{PatternId, PatternIdOverflow};
use thiserror::Error;

/// Failures while reading word lists or writing dictionary tables.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("line {line}: inflection {text:?} appears before any lemma marker")]
    MalformedRecord { line: usize, text: String },
    #[error("lemma {lemma:?} yields a stem or suffix containing a tab or line break")]
    ReservedCharacter { lemma: String },
    #[error("pattern catalog is full: {0}")]
    PatternOverflow(#[from] PatternIdOverflow),
    #[error(transparent)]
    Format(#[from] FormatError),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// A dictionary entry that cannot be reconstructed from the catalog.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum FormatError {
    #[error("pattern {id} is out of range (catalog holds {len} patterns)")]
    UnknownPattern { id: PatternId, len: usize },
    #[error("pattern {id} has {actual} suffixes but the entry declares {expected}")]
    ArityMismatch {
        id: PatternId,
        expected: usize,
        actual: usize,
    },
    #[error("malformed entry {line:?}: {reason}")]
    MalformedEntry { line: String, reason: &'static str },
}
