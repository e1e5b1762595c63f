//! Path addressing for flow documents
//!
//! A small dot/bracket path language over `serde_json::Value` trees:
//!
//! - `Parameters.Text`: member lookup
//! - `Parameters.Steps[0].Text`: fixed array index
//! - `Parameters.Messages[*].PromptId`: every element of an array
//!
//! Reading ([`resolve_single`], [`resolve_all`]) treats a miss as "no value".
//! Writing ([`write`]) takes a fully resolved [`Location`] and reports
//! structural mismatches as [`PathError`].

mod location;
mod mutator;
mod navigator;
mod parser;

pub use location::{Location, LocationStep, Position};
pub use mutator::{write, write_path};
pub use navigator::{resolve_all, resolve_all_str, resolve_single, resolve_single_str, PathMatch};
pub use parser::{parse_path, PathExpr, PathSegment, WILDCARD_TOKEN};

use thiserror::Error;

/// Structural errors raised when writing into a document
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PathError {
    #[error("expected an array at '{location}'")]
    NotASequence { location: String },

    #[error("index {index} is out of range at '{location}' (length {len})")]
    IndexOutOfRange {
        location: String,
        index: usize,
        len: usize,
    },

    #[error("expected an object at '{location}'")]
    NotAMapping { location: String },

    #[error("location '{expression}' still contains a wildcard")]
    WildcardInLocation { expression: String },

    #[error("cannot write to an empty location")]
    EmptyLocation,
}

impl PathError {
    /// The location the error refers to, if any
    pub fn location(&self) -> Option<&str> {
        match self {
            Self::NotASequence { location }
            | Self::IndexOutOfRange { location, .. }
            | Self::NotAMapping { location } => Some(location),
            Self::WildcardInLocation { expression } => Some(expression),
            Self::EmptyLocation => None,
        }
    }
}
