//! Error types for trex.

use crate::axiom::FactKind;
use crate::inference::Relation;
use thiserror::Error;

/// The main error type for trex operations.
#[derive(Debug, Error)]
pub enum TrexError {
    /// No registered matrix answers facts of this kind
    #[error("unsupported relation: {0}")]
    UnsupportedRelation(FactKind),

    /// Explanation requested from a reasoner built without explanation tracking
    #[error("explanations unavailable: reasoner was built without explanation tracking")]
    ExplanationsUnavailable,

    /// Fact cannot be handled by the provider it was routed to
    #[error("unprocessable fact {fact}: {reason}")]
    UnprocessableFact { fact: String, reason: String },

    /// Fact references an entity the naming registry does not know
    #[error("unknown entity: {0}")]
    UnknownEntity(String),

    /// A provider was wired up before a matrix it reads
    #[error("{relation} depends on {dependency}, which has not been materialized")]
    MissingDependency {
        relation: Relation,
        dependency: Relation,
    },

    /// Parse error
    #[error("parse error at {location}: {message}")]
    Parse { location: String, message: String },

    /// I/O error while loading a document
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl TrexError {
    pub(crate) fn unprocessable(fact: impl ToString, reason: impl Into<String>) -> Self {
        TrexError::UnprocessableFact {
            fact: fact.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type for trex operations.
pub type Result<T> = std::result::Result<T, TrexError>;
