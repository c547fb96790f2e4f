use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the vector-space model, the classifier and the
/// collaborators feeding them.
#[derive(Error, Debug)]
pub enum EsaError {
    /// Fitting was attempted on a collection with no documents
    #[error("cannot fit a model on an empty corpus")]
    EmptyCorpus,

    /// A document identifier is absent from the model or collection
    #[error("document '{id}' not found")]
    KeyNotFound { id: String },

    /// No candidates remain once the query itself is excluded
    #[error("no candidate documents left to classify '{query}'")]
    EmptyCandidateSet { query: String },

    /// Unsupported language or option combination
    #[error("invalid configuration: {reason}")]
    Configuration { reason: String },

    /// A vocabulary term that occurs in no document
    #[error("term '{term}' occurs in no document, idf is undefined")]
    UndefinedIdf { term: String },

    #[error("failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl EsaError {
    pub fn key_not_found(id: impl Into<String>) -> Self {
        Self::KeyNotFound { id: id.into() }
    }

    pub fn configuration(reason: impl Into<String>) -> Self {
        Self::Configuration {
            reason: reason.into(),
        }
    }

    /// Whether the failure was caused by the caller's input rather than the environment
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::Io { .. } | Self::UndefinedIdf { .. })
    }
}

pub type EsaResult<T> = Result<T, EsaError>;
