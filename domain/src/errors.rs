use thiserror::Error;

/// Failures of the retrieval core itself.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RetrieveError {
    #[error("corpus has no retrievable passages")]
    EmptyCorpus,

    #[error("embedding dimension mismatch: corpus is {expected}, query is {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("top-k must be greater than zero")]
    InvalidTopK,
}

/// Failures of the external embedding collaborator. Propagated, never
/// retried here.
#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("query embedding failed: {0}")]
    QueryEmbeddingFailed(String),
}
