use thiserror::Error;

/// Every way a store-level operation can fail. Detected synchronously at the
/// offending call; the store is left unmodified on any error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    #[error("feature vector has {found} dimensions, the store expects {expected}")]
    DimensionMismatch { expected: usize, found: usize },

    #[error("label must be a non-empty string")]
    InvalidLabel,

    #[error("the store holds no examples; add at least one labelled example before predicting")]
    EmptyStore,

    #[error("neighbor count must be at least 1")]
    InvalidNeighborCount,

    #[error("snapshot class '{0}' holds no examples")]
    EmptyClass(String),

    #[error("snapshot lists class '{0}' more than once")]
    DuplicateClass(String),

    #[error("snapshot contains examples but declares no dimensionality")]
    UndeclaredDimensions,

    #[error("snapshot declares {declared} examples but contains {actual}")]
    CountMismatch { declared: usize, actual: usize },
}
