use thiserror::Error;

/// Fatal pipeline errors. The pipeline aborts at the earliest stage that
/// detects one of these.
#[derive(Debug, Error)]
pub enum Error {
    #[error("unsupported schema draft: {0}")]
    UnsupportedSchemaDraft(String),

    #[error("unresolved reference: {0}")]
    UnresolvedReference(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Non-fatal findings, accumulated in a side channel and returned alongside
/// the model map. They never affect the map itself.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Warning {
    #[error("merge conflict on `{id}`: {detail}")]
    MergeConflict { id: String, detail: String },
}
