use thiserror::Error;

use crate::corrections::Checkpoint;

/// Missing-precondition failures. Each one halts the current document only.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    #[error("no text lines extracted from {doc}")]
    NoLines { doc: String },
    #[error("no transactional hearing section found in {doc}")]
    SectionNotFound { doc: String },
    #[error("no license chunks extracted from {doc}")]
    NoChunks { doc: String },
    #[error("no listing records found in {doc}")]
    EmptyListing { doc: String },
    #[error("layout documents have no text section: {doc}")]
    LayoutDocument { doc: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    #[error("duplicate correction rule name: {0}")]
    DuplicateName(&'static str),
    #[error("correction rule {0} has no effects")]
    NoEffects(&'static str),
    #[error("correction rule {second} shadows {first} at {checkpoint} (target {target:?})")]
    Shadowed {
        first: &'static str,
        second: &'static str,
        checkpoint: Checkpoint,
        target: &'static str,
    },
}
