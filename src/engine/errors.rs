//! Engine error taxonomy.
//!
//! Ordinary trial failures are never errors; they flow back through
//! `ProbeReport`. Only check exhaustion, fatal probe conditions, and
//! state conflicts travel this path.

use thiserror::Error;

use crate::core::state::StateError;
use crate::probe::ProbeError;

/// Failure to select a candidate for one check.
#[derive(Debug, Error)]
pub enum SelectError {
    /// Every candidate was probed and none was accepted.
    #[error("no candidate was accepted")]
    Exhausted,

    /// Probing itself became impossible.
    #[error(transparent)]
    Fatal(#[from] ProbeError),
}

/// Terminal failure of the whole check sequence.
#[derive(Debug, Error)]
pub enum RunError {
    /// A required check exhausted its candidates. No later check ran and
    /// no output artifacts may be written.
    #[error("required check failed: no working candidate for {purpose}")]
    Aborted { id: String, purpose: String },

    /// The toolchain became unusable mid-run.
    #[error(transparent)]
    Probe(#[from] ProbeError),

    /// A resolver violated the write-once state discipline. This is an
    /// internal defect and must fail loudly.
    #[error(transparent)]
    State(#[from] StateError),
}
