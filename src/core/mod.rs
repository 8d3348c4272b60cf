//! Core data model: candidates, checks, and configuration state.

pub mod candidate;
pub mod check;
pub mod state;

pub use candidate::{Acceptance, Candidate, Payload};
pub use check::Check;
pub use state::{ConfigState, StateError, Value};
