//! Probing: trial-compiling candidates against the real toolchain.
//!
//! A probe is purely advisory. It reports whether a trial was accepted
//! and preserves the raw diagnostics; it never mutates configuration
//! state and never errors for an unsuccessful trial. Only unrecoverable
//! conditions (the selected compiler can no longer be executed, scratch
//! area I/O failures) surface as [`ProbeError`].

pub mod paths;
pub mod toolchain;

use thiserror::Error;

use crate::core::candidate::Candidate;
use crate::core::state::ConfigState;

pub use paths::SearchPaths;
pub use toolchain::ToolchainProbe;

/// Outcome of a single trial.
#[derive(Debug, Clone)]
pub struct ProbeReport {
    pub accepted: bool,
    /// Raw diagnostic text: the command line, toolchain output, and for
    /// run trials the trial binary's stdout.
    pub output: String,
    /// The trial binary's stdout alone, empty for trials that never ran.
    /// Resolvers that parse probe output (version probes) must read this,
    /// not `output`: the diagnostic text starts with the command line,
    /// and a versioned path in there would match first.
    pub stdout: String,
}

impl ProbeReport {
    pub fn accepted(output: impl Into<String>) -> Self {
        ProbeReport {
            accepted: true,
            output: output.into(),
            stdout: String::new(),
        }
    }

    pub fn rejected(output: impl Into<String>) -> Self {
        ProbeReport {
            accepted: false,
            output: output.into(),
            stdout: String::new(),
        }
    }

    /// Attach the trial binary's captured stdout.
    pub fn with_stdout(mut self, stdout: impl Into<String>) -> Self {
        self.stdout = stdout.into();
        self
    }
}

/// Unrecoverable probing failure, distinct from "trial failed".
#[derive(Debug, Error)]
pub enum ProbeError {
    /// The previously selected compiler can no longer be executed.
    #[error("compiler `{program}` could not be executed: {message}")]
    ToolUnusable { program: String, message: String },

    /// A trial needed the compiler before the compiler check resolved.
    /// Indicates a mis-ordered check catalog.
    #[error("trial requires a compiler but none has been selected yet")]
    CompilerUnresolved,

    /// Scratch area or log I/O failed.
    #[error("scratch area error: {0}")]
    Scratch(#[from] std::io::Error),
}

/// One trial of one candidate under the accumulated state.
pub trait Probe {
    fn probe(&mut self, candidate: &Candidate, state: &ConfigState)
        -> Result<ProbeReport, ProbeError>;
}
