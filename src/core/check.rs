//! Checks: one logical configuration decision with ordered candidates.

use crate::core::candidate::Candidate;
use crate::core::state::{ConfigState, StateError};
use crate::probe::ProbeReport;

/// Applies an accepted candidate to the configuration state.
///
/// Receives the accepted candidate and the probe report (version probes
/// read captured output). Only successful candidates ever reach a
/// resolver; rejected trials never touch state.
pub type Resolver = Box<dyn Fn(&Candidate, &ProbeReport, &mut ConfigState) -> Result<(), StateError>>;

/// Decides from earlier state whether a check should run at all.
pub type Gate = Box<dyn Fn(&ConfigState) -> bool>;

/// One logical configuration decision.
///
/// A check either resolves to exactly one accepted candidate or fails.
/// Required checks abort the run when exhausted; optional checks record
/// a warning and leave their state keys absent.
pub struct Check {
    pub id: String,
    /// Human purpose, e.g. "BLAS library".
    pub purpose: String,
    pub required: bool,
    /// Trial program body shared by candidates that don't carry their own.
    pub source: String,
    /// Ordered most-preferred-first; order is the only tie-break.
    pub candidates: Vec<Candidate>,
    pub resolver: Resolver,
    pub gate: Option<Gate>,
}

impl Check {
    /// A required check. `source` is the shared trial program body.
    pub fn new(id: impl Into<String>, purpose: impl Into<String>, source: impl Into<String>) -> Self {
        Check {
            id: id.into(),
            purpose: purpose.into(),
            required: true,
            source: source.into(),
            candidates: Vec::new(),
            resolver: Box::new(|_, _, _| Ok(())),
            gate: None,
        }
    }

    /// Mark the check optional: exhaustion warns instead of aborting.
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Add one candidate, inheriting the check's trial source if the
    /// candidate doesn't carry its own.
    pub fn candidate(mut self, mut candidate: Candidate) -> Self {
        if candidate.source.is_empty() {
            candidate.source = self.source.clone();
        }
        self.candidates.push(candidate);
        self
    }

    /// Add candidates in authored order.
    pub fn candidates(mut self, candidates: impl IntoIterator<Item = Candidate>) -> Self {
        for c in candidates {
            self = self.candidate(c);
        }
        self
    }

    /// Set the resolver applied to the accepted candidate.
    pub fn resolve(
        mut self,
        f: impl Fn(&Candidate, &ProbeReport, &mut ConfigState) -> Result<(), StateError> + 'static,
    ) -> Self {
        self.resolver = Box::new(f);
        self
    }

    /// Gate the check on earlier state; a false gate skips the check
    /// without warning (feature not applicable in this environment).
    pub fn gated(mut self, f: impl Fn(&ConfigState) -> bool + 'static) -> Self {
        self.gate = Some(Box::new(f));
        self
    }

    /// Whether earlier state allows this check to run.
    pub fn enabled(&self, state: &ConfigState) -> bool {
        self.gate.as_ref().map_or(true, |g| g(state))
    }
}

impl std::fmt::Debug for Check {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Check")
            .field("id", &self.id)
            .field("purpose", &self.purpose)
            .field("required", &self.required)
            .field("candidates", &self.candidates.len())
            .field("gated", &self.gate.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidates_inherit_check_source() {
        let check = Check::new("cxx-std", "C++ standard flag", "int main() { return 0; }")
            .candidates([Candidate::flag("-std=c++20"), Candidate::flag("-std=c++17")]);
        assert!(check.required);
        assert_eq!(check.candidates.len(), 2);
        assert_eq!(check.candidates[0].source, "int main() { return 0; }");
    }

    #[test]
    fn test_candidate_keeps_own_source() {
        let check = Check::new("x", "x", "shared")
            .candidate(Candidate::flag("-a").with_source("own"));
        assert_eq!(check.candidates[0].source, "own");
    }

    #[test]
    fn test_gate_consults_state() {
        let check = Check::new("lapacke-pstrf", "LAPACKE pstrf", "")
            .optional()
            .gated(|s| s.get_bool("HAVE_LAPACKE"));
        let mut state = ConfigState::new("fathom");
        assert!(!check.enabled(&state));
        state.set("HAVE_LAPACKE", true).unwrap();
        assert!(check.enabled(&state));
    }
}
