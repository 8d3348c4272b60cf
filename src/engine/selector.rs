//! Candidate selection over one check's ordered candidates.

use crate::core::candidate::Candidate;
use crate::core::check::Check;
use crate::core::state::ConfigState;
use crate::engine::errors::SelectError;
use crate::probe::{Probe, ProbeReport};

/// How a check's accepted candidates are narrowed to one.
///
/// Chosen once per run and applied uniformly to every check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionPolicy {
    /// Accept the first candidate that probes successfully and stop.
    #[default]
    FirstMatch,
    /// Probe every candidate, then ask the chooser to pick among all
    /// that were accepted.
    AllMatches,
}

/// External collaborator that picks among accepted candidates.
///
/// `accepted` is never empty. The return value indexes into `accepted`;
/// `None` (or an out-of-range index) means "take the first".
pub trait Chooser {
    fn choose(&mut self, check: &Check, accepted: &[&Candidate]) -> Option<usize>;
}

/// Always defers to the first accepted candidate.
pub struct FirstChooser;

impl Chooser for FirstChooser {
    fn choose(&mut self, _check: &Check, _accepted: &[&Candidate]) -> Option<usize> {
        None
    }
}

/// The accepted candidate's position in the authored list, plus the
/// probe report that accepted it (resolvers may read captured output).
#[derive(Debug)]
pub struct Selection {
    pub index: usize,
    pub report: ProbeReport,
}

/// Run the check's candidates under the policy.
///
/// Candidate lists are authored most-preferred-first; under
/// `FirstMatch` the authored order is the only ordering ever consulted,
/// and under `AllMatches` list order breaks every tie.
pub fn select(
    check: &Check,
    state: &ConfigState,
    probe: &mut dyn Probe,
    policy: SelectionPolicy,
    chooser: &mut dyn Chooser,
) -> Result<Selection, SelectError> {
    match policy {
        SelectionPolicy::FirstMatch => {
            for (index, candidate) in check.candidates.iter().enumerate() {
                let report = probe.probe(candidate, state)?;
                if report.accepted {
                    return Ok(Selection { index, report });
                }
            }
            Err(SelectError::Exhausted)
        }
        SelectionPolicy::AllMatches => {
            let mut accepted: Vec<(usize, ProbeReport)> = Vec::new();
            for (index, candidate) in check.candidates.iter().enumerate() {
                let report = probe.probe(candidate, state)?;
                if report.accepted {
                    accepted.push((index, report));
                }
            }
            if accepted.is_empty() {
                return Err(SelectError::Exhausted);
            }

            let shortlist: Vec<&Candidate> = accepted
                .iter()
                .map(|(i, _)| &check.candidates[*i])
                .collect();
            let pick = chooser
                .choose(check, &shortlist)
                .filter(|&i| i < accepted.len())
                .unwrap_or(0);
            let (index, report) = accepted.swap_remove(pick);
            Ok(Selection { index, report })
        }
    }
}
