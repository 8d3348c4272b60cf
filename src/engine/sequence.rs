//! The dependency-ordered check sequence.
//!
//! Checks run strictly in authored order, single-threaded, so later
//! checks can read state written by earlier ones. A required check with
//! no working candidate aborts the run immediately; an optional one
//! records a warning, leaves its keys absent, and the run continues.

use crate::core::check::Check;
use crate::core::state::ConfigState;
use crate::engine::errors::{RunError, SelectError};
use crate::engine::selector::{select, Chooser, SelectionPolicy};
use crate::probe::Probe;

/// A recorded optional-check failure.
#[derive(Debug, Clone)]
pub struct Warning {
    pub check: String,
    pub message: String,
}

/// Successful outcome: the populated state plus any warnings.
#[derive(Debug)]
pub struct Configured {
    pub state: ConfigState,
    pub warnings: Vec<Warning>,
}

/// Progress notifications for the caller's UI. All hooks default to
/// no-ops.
pub trait Observer {
    fn run_started(&mut self, _total: usize) {}
    fn check_started(&mut self, _check: &Check) {}
    fn check_resolved(&mut self, _check: &Check, _label: &str) {}
    /// The check's gate consulted earlier state and declined to run it.
    fn check_skipped(&mut self, _check: &Check) {}
    fn check_warned(&mut self, _warning: &Warning) {}
}

/// Observer that ignores everything.
pub struct NullObserver;

impl Observer for NullObserver {}

/// Run the checks in order over `state`.
///
/// Two runs over an unchanged environment and check list produce
/// identical state: there is no randomness and no unordered iteration
/// anywhere in the engine.
pub fn run(
    checks: &[Check],
    mut state: ConfigState,
    probe: &mut dyn Probe,
    policy: SelectionPolicy,
    chooser: &mut dyn Chooser,
    observer: &mut dyn Observer,
) -> Result<Configured, RunError> {
    let mut warnings = Vec::new();
    observer.run_started(checks.len());

    for check in checks {
        if !check.enabled(&state) {
            tracing::debug!(check = %check.id, "gated off by earlier state");
            observer.check_skipped(check);
            continue;
        }

        observer.check_started(check);
        match select(check, &state, probe, policy, chooser) {
            Ok(selection) => {
                let candidate = &check.candidates[selection.index];
                (check.resolver)(candidate, &selection.report, &mut state)?;
                observer.check_resolved(check, &candidate.label);
            }
            Err(SelectError::Exhausted) => {
                if check.required {
                    return Err(RunError::Aborted {
                        id: check.id.clone(),
                        purpose: check.purpose.clone(),
                    });
                }
                let warning = Warning {
                    check: check.id.clone(),
                    message: format!("no working candidate for {}; continuing without it", check.purpose),
                };
                tracing::warn!(check = %check.id, "{}", warning.message);
                observer.check_warned(&warning);
                warnings.push(warning);
            }
            Err(SelectError::Fatal(e)) => return Err(RunError::Probe(e)),
        }
    }

    Ok(Configured { state, warnings })
}
