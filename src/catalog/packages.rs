//! Companion-package location: find checked-out source trees next to
//! the project by probing for their marker header under each candidate
//! directory. The found directory is recorded in state so the build can
//! point its include and link paths at it.

use crate::core::candidate::Candidate;
use crate::core::check::Check;

const TRIAL_MAIN: &str = "int main() { return 0; }\n";

pub fn checks() -> Vec<Check> {
    vec![blaspp_check(), testsweeper_check()]
}

/// A header-presence candidate for one candidate directory.
fn dir_candidate(dir: &str, marker: &str, include_dir: String) -> Candidate {
    Candidate::header(marker)
        .labeled(dir)
        .with_include_dir(include_dir)
}

/// Record the directory the accepted candidate probed.
fn package_resolver(
    key: &'static str,
) -> impl Fn(
    &Candidate,
    &crate::probe::ProbeReport,
    &mut crate::core::ConfigState,
) -> Result<(), crate::core::StateError> {
    move |candidate, _report, state| state.set(key, candidate.label.clone())
}

/// BLAS++ is a hard dependency of the wrappers; a sibling or nested
/// checkout must exist.
fn blaspp_check() -> Check {
    Check::new("blaspp", "BLAS++ package", TRIAL_MAIN)
        .candidates(
            ["../blaspp", "./blaspp"].map(|dir| {
                dir_candidate(dir, "blas.hh", format!("{}/include", dir))
            }),
        )
        .resolve(package_resolver("blaspp_dir"))
}

/// TestSweeper drives the testers only. Its checkout may live beside
/// the project or inside either BLAS++ location.
fn testsweeper_check() -> Check {
    Check::new("testsweeper", "TestSweeper package", TRIAL_MAIN)
        .optional()
        .candidates(
            [
                "../testsweeper",
                "../blaspp/testsweeper",
                "./blaspp/testsweeper",
                "./testsweeper",
            ]
            .map(|dir| dir_candidate(dir, "testsweeper.hh", dir.to_string())),
        )
        .resolve(package_resolver("testsweeper_dir"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::candidate::Payload;
    use crate::core::ConfigState;
    use crate::probe::ProbeReport;

    #[test]
    fn test_blaspp_probes_marker_under_include() {
        let check = blaspp_check();
        assert!(check.required);
        assert_eq!(check.candidates[0].label, "../blaspp");
        assert!(matches!(
            check.candidates[0].payload,
            Payload::Header { ref include } if include == "blas.hh"
        ));
        assert_eq!(check.candidates[0].include_dirs, ["../blaspp/include"]);
    }

    #[test]
    fn test_testsweeper_optional_with_nested_locations() {
        let check = testsweeper_check();
        assert!(!check.required);
        let dirs: Vec<&str> = check.candidates.iter().map(|c| c.label.as_str()).collect();
        assert!(dirs.contains(&"../blaspp/testsweeper"));
        assert_eq!(check.candidates[0].include_dirs, ["../testsweeper"]);
    }

    #[test]
    fn test_resolver_records_directory() {
        let check = blaspp_check();
        let mut state = ConfigState::new("fathom");
        (check.resolver)(&check.candidates[1], &ProbeReport::accepted(""), &mut state).unwrap();
        assert_eq!(state.get_str("blaspp_dir"), Some("./blaspp"));
    }
}
