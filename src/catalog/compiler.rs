//! Compiler discovery and compiler-flag checks.

use crate::catalog::CatalogOptions;
use crate::core::candidate::{Candidate, Payload};
use crate::core::check::Check;

const HELLO: &str = r#"#include <iostream>
int main() {
    std::cout << "hello\n";
    return 0;
}
"#;

const OMP_HELLO: &str = r#"int main() {
    int sum = 0;
    #pragma omp parallel for reduction(+:sum)
    for (int i = 0; i < 100; ++i) {
        sum += i;
    }
    return sum == 4950 ? 0 : 1;
}
"#;

/// Standard flags, newest first; the first one the compiler accepts wins.
const STD_FLAGS: [&str; 4] = ["-std=c++20", "-std=c++17", "-std=c++14", "-std=c++11"];

/// Individually optional quality-of-life flags.
const EXTRA_FLAGS: [&str; 4] = [
    "-MMD",
    "-Wall",
    "-Wno-unused-local-typedefs",
    "-Wno-unused-function",
];

pub fn checks(options: &CatalogOptions) -> Vec<Check> {
    let mut checks = vec![cxx_check(options), std_flag_check(), optimize_check()];
    for flag in EXTRA_FLAGS {
        checks.push(extra_flag_check(flag));
    }
    checks.push(openmp_check());
    checks
}

/// Candidate compilers, most preferred first: explicit override, then
/// `$CXX`, then the usual suspects that are actually on PATH. Duplicates
/// collapse to their first appearance so the override doesn't get probed
/// twice.
fn cxx_check(options: &CatalogOptions) -> Check {
    let mut programs: Vec<String> = Vec::new();
    let mut push = |p: String| {
        if !p.is_empty() && !programs.contains(&p) {
            programs.push(p);
        }
    };
    if let Some(cxx) = &options.cxx {
        push(cxx.clone());
    }
    if let Ok(cxx) = std::env::var("CXX") {
        push(cxx);
    }
    for p in ["g++", "clang++", "icpx", "c++"] {
        if which::which(p).is_ok() {
            push(p.to_string());
        }
    }

    Check::new("cxx", "C++ compiler", HELLO)
        .candidates(programs.into_iter().map(Candidate::compiler))
        .resolve(|candidate, _report, state| {
            let Payload::Compiler { program } = &candidate.payload else {
                unreachable!("cxx check only enumerates compiler candidates");
            };
            state.set("CXX", program.clone())
        })
}

fn std_flag_check() -> Check {
    Check::new("cxx-std", "C++ standard flag", HELLO)
        .candidates(STD_FLAGS.into_iter().map(Candidate::flag))
        .resolve(append_flag)
}

fn optimize_check() -> Check {
    Check::new("flag(-O2)", "optimization flag -O2", HELLO)
        .optional()
        .candidate(Candidate::flag("-O2"))
        .resolve(append_flag)
}

fn extra_flag_check(flag: &str) -> Check {
    Check::new(
        format!("flag({})", flag),
        format!("compiler flag {}", flag),
        HELLO,
    )
    .optional()
    .candidate(Candidate::flag(flag))
    .resolve(append_flag)
}

fn openmp_check() -> Check {
    Check::new("openmp", "OpenMP support", OMP_HELLO)
        .optional()
        .candidates([Candidate::flag("-fopenmp"), Candidate::flag("-qopenmp")])
        .resolve(|candidate, _report, state| {
            append_flag_of(candidate, state)?;
            state.set("HAVE_OPENMP", true)
        })
}

fn append_flag(
    candidate: &crate::core::Candidate,
    _report: &crate::probe::ProbeReport,
    state: &mut crate::core::ConfigState,
) -> Result<(), crate::core::StateError> {
    append_flag_of(candidate, state)
}

fn append_flag_of(
    candidate: &crate::core::Candidate,
    state: &mut crate::core::ConfigState,
) -> Result<(), crate::core::StateError> {
    let Payload::Flag { flag } = &candidate.payload else {
        unreachable!("flag checks only enumerate flag candidates");
    };
    state.append("CXXFLAGS", flag.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_std_flags_newest_first() {
        let check = std_flag_check();
        assert_eq!(check.candidates[0].label, "-std=c++20");
        assert_eq!(check.candidates.last().unwrap().label, "-std=c++11");
    }

    #[test]
    fn test_override_deduplicates() {
        let options = CatalogOptions {
            cxx: Some("g++".to_string()),
        };
        let check = cxx_check(&options);
        let g_count = check
            .candidates
            .iter()
            .filter(|c| c.label == "g++")
            .count();
        assert_eq!(g_count, 1);
        assert_eq!(check.candidates[0].label, "g++");
    }

    #[test]
    fn test_flag_resolver_appends_to_cxxflags() {
        let check = optimize_check();
        let mut state = crate::core::ConfigState::new("fathom");
        let report = crate::probe::ProbeReport::accepted("");
        (check.resolver)(&check.candidates[0], &report, &mut state).unwrap();
        assert_eq!(state.get_list("CXXFLAGS"), ["-O2"]);
    }
}
