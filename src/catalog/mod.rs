//! The authored check catalog.
//!
//! Order matters: later checks read state written by earlier ones, so
//! the compiler comes first, the BLAS vendor must be identified before
//! any check that special-cases a vendor's header layout (CBLAS,
//! LAPACKE), and LAPACK extensions come after LAPACK itself.

pub mod blas;
pub mod compiler;
pub mod gpu;
pub mod lapack;
pub mod packages;

use crate::core::candidate::Candidate;
use crate::core::check::Check;
use crate::core::state::ConfigState;
use crate::probe::ProbeReport;

/// Knobs the CLI and config files feed into the catalog.
#[derive(Debug, Clone, Default)]
pub struct CatalogOptions {
    /// Compiler to try ahead of the built-in candidates.
    pub cxx: Option<String>,
}

/// The full dependency-ordered check list.
pub fn standard(options: &CatalogOptions) -> Vec<Check> {
    let mut checks = compiler::checks(options);
    checks.extend(blas::checks());
    checks.extend(lapack::checks());
    checks.extend(gpu::checks());
    checks.extend(packages::checks());
    checks
}

/// Resolver for plain library checks: record the accepted link line and
/// set one feature key.
pub(crate) fn library_resolver(
    key: &'static str,
) -> impl Fn(&Candidate, &ProbeReport, &mut ConfigState) -> Result<(), crate::core::StateError> {
    move |candidate, _report, state| {
        for lib in candidate.lib_tokens() {
            state.append("LIBS", lib)?;
        }
        state.set(key, true)
    }
}

/// Pull the first `major.minor[.patch]` out of probe output.
pub(crate) fn parse_version(text: &str) -> Option<semver::Version> {
    let re = regex::Regex::new(r"(\d+)\.(\d+)(?:\.(\d+))?").expect("authored version pattern");
    let caps = re.captures(text)?;
    let major = caps.get(1)?.as_str().parse().ok()?;
    let minor = caps.get(2)?.as_str().parse().ok()?;
    let patch = caps
        .get(3)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0);
    Some(semver::Version::new(major, minor, patch))
}
