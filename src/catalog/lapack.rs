//! LAPACK discovery and its optional extensions.

use crate::catalog::{library_resolver, parse_version};
use crate::core::candidate::Candidate;
use crate::core::check::Check;

/// Factors a small SPD matrix; exercises a real LAPACK entry point.
const LAPACK_MAIN: &str = r#"extern "C"
void dpotrf_(const char* uplo, const int* n, double* a, const int* lda,
             int* info);
int main() {
    int n = 2, info = -1;
    double a[] = { 4, 1, 1, 3 };
    dpotrf_("L", &n, a, &n, &info);
    return info;
}
"#;

const LAPACK_VERSION_MAIN: &str = r#"#include <cstdio>
extern "C" void ilaver_(int* major, int* minor, int* patch);
int main() {
    int major = 0, minor = 0, patch = 0;
    ilaver_(&major, &minor, &patch);
    printf("%d.%d.%d\n", major, minor, patch);
    return 0;
}
"#;

/// Referencing the symbol is enough; XBLAS has no safe no-op call.
const XBLAS_MAIN: &str = r#"extern "C" void BLAS_dgemm_x();
int main() {
    void (*f)() = BLAS_dgemm_x;
    return f != nullptr ? 0 : 1;
}
"#;

const MATGEN_MAIN: &str = r#"extern "C" void dlagsy_();
int main() {
    void (*f)() = dlagsy_;
    return f != nullptr ? 0 : 1;
}
"#;

const LAPACKE_MAIN: &str = r#"int main() {
    double a[] = { 4, 1, 1, 3 };
    int info = LAPACKE_dpotrf(LAPACK_COL_MAJOR, 'L', 2, a, 2);
    return info;
}
"#;

const LAPACKE_PSTRF_MAIN: &str = r#"int main() {
    double a[] = { 4, 1, 1, 3 };
    int piv[2] = { 0, 0 };
    int rank = 0;
    int info = LAPACKE_dpstrf(LAPACK_COL_MAJOR, 'L', 2, a, 2, piv, &rank, -1.0);
    return info < 0 ? 1 : 0;
}
"#;

pub fn checks() -> Vec<Check> {
    vec![
        lapack_check(),
        lapack_version_check(),
        xblas_check(),
        matgen_check(),
        lapacke_check(),
        lapacke_pstrf_check(),
    ]
}

/// Most BLAS vendors bundle LAPACK; try the already-found libraries
/// before reaching for `-llapack`.
fn lapack_check() -> Check {
    Check::new("lapack", "LAPACK library", LAPACK_MAIN)
        .candidates([
            Candidate::link("LAPACK in BLAS library", "").runs(),
            Candidate::link("standalone LAPACK", "-llapack").runs(),
        ])
        .resolve(library_resolver("HAVE_LAPACK"))
}

fn lapack_version_check() -> Check {
    Check::new("lapack-version", "LAPACK version", LAPACK_VERSION_MAIN)
        .candidate(Candidate::link("ilaver", "").run_matching(r"\d+\.\d+"))
        .resolve(|_candidate, report, state| {
            // The trial binary's stdout only; the diagnostic text leads
            // with the link line, where a versioned path would match.
            let version = parse_version(&report.stdout)
                .map(|v| v.to_string())
                .unwrap_or_else(|| "unknown".to_string());
            state.set("LAPACK_VERSION", version)
        })
}

fn xblas_check() -> Check {
    Check::new("xblas", "extended-precision BLAS (XBLAS)", XBLAS_MAIN)
        .optional()
        .candidates([
            Candidate::link("XBLAS in found libraries", ""),
            Candidate::link("standalone XBLAS", "-lxblas"),
        ])
        .resolve(library_resolver("HAVE_XBLAS"))
}

fn matgen_check() -> Check {
    Check::new("matgen", "LAPACK matrix generation (tmglib)", MATGEN_MAIN)
        .optional()
        .candidates([
            Candidate::link("matgen in found libraries", ""),
            Candidate::link("standalone tmglib", "-ltmglib"),
        ])
        .resolve(library_resolver("HAVE_MATGEN"))
}

/// LAPACKE for the testers; MKL ships its own header layout.
fn lapacke_check() -> Check {
    Check::new("lapacke", "LAPACKE interface", LAPACKE_MAIN)
        .optional()
        .candidates([
            Candidate::link("LAPACKE via MKL", "")
                .with_include("mkl_lapacke.h")
                .runs(),
            Candidate::link("LAPACKE in found libraries", "")
                .with_include("lapacke.h")
                .runs(),
            Candidate::link("standalone LAPACKE", "-llapacke")
                .with_include("lapacke.h")
                .runs(),
        ])
        .resolve(library_resolver("HAVE_LAPACKE"))
}

/// Older LAPACKE releases lack dpstrf; only worth probing once LAPACKE
/// itself resolved.
fn lapacke_pstrf_check() -> Check {
    Check::new("lapacke-pstrf", "LAPACKE dpstrf", LAPACKE_PSTRF_MAIN)
        .optional()
        .gated(|state| state.get_bool("HAVE_LAPACKE"))
        .candidates([
            Candidate::link("dpstrf via MKL", "")
                .with_include("mkl_lapacke.h")
                .runs(),
            Candidate::link("dpstrf in LAPACKE", "")
                .with_include("lapacke.h")
                .runs(),
        ])
        .resolve(|_candidate, _report, state| state.set("HAVE_LAPACKE_PSTRF", true))
}
