//! BLAS discovery: vendor link lines, calling-convention probes, vendor
//! version, and CBLAS.

use crate::catalog::{library_resolver, parse_version};
use crate::core::candidate::Candidate;
use crate::core::check::Check;

/// Links and runs a Fortran-convention ddot.
const BLAS_MAIN: &str = r#"extern "C"
double ddot_(const int* n, const double* x, const int* incx,
             const double* y, const int* incy);
int main() {
    int n = 5, ione = 1;
    double x[] = { 1, 2, 3, 4, 5 };
    double y[] = { 5, 4, 3, 2, 1 };
    double result = ddot_(&n, x, &ione, y, &ione);
    return (result > 34.9 && result < 35.1) ? 0 : 1;
}
"#;

/// sdot returns float under the reference convention, double under f2c.
const FLOAT_RETURN_MAIN: &str = r#"#include <cstdio>
extern "C"
#ifdef BLAS_F2C
double sdot_(const int* n, const float* x, const int* incx,
             const float* y, const int* incy);
#else
float sdot_(const int* n, const float* x, const int* incx,
            const float* y, const int* incy);
#endif
int main() {
    int n = 5, ione = 1;
    float x[] = { 1, 2, 3, 4, 5 };
    float y[] = { 5, 4, 3, 2, 1 };
    double result = sdot_(&n, x, &ione, y, &ione);
    if (result > 34.9 && result < 35.1) {
        printf("ok\n");
        return 0;
    }
    printf("got %f\n", result);
    return 1;
}
"#;

/// zdotc returns a complex value directly (GNU) or through a hidden
/// first argument (Intel f2c-style interfaces).
const COMPLEX_RETURN_MAIN: &str = r#"#include <complex>
#include <cstdio>
extern "C"
#ifdef BLAS_COMPLEX_RETURN_ARGUMENT
void zdotc_(std::complex<double>* result, const int* n,
            const std::complex<double>* x, const int* incx,
            const std::complex<double>* y, const int* incy);
#else
std::complex<double> zdotc_(const int* n,
                            const std::complex<double>* x, const int* incx,
                            const std::complex<double>* y, const int* incy);
#endif
int main() {
    int n = 2, ione = 1;
    std::complex<double> x[] = { { 1, 0 }, { 0, 1 } };
    std::complex<double> y[] = { { 2, 0 }, { 0, 2 } };
#ifdef BLAS_COMPLEX_RETURN_ARGUMENT
    std::complex<double> result;
    zdotc_(&result, &n, x, &ione, y, &ione);
#else
    std::complex<double> result = zdotc_(&n, x, &ione, y, &ione);
#endif
    if (std::abs(result.real() - 4.0) < 1e-12) {
        printf("ok\n");
        return 0;
    }
    return 1;
}
"#;

const MKL_VERSION_MAIN: &str = r#"#include <mkl_version.h>
#include <cstdio>
int main() {
    printf("MKL %d.%d.%d\n",
           __INTEL_MKL__, __INTEL_MKL_MINOR__, __INTEL_MKL_UPDATE__);
    return 0;
}
"#;

const OPENBLAS_VERSION_MAIN: &str = r#"#include <cstdio>
extern "C" char* openblas_get_config();
int main() {
    printf("OpenBLAS %s\n", openblas_get_config());
    return 0;
}
"#;

const ESSL_VERSION_MAIN: &str = r#"#include <cstdio>
extern "C" int iessl();
int main() {
    printf("ESSL %d\n", iessl());
    return 0;
}
"#;

const CBLAS_MAIN: &str = r#"int main() {
    double x[] = { 1, 2, 3 };
    double y[] = { 3, 2, 1 };
    double result = cblas_ddot(3, x, 1, y, 1);
    return (result > 9.9 && result < 10.1) ? 0 : 1;
}
"#;

pub fn checks() -> Vec<Check> {
    vec![
        blas_check(),
        float_return_check(),
        complex_return_check(),
        vendor_version_check(),
        cblas_check(),
    ]
}

/// Vendor link lines, most specific first; the generic `-lblas` is the
/// fallback of last resort.
fn blas_check() -> Check {
    Check::new("blas", "BLAS library", BLAS_MAIN)
        .candidates([
            Candidate::link(
                "Intel MKL (sequential, Intel conventions)",
                "-lmkl_intel_lp64 -lmkl_sequential -lmkl_core -lpthread -lm",
            )
            .tagged("mkl")
            .runs(),
            Candidate::link(
                "Intel MKL (sequential, GNU conventions)",
                "-lmkl_gf_lp64 -lmkl_sequential -lmkl_core -lpthread -lm",
            )
            .tagged("mkl")
            .runs(),
            Candidate::link("OpenBLAS", "-lopenblas").tagged("openblas").runs(),
            Candidate::link("Apple Accelerate", "-framework Accelerate")
                .tagged("accelerate")
                .runs(),
            Candidate::link("IBM ESSL", "-lessl").tagged("essl").runs(),
            Candidate::link("generic BLAS", "-lblas").runs(),
        ])
        .resolve(library_resolver("HAVE_BLAS"))
}

fn float_return_check() -> Check {
    Check::new(
        "blas-float-return",
        "BLAS float return convention",
        FLOAT_RETURN_MAIN,
    )
    .candidates([
        Candidate::link("sdot returns float", "").run_matching("^ok"),
        Candidate::link("sdot returns double (f2c)", "")
            .tagged("f2c")
            .with_define("BLAS_F2C")
            .run_matching("^ok"),
    ])
    .resolve(|candidate, _report, state| {
        if candidate.tag.as_deref() == Some("f2c") {
            state.set("BLAS_FLOAT_RETURN", "double")?;
            state.set("BLAS_HAVE_F2C", true)
        } else {
            state.set("BLAS_FLOAT_RETURN", "float")
        }
    })
}

fn complex_return_check() -> Check {
    Check::new(
        "blas-complex-return",
        "BLAS complex return convention",
        COMPLEX_RETURN_MAIN,
    )
    .candidates([
        Candidate::link("zdotc returns value", "").run_matching("^ok"),
        Candidate::link("zdotc returns via argument", "")
            .tagged("argument")
            .with_define("BLAS_COMPLEX_RETURN_ARGUMENT")
            .run_matching("^ok"),
    ])
    .resolve(|candidate, _report, state| {
        if candidate.tag.as_deref() == Some("argument") {
            state.set("BLAS_COMPLEX_RETURN", "argument")?;
            state.set("BLAS_COMPLEX_RETURN_ARGUMENT", true)
        } else {
            state.set("BLAS_COMPLEX_RETURN", "value")
        }
    })
}

/// Identify the vendor by its version interface. Must run after `blas`
/// (it links against the found libraries) and before any check that
/// special-cases vendor headers (CBLAS, LAPACKE).
fn vendor_version_check() -> Check {
    Check::new("vendor-version", "BLAS vendor version", "")
        .optional()
        .candidates([
            Candidate::link("Intel MKL", "")
                .tagged("mkl")
                .with_source(MKL_VERSION_MAIN)
                .run_matching(r"MKL \d+"),
            Candidate::link("OpenBLAS", "")
                .tagged("openblas")
                .with_source(OPENBLAS_VERSION_MAIN)
                .run_matching("OpenBLAS"),
            Candidate::link("IBM ESSL", "")
                .tagged("essl")
                .with_source(ESSL_VERSION_MAIN)
                .run_matching(r"ESSL \d+"),
        ])
        .resolve(|candidate, report, state| {
            // Parse the run stdout only, never the command line.
            let version = parse_version(&report.stdout)
                .map(|v| v.to_string())
                .unwrap_or_else(|| "unknown".to_string());
            match candidate.tag.as_deref() {
                Some("mkl") => {
                    state.set("HAVE_MKL", true)?;
                    state.set("MKL_VERSION", version)
                }
                Some("openblas") => {
                    state.set("HAVE_OPENBLAS", true)?;
                    state.set("OPENBLAS_VERSION", version)
                }
                Some("essl") => state.set("HAVE_ESSL", true),
                _ => Ok(()),
            }
        })
}

/// CBLAS for the testers. MKL ships its own header, so that layout is
/// tried first; it simply fails to compile elsewhere.
fn cblas_check() -> Check {
    Check::new("cblas", "CBLAS interface", CBLAS_MAIN)
        .optional()
        .candidates([
            Candidate::link("CBLAS via MKL", "").with_include("mkl_cblas.h").runs(),
            Candidate::link("CBLAS in found libraries", "")
                .with_include("cblas.h")
                .runs(),
            Candidate::link("standalone CBLAS", "-lcblas")
                .with_include("cblas.h")
                .runs(),
        ])
        .resolve(library_resolver("HAVE_CBLAS"))
}
