//! GPU BLAS discovery. Link-only: probing machines often build for GPUs
//! they don't have, so trial binaries are never executed here.

use crate::core::candidate::Candidate;
use crate::core::check::Check;

const CUBLAS_MAIN: &str = r#"#include <cublas_v2.h>
int main() {
    cublasHandle_t handle = nullptr;
    if (cublasCreate(&handle) == CUBLAS_STATUS_SUCCESS) {
        cublasDestroy(handle);
    }
    return 0;
}
"#;

const ROCBLAS_MAIN: &str = r#"#include <rocblas/rocblas.h>
int main() {
    rocblas_handle handle = nullptr;
    if (rocblas_create_handle(&handle) == rocblas_status_success) {
        rocblas_destroy_handle(handle);
    }
    return 0;
}
"#;

pub fn checks() -> Vec<Check> {
    vec![gpu_blas_check()]
}

fn gpu_blas_check() -> Check {
    Check::new("gpu-blas", "GPU BLAS library", "")
        .optional()
        .candidates([
            Candidate::link("NVIDIA cuBLAS", "-lcublas -lcudart")
                .tagged("cublas")
                .with_source(CUBLAS_MAIN),
            Candidate::link("AMD rocBLAS", "-lrocblas")
                .tagged("rocblas")
                .with_source(ROCBLAS_MAIN),
        ])
        .resolve(|candidate, _report, state| {
            for lib in candidate.lib_tokens() {
                state.append("LIBS", lib)?;
            }
            match candidate.tag.as_deref() {
                Some("cublas") => state.set("HAVE_CUBLAS", true),
                Some("rocblas") => state.set("HAVE_ROCBLAS", true),
                _ => Ok(()),
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ConfigState;
    use crate::probe::ProbeReport;

    #[test]
    fn test_gpu_trials_never_run() {
        let check = gpu_blas_check();
        assert!(check.candidates.iter().all(|c| !c.accept.run));
    }

    #[test]
    fn test_cublas_resolver() {
        let check = gpu_blas_check();
        let mut state = ConfigState::new("fathom");
        (check.resolver)(&check.candidates[0], &ProbeReport::accepted(""), &mut state).unwrap();
        assert!(state.get_bool("HAVE_CUBLAS"));
        assert_eq!(state.get_list("LIBS"), ["-lcublas", "-lcudart"]);
    }
}
