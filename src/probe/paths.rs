//! Search paths consumed by probes.
//!
//! Three read-only environment inputs influence discovery, matching what
//! compilers themselves honor: `CPATH` (headers), `LIBRARY_PATH` (link
//! time), and `LD_LIBRARY_PATH` (run time, forwarded to trial binaries).

use std::path::PathBuf;

/// Header, link-time, and run-time search paths.
#[derive(Debug, Clone, Default)]
pub struct SearchPaths {
    pub include: Vec<PathBuf>,
    pub library: Vec<PathBuf>,
    pub runtime: Vec<PathBuf>,
}

impl SearchPaths {
    /// Read search paths from the process environment.
    pub fn from_env() -> Self {
        SearchPaths {
            include: split_env("CPATH"),
            library: split_env("LIBRARY_PATH"),
            runtime: split_env("LD_LIBRARY_PATH"),
        }
    }

    /// The run-time path list joined for a child's `LD_LIBRARY_PATH`.
    pub fn runtime_env(&self) -> Option<String> {
        if self.runtime.is_empty() {
            return None;
        }
        std::env::join_paths(&self.runtime)
            .ok()
            .map(|v| v.to_string_lossy().into_owned())
    }
}

fn split_env(key: &str) -> Vec<PathBuf> {
    match std::env::var_os(key) {
        Some(value) => std::env::split_paths(&value)
            .filter(|p| !p.as_os_str().is_empty())
            .collect(),
        None => Vec::new(),
    }
}
