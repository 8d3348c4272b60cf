//! Output artifacts: build-settings file, defines header, run log.
//!
//! The emitter only ever sees a complete, ordered configuration state;
//! nothing is written for an aborted run.

pub mod defines;
pub mod log;
pub mod make_inc;

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::core::state::ConfigState;

pub use log::RunLog;

/// Write `make.inc` and the defines header under `out_dir`.
///
/// Returns the paths written, for the final summary.
pub fn write_outputs(state: &ConfigState, out_dir: &Path) -> Result<Vec<PathBuf>> {
    let make_inc_path = out_dir.join("make.inc");
    make_inc::write(state, &make_inc_path)?;

    let header_dir = state.namespace().to_lowercase();
    let defines_path = out_dir
        .join("include")
        .join(header_dir)
        .join("defines.h");
    defines::write(state, &defines_path)?;

    Ok(vec![make_inc_path, defines_path])
}
