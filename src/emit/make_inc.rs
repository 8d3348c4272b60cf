//! `make.inc` emission: one `key = value` line per state entry, in the
//! order the checks resolved them.

use std::path::Path;

use anyhow::{Context, Result};

use crate::core::state::{ConfigState, Value};

pub fn render(state: &ConfigState) -> String {
    let mut out = String::new();
    out.push_str("# Generated by fathom configure; do not edit.\n");
    out.push_str("# Re-run `fathom configure` to regenerate.\n\n");
    for (key, value) in state.all() {
        // Unset features are absent, not "0"; a false here would lie.
        if matches!(value, Value::Bool(false)) {
            continue;
        }
        out.push_str(&format!("{} = {}\n", key, value.render()));
    }
    out
}

pub fn write(state: &ConfigState, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(path, render(state))
        .with_context(|| format!("failed to write {}", path.display()))
}
