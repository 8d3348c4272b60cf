//! Feature-defines header emission.
//!
//! Boolean state entries become namespaced symbols
//! (`#define FATHOM_HAVE_MKL`), version strings become string defines,
//! and any `-DNAME[=value]` that accumulated in the flag lists is
//! re-emitted verbatim so downstream code sees the same defines the
//! probes compiled with.

use std::path::Path;

use anyhow::{Context, Result};

use crate::core::state::{ConfigState, Value};

/// Pull `-DNAME[=value]` defines out of a flag list.
pub fn extract_defines(flags: &[String]) -> Vec<(String, Option<String>)> {
    flags
        .iter()
        .filter_map(|flag| flag.strip_prefix("-D"))
        .filter(|rest| !rest.is_empty())
        .map(|rest| match rest.split_once('=') {
            Some((name, value)) => (name.to_string(), Some(value.to_string())),
            None => (rest.to_string(), None),
        })
        .collect()
}

pub fn render(state: &ConfigState) -> String {
    let guard = format!("{}_DEFINES_H", state.namespace());
    let mut out = String::new();
    out.push_str("// Generated by fathom configure; do not edit.\n");
    out.push_str(&format!("#ifndef {}\n#define {}\n\n", guard, guard));

    for (key, value) in state.all() {
        match value {
            Value::Bool(true) => {
                out.push_str(&format!("#define {}\n", state.symbol(key)));
            }
            Value::Str(s) if key.ends_with("_VERSION") => {
                out.push_str(&format!("#define {} \"{}\"\n", state.symbol(key), s));
            }
            _ => {}
        }
    }

    let flag_defines = extract_defines(state.get_list("CXXFLAGS"));
    if !flag_defines.is_empty() {
        out.push('\n');
        for (name, value) in flag_defines {
            match value {
                Some(value) => out.push_str(&format!("#define {} {}\n", name, value)),
                None => out.push_str(&format!("#define {}\n", name)),
            }
        }
    }

    out.push_str(&format!("\n#endif // {}\n", guard));
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_defines() {
        let flags = vec![
            "-O2".to_string(),
            "-DNDEBUG".to_string(),
            "-DMAX_THREADS=8".to_string(),
        ];
        assert_eq!(
            extract_defines(&flags),
            vec![
                ("NDEBUG".to_string(), None),
                ("MAX_THREADS".to_string(), Some("8".to_string())),
            ]
        );
    }

    #[test]
    fn test_render_booleans_and_versions() {
        let mut state = ConfigState::new("fathom");
        state.set("CXX", "g++").unwrap();
        state.set("HAVE_BLAS", true).unwrap();
        state.set("HAVE_XBLAS", false).unwrap();
        state.set("LAPACK_VERSION", "3.9.0").unwrap();
        state.append("CXXFLAGS", "-DNDEBUG").unwrap();

        let text = render(&state);
        assert!(text.contains("#ifndef FATHOM_DEFINES_H"));
        assert!(text.contains("#define FATHOM_HAVE_BLAS\n"));
        assert!(!text.contains("FATHOM_HAVE_XBLAS"));
        assert!(text.contains("#define FATHOM_LAPACK_VERSION \"3.9.0\""));
        assert!(text.contains("#define NDEBUG\n"));
        // The compiler path itself is not a define.
        assert!(!text.contains("g++"));
    }
}
