//! Configuration file support.
//!
//! Two locations, project overriding global:
//! - Global: `~/.fathom/config.toml` — user-wide defaults
//! - Project: `.fathom/config.toml` — per-project overrides

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Fathom configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub toolchain: ToolchainSettings,
    pub output: OutputSettings,
}

/// Toolchain overrides consulted before automatic discovery.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolchainSettings {
    /// C++ compiler to try first (e.g. /usr/bin/clang++).
    pub cxx: Option<PathBuf>,

    /// Extra flags seeded into CXXFLAGS before any flag check runs.
    pub cxxflags: Vec<String>,

    /// Extra libraries seeded into LIBS before any library check runs.
    pub libs: Vec<String>,

    /// Per-trial timeout in seconds.
    pub timeout_secs: Option<u64>,
}

/// Where and under which namespace artifacts are emitted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Define namespace, e.g. `LAPACK` for `LAPACK_HAVE_MKL`.
    pub namespace: Option<String>,

    /// Install prefix recorded in make.inc.
    pub prefix: Option<PathBuf>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config: {}", path.display()))
    }

    /// Load with fallback to defaults if the file doesn't exist or is
    /// unreadable.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("failed to load config from {}: {}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        if other.toolchain.cxx.is_some() {
            self.toolchain.cxx = other.toolchain.cxx;
        }
        if !other.toolchain.cxxflags.is_empty() {
            self.toolchain.cxxflags = other.toolchain.cxxflags;
        }
        if !other.toolchain.libs.is_empty() {
            self.toolchain.libs = other.toolchain.libs;
        }
        if other.toolchain.timeout_secs.is_some() {
            self.toolchain.timeout_secs = other.toolchain.timeout_secs;
        }
        if other.output.namespace.is_some() {
            self.output.namespace = other.output.namespace;
        }
        if other.output.prefix.is_some() {
            self.output.prefix = other.output.prefix;
        }
    }
}

/// Global config path (`~/.fathom/config.toml`), if a home is known.
pub fn global_config_path() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|dirs| dirs.home_dir().join(".fathom").join("config.toml"))
}

/// Project config path under `project_dir`.
pub fn project_config_path(project_dir: &Path) -> PathBuf {
    project_dir.join(".fathom").join("config.toml")
}

/// Load merged configuration: defaults, then global, then project.
pub fn load_config(project_dir: &Path) -> Config {
    let mut config = Config::default();
    if let Some(global) = global_config_path() {
        if global.exists() {
            config.merge(Config::load_or_default(&global));
        }
    }
    let project = project_config_path(project_dir);
    if project.exists() {
        config.merge(Config::load_or_default(&project));
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let config: Config = toml::from_str(
            r#"
            [toolchain]
            cxx = "/usr/bin/clang++"
            cxxflags = ["-march=native"]
            timeout_secs = 30

            [output]
            namespace = "LAPACK"
            prefix = "/opt/slate"
            "#,
        )
        .unwrap();
        assert_eq!(config.toolchain.cxx, Some(PathBuf::from("/usr/bin/clang++")));
        assert_eq!(config.toolchain.cxxflags, ["-march=native"]);
        assert_eq!(config.toolchain.timeout_secs, Some(30));
        assert_eq!(config.output.namespace.as_deref(), Some("LAPACK"));
    }

    #[test]
    fn test_merge_precedence() {
        let mut base: Config = toml::from_str(
            r#"
            [toolchain]
            cxx = "/usr/bin/g++"
            cxxflags = ["-O3"]
            "#,
        )
        .unwrap();
        let project: Config = toml::from_str(
            r#"
            [toolchain]
            cxx = "/usr/bin/clang++"
            "#,
        )
        .unwrap();
        base.merge(project);
        // Project value wins; untouched fields survive.
        assert_eq!(base.toolchain.cxx, Some(PathBuf::from("/usr/bin/clang++")));
        assert_eq!(base.toolchain.cxxflags, ["-O3"]);
    }

    #[test]
    fn test_missing_file_is_default() {
        let config = Config::load_or_default(Path::new("/no/such/config.toml"));
        assert!(config.toolchain.cxx.is_none());
    }
}
