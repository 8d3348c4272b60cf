//! The end-to-end configure run: seed state, probe the catalog in
//! order, and emit artifacts on success.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, Result};

use crate::catalog::{self, CatalogOptions};
use crate::core::state::ConfigState;
use crate::emit::{self, RunLog};
use crate::engine::sequence::{self, Observer, Warning};
use crate::engine::{Chooser, RunError, SelectionPolicy};
use crate::probe::{SearchPaths, ToolchainProbe};
use crate::util::config::Config;

/// Default define namespace when neither CLI nor config set one.
pub const DEFAULT_NAMESPACE: &str = "FATHOM";

/// Options for the configure command.
#[derive(Debug, Clone)]
pub struct ConfigureOptions {
    /// Probe exhaustively and let the user choose, instead of taking
    /// the first working candidate.
    pub interactive: bool,

    /// Where `make.inc`, the defines header, and the log land.
    pub project_dir: PathBuf,

    /// Compiler override from the command line (beats config).
    pub cxx: Option<String>,

    /// Define namespace override.
    pub namespace: Option<String>,

    /// Install prefix override.
    pub prefix: Option<PathBuf>,
}

impl Default for ConfigureOptions {
    fn default() -> Self {
        ConfigureOptions {
            interactive: false,
            project_dir: PathBuf::from("."),
            cxx: None,
            namespace: None,
            prefix: None,
        }
    }
}

/// Outcome of a successful configure run.
#[derive(Debug)]
pub struct ConfigureReport {
    pub state: ConfigState,
    pub warnings: Vec<Warning>,
    /// Artifact paths written, in emission order.
    pub written: Vec<PathBuf>,
    pub log_path: PathBuf,
}

/// Where the probe log for a project lives.
pub fn log_path(options: &ConfigureOptions) -> PathBuf {
    options.project_dir.join(".fathom").join("configure.log")
}

/// Run the whole configure flow.
///
/// On an aborted run nothing is written besides the probe log, and the
/// returned error names the failing check and points at the log.
pub fn configure(
    options: &ConfigureOptions,
    config: &Config,
    chooser: &mut dyn Chooser,
    observer: &mut dyn Observer,
) -> Result<ConfigureReport> {
    let namespace = options
        .namespace
        .clone()
        .or_else(|| config.output.namespace.clone())
        .unwrap_or_else(|| DEFAULT_NAMESPACE.to_string());

    let mut state = ConfigState::new(namespace);
    if let Some(prefix) = options.prefix.clone().or_else(|| config.output.prefix.clone()) {
        state.set("prefix", prefix.display().to_string())?;
    }
    // User-supplied flags and libraries participate in every trial.
    for flag in &config.toolchain.cxxflags {
        state.append("CXXFLAGS", flag.clone())?;
    }
    for lib in &config.toolchain.libs {
        state.append("LIBS", lib.clone())?;
    }

    let catalog_options = CatalogOptions {
        cxx: options
            .cxx
            .clone()
            .or_else(|| config.toolchain.cxx.as_ref().map(|p| p.display().to_string())),
    };
    let checks = catalog::standard(&catalog_options);

    let timeout = config
        .toolchain
        .timeout_secs
        .map(Duration::from_secs)
        .unwrap_or(crate::probe::toolchain::DEFAULT_TIMEOUT);
    let log_path = log_path(options);
    let log = RunLog::create(&log_path)?;
    let mut probe = ToolchainProbe::new(SearchPaths::from_env(), timeout, log)?;

    let policy = if options.interactive {
        SelectionPolicy::AllMatches
    } else {
        SelectionPolicy::FirstMatch
    };

    let configured =
        sequence::run(&checks, state, &mut probe, policy, chooser, observer).map_err(
            |e| match e {
                RunError::Aborted { purpose, .. } => anyhow!(
                    "no working candidate for {}; see the probe log at {}",
                    purpose,
                    log_path.display()
                ),
                other => anyhow!(other),
            },
        )?;

    let written = emit::write_outputs(&configured.state, &options.project_dir)?;

    Ok(ConfigureReport {
        state: configured.state,
        warnings: configured.warnings,
        written,
        log_path,
    })
}

#[cfg(test)]
#[cfg(unix)]
mod tests {
    use super::*;
    use crate::engine::sequence::NullObserver;
    use crate::engine::FirstChooser;
    use std::os::unix::fs::PermissionsExt;
    use std::path::Path;

    /// Stub "compiler" that writes a runnable trial printing `ok 3.9.0`.
    fn stub_compiler(dir: &Path) -> PathBuf {
        let path = dir.join("stubxx");
        std::fs::write(
            &path,
            r#"#!/bin/sh
out=""
while [ $# -gt 0 ]; do
  if [ "$1" = "-o" ]; then out="$2"; shift; fi
  shift
done
if [ -n "$out" ]; then
  printf '#!/bin/sh\necho ok 3.9.0\n' > "$out"
  chmod +x "$out"
fi
exit 0
"#,
        )
        .unwrap();
        let mut perms = std::fs::metadata(&path).unwrap().permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&path, perms).unwrap();
        path
    }

    #[test]
    fn test_configure_with_permissive_toolchain() {
        let dir = tempfile::tempdir().unwrap();
        let cxx = stub_compiler(dir.path());
        let options = ConfigureOptions {
            project_dir: dir.path().to_path_buf(),
            cxx: Some(cxx.display().to_string()),
            prefix: Some(PathBuf::from("/opt/slate")),
            ..Default::default()
        };
        let report = configure(
            &options,
            &Config::default(),
            &mut FirstChooser,
            &mut NullObserver,
        )
        .unwrap();

        assert_eq!(
            report.state.get_str("CXX"),
            Some(cxx.display().to_string().as_str())
        );
        // Everything accepts, so the newest standard flag wins.
        assert!(report
            .state
            .get_list("CXXFLAGS")
            .contains(&"-std=c++20".to_string()));
        assert!(report.state.get_bool("HAVE_BLAS"));
        assert!(report.state.get_bool("HAVE_LAPACK"));
        assert_eq!(report.state.get_str("LAPACK_VERSION"), Some("3.9.0"));
        assert_eq!(report.state.get_str("prefix"), Some("/opt/slate"));
        // Package location takes the most preferred directory.
        assert_eq!(report.state.get_str("blaspp_dir"), Some("../blaspp"));
        assert_eq!(report.state.get_str("testsweeper_dir"), Some("../testsweeper"));

        // The stub prints no vendor banner: the vendor check warns.
        assert!(report.warnings.iter().any(|w| w.check == "vendor-version"));

        assert!(dir.path().join("make.inc").exists());
        assert!(dir
            .path()
            .join("include")
            .join("fathom")
            .join("defines.h")
            .exists());
        assert!(report.log_path.exists());
    }

    #[test]
    fn test_configure_seeds_user_flags() {
        let dir = tempfile::tempdir().unwrap();
        let cxx = stub_compiler(dir.path());
        let options = ConfigureOptions {
            project_dir: dir.path().to_path_buf(),
            cxx: Some(cxx.display().to_string()),
            ..Default::default()
        };
        let mut config = Config::default();
        config.toolchain.cxxflags = vec!["-DNDEBUG".to_string()];

        let report = configure(&options, &config, &mut FirstChooser, &mut NullObserver).unwrap();
        assert_eq!(report.state.get_list("CXXFLAGS")[0], "-DNDEBUG");

        let defines = std::fs::read_to_string(
            dir.path().join("include").join("fathom").join("defines.h"),
        )
        .unwrap();
        assert!(defines.contains("#define NDEBUG"));
    }
}
