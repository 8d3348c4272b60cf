//! CLI integration tests for Fathom.
//!
//! These run the real binary against stub "compilers" so the outcome is
//! deterministic regardless of what's installed on the host.

use std::path::{Path, PathBuf};
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get the fathom binary command with probe-relevant env scrubbed.
fn fathom() -> Command {
    let mut cmd = Command::cargo_bin("fathom").unwrap();
    cmd.env_remove("CXX")
        .env_remove("CPATH")
        .env_remove("LIBRARY_PATH")
        .env_remove("LD_LIBRARY_PATH");
    cmd
}

/// Create a temporary directory for test projects.
fn temp_dir() -> TempDir {
    TempDir::new().unwrap()
}

/// Stub compiler that accepts everything: it ignores its inputs and
/// writes a runnable script printing `ok 3.9.0` wherever `-o` points.
#[cfg(unix)]
fn permissive_compiler(dir: &Path) -> PathBuf {
    write_script(
        dir,
        "okxx",
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
}

/// Stub compiler that rejects every trial.
#[cfg(unix)]
fn failing_compiler(dir: &Path) -> PathBuf {
    write_script(
        dir,
        "badxx",
        "#!/bin/sh\necho 'error: no' >&2\nexit 1\n",
    )
}

#[cfg(unix)]
fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;
    let path = dir.join(name);
    std::fs::write(&path, body).unwrap();
    let mut perms = std::fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).unwrap();
    path
}

// ============================================================================
// fathom configure
// ============================================================================

#[cfg(unix)]
#[test]
fn test_configure_emits_artifacts() {
    let tmp = temp_dir();
    let cxx = permissive_compiler(tmp.path());

    fathom()
        .args(["configure", "--cxx"])
        .arg(&cxx)
        .args(["--prefix", "/opt/slate"])
        .current_dir(tmp.path())
        .assert()
        .success();

    let make_inc = std::fs::read_to_string(tmp.path().join("make.inc")).unwrap();
    assert!(make_inc.contains(&format!("CXX = {}", cxx.display())));
    assert!(make_inc.contains("prefix = /opt/slate"));
    assert!(make_inc.contains("HAVE_BLAS = 1"));
    assert!(make_inc.contains("LAPACK_VERSION = 3.9.0"));
    assert!(make_inc.contains("blaspp_dir = ../blaspp"));

    let defines =
        std::fs::read_to_string(tmp.path().join("include/fathom/defines.h")).unwrap();
    assert!(defines.contains("#define FATHOM_HAVE_BLAS"));
    assert!(defines.contains("#define FATHOM_LAPACK_VERSION \"3.9.0\""));

    assert!(tmp.path().join(".fathom/configure.log").exists());
}

#[cfg(unix)]
#[test]
fn test_configure_namespace_controls_header() {
    let tmp = temp_dir();
    let cxx = permissive_compiler(tmp.path());

    fathom()
        .args(["configure", "--cxx"])
        .arg(&cxx)
        .args(["--namespace", "LAPACK"])
        .current_dir(tmp.path())
        .assert()
        .success();

    let defines =
        std::fs::read_to_string(tmp.path().join("include/lapack/defines.h")).unwrap();
    assert!(defines.contains("#define LAPACK_HAVE_BLAS"));
}

#[cfg(unix)]
#[test]
fn test_configure_failure_names_check_and_writes_nothing() {
    let tmp = temp_dir();
    let cxx = failing_compiler(tmp.path());

    // Empty PATH so no fallback compiler is ever found.
    fathom()
        .args(["configure", "--cxx"])
        .arg(&cxx)
        .current_dir(tmp.path())
        .env("PATH", "")
        .assert()
        .failure()
        .stderr(predicate::str::contains("C++ compiler"))
        .stderr(predicate::str::contains("configure.log"));

    // No partial artifacts on an aborted run.
    assert!(!tmp.path().join("make.inc").exists());
    assert!(!tmp.path().join("include").exists());
    // The probe log still exists for diagnosis.
    assert!(tmp.path().join(".fathom/configure.log").exists());
}

#[cfg(unix)]
#[test]
fn test_configure_log_records_rejections() {
    let tmp = temp_dir();
    let cxx = failing_compiler(tmp.path());

    fathom()
        .args(["configure", "--cxx"])
        .arg(&cxx)
        .current_dir(tmp.path())
        .env("PATH", "")
        .assert()
        .failure();

    let log = std::fs::read_to_string(tmp.path().join(".fathom/configure.log")).unwrap();
    assert!(log.contains("rejected"));
    assert!(log.contains("error: no"));
}

#[cfg(unix)]
#[test]
fn test_configure_json_mode() {
    let tmp = temp_dir();
    let cxx = permissive_compiler(tmp.path());

    let output = fathom()
        .args(["configure", "--json", "--cxx"])
        .arg(&cxx)
        .current_dir(tmp.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let mut reasons = Vec::new();
    for line in stdout.lines().filter(|l| !l.trim().is_empty()) {
        let event: serde_json::Value = serde_json::from_str(line).unwrap();
        reasons.push(event["reason"].as_str().unwrap().to_string());
    }
    assert!(reasons.iter().any(|r| r == "check-resolved"));
    assert_eq!(reasons.last().map(String::as_str), Some("configured"));
}

#[cfg(unix)]
#[test]
fn test_configure_respects_project_config() {
    let tmp = temp_dir();
    let cxx = permissive_compiler(tmp.path());

    std::fs::create_dir_all(tmp.path().join(".fathom")).unwrap();
    std::fs::write(
        tmp.path().join(".fathom/config.toml"),
        format!(
            "[toolchain]\ncxx = \"{}\"\ncxxflags = [\"-DNDEBUG\"]\n\n[output]\nnamespace = \"SLATE\"\n",
            cxx.display()
        ),
    )
    .unwrap();

    fathom()
        .arg("configure")
        .current_dir(tmp.path())
        .assert()
        .success();

    let make_inc = std::fs::read_to_string(tmp.path().join("make.inc")).unwrap();
    assert!(make_inc.contains("-DNDEBUG"));
    assert!(tmp.path().join("include/slate/defines.h").exists());
}

// ============================================================================
// fathom completions
// ============================================================================

#[test]
fn test_completions_bash() {
    fathom()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("fathom"));
}

#[test]
fn test_unknown_subcommand_fails() {
    fathom().arg("frobnicate").assert().failure();
}
