//! The real probe: invokes the C++ toolchain on generated trial programs.

use std::path::PathBuf;
use std::time::Duration;

use tempfile::TempDir;

use crate::core::candidate::{Candidate, Payload};
use crate::core::state::ConfigState;
use crate::emit::log::RunLog;
use crate::probe::{Probe, ProbeError, ProbeReport, SearchPaths};
use crate::util::process::{ExecOutcome, ProcessBuilder};

/// Default bound on a single toolchain invocation.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Probes candidates by compiling, linking, and optionally running
/// minimal trial programs in a scratch directory.
pub struct ToolchainProbe {
    scratch: TempDir,
    paths: SearchPaths,
    timeout: Duration,
    log: RunLog,
    trial: usize,
}

impl ToolchainProbe {
    pub fn new(paths: SearchPaths, timeout: Duration, log: RunLog) -> Result<Self, ProbeError> {
        Ok(ToolchainProbe {
            scratch: TempDir::with_prefix("fathom-probe-")?,
            paths,
            timeout,
            log,
            trial: 0,
        })
    }

    /// Where diagnostics are being persisted.
    pub fn log_path(&self) -> PathBuf {
        self.log.path().to_path_buf()
    }

    fn write_trial_source(&self, n: usize, candidate: &Candidate) -> Result<PathBuf, ProbeError> {
        let mut source = String::new();
        if let Payload::Header { include } = &candidate.payload {
            source.push_str(&format!("#include <{}>\n", include));
        }
        for header in &candidate.includes {
            source.push_str(&format!("#include <{}>\n", header));
        }
        source.push_str(&candidate.source);
        if !source.ends_with('\n') {
            source.push('\n');
        }

        let path = self.scratch.path().join(format!("trial_{:03}.cc", n));
        std::fs::write(&path, source)?;
        Ok(path)
    }

    fn trial_command(
        &self,
        compiler: &str,
        candidate: &Candidate,
        state: &ConfigState,
        src: &PathBuf,
        out: &PathBuf,
        link: bool,
    ) -> ProcessBuilder {
        let mut cmd = ProcessBuilder::new(compiler);

        for define in &candidate.defines {
            cmd = cmd.arg(format!("-D{}", define));
        }
        for dir in &candidate.include_dirs {
            cmd = cmd.arg(format!("-I{}", dir));
        }
        for dir in &self.paths.include {
            cmd = cmd.arg(format!("-I{}", dir.display()));
        }
        cmd = cmd.args(state.get_list("CXXFLAGS"));
        if let Payload::Flag { flag } = &candidate.payload {
            cmd = cmd.arg(flag);
        }

        if link {
            for dir in &self.paths.library {
                cmd = cmd.arg(format!("-L{}", dir.display()));
            }
        } else {
            cmd = cmd.arg("-c");
        }
        cmd = cmd.arg("-o").arg(out).arg(src);
        if link {
            // New libraries ahead of those already found, so a candidate
            // can depend on symbols from earlier selections.
            cmd = cmd.args(candidate.lib_tokens());
            cmd = cmd.args(state.get_list("LIBS"));
        }
        cmd
    }

    /// Run a trial command; `Ok(None)` means the trial failed in an
    /// ordinary, recoverable way and `diag` explains why.
    fn run_bounded(
        &self,
        cmd: &ProcessBuilder,
        fatal_on_spawn_error: bool,
        diag: &mut String,
    ) -> Result<Option<std::process::Output>, ProbeError> {
        diag.push_str("$ ");
        diag.push_str(&cmd.display_command());
        diag.push('\n');

        match cmd.exec_timeout(self.timeout) {
            Ok(ExecOutcome::Completed(output)) => {
                diag.push_str(&String::from_utf8_lossy(&output.stdout));
                diag.push_str(&String::from_utf8_lossy(&output.stderr));
                if output.status.success() {
                    Ok(Some(output))
                } else {
                    diag.push_str(&format!("exit status: {}\n", output.status));
                    Ok(None)
                }
            }
            Ok(ExecOutcome::TimedOut) => {
                diag.push_str(&format!("timed out after {:?}\n", self.timeout));
                Ok(None)
            }
            Err(e) if fatal_on_spawn_error => Err(ProbeError::ToolUnusable {
                program: cmd.get_program().display().to_string(),
                message: e.to_string(),
            }),
            Err(e) => {
                diag.push_str(&format!("could not execute: {}\n", e));
                Ok(None)
            }
        }
    }
}

impl Probe for ToolchainProbe {
    fn probe(
        &mut self,
        candidate: &Candidate,
        state: &ConfigState,
    ) -> Result<ProbeReport, ProbeError> {
        self.trial += 1;
        let n = self.trial;

        // A candidate compiler that doesn't exist is an ordinary trial
        // failure; a selected compiler that stops working is fatal.
        let (compiler, bootstrap) = match &candidate.payload {
            Payload::Compiler { program } => (program.clone(), true),
            _ => {
                let cxx = state
                    .get_str("CXX")
                    .ok_or(ProbeError::CompilerUnresolved)?;
                (cxx.to_string(), false)
            }
        };

        let link = matches!(
            candidate.payload,
            Payload::Compiler { .. } | Payload::Link { .. }
        );
        let src = self.write_trial_source(n, candidate)?;
        let out = self
            .scratch
            .path()
            .join(format!("trial_{:03}{}", n, if link { "" } else { ".o" }));

        let cmd = self.trial_command(&compiler, candidate, state, &src, &out, link);
        let mut diag = String::new();

        let report = match self.run_bounded(&cmd, !bootstrap, &mut diag)? {
            None => ProbeReport::rejected(diag),
            Some(output) => {
                if candidate.accept.run && link {
                    let mut run_cmd = ProcessBuilder::new(&out);
                    if let Some(ld_path) = self.paths.runtime_env() {
                        run_cmd = run_cmd.env("LD_LIBRARY_PATH", ld_path);
                    }
                    match self.run_bounded(&run_cmd, false, &mut diag)? {
                        None => ProbeReport::rejected(diag),
                        Some(run_output) => {
                            let stdout = String::from_utf8_lossy(&run_output.stdout).into_owned();
                            let ok = match &candidate.accept.pattern {
                                Some(pattern) => pattern.is_match(&stdout),
                                None => true,
                            };
                            if ok {
                                ProbeReport::accepted(diag).with_stdout(stdout)
                            } else {
                                diag.push_str("output did not match acceptance pattern\n");
                                ProbeReport::rejected(diag).with_stdout(stdout)
                            }
                        }
                    }
                } else {
                    let text = format!(
                        "{}{}",
                        String::from_utf8_lossy(&output.stdout),
                        String::from_utf8_lossy(&output.stderr)
                    );
                    let ok = match &candidate.accept.pattern {
                        Some(pattern) => pattern.is_match(&text),
                        None => true,
                    };
                    if ok {
                        ProbeReport::accepted(diag)
                    } else {
                        diag.push_str("output did not match acceptance pattern\n");
                        ProbeReport::rejected(diag)
                    }
                }
            }
        };

        let verdict = if report.accepted { "accepted" } else { "rejected" };
        let title = format!("trial {:03}: {} [{}]", n, candidate.label, verdict);
        if let Err(e) = self.log.append(&title, &report.output) {
            tracing::warn!("failed to append to configure log: {}", e);
        }
        tracing::debug!(trial = n, label = %candidate.label, accepted = report.accepted);

        Ok(report)
    }
}
