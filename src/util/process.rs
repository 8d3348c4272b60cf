//! Subprocess execution with bounded timeouts.
//!
//! Every toolchain invocation a probe makes goes through
//! [`ProcessBuilder::exec_timeout`]: a hanging compiler is killed and
//! reported as [`ExecOutcome::TimedOut`] rather than hanging the run.

use std::ffi::OsStr;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use std::time::{Duration, Instant};

/// Builder for subprocess execution.
#[derive(Debug, Clone)]
pub struct ProcessBuilder {
    program: PathBuf,
    args: Vec<String>,
    env: Vec<(String, String)>,
    cwd: Option<PathBuf>,
}

/// Result of a bounded execution.
#[derive(Debug)]
pub enum ExecOutcome {
    Completed(Output),
    TimedOut,
}

impl ProcessBuilder {
    /// Create a new process builder for the given program.
    pub fn new(program: impl AsRef<Path>) -> Self {
        ProcessBuilder {
            program: program.as_ref().to_path_buf(),
            args: Vec::new(),
            env: Vec::new(),
            cwd: None,
        }
    }

    /// Add a single argument.
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_string_lossy().into_owned());
        self
    }

    /// Add multiple arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args.extend(
            args.into_iter()
                .map(|s| s.as_ref().to_string_lossy().into_owned()),
        );
        self
    }

    /// Set an environment variable on the child.
    pub fn env(mut self, key: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        self.env
            .push((key.as_ref().to_string(), value.as_ref().to_string()));
        self
    }

    /// Set the working directory.
    pub fn cwd(mut self, cwd: impl AsRef<Path>) -> Self {
        self.cwd = Some(cwd.as_ref().to_path_buf());
        self
    }

    /// Get the program path.
    pub fn get_program(&self) -> &Path {
        &self.program
    }

    /// Display the command for diagnostics.
    pub fn display_command(&self) -> String {
        let mut parts = vec![self.program.display().to_string()];
        parts.extend(self.args.iter().cloned());
        parts.join(" ")
    }

    fn build_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        for (key, value) in &self.env {
            cmd.env(key, value);
        }
        if let Some(ref cwd) = self.cwd {
            cmd.current_dir(cwd);
        }
        cmd
    }

    /// Execute with a deadline, killing the child if it overruns.
    ///
    /// Spawn failures (program missing, not executable) surface as the
    /// `io::Error`; the caller decides whether that is fatal.
    pub fn exec_timeout(&self, timeout: Duration) -> io::Result<ExecOutcome> {
        let mut cmd = self.build_command();
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        let mut child = cmd.spawn()?;

        // Drain pipes on threads so a chatty compiler can't deadlock
        // against the try_wait polling loop.
        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let out_handle = std::thread::spawn(move || read_all(stdout));
        let err_handle = std::thread::spawn(move || read_all(stderr));

        let deadline = Instant::now() + timeout;
        loop {
            if let Some(status) = child.try_wait()? {
                let stdout = out_handle.join().unwrap_or_default();
                let stderr = err_handle.join().unwrap_or_default();
                return Ok(ExecOutcome::Completed(Output {
                    status,
                    stdout,
                    stderr,
                }));
            }
            if Instant::now() >= deadline {
                let _ = child.kill();
                let _ = child.wait();
                let _ = out_handle.join();
                let _ = err_handle.join();
                return Ok(ExecOutcome::TimedOut);
            }
            std::thread::sleep(Duration::from_millis(10));
        }
    }
}

fn read_all(pipe: Option<impl Read>) -> Vec<u8> {
    let mut buf = Vec::new();
    if let Some(mut pipe) = pipe {
        let _ = pipe.read_to_end(&mut buf);
    }
    buf
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completed_with_output() {
        let outcome = ProcessBuilder::new("echo")
            .arg("hello")
            .exec_timeout(Duration::from_secs(5))
            .unwrap();
        match outcome {
            ExecOutcome::Completed(output) => {
                assert!(output.status.success());
                assert!(String::from_utf8_lossy(&output.stdout).contains("hello"));
            }
            ExecOutcome::TimedOut => panic!("echo should not time out"),
        }
    }

    #[test]
    #[cfg(unix)]
    fn test_hung_child_is_killed() {
        let outcome = ProcessBuilder::new("sleep")
            .arg("30")
            .exec_timeout(Duration::from_millis(100))
            .unwrap();
        assert!(matches!(outcome, ExecOutcome::TimedOut));
    }

    #[test]
    fn test_missing_program_is_spawn_error() {
        let result =
            ProcessBuilder::new("fathom-no-such-binary").exec_timeout(Duration::from_secs(1));
        assert!(result.is_err());
    }

    #[test]
    fn test_display_command() {
        let pb = ProcessBuilder::new("g++").args(["-std=c++17", "-o", "trial", "trial.cc"]);
        assert_eq!(pb.display_command(), "g++ -std=c++17 -o trial trial.cc");
    }
}
