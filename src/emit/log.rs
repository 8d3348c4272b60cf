//! Persistent diagnostic log for post-mortem debugging.
//!
//! Every trial's diagnostics are appended in run order, whatever the
//! check's outcome. On an aborted run this log is the only artifact.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Append-only log file for probe diagnostics.
#[derive(Debug)]
pub struct RunLog {
    path: PathBuf,
    file: File,
}

impl RunLog {
    /// Create (truncate) the log file, creating parent directories.
    pub fn create(path: impl Into<PathBuf>) -> io::Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = File::create(&path)?;
        writeln!(file, "fathom configure log")?;
        Ok(RunLog { path, file })
    }

    /// Append one titled section.
    pub fn append(&mut self, title: &str, body: &str) -> io::Result<()> {
        writeln!(self.file, "\n{}", "-".repeat(72))?;
        writeln!(self.file, "{}", title)?;
        let body = body.trim_end();
        if !body.is_empty() {
            writeln!(self.file, "{}", body)?;
        }
        self.file.flush()
    }

    /// Where the log lives, for user-facing messages.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sections_appended_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("configure.log");
        let mut log = RunLog::create(&path).unwrap();
        log.append("trial 1: g++", "g++ -o trial trial.cc\nok").unwrap();
        log.append("trial 2: -std=c++20", "rejected").unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        let first = contents.find("trial 1: g++").unwrap();
        let second = contents.find("trial 2: -std=c++20").unwrap();
        assert!(first < second);
        assert!(contents.contains("fathom configure log"));
    }
}
