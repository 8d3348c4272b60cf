//! `fathom configure` command
//!
//! Drives the probing run and renders progress, the interactive
//! candidate prompt, and the final summary.

use std::io::{self, BufRead, Write};
use std::time::Instant;

use anyhow::Result;
use indicatif::ProgressBar;

use fathom::core::{Candidate, Check};
use fathom::engine::{Chooser, FirstChooser, Observer, Warning};
use fathom::ops::{self, ConfigureOptions};
use fathom::util::config::load_config;
use fathom::util::shell::{format_duration, ColorChoice, Shell, Status};

use crate::cli::ConfigureArgs;

pub fn execute(args: ConfigureArgs, verbose: bool, quiet: bool, color: ColorChoice) -> Result<()> {
    let shell = Shell::from_flags(quiet, verbose, color, args.json);

    let config = load_config(&args.dir);
    let options = ConfigureOptions {
        interactive: args.interactive,
        project_dir: args.dir.clone(),
        cxx: args.cxx.clone(),
        namespace: args.namespace.clone(),
        prefix: args.prefix.clone(),
    };

    let started = Instant::now();
    let mut observer = ShellObserver::new(&shell, args.interactive);
    let result = if args.interactive {
        let mut chooser = ConsoleChooser::new(&shell);
        ops::configure(&options, &config, &mut chooser, &mut observer)
    } else {
        ops::configure(&options, &config, &mut FirstChooser, &mut observer)
    };
    observer.finish();

    let report = match result {
        Ok(report) => report,
        Err(e) => {
            shell.error(&e);
            std::process::exit(1);
        }
    };

    for warning in &report.warnings {
        shell.warn(&warning.message);
    }
    for path in &report.written {
        shell.status(Status::Created, path.display());
    }
    shell.status(
        Status::Finished,
        format!(
            "configured {} settings in {}",
            report.state.len(),
            format_duration(started.elapsed())
        ),
    );
    shell.note(format!("probe log at {}", report.log_path.display()));

    if shell.is_json() {
        let entries: Vec<serde_json::Value> = report
            .state
            .all()
            .map(|(k, v)| serde_json::json!({ "key": k, "value": v.render() }))
            .collect();
        shell.json_event(&serde_json::json!({
            "reason": "configured",
            "state": entries,
            "warnings": report.warnings.len(),
            "log": report.log_path.display().to_string(),
        }));
    }

    Ok(())
}

/// Forwards engine progress to the shell.
struct ShellObserver<'a> {
    shell: &'a Shell,
    /// Interactive runs prompt on stderr mid-check; a live bar would
    /// redraw over the candidate list, so none is created.
    interactive: bool,
    bar: Option<ProgressBar>,
}

impl<'a> ShellObserver<'a> {
    fn new(shell: &'a Shell, interactive: bool) -> Self {
        ShellObserver {
            shell,
            interactive,
            bar: None,
        }
    }

    fn finish(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }
}

impl Observer for ShellObserver<'_> {
    fn run_started(&mut self, total: usize) {
        if !self.interactive {
            self.bar = self.shell.progress(total as u64, "probing");
        }
    }

    fn check_started(&mut self, check: &Check) {
        if self.shell.is_verbose() {
            self.shell.status(Status::Probing, &check.purpose);
        }
        if let Some(bar) = &self.bar {
            bar.set_message(check.purpose.clone());
        }
    }

    fn check_resolved(&mut self, check: &Check, label: &str) {
        self.shell
            .status(Status::Selected, format!("{}: {}", check.purpose, label));
        self.shell.json_event(&serde_json::json!({
            "reason": "check-resolved",
            "check": check.id,
            "candidate": label,
        }));
        if let Some(bar) = &self.bar {
            bar.inc(1);
        }
    }

    fn check_skipped(&mut self, check: &Check) {
        if self.shell.is_verbose() {
            self.shell.status(Status::Skipped, &check.purpose);
        }
        self.shell.json_event(&serde_json::json!({
            "reason": "check-skipped",
            "check": check.id,
        }));
        if let Some(bar) = &self.bar {
            bar.inc(1);
        }
    }

    fn check_warned(&mut self, warning: &Warning) {
        self.shell.json_event(&serde_json::json!({
            "reason": "check-warned",
            "check": warning.check,
            "message": warning.message,
        }));
        if let Some(bar) = &self.bar {
            bar.inc(1);
        }
    }
}

/// Interactive prompt: list the accepted candidates, read a number.
///
/// Anything other than a valid number defers to the first candidate.
struct ConsoleChooser<'a> {
    shell: &'a Shell,
}

impl<'a> ConsoleChooser<'a> {
    fn new(shell: &'a Shell) -> Self {
        ConsoleChooser { shell }
    }
}

impl Chooser for ConsoleChooser<'_> {
    fn choose(&mut self, check: &Check, accepted: &[&Candidate]) -> Option<usize> {
        if accepted.len() == 1 {
            return None;
        }
        self.shell
            .print(format!("{}: {} working candidates", check.purpose, accepted.len()));
        for (i, candidate) in accepted.iter().enumerate() {
            self.shell.print(format!("  [{}] {}", i + 1, candidate.label));
        }
        eprint!("choice [1]: ");
        let _ = io::stderr().flush();

        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line).is_err() {
            return None;
        }
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return None;
        }
        trimmed
            .parse::<usize>()
            .ok()
            .filter(|&n| n >= 1 && n <= accepted.len())
            .map(|n| n - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fathom::util::shell::{ShellMode, Verbosity};

    fn plain_shell() -> Shell {
        Shell::new(ShellMode::Human {
            verbosity: Verbosity::Normal,
            color: ColorChoice::Never,
        })
    }

    #[test]
    fn test_no_progress_bar_in_interactive_mode() {
        let shell = plain_shell();
        let mut observer = ShellObserver::new(&shell, true);
        observer.run_started(10);
        assert!(observer.bar.is_none());
    }

    #[test]
    fn test_progress_bar_in_batch_mode() {
        let shell = plain_shell();
        let mut observer = ShellObserver::new(&shell, false);
        observer.run_started(10);
        assert!(observer.bar.is_some());
        observer.finish();
    }
}
