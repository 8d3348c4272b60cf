//! Candidates: one concrete thing to trial for a configuration decision.

use regex::Regex;

/// What a trial feeds the toolchain.
#[derive(Debug, Clone)]
pub enum Payload {
    /// Try `program` as the C++ compiler by compiling and linking a
    /// minimal program with it.
    Compiler { program: String },

    /// Compile the trial source with one extra compiler flag (no link).
    Flag { flag: String },

    /// Compile a source that includes `header` (no link).
    Header { include: String },

    /// Compile and link the trial source against a link line.
    /// `libs` is a whitespace-separated list of `-l`/`-framework` tokens;
    /// it may be empty when the symbol is expected in already-found
    /// libraries.
    Link { libs: String },
}

/// How a trial's result is judged.
///
/// Exit success is always required. A pattern, when present, must match
/// the captured output: the trial binary's stdout for run trials, the
/// toolchain diagnostics otherwise.
#[derive(Debug, Clone, Default)]
pub struct Acceptance {
    pub pattern: Option<Regex>,
    /// Execute the linked trial binary and judge its output.
    pub run: bool,
}

/// One concrete option value to trial for a check.
///
/// Immutable once constructed; owned by the check that enumerates it.
#[derive(Debug, Clone)]
pub struct Candidate {
    /// Human label shown in status output and interactive prompts.
    pub label: String,
    /// Machine-readable tag for resolvers that branch per candidate
    /// (e.g. which vendor a version probe identified).
    pub tag: Option<String>,
    pub payload: Payload,
    /// Headers included ahead of the trial source.
    pub includes: Vec<String>,
    /// Extra `-I` search directories for this trial only.
    pub include_dirs: Vec<String>,
    /// Extra `-D` defines passed to this trial only.
    pub defines: Vec<String>,
    /// Trial program body. Left empty by the constructors and filled in
    /// from the owning check's trial source.
    pub source: String,
    pub accept: Acceptance,
}

impl Candidate {
    fn new(label: impl Into<String>, payload: Payload) -> Self {
        Candidate {
            label: label.into(),
            tag: None,
            payload,
            includes: Vec::new(),
            include_dirs: Vec::new(),
            defines: Vec::new(),
            source: String::new(),
            accept: Acceptance::default(),
        }
    }

    /// A compiler-program candidate, labeled by the program name.
    pub fn compiler(program: impl Into<String>) -> Self {
        let program = program.into();
        Candidate::new(program.clone(), Payload::Compiler { program })
    }

    /// A compiler-flag candidate, labeled by the flag itself.
    pub fn flag(flag: impl Into<String>) -> Self {
        let flag = flag.into();
        Candidate::new(flag.clone(), Payload::Flag { flag })
    }

    /// A header-presence candidate.
    pub fn header(include: impl Into<String>) -> Self {
        let include = include.into();
        Candidate::new(include.clone(), Payload::Header { include })
    }

    /// A link-line candidate.
    pub fn link(label: impl Into<String>, libs: impl Into<String>) -> Self {
        Candidate::new(label, Payload::Link { libs: libs.into() })
    }

    /// Attach a machine-readable tag.
    pub fn tagged(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Replace the default label (package checks label by directory,
    /// not by the marker header every candidate shares).
    pub fn labeled(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Add a header search directory for this trial.
    pub fn with_include_dir(mut self, dir: impl Into<String>) -> Self {
        self.include_dirs.push(dir.into());
        self
    }

    /// Include a header ahead of the trial source.
    pub fn with_include(mut self, header: impl Into<String>) -> Self {
        self.includes.push(header.into());
        self
    }

    /// Pass an extra define to this trial.
    pub fn with_define(mut self, define: impl Into<String>) -> Self {
        self.defines.push(define.into());
        self
    }

    /// Override the owning check's trial source for this candidate.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    /// Run the linked trial binary; judge by its exit status alone.
    pub fn runs(mut self) -> Self {
        self.accept.run = true;
        self
    }

    /// Run the linked trial binary and require `pattern` in its stdout.
    ///
    /// Panics on an invalid pattern; patterns are authored constants.
    pub fn run_matching(mut self, pattern: &str) -> Self {
        self.accept.pattern = Some(Regex::new(pattern).expect("authored acceptance pattern"));
        self.accept.run = true;
        self
    }

    /// The libraries this candidate links, as individual tokens.
    pub fn lib_tokens(&self) -> Vec<String> {
        match &self.payload {
            Payload::Link { libs } => libs.split_whitespace().map(str::to_string).collect(),
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_candidate_labeled_by_flag() {
        let c = Candidate::flag("-std=c++20");
        assert_eq!(c.label, "-std=c++20");
        assert!(matches!(c.payload, Payload::Flag { ref flag } if flag == "-std=c++20"));
        assert!(!c.accept.run);
    }

    #[test]
    fn test_link_candidate_tokens() {
        let c = Candidate::link("OpenBLAS", "-lopenblas -lpthread");
        assert_eq!(c.lib_tokens(), ["-lopenblas", "-lpthread"]);
        assert!(Candidate::flag("-O2").lib_tokens().is_empty());
    }

    #[test]
    fn test_header_candidate_relabeled_by_directory() {
        let c = Candidate::header("blas.hh")
            .labeled("../blaspp")
            .with_include_dir("../blaspp/include");
        assert_eq!(c.label, "../blaspp");
        assert!(matches!(c.payload, Payload::Header { ref include } if include == "blas.hh"));
        assert_eq!(c.include_dirs, ["../blaspp/include"]);
    }

    #[test]
    fn test_run_matching_sets_acceptance() {
        let c = Candidate::link("LAPACK version", "").run_matching(r"\d+\.\d+");
        assert!(c.accept.run);
        assert!(c.accept.pattern.unwrap().is_match("3.9.0"));
    }
}
