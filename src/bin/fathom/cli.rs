//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use fathom::util::shell::ColorChoice;

/// Fathom - discover a working toolchain and BLAS/LAPACK libraries
#[derive(Parser)]
#[command(name = "fathom")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output (print every trial)
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only print errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output: auto, always, never
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Probe the toolchain and emit make.inc and a defines header
    Configure(ConfigureArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args)]
pub struct ConfigureArgs {
    /// Project directory to configure (defaults to current directory)
    #[arg(long, default_value = ".")]
    pub dir: PathBuf,

    /// C++ compiler to try first
    #[arg(long, env = "CXX")]
    pub cxx: Option<String>,

    /// Install prefix recorded in make.inc
    #[arg(long)]
    pub prefix: Option<PathBuf>,

    /// Namespace for emitted defines (e.g. LAPACK)
    #[arg(long)]
    pub namespace: Option<String>,

    /// Probe every candidate and pick interactively
    #[arg(short, long)]
    pub interactive: bool,

    /// Emit machine-readable JSON events on stdout
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: Shell,
}
