//! Fathom - a toolchain and library discovery tool for numerical software
//!
//! This crate provides the core library functionality for Fathom:
//! trial-compilation probing, ordered check sequencing, and emission of
//! build settings and defines headers.

pub mod catalog;
pub mod core;
pub mod emit;
pub mod engine;
pub mod ops;
pub mod probe;
pub mod util;

pub use core::{Acceptance, Candidate, Check, ConfigState, Payload, Value};

pub use engine::{Chooser, Configured, Observer, SelectionPolicy};
pub use probe::{Probe, ProbeError, ProbeReport};
pub use util::Shell;
