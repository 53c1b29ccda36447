//! Release pipeline for the JDAT shell.
//!
//! Checks the Python toolchain, provisions a venv, installs the build
//! dependencies, packages the entry point into a single executable, installs it
//! and removes the packager leftovers. Each step returns a typed result and the
//! first failure stops the run.

pub mod config;
pub mod error;
pub mod pipeline;
pub mod runner;
pub mod steps;

pub use config::PipelineConfig;
pub use error::BuildError;
pub use pipeline::{Pipeline, PipelineReport, PlannedStep, StepReport};
pub use runner::{CommandOutput, CommandRunner, Invocation, SystemRunner};
pub use steps::StepOutcome;
