//! The six pipeline steps, executed once each in a fixed order.

mod cleanup;
mod deps;
mod installer;
mod packager;
mod toolchain;
mod venv;

pub use cleanup::Cleanup;
pub use deps::DependencyInstaller;
pub use installer::Installer;
pub use packager::Packager;
pub use toolchain::ToolchainVerifier;
pub use venv::EnvironmentProvisioner;

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::PipelineConfig;
use crate::error::BuildError;
use crate::runner::{CommandOutput, CommandRunner, Invocation};

pub const TOOLCHAIN: &str = "toolchain";
pub const ENVIRONMENT: &str = "environment";
pub const DEPENDENCIES: &str = "dependencies";
pub const PACKAGING: &str = "packaging";
pub const INSTALL: &str = "install";
pub const CLEANUP: &str = "cleanup";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum StepOutcome {
    Done { detail: String },
    Skipped { reason: String },
}

impl StepOutcome {
    pub fn done(detail: impl Into<String>) -> Self {
        Self::Done {
            detail: detail.into(),
        }
    }

    pub fn skipped(reason: impl Into<String>) -> Self {
        Self::Skipped {
            reason: reason.into(),
        }
    }
}

/// Interpreter and tools of the provisioned venv, used by every later step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveEnv {
    pub root: PathBuf,
    pub bin_dir: PathBuf,
    pub python: PathBuf,
}

impl ActiveEnv {
    /// POSIX layout (`bin/python`) unless a Windows layout (`Scripts/python.exe`) exists.
    pub fn for_venv(root: &Path) -> Self {
        let scripts = root.join("Scripts");
        if scripts.join("python.exe").exists() {
            return Self {
                root: root.to_path_buf(),
                python: scripts.join("python.exe"),
                bin_dir: scripts,
            };
        }
        let bin = root.join("bin");
        Self {
            root: root.to_path_buf(),
            python: bin.join("python"),
            bin_dir: bin,
        }
    }

    pub fn tool(&self, name: &str) -> PathBuf {
        if self.bin_dir.ends_with("Scripts") {
            self.bin_dir.join(format!("{}.exe", name))
        } else {
            self.bin_dir.join(name)
        }
    }
}

/// Mutable state threaded through the steps.
pub struct BuildContext<'a> {
    pub config: &'a PipelineConfig,
    pub runner: &'a mut dyn CommandRunner,
    pub env: Option<ActiveEnv>,
}

impl<'a> BuildContext<'a> {
    pub fn new(config: &'a PipelineConfig, runner: &'a mut dyn CommandRunner) -> Self {
        Self {
            config,
            runner,
            env: None,
        }
    }

    /// Run and treat a non-zero exit as fatal for `step`.
    pub fn exec(
        &mut self,
        step: &'static str,
        invocation: Invocation,
    ) -> Result<CommandOutput, BuildError> {
        tracing::info!(step, command = %invocation, "running");
        let out = self.runner.run(&invocation).map_err(|source| BuildError::Spawn {
            step,
            program: invocation.program.clone(),
            source,
        })?;
        if !out.success {
            return Err(BuildError::CommandFailed {
                step,
                command: invocation.to_string(),
                status: out.status_text(),
                code: out.code,
                stderr: out.stderr.trim().to_string(),
            });
        }
        Ok(out)
    }

    /// The venv activated by the environment step, or its expected layout if
    /// that step has not run.
    pub fn active_env(&self) -> ActiveEnv {
        self.env
            .clone()
            .unwrap_or_else(|| ActiveEnv::for_venv(&self.config.venv_path()))
    }
}

pub trait Step {
    fn name(&self) -> &'static str;

    /// Human-readable actions, for `--dry-run`.
    fn plan(&self, config: &PipelineConfig) -> Vec<String>;

    fn run(&self, ctx: &mut BuildContext<'_>) -> Result<StepOutcome, BuildError>;
}

pub(crate) fn io_err(step: &'static str, path: &Path) -> impl FnOnce(std::io::Error) -> BuildError {
    let path = path.to_path_buf();
    move |source| BuildError::Io { step, path, source }
}
