use std::path::PathBuf;

use thiserror::Error;

/// Every pipeline failure is fatal: the run stops at the step that produced it.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("[{step}] `{command}` failed ({status}): {stderr}")]
    CommandFailed {
        step: &'static str,
        command: String,
        status: String,
        /// Exit code of the failed command; `None` when killed by a signal.
        code: Option<i32>,
        stderr: String,
    },

    #[error("[{step}] could not launch `{program}`: {source}")]
    Spawn {
        step: &'static str,
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("[packaging] entry point not found: {}", .0.display())]
    MissingEntryPoint(PathBuf),

    #[error("[packaging] packager finished but {} was not produced", .0.display())]
    MissingArtifact(PathBuf),

    #[error("[{step}] {}: {source}", .path.display())]
    Io {
        step: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl BuildError {
    /// Name of the step that failed.
    pub fn step(&self) -> &'static str {
        match self {
            Self::CommandFailed { step, .. } | Self::Spawn { step, .. } | Self::Io { step, .. } => {
                *step
            }
            Self::MissingEntryPoint(_) | Self::MissingArtifact(_) => crate::steps::PACKAGING,
        }
    }

    /// Exit code of the external command that failed, if any.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            Self::CommandFailed { code, .. } => *code,
            _ => None,
        }
    }
}
