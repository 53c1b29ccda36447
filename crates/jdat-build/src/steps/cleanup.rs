use std::path::Path;

use super::{io_err, BuildContext, Step, StepOutcome, CLEANUP};
use crate::config::PipelineConfig;
use crate::error::BuildError;

const TRANSIENT_DIRS: &[&str] = &["build", "__pycache__"];

/// Removes packager leftovers (`build/`, `__pycache__/`, `*.spec`) and deactivates the venv.
/// The venv directory itself is kept.
pub struct Cleanup;

fn remove_spec_files(dir: &Path) -> Result<usize, BuildError> {
    let mut removed = 0;
    let entries = std::fs::read_dir(dir).map_err(io_err(CLEANUP, dir))?;
    for entry in entries {
        let path = entry.map_err(io_err(CLEANUP, dir))?.path();
        if path.is_file() && path.extension().is_some_and(|e| e == "spec") {
            std::fs::remove_file(&path).map_err(io_err(CLEANUP, &path))?;
            removed += 1;
        }
    }
    Ok(removed)
}

impl Step for Cleanup {
    fn name(&self) -> &'static str {
        CLEANUP
    }

    fn plan(&self, config: &PipelineConfig) -> Vec<String> {
        let mut lines: Vec<String> = TRANSIENT_DIRS
            .iter()
            .map(|d| format!("remove {}", config.work_dir.join(d).display()))
            .collect();
        lines.push(format!("remove {}", config.work_dir.join("*.spec").display()));
        lines.push("deactivate environment".to_string());
        lines
    }

    fn run(&self, ctx: &mut BuildContext<'_>) -> Result<StepOutcome, BuildError> {
        let config = ctx.config;
        let work_dir = &config.work_dir;
        let mut removed = Vec::new();
        for name in TRANSIENT_DIRS {
            let path = work_dir.join(name);
            if path.is_dir() {
                std::fs::remove_dir_all(&path).map_err(io_err(CLEANUP, &path))?;
                removed.push(format!("{}/", name));
            }
        }
        let specs = remove_spec_files(work_dir)?;
        if specs > 0 {
            removed.push(format!("{} spec file(s)", specs));
        }

        if let Some(env) = ctx.env.take() {
            tracing::info!(path = %env.root.display(), "environment deactivated");
        }
        if removed.is_empty() {
            return Ok(StepOutcome::skipped("nothing to remove"));
        }
        Ok(StepOutcome::done(format!("removed {}", removed.join(", "))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::testing::RecordingRunner;
    use crate::steps::ActiveEnv;
    use jdat_core::config::BuildConfig;

    #[test]
    fn test_removes_artifacts_and_keeps_venv() {
        let dir = tempfile::tempdir().unwrap();
        let w = dir.path();
        std::fs::create_dir_all(w.join("build/jdat")).unwrap();
        std::fs::create_dir_all(w.join("__pycache__")).unwrap();
        std::fs::create_dir_all(w.join(".venv/bin")).unwrap();
        std::fs::write(w.join("jdat.spec"), "a").unwrap();
        std::fs::write(w.join("shell.py"), "b").unwrap();

        let cfg = PipelineConfig::from_build_config(&BuildConfig::default(), w);
        let mut runner = RecordingRunner::new();
        let mut ctx = BuildContext::new(&cfg, &mut runner);
        ctx.env = Some(ActiveEnv::for_venv(&w.join(".venv")));
        let outcome = Cleanup.run(&mut ctx).unwrap();

        assert!(matches!(outcome, StepOutcome::Done { .. }));
        assert!(ctx.env.is_none());
        assert!(!w.join("build").exists());
        assert!(!w.join("__pycache__").exists());
        assert!(!w.join("jdat.spec").exists());
        assert!(w.join("shell.py").exists());
        assert!(w.join(".venv").exists());
    }

    #[test]
    fn test_clean_tree_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = PipelineConfig::from_build_config(&BuildConfig::default(), dir.path());
        let mut runner = RecordingRunner::new();
        let outcome = Cleanup
            .run(&mut BuildContext::new(&cfg, &mut runner))
            .unwrap();
        assert!(matches!(outcome, StepOutcome::Skipped { .. }));
    }
}
