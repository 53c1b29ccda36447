use super::{BuildContext, Step, StepOutcome, DEPENDENCIES};
use crate::config::PipelineConfig;
use crate::error::BuildError;
use crate::runner::Invocation;

/// Upgrades pip, then installs the configured packages (unpinned, quiet).
pub struct DependencyInstaller;

fn pip(python: &str) -> Invocation {
    Invocation::new(python).args(["-m", "pip", "install", "--quiet"])
}

impl Step for DependencyInstaller {
    fn name(&self) -> &'static str {
        DEPENDENCIES
    }

    fn plan(&self, config: &PipelineConfig) -> Vec<String> {
        let py = super::ActiveEnv::for_venv(&config.venv_path()).python;
        let py = py.to_string_lossy();
        vec![
            pip(&py).args(["--upgrade", "pip"]).to_string(),
            pip(&py).args(config.deps.iter().cloned()).to_string(),
        ]
    }

    fn run(&self, ctx: &mut BuildContext<'_>) -> Result<StepOutcome, BuildError> {
        let python = ctx.active_env().python.to_string_lossy().into_owned();
        let work_dir = ctx.config.work_dir.clone();

        ctx.exec(
            DEPENDENCIES,
            pip(&python).args(["--upgrade", "pip"]).current_dir(&work_dir),
        )?;
        if ctx.config.deps.is_empty() {
            return Ok(StepOutcome::skipped("no dependencies configured"));
        }
        ctx.exec(
            DEPENDENCIES,
            pip(&python)
                .args(ctx.config.deps.iter().cloned())
                .current_dir(&work_dir),
        )?;
        let summary = format!("installed {}", ctx.config.deps.join(", "));
        tracing::info!("{}", summary);
        Ok(StepOutcome::done(summary))
    }
}
