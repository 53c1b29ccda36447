use super::{ActiveEnv, BuildContext, Step, StepOutcome, PACKAGING};
use crate::config::PipelineConfig;
use crate::error::BuildError;
use crate::runner::Invocation;

/// Bundles the entry point into a single stripped executable at `dist/<name>`.
pub struct Packager;

impl Packager {
    fn command(config: &PipelineConfig, env: &ActiveEnv) -> Invocation {
        Invocation::new(env.tool("pyinstaller").to_string_lossy())
            .args(["--onefile", "--strip", "--clean", "--name"])
            .arg(config.binary_name.as_str())
            .arg(config.entry_point.to_string_lossy())
            .current_dir(&config.work_dir)
    }
}

impl Step for Packager {
    fn name(&self) -> &'static str {
        PACKAGING
    }

    fn plan(&self, config: &PipelineConfig) -> Vec<String> {
        let env = ActiveEnv::for_venv(&config.venv_path());
        vec![Self::command(config, &env).to_string()]
    }

    fn run(&self, ctx: &mut BuildContext<'_>) -> Result<StepOutcome, BuildError> {
        let entry = ctx.config.entry_path();
        if !entry.is_file() {
            return Err(BuildError::MissingEntryPoint(entry));
        }
        let env = ctx.active_env();
        ctx.exec(PACKAGING, Self::command(ctx.config, &env))?;

        let artifact = ctx.config.dist_binary();
        if !artifact.is_file() {
            return Err(BuildError::MissingArtifact(artifact));
        }
        tracing::info!(artifact = %artifact.display(), "packaged");
        Ok(StepOutcome::done(format!("built {}", artifact.display())))
    }
}
