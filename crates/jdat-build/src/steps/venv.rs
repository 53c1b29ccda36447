use super::{ActiveEnv, BuildContext, Step, StepOutcome, ENVIRONMENT};
use crate::config::PipelineConfig;
use crate::error::BuildError;
use crate::runner::Invocation;

/// Creates the venv from scratch (`--clear`) and activates it for later steps.
pub struct EnvironmentProvisioner;

impl EnvironmentProvisioner {
    fn create_command(config: &PipelineConfig) -> Invocation {
        Invocation::new(config.python.as_str())
            .args(["-m", "venv", "--clear"])
            .arg(config.venv_path().to_string_lossy())
            .current_dir(&config.work_dir)
    }
}

impl Step for EnvironmentProvisioner {
    fn name(&self) -> &'static str {
        ENVIRONMENT
    }

    fn plan(&self, config: &PipelineConfig) -> Vec<String> {
        vec![
            Self::create_command(config).to_string(),
            format!("activate {}", config.venv_path().display()),
        ]
    }

    fn run(&self, ctx: &mut BuildContext<'_>) -> Result<StepOutcome, BuildError> {
        let venv = ctx.config.venv_path();
        if venv.exists() {
            tracing::debug!(path = %venv.display(), "existing environment will be overwritten");
        }
        ctx.exec(ENVIRONMENT, Self::create_command(ctx.config))?;

        let env = ActiveEnv::for_venv(&venv);
        tracing::info!(python = %env.python.display(), "environment activated");
        ctx.env = Some(env);
        Ok(StepOutcome::done(format!("created {}", venv.display())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::testing::RecordingRunner;
    use jdat_core::config::BuildConfig;

    #[test]
    fn test_creates_fresh_venv_and_activates() {
        let cfg = PipelineConfig::from_build_config(&BuildConfig::default(), "/w");
        let mut runner = RecordingRunner::new();
        let mut ctx = BuildContext::new(&cfg, &mut runner);
        EnvironmentProvisioner.run(&mut ctx).unwrap();
        let env = ctx.env.clone().unwrap();
        assert_eq!(env.python, std::path::PathBuf::from("/w/.venv/bin/python"));
        assert_eq!(env.tool("pyinstaller"), std::path::PathBuf::from("/w/.venv/bin/pyinstaller"));
        drop(ctx);
        assert_eq!(runner.rendered(), vec!["python3.11 -m venv --clear /w/.venv"]);
        assert_eq!(runner.calls[0].cwd.as_deref(), Some(std::path::Path::new("/w")));
    }
}
