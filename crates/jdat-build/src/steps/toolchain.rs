use super::{BuildContext, Step, StepOutcome, TOOLCHAIN};
use crate::config::PipelineConfig;
use crate::error::BuildError;
use crate::runner::Invocation;

/// Ensures the interpreter is on PATH, installing it from the configured
/// package source when missing, then prints its version.
pub struct ToolchainVerifier;

impl ToolchainVerifier {
    fn install_commands(config: &PipelineConfig) -> Vec<Invocation> {
        vec![
            Invocation::new("add-apt-repository")
                .args(["-y", config.python_ppa.as_str()])
                .elevated(config.elevate),
            Invocation::new("apt-get")
                .arg("update")
                .elevated(config.elevate),
            Invocation::new("apt-get")
                .args(["install", "-y"])
                .args(config.system_packages.iter().cloned())
                .elevated(config.elevate),
        ]
    }

    fn version_command(config: &PipelineConfig) -> Invocation {
        Invocation::new(config.python.as_str()).arg("--version")
    }
}

impl Step for ToolchainVerifier {
    fn name(&self) -> &'static str {
        TOOLCHAIN
    }

    fn plan(&self, config: &PipelineConfig) -> Vec<String> {
        let mut lines = vec![format!("check `{}` on PATH", config.python)];
        lines.extend(
            Self::install_commands(config)
                .iter()
                .map(|c| format!("if missing: {}", c)),
        );
        lines.push(Self::version_command(config).to_string());
        lines
    }

    fn run(&self, ctx: &mut BuildContext<'_>) -> Result<StepOutcome, BuildError> {
        let config = ctx.config;
        let outcome = match ctx.runner.locate(&config.python) {
            Some(path) => {
                tracing::info!(python = %config.python, path = %path.display(), "interpreter found");
                StepOutcome::skipped(format!("{} already installed", config.python))
            }
            None => {
                tracing::warn!(python = %config.python, "interpreter missing, installing");
                for cmd in Self::install_commands(config) {
                    ctx.exec(TOOLCHAIN, cmd)?;
                }
                StepOutcome::done(format!("installed {}", config.system_packages.join(" ")))
            }
        };

        let out = ctx.exec(TOOLCHAIN, Self::version_command(config))?;
        // Older interpreters print the version on stderr.
        let version = if out.stdout.trim().is_empty() {
            out.stderr.trim().to_string()
        } else {
            out.stdout.trim().to_string()
        };
        tracing::info!(%version, "toolchain ready");
        Ok(outcome)
    }
}
