//! Fail-fast orchestration of the release steps.

use std::path::PathBuf;

use serde::Serialize;

use crate::config::PipelineConfig;
use crate::error::BuildError;
use crate::runner::CommandRunner;
use crate::steps::{
    BuildContext, Cleanup, DependencyInstaller, EnvironmentProvisioner, Installer, Packager, Step,
    StepOutcome, ToolchainVerifier,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepReport {
    pub name: &'static str,
    #[serde(flatten)]
    pub outcome: StepOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PipelineReport {
    pub steps: Vec<StepReport>,
    pub installed: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedStep {
    pub name: &'static str,
    pub actions: Vec<String>,
}

pub struct Pipeline<'a> {
    config: PipelineConfig,
    runner: &'a mut dyn CommandRunner,
    steps: Vec<Box<dyn Step>>,
}

impl<'a> Pipeline<'a> {
    pub fn new(config: PipelineConfig, runner: &'a mut dyn CommandRunner) -> Self {
        Self {
            config,
            runner,
            steps: vec![
                Box::new(ToolchainVerifier),
                Box::new(EnvironmentProvisioner),
                Box::new(DependencyInstaller),
                Box::new(Packager),
                Box::new(Installer),
                Box::new(Cleanup),
            ],
        }
    }

    pub fn plan(&self) -> Vec<PlannedStep> {
        self.steps
            .iter()
            .map(|s| PlannedStep {
                name: s.name(),
                actions: s.plan(&self.config),
            })
            .collect()
    }

    /// Run every step once, in order. The first error stops the run; nothing
    /// after the failing step executes and cleanup is skipped.
    pub fn run(&mut self) -> Result<PipelineReport, BuildError> {
        let mut ctx = BuildContext::new(&self.config, &mut *self.runner);
        let mut reports = Vec::with_capacity(self.steps.len());
        let total = self.steps.len();
        for (i, step) in self.steps.iter().enumerate() {
            tracing::info!(step = step.name(), "[{}/{}] {}", i + 1, total, step.name());
            match step.run(&mut ctx) {
                Ok(outcome) => reports.push(StepReport {
                    name: step.name(),
                    outcome,
                }),
                Err(e) => {
                    tracing::error!(step = step.name(), error = %e, "pipeline aborted");
                    return Err(e);
                }
            }
        }
        Ok(PipelineReport {
            steps: reports,
            installed: self.config.installed_binary(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::testing::RecordingRunner;
    use crate::steps;
    use jdat_core::config::BuildConfig;
    use std::path::Path;

    struct Fixture {
        work: tempfile::TempDir,
        bin: tempfile::TempDir,
    }

    impl Fixture {
        fn new() -> Self {
            let work = tempfile::tempdir().unwrap();
            std::fs::write(work.path().join("shell.py"), "print('jdat')\n").unwrap();
            Self {
                work,
                bin: tempfile::tempdir().unwrap(),
            }
        }

        fn config(&self) -> PipelineConfig {
            let mut cfg = PipelineConfig::from_build_config(&BuildConfig::default(), self.work.path());
            cfg.install_dir = self.bin.path().to_path_buf();
            cfg.elevate = false;
            cfg
        }

        /// Runner whose packager call leaves the same artifacts pyinstaller does.
        fn runner(&self) -> RecordingRunner {
            let work = self.work.path().to_path_buf();
            RecordingRunner::new()
                .with_on_path("python3.11")
                .with_hook(move |inv| {
                    if inv.args.iter().any(|a| a == "--onefile") {
                        fake_pyinstaller(&work);
                    }
                })
        }

        fn installed(&self) -> std::path::PathBuf {
            self.bin.path().join("jdat")
        }
    }

    fn fake_pyinstaller(work: &Path) {
        std::fs::create_dir_all(work.join("dist")).unwrap();
        std::fs::create_dir_all(work.join("build/jdat")).unwrap();
        std::fs::create_dir_all(work.join("__pycache__")).unwrap();
        std::fs::write(work.join("dist/jdat"), "#!binary").unwrap();
        std::fs::write(work.join("jdat.spec"), "# spec").unwrap();
    }

    #[test]
    fn test_successful_run_installs_and_cleans() {
        let fx = Fixture::new();
        let mut runner = fx.runner();
        let report = Pipeline::new(fx.config(), &mut runner).run().unwrap();

        let names: Vec<&str> = report.steps.iter().map(|s| s.name).collect();
        assert_eq!(
            names,
            vec![
                steps::TOOLCHAIN,
                steps::ENVIRONMENT,
                steps::DEPENDENCIES,
                steps::PACKAGING,
                steps::INSTALL,
                steps::CLEANUP
            ]
        );
        assert_eq!(report.installed, fx.installed());
        assert_eq!(std::fs::read_to_string(fx.installed()).unwrap(), "#!binary");

        let w = fx.work.path();
        assert!(!w.join("build").exists());
        assert!(!w.join("__pycache__").exists());
        assert!(!w.join("jdat.spec").exists());
        assert!(w.join("dist/jdat").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_installed_binary_is_world_executable() {
        use std::os::unix::fs::PermissionsExt;
        let fx = Fixture::new();
        let mut runner = fx.runner();
        Pipeline::new(fx.config(), &mut runner).run().unwrap();
        let mode = std::fs::metadata(fx.installed()).unwrap().permissions().mode();
        assert_eq!(mode & 0o111, 0o111);
    }

    #[test]
    fn test_present_toolchain_never_touches_package_manager() {
        let fx = Fixture::new();
        let mut runner = fx.runner();
        Pipeline::new(fx.config(), &mut runner).run().unwrap();
        assert!(!runner.ran("add-apt-repository"));
        assert!(!runner.ran("apt-get"));
    }

    #[test]
    fn test_two_runs_end_in_same_state() {
        let fx = Fixture::new();
        let mut runner = fx.runner();
        let first = Pipeline::new(fx.config(), &mut runner).run().unwrap();
        let second = Pipeline::new(fx.config(), &mut runner).run().unwrap();
        assert_eq!(first.installed, second.installed);
        let venv_creations = runner
            .rendered()
            .iter()
            .filter(|c| c.contains("-m venv --clear"))
            .count();
        assert_eq!(venv_creations, 2);
    }

    #[test]
    fn test_failure_stops_later_steps_and_keeps_installed_binary() {
        let fx = Fixture::new();
        std::fs::write(fx.installed(), "previous").unwrap();
        let mut runner = fx.runner().failing_on("cryptography");
        let err = Pipeline::new(fx.config(), &mut runner).run().unwrap_err();

        assert_eq!(err.step(), steps::DEPENDENCIES);
        assert!(!runner.ran("--onefile"));
        assert_eq!(std::fs::read_to_string(fx.installed()).unwrap(), "previous");
    }

    #[test]
    fn test_failure_carries_command_exit_code() {
        let fx = Fixture::new();
        let mut runner = fx.runner().failing_with("python3.11 --version", 42);
        let err = Pipeline::new(fx.config(), &mut runner).run().unwrap_err();
        assert_eq!(err.step(), steps::TOOLCHAIN);
        assert_eq!(err.exit_code(), Some(42));
        assert_eq!(runner.calls.len(), 1);
    }

    #[test]
    fn test_failure_leaves_partial_state_uncleaned() {
        let fx = Fixture::new();
        std::fs::create_dir_all(fx.work.path().join("build")).unwrap();
        let mut runner = fx.runner().failing_on("--onefile");
        let err = Pipeline::new(fx.config(), &mut runner).run().unwrap_err();
        assert!(matches!(err, BuildError::CommandFailed { step: steps::PACKAGING, .. }));
        assert!(fx.work.path().join("build").exists());
        assert!(!fx.installed().exists());
    }

    #[test]
    fn test_plan_lists_steps_in_order_without_running() {
        let fx = Fixture::new();
        let mut runner = fx.runner();
        let pipeline = Pipeline::new(fx.config(), &mut runner);
        let plan = pipeline.plan();
        assert_eq!(plan.len(), 6);
        assert_eq!(plan[0].name, steps::TOOLCHAIN);
        assert!(plan[3].actions[0].contains("--onefile --strip --clean --name jdat"));
        drop(pipeline);
        assert!(runner.calls.is_empty());
    }
}
