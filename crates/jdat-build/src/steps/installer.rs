use std::path::Path;

use super::{io_err, BuildContext, Step, StepOutcome, INSTALL};
use crate::config::PipelineConfig;
use crate::error::BuildError;
use crate::runner::Invocation;

/// Mode of the installed binary: executable by everyone.
pub const INSTALLED_MODE: u32 = 0o755;

/// Copies `dist/<name>` over `<install_dir>/<name>` (no backup) and marks it executable.
pub struct Installer;

impl Installer {
    fn elevated_commands(config: &PipelineConfig) -> Vec<Invocation> {
        let src = config.dist_binary();
        let dest = config.installed_binary();
        vec![
            Invocation::new("cp")
                .arg(src.to_string_lossy())
                .arg(dest.to_string_lossy())
                .elevated(true),
            Invocation::new("chmod")
                .arg(format!("{:o}", INSTALLED_MODE))
                .arg(dest.to_string_lossy())
                .elevated(true),
        ]
    }

    fn install_in_process(src: &Path, dest: &Path) -> Result<(), BuildError> {
        std::fs::copy(src, dest).map_err(io_err(INSTALL, dest))?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(dest, std::fs::Permissions::from_mode(INSTALLED_MODE))
                .map_err(io_err(INSTALL, dest))?;
        }
        Ok(())
    }
}

impl Step for Installer {
    fn name(&self) -> &'static str {
        INSTALL
    }

    fn plan(&self, config: &PipelineConfig) -> Vec<String> {
        if config.elevate {
            Self::elevated_commands(config)
                .iter()
                .map(|c| c.to_string())
                .collect()
        } else {
            vec![
                format!(
                    "copy {} -> {}",
                    config.dist_binary().display(),
                    config.installed_binary().display()
                ),
                format!("chmod {:o} {}", INSTALLED_MODE, config.installed_binary().display()),
            ]
        }
    }

    fn run(&self, ctx: &mut BuildContext<'_>) -> Result<StepOutcome, BuildError> {
        let dest = ctx.config.installed_binary();
        if ctx.config.elevate {
            for cmd in Self::elevated_commands(ctx.config) {
                ctx.exec(INSTALL, cmd)?;
            }
        } else {
            Self::install_in_process(&ctx.config.dist_binary(), &dest)?;
        }
        tracing::info!(path = %dest.display(), "installed");
        Ok(StepOutcome::done(format!("installed {}", dest.display())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::testing::RecordingRunner;
    use jdat_core::config::BuildConfig;

    #[test]
    fn test_elevated_install_uses_sudo() {
        let cfg = PipelineConfig::from_build_config(&BuildConfig::default(), "/w");
        let mut runner = RecordingRunner::new();
        Installer
            .run(&mut BuildContext::new(&cfg, &mut runner))
            .unwrap();
        assert_eq!(
            runner.rendered(),
            vec![
                "sudo cp /w/dist/jdat /usr/local/bin/jdat",
                "sudo chmod 755 /usr/local/bin/jdat",
            ]
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_in_process_install_overwrites_and_sets_mode() {
        use std::os::unix::fs::PermissionsExt;

        let work = tempfile::tempdir().unwrap();
        let bin = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(work.path().join("dist")).unwrap();
        std::fs::write(work.path().join("dist/jdat"), "new").unwrap();
        std::fs::write(bin.path().join("jdat"), "old").unwrap();

        let mut cfg = PipelineConfig::from_build_config(&BuildConfig::default(), work.path());
        cfg.install_dir = bin.path().to_path_buf();
        cfg.elevate = false;
        let mut runner = RecordingRunner::new();
        Installer
            .run(&mut BuildContext::new(&cfg, &mut runner))
            .unwrap();

        let dest = bin.path().join("jdat");
        assert_eq!(std::fs::read_to_string(&dest).unwrap(), "new");
        let mode = std::fs::metadata(&dest).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
        assert!(runner.calls.is_empty());
    }
}
