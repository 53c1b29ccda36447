//! Injectable pipeline configuration: every path the pipeline touches is here.

use std::path::{Path, PathBuf};

use jdat_core::config::BuildConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Interpreter executable required on PATH, e.g. `python3.11`.
    pub python: String,
    /// Package source added before installing a missing interpreter.
    pub python_ppa: String,
    /// System packages installed when the interpreter is missing.
    pub system_packages: Vec<String>,
    /// Isolated environment, relative to `work_dir` unless absolute.
    pub venv_dir: PathBuf,
    pub deps: Vec<String>,
    /// Script handed to the packager, relative to `work_dir` unless absolute.
    pub entry_point: PathBuf,
    pub binary_name: String,
    pub work_dir: PathBuf,
    pub install_dir: PathBuf,
    /// Run privileged commands through `sudo`.
    pub elevate: bool,
}

/// Interpreter plus its venv module and development headers.
pub fn system_packages_for(python: &str) -> Vec<String> {
    vec![
        python.to_string(),
        format!("{}-venv", python),
        format!("{}-dev", python),
    ]
}

impl PipelineConfig {
    pub fn from_build_config(cfg: &BuildConfig, work_dir: impl Into<PathBuf>) -> Self {
        Self {
            python: cfg.python.clone(),
            python_ppa: cfg.python_ppa.clone(),
            system_packages: system_packages_for(&cfg.python),
            venv_dir: PathBuf::from(&cfg.venv_dir),
            deps: cfg.deps.clone(),
            entry_point: PathBuf::from(&cfg.entry_point),
            binary_name: cfg.binary_name.clone(),
            work_dir: work_dir.into(),
            install_dir: PathBuf::from(&cfg.install_dir),
            elevate: cfg.use_sudo,
        }
    }

    fn in_work_dir(&self, p: &Path) -> PathBuf {
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            self.work_dir.join(p)
        }
    }

    pub fn venv_path(&self) -> PathBuf {
        self.in_work_dir(&self.venv_dir)
    }

    pub fn entry_path(&self) -> PathBuf {
        self.in_work_dir(&self.entry_point)
    }

    /// Packager output: `<work_dir>/dist/<binary_name>`.
    pub fn dist_binary(&self) -> PathBuf {
        self.work_dir.join("dist").join(&self.binary_name)
    }

    pub fn installed_binary(&self) -> PathBuf {
        self.install_dir.join(&self.binary_name)
    }
}
