//! Configuration structs grouped by concern, loaded from the environment.

use super::env_keys::{build as build_keys, observability as obv_keys};
use super::loader::{env_bool, env_list, env_optional, env_or};

pub const DEFAULT_PYTHON: &str = "python3.11";
pub const DEFAULT_PYTHON_PPA: &str = "ppa:deadsnakes/ppa";
pub const DEFAULT_VENV_DIR: &str = ".venv";
pub const DEFAULT_ENTRY_POINT: &str = "shell.py";
pub const DEFAULT_BINARY_NAME: &str = "jdat";
pub const DEFAULT_INSTALL_DIR: &str = "/usr/local/bin";
pub const DEFAULT_BUILD_DEPS: &[&str] = &["cryptography", "pyinstaller"];

/// Observability: quiet, log level, JSON output.
#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    pub quiet: bool,
    pub log_level: String,
    pub log_json: bool,
}

impl ObservabilityConfig {
    pub fn from_env() -> &'static Self {
        use std::sync::OnceLock;
        static CACHE: OnceLock<ObservabilityConfig> = OnceLock::new();
        CACHE.get_or_init(|| {
            super::loader::load_dotenv();
            Self {
                quiet: env_bool(obv_keys::JDAT_QUIET, obv_keys::QUIET_ALIASES, false),
                log_level: env_or(obv_keys::JDAT_LOG_LEVEL, obv_keys::LOG_LEVEL_ALIASES, || {
                    "jdat=info".to_string()
                }),
                log_json: env_bool(obv_keys::JDAT_LOG_JSON, obv_keys::LOG_JSON_ALIASES, false),
            }
        })
    }
}

/// Release pipeline settings. CLI flags are applied on top of this by the binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConfig {
    pub python: String,
    pub python_ppa: String,
    pub venv_dir: String,
    pub entry_point: String,
    pub binary_name: String,
    pub install_dir: String,
    pub deps: Vec<String>,
    pub use_sudo: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            python: DEFAULT_PYTHON.to_string(),
            python_ppa: DEFAULT_PYTHON_PPA.to_string(),
            venv_dir: DEFAULT_VENV_DIR.to_string(),
            entry_point: DEFAULT_ENTRY_POINT.to_string(),
            binary_name: DEFAULT_BINARY_NAME.to_string(),
            install_dir: DEFAULT_INSTALL_DIR.to_string(),
            deps: DEFAULT_BUILD_DEPS.iter().map(|s| s.to_string()).collect(),
            use_sudo: true,
        }
    }
}

impl BuildConfig {
    /// Load from environment (and `.env`); unset keys use the built-in defaults.
    pub fn from_env() -> Self {
        super::loader::load_dotenv();
        let d = Self::default();
        Self {
            python: env_or(build_keys::JDAT_PYTHON, build_keys::PYTHON_ALIASES, || d.python),
            python_ppa: env_optional(build_keys::JDAT_PYTHON_PPA, &[]).unwrap_or(d.python_ppa),
            venv_dir: env_or(build_keys::JDAT_VENV_DIR, build_keys::VENV_DIR_ALIASES, || {
                d.venv_dir
            }),
            entry_point: env_optional(build_keys::JDAT_ENTRY_POINT, &[]).unwrap_or(d.entry_point),
            binary_name: env_optional(build_keys::JDAT_BINARY_NAME, &[]).unwrap_or(d.binary_name),
            install_dir: env_optional(build_keys::JDAT_INSTALL_DIR, &[]).unwrap_or(d.install_dir),
            deps: env_list(build_keys::JDAT_BUILD_DEPS, &[], DEFAULT_BUILD_DEPS),
            use_sudo: !env_bool(build_keys::JDAT_NO_SUDO, &[], false),
        }
    }
}
