//! Environment variable names and aliases.
//!
//! Primary names use the `JDAT_*` prefix; aliases are accepted where an older
//! or more generic name is common.

/// Logging and observability
pub mod observability {
    pub const JDAT_QUIET: &str = "JDAT_QUIET";
    pub const QUIET_ALIASES: &[&str] = &[];

    pub const JDAT_LOG_LEVEL: &str = "JDAT_LOG_LEVEL";
    pub const LOG_LEVEL_ALIASES: &[&str] = &["JDAT_LOG"];

    pub const JDAT_LOG_JSON: &str = "JDAT_LOG_JSON";
    pub const LOG_JSON_ALIASES: &[&str] = &[];
}

/// Release pipeline (`jdat build`)
pub mod build {
    /// Interpreter executable that must be on PATH, e.g. `python3.11`.
    pub const JDAT_PYTHON: &str = "JDAT_PYTHON";
    pub const PYTHON_ALIASES: &[&str] = &["PYTHON_BIN"];

    /// Package source added when the interpreter is missing.
    pub const JDAT_PYTHON_PPA: &str = "JDAT_PYTHON_PPA";

    pub const JDAT_VENV_DIR: &str = "JDAT_VENV_DIR";
    pub const VENV_DIR_ALIASES: &[&str] = &["VIRTUAL_ENV_DIR"];

    pub const JDAT_ENTRY_POINT: &str = "JDAT_ENTRY_POINT";
    pub const JDAT_BINARY_NAME: &str = "JDAT_BINARY_NAME";
    pub const JDAT_INSTALL_DIR: &str = "JDAT_INSTALL_DIR";

    /// Comma-separated list of packages installed into the venv.
    pub const JDAT_BUILD_DEPS: &str = "JDAT_BUILD_DEPS";

    /// `1` runs privileged commands without `sudo`.
    pub const JDAT_NO_SUDO: &str = "JDAT_NO_SUDO";
}
