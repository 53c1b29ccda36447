//! Tracing initialisation.
//!
//! Uses `config::ObservabilityConfig` for JDAT_QUIET, JDAT_LOG_LEVEL and JDAT_LOG_JSON.
//! Logs always go to stderr so shell and `--json` output on stdout stay clean.

use jdat_core::config::ObservabilityConfig;
use tracing_subscriber::{prelude::*, EnvFilter};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TracingMode {
    /// Level from JDAT_LOG_LEVEL / JDAT_QUIET.
    Default,
    /// Interactive shell: library info logs would interleave with the prompt.
    Shell,
}

fn filter_directive(cfg: &ObservabilityConfig, mode: TracingMode) -> String {
    let level = if cfg.quiet {
        "jdat=warn".to_string()
    } else {
        cfg.log_level.clone()
    };
    match mode {
        TracingMode::Default => level,
        TracingMode::Shell => format!("{},jdat_core=warn,jdat_build=warn", level),
    }
}

/// Call once at process startup; later calls are no-ops.
pub fn init_tracing(mode: TracingMode) {
    let cfg = ObservabilityConfig::from_env();
    let directive = filter_directive(cfg, mode);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&directive));

    let _ = if cfg.log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_target(true),
            )
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true),
            )
            .try_init()
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg(quiet: bool) -> ObservabilityConfig {
        ObservabilityConfig {
            quiet,
            log_level: "jdat=debug".to_string(),
            log_json: false,
        }
    }

    #[test]
    fn test_quiet_overrides_level() {
        assert_eq!(filter_directive(&cfg(true), TracingMode::Default), "jdat=warn");
        assert_eq!(filter_directive(&cfg(false), TracingMode::Default), "jdat=debug");
    }

    #[test]
    fn test_shell_mode_silences_libraries() {
        let d = filter_directive(&cfg(false), TracingMode::Shell);
        assert!(d.starts_with("jdat=debug,"));
        assert!(d.contains("jdat_core=warn"));
    }
}
