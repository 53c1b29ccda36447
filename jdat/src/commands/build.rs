//! `jdat build`: run the release pipeline.

use anyhow::{Context, Result};
use jdat_build::{Pipeline, PipelineConfig, StepOutcome, SystemRunner};
use jdat_core::config::BuildConfig;

use crate::cli::BuildArgs;

/// Flags win over environment, environment over defaults.
pub fn resolve_config(args: &BuildArgs, base: BuildConfig) -> Result<PipelineConfig> {
    let mut cfg = base;
    if let Some(ref v) = args.python {
        cfg.python = v.clone();
    }
    if let Some(ref v) = args.ppa {
        cfg.python_ppa = v.clone();
    }
    if let Some(ref v) = args.venv_dir {
        cfg.venv_dir = v.clone();
    }
    if let Some(ref v) = args.entry_point {
        cfg.entry_point = v.clone();
    }
    if let Some(ref v) = args.name {
        cfg.binary_name = v.clone();
    }
    if let Some(ref v) = args.install_dir {
        cfg.install_dir = v.clone();
    }
    if let Some(ref deps) = args.deps {
        cfg.deps = deps
            .iter()
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty())
            .collect();
    }
    if args.no_sudo {
        cfg.use_sudo = false;
    }
    let work_dir = match args.work_dir {
        Some(ref d) => d.clone(),
        None => std::env::current_dir().context("Failed to read current directory")?,
    };
    Ok(PipelineConfig::from_build_config(&cfg, work_dir))
}

pub fn cmd_build(args: &BuildArgs) -> Result<()> {
    let config = resolve_config(args, BuildConfig::from_env())?;
    let mut runner = SystemRunner;
    let mut pipeline = Pipeline::new(config, &mut runner);

    if args.dry_run {
        let plan = pipeline.plan();
        if args.json {
            println!("{}", serde_json::to_string_pretty(&plan)?);
        } else {
            for (i, step) in plan.iter().enumerate() {
                println!("{}. {}", i + 1, step.name);
                for action in &step.actions {
                    println!("     {}", action);
                }
            }
        }
        return Ok(());
    }

    let report = pipeline.run().context("Release pipeline failed")?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }
    for step in &report.steps {
        match step.outcome {
            StepOutcome::Done { ref detail } => eprintln!("  ✓ {:<13} {}", step.name, detail),
            StepOutcome::Skipped { ref reason } => eprintln!("  – {:<13} {}", step.name, reason),
        }
    }
    eprintln!("✓ Installed {}", report.installed.display());
    Ok(())
}
