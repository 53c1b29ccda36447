use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// JDAT - interactive shell for .jdat files with per-block AES-256-GCM encryption
#[derive(Parser, Debug)]
#[command(name = "jdat")]
#[command(author, version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// File to open in the shell (same as `jdat shell FILE`)
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the interactive shell
    Shell {
        /// .jdat file to open on start
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },

    /// List the blocks of a file
    #[command(alias = "ls")]
    List {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print one block, looked up by link or name
    Show {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Block link or name
        #[arg(value_name = "TARGET")]
        target: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Package the shell into a single executable and install it system-wide
    ///
    /// Checks the Python toolchain, creates a fresh venv, installs the build
    /// dependencies, runs pyinstaller, copies the result into the install
    /// directory and removes build leftovers. Stops at the first failure.
    Build(BuildArgs),
}

#[derive(Args, Debug, Default)]
pub struct BuildArgs {
    /// Interpreter required on PATH (default: JDAT_PYTHON or python3.11)
    #[arg(long, value_name = "BIN")]
    pub python: Option<String>,

    /// Package source used when the interpreter is missing (default: ppa:deadsnakes/ppa)
    #[arg(long, value_name = "PPA")]
    pub ppa: Option<String>,

    /// Virtual environment directory (default: .venv)
    #[arg(long, value_name = "DIR")]
    pub venv_dir: Option<String>,

    /// Entry-point script (default: shell.py)
    #[arg(long, value_name = "FILE")]
    pub entry_point: Option<String>,

    /// Name of the produced executable (default: jdat)
    #[arg(long, value_name = "NAME")]
    pub name: Option<String>,

    /// Install directory (default: /usr/local/bin)
    #[arg(long, value_name = "DIR")]
    pub install_dir: Option<String>,

    /// Packages to install into the venv, comma-separated (default: cryptography,pyinstaller)
    #[arg(long, value_name = "PKGS", value_delimiter = ',')]
    pub deps: Option<Vec<String>>,

    /// Run privileged commands without sudo
    #[arg(long)]
    pub no_sudo: bool,

    /// Working directory holding the entry point (default: current directory)
    #[arg(long, short = 'C', value_name = "DIR")]
    pub work_dir: Option<PathBuf>,

    /// Print the steps without running anything
    #[arg(long)]
    pub dry_run: bool,

    /// Print the run report (or plan) as JSON
    #[arg(long)]
    pub json: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_file_opens_shell() {
        let cli = Cli::try_parse_from(["jdat", "vault.jdat"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.file, Some(PathBuf::from("vault.jdat")));
    }

    #[test]
    fn test_build_flags() {
        let cli = Cli::try_parse_from([
            "jdat",
            "build",
            "--python",
            "python3.12",
            "--deps",
            "cryptography,pyinstaller,rich",
            "--no-sudo",
            "--dry-run",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Build(args)) => {
                assert_eq!(args.python.as_deref(), Some("python3.12"));
                assert_eq!(args.deps.unwrap().len(), 3);
                assert!(args.no_sudo);
                assert!(args.dry_run);
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_show_requires_target() {
        assert!(Cli::try_parse_from(["jdat", "show", "vault.jdat"]).is_err());
    }

    #[test]
    fn test_cli_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
