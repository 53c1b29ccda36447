//! Interactive JDAT shell.

pub mod command;
pub mod prompt;
pub mod render;
pub mod session;

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Result;
use colored::Colorize;

use command::Command;
use prompt::{Prompter, TerminalPrompter};
use session::{Flow, Session};

pub fn run_shell(file: Option<PathBuf>) -> Result<()> {
    let mut prompter = TerminalPrompter::new()?;
    let mut stdout = io::stdout();
    repl(&mut Session::new(), file, &mut prompter, &mut stdout)?;
    Ok(())
}

/// Read-eval loop. Ends on `exit` or end of input.
pub fn repl(
    session: &mut Session,
    file: Option<PathBuf>,
    prompter: &mut dyn Prompter,
    out: &mut dyn Write,
) -> io::Result<()> {
    render::header(out)?;
    if let Some(f) = file {
        let cmd = Command::Open(Some(f.to_string_lossy().into_owned()));
        session.execute(cmd, prompter, out)?;
    }

    loop {
        let Some(raw) = prompter.line(&session.prompt())? else {
            writeln!(out, "\n{}", "  Goodbye!".cyan())?;
            break;
        };
        let raw = raw.trim();
        let Some(cmd) = Command::parse(raw) else {
            continue;
        };
        prompter.remember(raw);
        tracing::debug!(command = ?cmd, "shell command");
        if session.execute(cmd, prompter, out)? == Flow::Exit {
            break;
        }
    }
    Ok(())
}
