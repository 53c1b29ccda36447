//! Interactive input. The session only talks to [`Prompter`], so it can be
//! driven by scripted input.

use std::io;

pub trait Prompter {
    /// Read one line. `Ok(None)` on Ctrl-C / Ctrl-D.
    fn line(&mut self, prompt: &str) -> io::Result<Option<String>>;

    /// Read a password without echo.
    fn password(&mut self, prompt: &str) -> io::Result<String>;

    /// Remember a command line for arrow-key recall.
    fn remember(&mut self, _line: &str) {}
}

/// rustyline for lines (with history), dialoguer for hidden passwords.
pub struct TerminalPrompter {
    editor: rustyline::DefaultEditor,
}

impl TerminalPrompter {
    pub fn new() -> anyhow::Result<Self> {
        let editor = rustyline::DefaultEditor::new()
            .map_err(|e| anyhow::anyhow!("Failed to create line editor: {}", e))?;
        Ok(Self { editor })
    }
}

impl Prompter for TerminalPrompter {
    fn line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        use rustyline::error::ReadlineError;
        match self.editor.readline(prompt) {
            Ok(line) => Ok(Some(line)),
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(None),
            Err(ReadlineError::Io(e)) => Err(e),
            Err(e) => Err(io::Error::new(io::ErrorKind::Other, e.to_string())),
        }
    }

    fn password(&mut self, prompt: &str) -> io::Result<String> {
        dialoguer::Password::new()
            .with_prompt(prompt)
            .allow_empty_password(true)
            .interact()
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))
    }

    fn remember(&mut self, line: &str) {
        let _ = self.editor.add_history_entry(line);
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::collections::VecDeque;

    /// Feeds queued answers; running out behaves like Ctrl-D.
    #[derive(Default)]
    pub struct ScriptedPrompter {
        pub lines: VecDeque<String>,
        pub passwords: VecDeque<String>,
        /// Prompts shown for each password request, in order.
        pub password_prompts: Vec<String>,
    }

    impl ScriptedPrompter {
        pub fn with_lines(lines: &[&str]) -> Self {
            Self {
                lines: lines.iter().map(|s| s.to_string()).collect(),
                ..Self::default()
            }
        }

        pub fn with_passwords(mut self, pws: &[&str]) -> Self {
            self.passwords = pws.iter().map(|s| s.to_string()).collect();
            self
        }
    }

    impl Prompter for ScriptedPrompter {
        fn line(&mut self, _prompt: &str) -> io::Result<Option<String>> {
            Ok(self.lines.pop_front())
        }

        fn password(&mut self, prompt: &str) -> io::Result<String> {
            self.password_prompts.push(prompt.to_string());
            self.passwords
                .pop_front()
                .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "no password queued"))
        }
    }
}
