//! Process execution seam for the pipeline.
//!
//! Steps never spawn processes directly; they go through [`CommandRunner`] so the
//! whole pipeline can run against a recording fake.

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

/// One external command: program, arguments and working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
}

impl Invocation {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: &Path) -> Self {
        self.cwd = Some(dir.to_path_buf());
        self
    }

    /// Prefix with `sudo` when `elevate` is set.
    pub fn elevated(self, elevate: bool) -> Self {
        if !elevate {
            return self;
        }
        let mut args = Vec::with_capacity(self.args.len() + 1);
        args.push(self.program);
        args.extend(self.args);
        Self {
            program: "sudo".to_string(),
            args,
            cwd: self.cwd,
        }
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for a in &self.args {
            if a.is_empty() || a.contains(char::is_whitespace) {
                write!(f, " '{}'", a)?;
            } else {
                write!(f, " {}", a)?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub success: bool,
    /// `None` when terminated by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            success: true,
            code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    pub fn failed(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            success: false,
            code: Some(code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    pub fn status_text(&self) -> String {
        match self.code {
            Some(c) => format!("exit code {}", c),
            None => "terminated by signal".to_string(),
        }
    }
}

pub trait CommandRunner {
    /// Run to completion, capturing output. `Err` only when the process could not be started.
    fn run(&mut self, invocation: &Invocation) -> std::io::Result<CommandOutput>;

    /// Find an executable on PATH.
    fn locate(&self, program: &str) -> Option<PathBuf>;
}

/// Runs real processes.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&mut self, invocation: &Invocation) -> std::io::Result<CommandOutput> {
        tracing::debug!(command = %invocation, "spawning");
        let mut cmd = Command::new(&invocation.program);
        cmd.args(&invocation.args);
        if let Some(ref dir) = invocation.cwd {
            cmd.current_dir(dir);
        }
        let out = cmd.output()?;
        Ok(CommandOutput {
            success: out.status.success(),
            code: out.status.code(),
            stdout: String::from_utf8_lossy(&out.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&out.stderr).into_owned(),
        })
    }

    fn locate(&self, program: &str) -> Option<PathBuf> {
        which::which(program).ok()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Recording fake used by the step and pipeline tests.

    use super::*;
    use std::collections::HashSet;

    type Hook = Box<dyn FnMut(&Invocation)>;

    pub struct RecordingRunner {
        pub calls: Vec<Invocation>,
        pub on_path: HashSet<String>,
        /// Any invocation whose rendered command contains the needle fails with the code.
        pub fail_when: Option<(String, i32)>,
        hooks: Vec<Hook>,
    }

    impl RecordingRunner {
        pub fn new() -> Self {
            Self {
                calls: Vec::new(),
                on_path: HashSet::new(),
                fail_when: None,
                hooks: Vec::new(),
            }
        }

        pub fn with_on_path(mut self, program: &str) -> Self {
            self.on_path.insert(program.to_string());
            self
        }

        pub fn failing_on(self, needle: &str) -> Self {
            self.failing_with(needle, 1)
        }

        pub fn failing_with(mut self, needle: &str, code: i32) -> Self {
            self.fail_when = Some((needle.to_string(), code));
            self
        }

        /// Side effect applied on every successful invocation (e.g. create `dist/<name>`).
        pub fn with_hook(mut self, hook: impl FnMut(&Invocation) + 'static) -> Self {
            self.hooks.push(Box::new(hook));
            self
        }

        pub fn rendered(&self) -> Vec<String> {
            self.calls.iter().map(|c| c.to_string()).collect()
        }

        pub fn ran(&self, needle: &str) -> bool {
            self.rendered().iter().any(|c| c.contains(needle))
        }
    }

    impl CommandRunner for RecordingRunner {
        fn run(&mut self, invocation: &Invocation) -> std::io::Result<CommandOutput> {
            self.calls.push(invocation.clone());
            let rendered = invocation.to_string();
            if let Some((ref needle, code)) = self.fail_when {
                if rendered.contains(needle.as_str()) {
                    return Ok(CommandOutput::failed(code, format!("{} failed", invocation.program)));
                }
            }
            for hook in self.hooks.iter_mut() {
                hook(invocation);
            }
            if invocation.args.iter().any(|a| a == "--version") {
                return Ok(CommandOutput::ok("Python 3.11.9\n"));
            }
            Ok(CommandOutput::ok(""))
        }

        fn locate(&self, program: &str) -> Option<PathBuf> {
            self.on_path
                .contains(program)
                .then(|| PathBuf::from("/usr/bin").join(program))
        }
    }
}
