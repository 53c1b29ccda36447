//! Shell state: the open document and the block the user has entered.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use colored::Colorize;
use jdat_core::{BlockKind, Document, FormatError};

use super::command::Command;
use super::prompt::Prompter;
use super::render;

const NO_FILE: &str = "No file open";
const CONFIRM_WORDS: &[&str] = &["yes", "y", "oui", "o"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

#[derive(Debug, Default)]
pub struct Session {
    doc: Option<Document>,
    /// Link of the entered block; `None` is the root.
    current: Option<String>,
}

fn with_extension(name: &str) -> PathBuf {
    if name.ends_with(".jdat") {
        PathBuf::from(name)
    } else {
        PathBuf::from(format!("{}.jdat", name))
    }
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn document(&self) -> Option<&Document> {
        self.doc.as_ref()
    }

    #[cfg(test)]
    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn prompt(&self) -> String {
        let name = self
            .doc
            .as_ref()
            .and_then(|d| d.path())
            .and_then(Path::file_name)
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "no file".to_string());
        let mut p = format!("{}{}", "jdat".cyan().bold(), format!("({})", name).bright_black());
        if let Some(ref link) = self.current {
            p.push_str(&format!(" {}", format!("→ {}", link).magenta().bold()));
        }
        p.push_str(&" > ".cyan().to_string());
        p
    }

    pub fn execute(
        &mut self,
        cmd: Command,
        prompter: &mut dyn Prompter,
        out: &mut dyn Write,
    ) -> io::Result<Flow> {
        match cmd {
            Command::Exit => {
                writeln!(out, "{}", "  Goodbye!".cyan())?;
                return Ok(Flow::Exit);
            }
            Command::Help => render::help(out)?,
            Command::Open(arg) => self.open(arg, out)?,
            Command::New(arg) => self.new_file(arg, out)?,
            Command::Save(arg) => self.save(arg, out)?,
            Command::Goto(arg) => self.goto(arg, out)?,
            Command::Back => self.back(out)?,
            Command::Pwd => self.pwd(out)?,
            Command::List => match self.doc {
                Some(ref doc) => render::block_table(out, doc)?,
                None => render::err(out, NO_FILE)?,
            },
            Command::Read(arg) => self.read(arg, out)?,
            Command::Find(arg) => self.find(arg, out)?,
            Command::Add => self.add(prompter, out)?,
            Command::Edit(arg) => self.edit(arg, prompter, out)?,
            Command::Del(arg) => self.del(arg, prompter, out)?,
            Command::Enc(arg) => self.enc(arg, prompter, out)?,
            Command::Dec(arg) => self.dec(arg, prompter, out)?,
            Command::Unknown(verb) => {
                render::err(out, &format!("Unknown command: '{}' (type 'help')", verb))?
            }
        }
        Ok(Flow::Continue)
    }

    /// Explicit argument, else the current block.
    fn target(&self, arg: Option<String>) -> Option<String> {
        arg.or_else(|| self.current.clone())
    }

    // ── Files ──────────────────────────────────────────────

    fn open(&mut self, arg: Option<String>, out: &mut dyn Write) -> io::Result<()> {
        self.current = None;
        let Some(file) = arg else {
            return render::err(out, "Usage: open <file.jdat>");
        };
        match Document::load(&file) {
            Ok(doc) => {
                render::ok(
                    out,
                    &format!("Opened {} ({} block(s))", file, doc.blocks().len()),
                )?;
                self.doc = Some(doc);
                Ok(())
            }
            Err(FormatError::NotFound(_)) => render::err(out, &format!("File not found: {}", file)),
            Err(e) => render::err(out, &format!("Read error: {}", e)),
        }
    }

    fn new_file(&mut self, arg: Option<String>, out: &mut dyn Write) -> io::Result<()> {
        self.current = None;
        let Some(name) = arg else {
            return render::err(out, "Usage: new <file.jdat>");
        };
        let path = with_extension(&name);
        render::ok(out, &format!("New file: {}", path.display()))?;
        self.doc = Some(Document::new(Some(path)));
        Ok(())
    }

    fn save(&mut self, arg: Option<String>, out: &mut dyn Write) -> io::Result<()> {
        let Some(doc) = self.doc.as_mut() else {
            return render::err(out, NO_FILE);
        };
        match doc.save(arg.as_deref().map(Path::new)) {
            Ok(path) => render::ok(out, &format!("Saved: {}", path.display())),
            Err(e) => render::err(out, &e.to_string()),
        }
    }

    // ── Navigation ─────────────────────────────────────────

    fn goto(&mut self, arg: Option<String>, out: &mut dyn Write) -> io::Result<()> {
        let Some(doc) = self.doc.as_ref() else {
            return render::err(out, NO_FILE);
        };
        let Some(target) = arg else {
            return match self.current.as_deref().and_then(|l| doc.get_by_link(l)) {
                Some(b) => render::block(out, b),
                None => render::err(out, "Usage: goto <link>"),
            };
        };
        if target == ".." || target == "/" {
            self.current = None;
            return render::ok(out, "Back at the root");
        }
        match doc.resolve(&target) {
            Some(b) => {
                render::ok(out, &format!("Entered '{}' (link: {})", b.name(), b.link()))?;
                render::block(out, b)?;
                self.current = Some(b.link().to_string());
                Ok(())
            }
            None => render::err(out, &format!("Block not found: '{}'", target)),
        }
    }

    fn back(&mut self, out: &mut dyn Write) -> io::Result<()> {
        match self.current.take() {
            Some(link) => render::ok(out, &format!("Back at the root (left: {})", link)),
            None => render::info(out, "Already at the root"),
        }
    }

    fn pwd(&self, out: &mut dyn Write) -> io::Result<()> {
        let block = self
            .doc
            .as_ref()
            .zip(self.current.as_deref())
            .and_then(|(d, l)| d.get_by_link(l));
        match block {
            Some(b) => render::block(out, b),
            None => render::info(out, "Root - no block selected (use 'goto <link>')"),
        }
    }

    // ── Reading ────────────────────────────────────────────

    fn read(&self, arg: Option<String>, out: &mut dyn Write) -> io::Result<()> {
        let Some(doc) = self.doc.as_ref() else {
            return render::err(out, NO_FILE);
        };
        let Some(target) = self.target(arg) else {
            return render::err(out, "Usage: read <link> (or 'goto <link>' first)");
        };
        match doc.resolve(&target) {
            Some(b) => render::block(out, b),
            None => render::err(out, &format!("Block not found: {}", target)),
        }
    }

    fn find(&self, arg: Option<String>, out: &mut dyn Write) -> io::Result<()> {
        let Some(doc) = self.doc.as_ref() else {
            return render::err(out, NO_FILE);
        };
        let Some(query) = arg else {
            return render::err(out, "Usage: find <text>");
        };
        let hits = doc.find(&query);
        if hits.is_empty() {
            return render::info(out, "No results");
        }
        render::info(out, &format!("{} result(s):", hits.len()))?;
        for b in hits {
            render::block(out, b)?;
        }
        Ok(())
    }

    // ── Writing ────────────────────────────────────────────

    /// Lines until an empty line (or end of input).
    fn read_lines(
        prompter: &mut dyn Prompter,
        indent: &str,
    ) -> io::Result<Vec<String>> {
        let mut lines = Vec::new();
        while let Some(line) = prompter.line("  > ")? {
            if line.is_empty() {
                break;
            }
            lines.push(format!("{}{}", indent, line));
        }
        Ok(lines)
    }

    fn add(&mut self, prompter: &mut dyn Prompter, out: &mut dyn Write) -> io::Result<()> {
        let Some(doc) = self.doc.as_mut() else {
            return render::err(out, NO_FILE);
        };
        writeln!(out, "{}", "\n  ── New block ──".cyan().bold())?;
        let Some(name) = prompter.line("  name (n:) > ")? else {
            return Ok(());
        };
        let Some(link) = prompter.line("  link (l:) > ")? else {
            return Ok(());
        };
        let Some(kind) = prompter.line("  type [1=data / 2=code] > ")? else {
            return Ok(());
        };
        let kind = match kind.trim() {
            "2" => BlockKind::Code,
            _ => BlockKind::Data,
        };
        writeln!(out, "{}", "  Content (empty line to finish):".bright_black())?;
        let indent = if kind == BlockKind::Data { "  " } else { "" };
        let content = Self::read_lines(prompter, indent)?.join("\n");

        let (name, link) = (name.trim(), link.trim());
        match doc.add_block(name, link, kind, &content) {
            Ok(_) => render::ok(out, &format!("Block '{}' added (link: {})", name, link)),
            Err(e) => render::err(out, &e.to_string()),
        }
    }

    fn edit(
        &mut self,
        arg: Option<String>,
        prompter: &mut dyn Prompter,
        out: &mut dyn Write,
    ) -> io::Result<()> {
        let target = self.target(arg);
        let Some(doc) = self.doc.as_mut() else {
            return render::err(out, NO_FILE);
        };
        let Some(target) = target else {
            return render::err(out, "Usage: edit <link> (or 'goto <link>' first)");
        };
        let Some(block) = doc.resolve_mut(&target) else {
            return render::err(out, &format!("Block not found: {}", target));
        };
        if block.is_encrypted() {
            return render::err(out, "Decrypt the block before editing it (dec)");
        }
        render::block(out, block)?;

        if block.kind() == BlockKind::Data {
            let Some(key) = prompter.line("  key to change > ")? else {
                return Ok(());
            };
            let key = key.trim();
            if key.is_empty() {
                return Ok(());
            }
            let value = prompter
                .line(&format!("  new value for '{}' > ", key))?
                .unwrap_or_default();
            match block.set(key, &value) {
                Ok(()) => render::ok(out, &format!("'{}' updated", key)),
                Err(e) => render::err(out, &e.to_string()),
            }
        } else {
            writeln!(out, "{}", "  New content (empty line to finish):".bright_black())?;
            let content = Self::read_lines(prompter, "")?.join("\n");
            match block.set_content(&content) {
                Ok(()) => render::ok(out, "Content updated"),
                Err(e) => render::err(out, &e.to_string()),
            }
        }
    }

    fn del(
        &mut self,
        arg: Option<String>,
        prompter: &mut dyn Prompter,
        out: &mut dyn Write,
    ) -> io::Result<()> {
        let target = self.target(arg);
        let Some(doc) = self.doc.as_mut() else {
            return render::err(out, NO_FILE);
        };
        let Some(target) = target else {
            return render::err(out, "Usage: del <link> (or 'goto <link>' first)");
        };
        let Some(link) = doc.resolve(&target).map(|b| b.link().to_string()) else {
            return render::err(out, &format!("Block not found: {}", target));
        };
        let answer = prompter
            .line(&format!("  Delete '{}'? (yes/no) > ", link).red().to_string())?
            .unwrap_or_default();
        if !CONFIRM_WORDS.contains(&answer.trim().to_lowercase().as_str()) {
            return render::info(out, "Cancelled");
        }
        doc.remove_block(&link);
        render::ok(out, &format!("Block '{}' deleted", link))?;
        if self.current.as_deref() == Some(link.as_str()) {
            self.current = None;
            render::info(out, "Current block deleted, back at the root")?;
        }
        Ok(())
    }

    // ── Encryption ─────────────────────────────────────────

    fn enc(
        &mut self,
        arg: Option<String>,
        prompter: &mut dyn Prompter,
        out: &mut dyn Write,
    ) -> io::Result<()> {
        let target = self.target(arg);
        let Some(doc) = self.doc.as_mut() else {
            return render::err(out, NO_FILE);
        };
        let Some(target) = target else {
            return render::err(out, "Usage: enc <link> (or 'goto <link>' first)");
        };
        let Some(block) = doc.resolve(&target) else {
            return render::err(out, &format!("Block not found: {}", target));
        };
        if block.is_encrypted() {
            return render::err(out, "This block is already encrypted");
        }
        let link = block.link().to_string();

        let first = match prompter.password("  Password") {
            Ok(p) => p,
            Err(e) => return render::err(out, &format!("Could not read password: {}", e)),
        };
        let second = match prompter.password("  Confirm ") {
            Ok(p) => p,
            Err(e) => return render::err(out, &format!("Could not read password: {}", e)),
        };
        if first != second {
            return render::err(out, "Passwords do not match");
        }
        match doc.encrypt_block(&link, &first) {
            Ok(()) => render::ok(out, &format!("Block '{}' encrypted with AES-256-GCM", link)),
            Err(e) => render::err(out, &e.to_string()),
        }
    }

    fn dec(
        &mut self,
        arg: Option<String>,
        prompter: &mut dyn Prompter,
        out: &mut dyn Write,
    ) -> io::Result<()> {
        let target = self.target(arg);
        let Some(doc) = self.doc.as_mut() else {
            return render::err(out, NO_FILE);
        };
        let Some(target) = target else {
            return render::err(out, "Usage: dec <link> (or 'goto <link>' first)");
        };
        let Some(block) = doc.resolve(&target) else {
            return render::err(out, &format!("Block not found: {}", target));
        };
        if !block.is_encrypted() {
            return render::err(out, "This block is not encrypted");
        }
        let link = block.link().to_string();

        let password = match prompter.password("  Password") {
            Ok(p) => p,
            Err(e) => return render::err(out, &format!("Could not read password: {}", e)),
        };
        match doc.decrypt_block(&link, &password) {
            Ok(()) => {
                render::ok(out, &format!("Block '{}' decrypted", link))?;
                match doc.get_by_link(&link) {
                    Some(b) => render::block(out, b),
                    None => Ok(()),
                }
            }
            Err(e) => render::err(out, &e.to_string()),
        }
    }
}
