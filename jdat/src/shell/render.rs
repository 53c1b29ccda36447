//! Terminal rendering for the shell and the `list` / `show` commands.

use std::io::{self, Write};

use colored::Colorize;
use jdat_core::{Block, BlockKind, Document};

const RULE: &str = "────────────────────────────────────────";

pub fn ok(out: &mut dyn Write, msg: &str) -> io::Result<()> {
    writeln!(out, "{}", format!("  ✓ {}", msg).green())
}

pub fn err(out: &mut dyn Write, msg: &str) -> io::Result<()> {
    writeln!(out, "{}", format!("  ✗ {}", msg).red())
}

pub fn info(out: &mut dyn Write, msg: &str) -> io::Result<()> {
    writeln!(out, "{}", format!("  ℹ {}", msg).yellow())
}

pub fn header(out: &mut dyn Write) -> io::Result<()> {
    let title = format!("║        JDAT Shell  v{:<17}║", env!("CARGO_PKG_VERSION"));
    let lines = [
        "╔══════════════════════════════════════╗",
        title.as_str(),
        "║  .jdat data format + AES-256-GCM     ║",
        "╚══════════════════════════════════════╝",
    ];
    for l in lines {
        writeln!(out, "{}", l.cyan().bold())?;
    }
    writeln!(out, "{}", "  Type 'help' for the list of commands\n".bright_black())
}

pub fn help(out: &mut dyn Write) -> io::Result<()> {
    let sections: [(&str, &[(&str, &str)]); 6] = [
        (
            "Files",
            &[
                ("open  <file.jdat>", "Open an existing file"),
                ("new   <file.jdat>", "Start a new empty file"),
                ("save  [file.jdat]", "Save (optionally to another path)"),
            ],
        ),
        (
            "Navigation",
            &[
                ("goto  <link|name>", "Enter a block (alias: cd)"),
                ("back", "Return to the root (alias: ..)"),
                ("pwd", "Show the current block"),
            ],
        ),
        (
            "Reading",
            &[
                ("list", "List all blocks (alias: ls)"),
                ("read  [target]", "Show a block (default: current)"),
                ("find  <text>", "Search names and links"),
            ],
        ),
        (
            "Writing",
            &[
                ("add", "Add a block (wizard)"),
                ("edit  [target]", "Edit a block (default: current)"),
                ("del   [target]", "Delete a block (default: current)"),
            ],
        ),
        (
            "Encryption",
            &[
                ("enc   [target]", "Encrypt a block (default: current)"),
                ("dec   [target]", "Decrypt a block (default: current)"),
            ],
        ),
        (
            "Other",
            &[("help", "Show this help"), ("exit / quit / q", "Leave the shell")],
        ),
    ];
    writeln!(out)?;
    writeln!(out, "{}", "Available commands:".cyan().bold())?;
    for (title, rows) in sections {
        writeln!(out)?;
        writeln!(out, "  {}", title.yellow())?;
        for (usage, desc) in rows {
            writeln!(out, "    {:<24} {}", usage, desc)?;
        }
    }
    writeln!(out)
}

pub fn block(out: &mut dyn Write, b: &Block) -> io::Result<()> {
    let status = if b.is_encrypted() {
        "🔒 ENCRYPTED".red().bold()
    } else {
        "🔓 plain".green()
    };
    let kind = match b.kind() {
        BlockKind::Data => "data (t:1)",
        BlockKind::Code => "raw text/code (t:2)",
    };
    let bar = "  │  ".cyan();
    writeln!(out)?;
    writeln!(
        out,
        "{}{} {}",
        format!("  ┌─ {} ", b.name()).cyan().bold(),
        format!("({})", kind).bright_black(),
        status
    )?;
    writeln!(out, "{}", format!("  │  link : {}", b.link()).bright_black())?;
    writeln!(out, "{}", format!("  ├{}", RULE).cyan())?;
    if b.is_encrypted() {
        writeln!(out, "{}", "  │  [encrypted content - use 'dec' to read]".yellow())?;
    } else if b.kind() == BlockKind::Data {
        for (k, v) in b.data() {
            writeln!(out, "{}{} : {}", bar, k.bold(), v)?;
        }
    } else {
        for line in b.content().trim().lines() {
            writeln!(out, "{}{}", bar, line)?;
        }
    }
    writeln!(out, "{}", format!("  └{}", RULE).cyan())?;
    writeln!(out)
}

pub fn block_table(out: &mut dyn Write, doc: &Document) -> io::Result<()> {
    if doc.blocks().is_empty() {
        return info(out, "No blocks in this file");
    }
    writeln!(out)?;
    writeln!(
        out,
        "{}",
        format!("  {:<20} {:<20} {:<8} {}", "NAME", "LINK", "TYPE", "STATE").bold()
    )?;
    writeln!(out, "{}", format!("  {}", "─".repeat(60)).bright_black())?;
    for b in doc.blocks() {
        let state = if b.is_encrypted() {
            "🔒 encrypted".red()
        } else {
            "🔓 plain".green()
        };
        // Pad before colouring so escape codes do not skew the columns.
        writeln!(
            out,
            "  {} {} {:<8} {}",
            format!("{:<20}", b.name()).cyan(),
            format!("{:<20}", b.link()).yellow(),
            b.kind().label(),
            state
        )?;
    }
    writeln!(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(f: impl FnOnce(&mut dyn Write) -> io::Result<()>) -> String {
        colored::control::set_override(false);
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_data_block_shows_pairs() {
        let b = Block::new("alice", "a1", BlockKind::Data, "  email: a@x.org").unwrap();
        let text = render(|o| block(o, &b));
        assert!(text.contains("┌─ alice (data (t:1)) 🔓 plain"));
        assert!(text.contains("│  link : a1"));
        assert!(text.contains("│  email : a@x.org"));
    }

    #[test]
    fn test_encrypted_block_hides_content() {
        let mut doc = Document::new(None);
        doc.add_block("k", "k1", BlockKind::Code, "topsecret").unwrap();
        doc.encrypt_block("k1", "pw").unwrap();
        let text = render(|o| block(o, doc.get_by_link("k1").unwrap()));
        assert!(text.contains("ENCRYPTED"));
        assert!(!text.contains(doc.get_by_link("k1").unwrap().content()));
    }

    #[test]
    fn test_table_columns() {
        let mut doc = Document::new(None);
        doc.add_block("alice", "a1", BlockKind::Data, "").unwrap();
        let text = render(|o| block_table(o, &doc));
        assert!(text.contains("NAME"));
        assert!(text.contains(&format!("{:<20} {:<20} data", "alice", "a1")));
        assert!(render(|o| block_table(o, &Document::new(None))).contains("No blocks"));
    }
}
