//! Non-interactive `list` / `show`.

use std::path::Path;

use anyhow::{Context, Result};
use jdat_core::{Block, BlockKind, Document};
use serde_json::{json, Value};

use crate::shell::render;

fn load(file: &Path) -> Result<Document> {
    Document::load(file).with_context(|| format!("Failed to open {}", file.display()))
}

pub fn block_json(block: &Block) -> Value {
    let mut v = json!({
        "name": block.name(),
        "link": block.link(),
        "type": block.kind().code(),
        "encrypted": block.is_encrypted(),
    });
    if block.is_encrypted() {
        return v;
    }
    match block.kind() {
        BlockKind::Data => {
            let data: Vec<Value> = block
                .data()
                .into_iter()
                .map(|(k, val)| json!({ "key": k, "value": val }))
                .collect();
            v["data"] = Value::Array(data);
        }
        BlockKind::Code => {
            v["content"] = Value::String(block.content().to_string());
        }
    }
    v
}

pub fn cmd_list(file: &Path, json: bool) -> Result<()> {
    let doc = load(file)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&doc.summaries())?);
        return Ok(());
    }
    let mut out = std::io::stdout().lock();
    render::block_table(&mut out, &doc)?;
    Ok(())
}

pub fn cmd_show(file: &Path, target: &str, json: bool) -> Result<()> {
    let doc = load(file)?;
    let block = doc
        .resolve(target)
        .with_context(|| format!("Block not found: '{}'", target))?;
    if json {
        println!("{}", serde_json::to_string_pretty(&block_json(block))?);
        return Ok(());
    }
    let mut out = std::io::stdout().lock();
    render::block(&mut out, block)?;
    Ok(())
}
