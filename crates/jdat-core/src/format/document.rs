use std::path::{Path, PathBuf};

use super::block::{validate_identifier, Block, BlockKind, BlockSummary};
use crate::crypto;
use crate::error::FormatError;

/// An in-memory `.jdat` file: comments, ordered blocks and the path it is bound to.
#[derive(Debug, Clone, Default)]
pub struct Document {
    path: Option<PathBuf>,
    pub comments: Vec<String>,
    pub(crate) blocks: Vec<Block>,
}

impl Document {
    /// Empty document, optionally bound to a path. Nothing is written until [`Document::save`].
    pub fn new(path: Option<PathBuf>) -> Self {
        Self {
            path,
            comments: Vec::new(),
            blocks: Vec::new(),
        }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, FormatError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(FormatError::NotFound(path.to_path_buf()));
        }
        let text = std::fs::read_to_string(path).map_err(|source| FormatError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut doc = super::parse(&text)?;
        doc.path = Some(path.to_path_buf());
        tracing::info!(path = %path.display(), blocks = doc.blocks.len(), "loaded jdat file");
        Ok(doc)
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn get_by_link(&self, link: &str) -> Option<&Block> {
        self.blocks.iter().find(|b| b.link == link)
    }

    pub fn get_by_name(&self, name: &str) -> Option<&Block> {
        self.blocks.iter().find(|b| b.name == name)
    }

    fn position(&self, target: &str) -> Option<usize> {
        self.blocks
            .iter()
            .position(|b| b.link == target)
            .or_else(|| self.blocks.iter().position(|b| b.name == target))
    }

    /// Look a block up by link, then by name.
    pub fn resolve(&self, target: &str) -> Option<&Block> {
        self.position(target).map(|i| &self.blocks[i])
    }

    pub fn resolve_mut(&mut self, target: &str) -> Option<&mut Block> {
        self.position(target).map(move |i| &mut self.blocks[i])
    }

    fn resolve_or_err(&mut self, target: &str) -> Result<&mut Block, FormatError> {
        self.resolve_mut(target)
            .ok_or_else(|| FormatError::BlockNotFound(target.to_string()))
    }

    pub fn summaries(&self) -> Vec<BlockSummary> {
        self.blocks.iter().map(Block::summary).collect()
    }

    /// Case-insensitive substring search over names and links.
    pub fn find(&self, query: &str) -> Vec<&Block> {
        let q = query.to_lowercase();
        self.blocks
            .iter()
            .filter(|b| b.name.to_lowercase().contains(&q) || b.link.to_lowercase().contains(&q))
            .collect()
    }

    pub fn add_block(
        &mut self,
        name: &str,
        link: &str,
        kind: BlockKind,
        content: &str,
    ) -> Result<&Block, FormatError> {
        validate_identifier("link", link)?;
        if self.get_by_link(link).is_some() {
            return Err(FormatError::DuplicateLink(link.to_string()));
        }
        let block = Block::new(name, link, kind, content)?;
        self.blocks.push(block);
        Ok(&self.blocks[self.blocks.len() - 1])
    }

    /// Remove by link. Returns `false` when no block has that link.
    pub fn remove_block(&mut self, link: &str) -> bool {
        match self.blocks.iter().position(|b| b.link == link) {
            Some(i) => {
                self.blocks.remove(i);
                true
            }
            None => false,
        }
    }

    pub fn encrypt_block(&mut self, target: &str, password: &str) -> Result<(), FormatError> {
        let block = self.resolve_or_err(target)?;
        if block.encrypted {
            return Err(FormatError::AlreadyEncrypted(block.link.clone()));
        }
        block.normalize();
        block.content = crypto::encrypt(&block.content, password)?;
        block.encrypted = true;
        tracing::debug!(link = %block.link, "block encrypted");
        Ok(())
    }

    /// On a wrong password the block is left encrypted and unchanged.
    pub fn decrypt_block(&mut self, target: &str, password: &str) -> Result<(), FormatError> {
        let block = self.resolve_or_err(target)?;
        if !block.encrypted {
            return Err(FormatError::NotEncrypted(block.link.clone()));
        }
        let plain = crypto::decrypt(&block.content, password)?;
        block.content = plain;
        block.encrypted = false;
        tracing::debug!(link = %block.link, "block decrypted");
        Ok(())
    }

    /// Write to `path` (rebinding the document to it) or to the bound path.
    pub fn save(&mut self, path: Option<&Path>) -> Result<PathBuf, FormatError> {
        if let Some(p) = path {
            self.path = Some(p.to_path_buf());
        }
        let target = self.path.clone().ok_or(FormatError::NoPath)?;
        std::fs::write(&target, self.to_jdat()).map_err(|source| FormatError::Io {
            path: target.clone(),
            source,
        })?;
        tracing::info!(path = %target.display(), blocks = self.blocks.len(), "saved jdat file");
        Ok(target)
    }

    pub fn to_jdat(&self) -> String {
        let parts: Vec<String> = self
            .comments
            .iter()
            .map(|c| format!("({{<{}>}})", c))
            .chain(self.blocks.iter().map(Block::to_jdat))
            .collect();
        parts.join("\n\n") + "\n"
    }
}
