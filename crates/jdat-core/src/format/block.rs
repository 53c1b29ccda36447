use serde::Serialize;

use crate::error::FormatError;

/// Sequence that terminates a block body; it cannot appear inside content.
pub(crate) const BODY_TERMINATOR: &str = "})";

/// `t:1` holds `key: value` lines, `t:2` holds raw text or code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    Data,
    Code,
}

impl BlockKind {
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::Data),
            2 => Some(Self::Code),
            _ => None,
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Self::Data => 1,
            Self::Code => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Data => "data",
            Self::Code => "code",
        }
    }
}

/// Row of `list` output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockSummary {
    pub name: String,
    pub link: String,
    #[serde(rename = "type")]
    pub type_code: u8,
    pub encrypted: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub(crate) name: String,
    pub(crate) link: String,
    pub(crate) kind: BlockKind,
    /// Plain text, or the base64 envelope when `encrypted`.
    pub(crate) content: String,
    pub(crate) encrypted: bool,
}

/// Names and links are whitespace-delimited tokens in the header.
pub fn validate_identifier(field: &'static str, value: &str) -> Result<(), FormatError> {
    let bad = value.is_empty()
        || value
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '(' | ')' | '{' | '}'));
    if bad {
        return Err(FormatError::InvalidIdentifier {
            field,
            value: value.to_string(),
        });
    }
    Ok(())
}

fn validate_content(link: &str, content: &str) -> Result<(), FormatError> {
    if content.contains(BODY_TERMINATOR) {
        return Err(FormatError::InvalidContent(link.to_string()));
    }
    Ok(())
}

/// Parse `key: value` lines. Lines without `:` are skipped; a repeated key keeps its first position.
pub(crate) fn parse_data(content: &str) -> Vec<(String, String)> {
    let mut out: Vec<(String, String)> = Vec::new();
    for line in content.lines() {
        let line = line.trim();
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let key = key.trim().to_string();
        let value = value.trim().to_string();
        match out.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => out.push((key, value)),
        }
    }
    out
}

fn render_data(pairs: &[(String, String)]) -> String {
    pairs
        .iter()
        .map(|(k, v)| format!("  {}: {}", k, v))
        .collect::<Vec<_>>()
        .join("\n")
}

impl Block {
    pub fn new(
        name: &str,
        link: &str,
        kind: BlockKind,
        content: &str,
    ) -> Result<Self, FormatError> {
        validate_identifier("name", name)?;
        validate_identifier("link", link)?;
        validate_content(link, content)?;
        Ok(Self {
            name: name.to_string(),
            link: link.to_string(),
            kind,
            content: content.to_string(),
            encrypted: false,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn link(&self) -> &str {
        &self.link
    }

    pub fn kind(&self) -> BlockKind {
        self.kind
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn is_encrypted(&self) -> bool {
        self.encrypted
    }

    /// Key/value pairs in file order. Empty for code or encrypted blocks.
    pub fn data(&self) -> Vec<(String, String)> {
        if self.kind != BlockKind::Data || self.encrypted {
            return Vec::new();
        }
        parse_data(&self.content)
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.data()
            .into_iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Update or append a key. Rebuilds content in canonical form.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), FormatError> {
        if self.encrypted {
            return Err(FormatError::Encrypted(self.link.clone()));
        }
        if self.kind != BlockKind::Data {
            return Err(FormatError::NotData(self.link.clone()));
        }
        let key = key.trim();
        let value = value.trim();
        if key.is_empty() || key.contains(':') {
            return Err(FormatError::InvalidIdentifier {
                field: "key",
                value: key.to_string(),
            });
        }
        validate_content(&self.link, value)?;
        let mut pairs = self.data();
        match pairs.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = value.to_string(),
            None => pairs.push((key.to_string(), value.to_string())),
        }
        self.content = render_data(&pairs);
        Ok(())
    }

    pub fn set_content(&mut self, content: &str) -> Result<(), FormatError> {
        if self.encrypted {
            return Err(FormatError::Encrypted(self.link.clone()));
        }
        validate_content(&self.link, content)?;
        self.content = content.to_string();
        Ok(())
    }

    /// Canonical `  key: value` layout for data blocks; no-op otherwise.
    pub(crate) fn normalize(&mut self) {
        if self.kind == BlockKind::Data && !self.encrypted {
            self.content = render_data(&parse_data(&self.content));
        }
    }

    pub fn summary(&self) -> BlockSummary {
        BlockSummary {
            name: self.name.clone(),
            link: self.link.clone(),
            type_code: self.kind.code(),
            encrypted: self.encrypted,
        }
    }

    pub fn to_jdat(&self) -> String {
        let t = self.kind.code();
        let header = if self.encrypted {
            format!("(n:{} l:{} t:{} encrypted{{", self.name, self.link, t)
        } else {
            match self.kind {
                BlockKind::Data => format!("(n:{} l:{} t:{} {{", self.name, self.link, t),
                BlockKind::Code => format!("(n:{} l:{} t:{}{{", self.name, self.link, t),
            }
        };
        format!("{}\n{}\n}})", header, self.content)
    }
}
