use std::sync::OnceLock;

use regex::Regex;

use super::block::{Block, BlockKind};
use super::document::Document;
use crate::error::FormatError;

/// Comments and blocks in one alternation so a comment-like sequence inside a
/// block body is consumed by the block match.
fn item_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?s)\(\{<(?P<comment>.*?)>\}\)|\(n:(?P<name>\S+)\s+l:(?P<link>\S+)\s+t:(?P<kind>\d+)\s*(?P<enc>encrypted)?\s*\{(?P<body>.*?)\}\)",
        )
        .expect("static regex is valid")
    })
}

/// Remove the single framing newline the serializer puts on each side of a body.
fn unframe(body: &str) -> &str {
    let body = body
        .strip_prefix("\r\n")
        .or_else(|| body.strip_prefix('\n'))
        .unwrap_or(body);
    body.strip_suffix("\r\n")
        .or_else(|| body.strip_suffix('\n'))
        .unwrap_or(body)
}

/// Parse `.jdat` text. Text outside comments and blocks is ignored.
pub fn parse(text: &str) -> Result<Document, FormatError> {
    let mut doc = Document::new(None);
    for caps in item_regex().captures_iter(text) {
        if let Some(comment) = caps.name("comment") {
            doc.comments.push(comment.as_str().trim().to_string());
            continue;
        }
        let name = &caps["name"];
        let link = &caps["link"];
        let raw_kind = &caps["kind"];
        let kind = raw_kind
            .parse::<u8>()
            .ok()
            .and_then(BlockKind::from_code)
            .ok_or_else(|| FormatError::UnknownBlockType {
                name: name.to_string(),
                kind: raw_kind.to_string(),
            })?;
        let encrypted = caps.name("enc").is_some();
        let body = unframe(&caps["body"]);
        let content = if encrypted { body.trim() } else { body };

        if doc.get_by_link(link).is_some() {
            return Err(FormatError::DuplicateLink(link.to_string()));
        }
        doc.blocks.push(Block {
            name: name.to_string(),
            link: link.to_string(),
            kind,
            content: content.to_string(),
            encrypted,
        });
    }
    tracing::debug!(
        blocks = doc.blocks.len(),
        comments = doc.comments.len(),
        "parsed jdat text"
    );
    Ok(doc)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "({<contacts file>})\n\n(n:alice l:a1 t:1 {\n  email: alice@example.com\n  phone: 0102\n})\n\n(n:script l:s1 t:2{\nfor i in range(3):\n    print(i)\n})\n";

    #[test]
    fn test_parse_sample() {
        let doc = parse(SAMPLE).unwrap();
        assert_eq!(doc.comments, vec!["contacts file"]);
        assert_eq!(doc.blocks().len(), 2);

        let alice = doc.get_by_link("a1").unwrap();
        assert_eq!(alice.kind(), BlockKind::Data);
        assert_eq!(alice.get("email").as_deref(), Some("alice@example.com"));

        let script = doc.get_by_name("script").unwrap();
        assert_eq!(script.kind(), BlockKind::Code);
        assert_eq!(script.content(), "for i in range(3):\n    print(i)");
    }

    #[test]
    fn test_serialize_then_parse_is_stable() {
        let doc = parse(SAMPLE).unwrap();
        let once = doc.to_jdat();
        let twice = parse(&once).unwrap().to_jdat();
        assert_eq!(once, twice);
        assert_eq!(once, SAMPLE);
    }

    #[test]
    fn test_header_whitespace_is_flexible() {
        let doc = parse("(n:x  l:y\tt:2   {\nbody\n})").unwrap();
        assert_eq!(doc.get_by_link("y").unwrap().content(), "body");
    }

    #[test]
    fn test_encrypted_block_trims_envelope() {
        let doc = parse("(n:k l:k t:1 encrypted{\n  QUJD  \n})").unwrap();
        let b = doc.get_by_link("k").unwrap();
        assert!(b.is_encrypted());
        assert_eq!(b.content(), "QUJD");
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        let err = parse("(n:x l:y t:7{\nz\n})").unwrap_err();
        assert!(matches!(err, FormatError::UnknownBlockType { .. }));
    }

    #[test]
    fn test_duplicate_links_are_rejected() {
        let err = parse("(n:a l:same t:2{\n1\n})\n(n:b l:same t:2{\n2\n})").unwrap_err();
        assert!(matches!(err, FormatError::DuplicateLink(l) if l == "same"));
    }

    #[test]
    fn test_stray_text_between_items_is_ignored() {
        let doc = parse("garbage\n(n:a l:a t:2{\nx\n})\nmore garbage\n({<c>})").unwrap();
        assert_eq!(doc.blocks().len(), 1);
        assert_eq!(doc.comments, vec!["c"]);
    }

    #[test]
    fn test_empty_text() {
        let doc = parse("").unwrap();
        assert!(doc.blocks().is_empty());
        assert!(doc.comments.is_empty());
    }
}
