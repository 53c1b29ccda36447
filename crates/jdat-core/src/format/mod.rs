//! The `.jdat` text format.
//!
//! ```text
//! ({<comment>})
//!
//! (n:NAME l:LINK t:1 {
//!   key: value
//! })
//!
//! (n:NAME l:LINK t:2{
//! raw text
//! })
//!
//! (n:NAME l:LINK t:1 encrypted{
//! <base64 envelope>
//! })
//! ```

mod block;
mod document;
mod parser;

pub use block::{validate_identifier, Block, BlockKind, BlockSummary};
pub use document::Document;
pub use parser::parse;
