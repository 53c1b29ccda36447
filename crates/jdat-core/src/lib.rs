//! JDAT core: configuration, the `.jdat` block format and per-block encryption.

pub mod config;
pub mod crypto;
pub mod error;
pub mod format;

pub use crypto::CryptoError;
pub use error::FormatError;
pub use format::{Block, BlockKind, BlockSummary, Document};
