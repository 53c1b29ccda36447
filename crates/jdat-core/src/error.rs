use std::path::PathBuf;

use thiserror::Error;

use crate::crypto::CryptoError;

/// Errors from reading, editing and writing `.jdat` documents.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("file not found: {0}")]
    NotFound(PathBuf),

    #[error("no file path set")]
    NoPath,

    #[error("block '{name}' has unknown type t:{kind} (expected 1 or 2)")]
    UnknownBlockType { name: String, kind: String },

    #[error("a block with link '{0}' already exists")]
    DuplicateLink(String),

    #[error("invalid {field} '{value}': must be non-empty without spaces or brackets")]
    InvalidIdentifier { field: &'static str, value: String },

    #[error("content of block '{0}' must not contain '}})'")]
    InvalidContent(String),

    #[error("block not found: '{0}'")]
    BlockNotFound(String),

    #[error("block '{0}' is already encrypted")]
    AlreadyEncrypted(String),

    #[error("block '{0}' is not encrypted")]
    NotEncrypted(String),

    #[error("block '{0}' is encrypted; decrypt it first")]
    Encrypted(String),

    #[error("block '{0}' is not a data block")]
    NotData(String),

    #[error(transparent)]
    Crypto(#[from] CryptoError),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
