//! Error types for the sheet extraction engine.

use thiserror::Error;

/// Result type alias for extraction operations.
pub type Result<T> = std::result::Result<T, SheetError>;

/// Errors surfaced by the extraction engine.
///
/// Only unrecoverable input problems become errors. Individual heuristic
/// misses (a stat phrase that does not match, a heading with no known
/// keyword) degrade to default values and are never reported here.
#[derive(Error, Debug)]
pub enum SheetError {
    /// The input could not be read as markup at all.
    #[error("malformed document at byte {position}: {reason}")]
    MalformedDocument {
        /// Byte offset where the reader gave up
        position: usize,
        /// Reader-provided description of the syntax problem
        reason: String,
    },

    /// The input parsed but contained no content nodes.
    #[error("document contains no content nodes")]
    EmptyDocument,
}
