//! Error types for core trigger primitives.
//!
//! # Design
//! - Keep messages constant; carry the offending input in structured fields.
//! - Rewrite compilation errors surface at construction time only.

use thiserror::Error;

/// Primary error type for core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A rewrite rule pattern failed to compile.
    #[error("invalid rewrite pattern")]
    InvalidRewrite {
        /// Zero-based position of the rule in its list.
        index: usize,
        /// Pattern that failed to compile.
        pattern: String,
        /// Underlying regex error.
        #[source]
        source: regex::Error,
    },
    /// The scan queue consumer has shut down.
    #[error("scan queue closed")]
    QueueClosed {
        /// Folder of the scan that could not be queued.
        folder: String,
    },
}

/// Convenience alias for core results.
pub type CoreResult<T> = Result<T, CoreError>;
