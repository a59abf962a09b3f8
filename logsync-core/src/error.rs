//! Error types for page conversion.

use std::path::PathBuf;

/// Errors that can occur while converting a single page
#[derive(Debug, thiserror::Error)]
pub enum PageError {
    /// The source page could not be opened, read, or decoded
    #[error("Failed to read source page {path:?}: {source}")]
    SourceRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An image reference points at an asset that does not exist
    #[error("Attachment not found: {path:?}")]
    MissingAttachment { path: PathBuf },

    /// `recursive` was requested without a `recursion_target`
    #[error("No recursion target given, add 'recursion_target' to the mapping options")]
    MissingRecursionTarget,

    /// A transform failed for a reason of its own
    #[error("Transform '{transform}' failed: {source}")]
    Transform {
        transform: &'static str,
        #[source]
        source: std::io::Error,
    },

    /// The converted page could not be written
    #[error("Failed to write page to {path:?}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, PageError>;
