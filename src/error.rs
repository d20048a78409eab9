//! Structured error types for xlfind.
//!
//! Load failures (`Xml`, `Zip`, `Io`, `Parse`, `MalformedMerge`, `DecryptionFailed`) abort the
//! whole load. `NavigationNotFound` is informational and leaves the current index untouched.

use crate::types::MergeRegion;

/// All errors that can occur while loading, searching, or navigating a workbook.
#[derive(Debug, thiserror::Error)]
pub enum XlfindError {
    /// XML parsing error from quick-xml.
    #[error("XML parsing: {0}")]
    Xml(#[from] quick_xml::Error),

    /// ZIP archive error (not a workbook container, or a missing part).
    #[error("ZIP archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Workbook structure error.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Invalid cell reference.
    #[error("Invalid cell reference: {0}")]
    CellRef(String),

    /// Two merge regions on one sheet claim the same cell.
    #[error("Sheet '{sheet}': merge region {first} overlaps {second}")]
    MalformedMerge {
        sheet: String,
        first: MergeRegion,
        second: MergeRegion,
    },

    /// Reported by the decryption collaborator; propagated as-is.
    #[error("Decryption failed: {0}")]
    DecryptionFailed(String),

    /// No display cell on the sheet holds the requested content.
    #[error("No cell with content '{content}' on sheet '{sheet}'")]
    NavigationNotFound { sheet: String, content: String },

    /// The sheet does not exist or is hidden by configuration.
    #[error("Unknown sheet: {0}")]
    UnknownSheet(String),

    /// The session has no workbook loaded.
    #[error("No workbook loaded")]
    NotLoaded,

    /// Invalid configuration value.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON (de)serialization error.
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl XlfindError {
    /// Whether this error aborts a workbook load.
    #[must_use]
    pub fn is_fatal_to_load(&self) -> bool {
        matches!(
            self,
            Self::Xml(_)
                | Self::Zip(_)
                | Self::Io(_)
                | Self::Parse(_)
                | Self::MalformedMerge { .. }
                | Self::DecryptionFailed(_)
        )
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, XlfindError>;
