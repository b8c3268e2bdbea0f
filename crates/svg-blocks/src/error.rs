//! Error types for svg-blocks

/// Result type for svg-blocks operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort an extraction or reject a record set outright.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Unbalanced SVG markup: <svg> opened at byte {offset} is never closed")]
    UnbalancedMarkup { offset: usize },

    #[error("Duplicate SVG identifier in record set: {id}")]
    DuplicateIdentifier { id: String },

    #[error("Invalid SVG record {id}: {reason}")]
    InvalidRecord { id: String, reason: String },
}

impl Error {
    pub fn invalid_record(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidRecord {
            id: id.into(),
            reason: reason.into(),
        }
    }
}

/// A problem with a single placeholder block found during restoration.
///
/// These never abort a restore. They are collected into the
/// [`ResolutionReport`](crate::resolver::ResolutionReport) and the affected
/// region of the document is left verbatim.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PlaceholderIssue {
    #[error("Corrupt placeholder at byte {offset}: {reason}")]
    Corrupt { offset: usize, reason: String },

    #[error("Unresolved placeholder {} at byte {offset} (best score {best_score:.2})", .id.as_deref().unwrap_or("<no id>"))]
    Unresolved {
        id: Option<String>,
        offset: usize,
        best_score: f64,
    },
}

impl PlaceholderIssue {
    /// Byte offset of the affected region in the placeholder document.
    pub fn offset(&self) -> usize {
        match self {
            Self::Corrupt { offset, .. } | Self::Unresolved { offset, .. } => *offset,
        }
    }
}
