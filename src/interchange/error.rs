//! Error types for interchange operations.

use thiserror::Error;

/// Errors that can occur while reading a model document.
///
/// Only whole-document failures are represented here. Subtrees the extractor
/// does not recognize are skipped rather than reported.
#[derive(Debug, Error)]
pub enum InterchangeError {
    /// XML parsing error.
    #[error("XML error: {0}")]
    Xml(String),

    /// The document has no content or no root element.
    #[error("Empty document: {0}")]
    Empty(String),

    /// IO error while reading the document.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl InterchangeError {
    /// Create an XML error.
    pub fn xml(message: impl Into<String>) -> Self {
        Self::Xml(message.into())
    }

    /// Create an empty-document error.
    pub fn empty(message: impl Into<String>) -> Self {
        Self::Empty(message.into())
    }
}
