//! Error types for syntax highlighting operations.

/// Result type for syntax highlighting operations.
pub type HighlightResult<T> = Result<T, HighlightError>;

/// Errors that can occur during syntax highlighting.
#[derive(Debug, thiserror::Error)]
pub enum HighlightError {
  #[error("language '{0}' has no highlighting rules")]
  UnknownLanguage(String),
}
