//! Syntax highlighting for fenced code blocks.
//!
//! The [`SyntaxHighlighter`] trait abstracts over highlighting backends; the
//! built-in [`TokenHighlighter`] covers the JavaScript, Python, C/C++, and
//! Arduino sketch families with static rule tables. [`HighlightManager`]
//! owns a backend plus a [`HighlightConfig`] that maps language aliases
//! (`js`, `py`, `arduino`, ...) onto canonical family names and falls back
//! to JavaScript rules for anything unknown.

mod error;
mod rules;
mod types;

pub use error::{HighlightError, HighlightResult};
pub use rules::{LanguageRules, TokenHighlighter};
pub use types::{HighlightConfig, HighlightManager, SyntaxHighlighter};

/// Create a manager wired to the built-in token highlighter and the default
/// alias configuration.
#[must_use]
pub fn create_default_manager() -> HighlightManager {
  HighlightManager::with_highlighter(Box::new(TokenHighlighter::new()))
}
