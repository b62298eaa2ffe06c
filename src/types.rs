//! Shared output types for the renderer.

use serde::{Deserialize, Serialize};

/// A table of contents entry extracted from a heading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TocEntry {
  /// The heading text with markdown syntax stripped.
  pub text: String,

  /// The heading level (1-6).
  pub level: u8,

  /// The anchor id assigned to the heading element.
  pub anchor_id: String,
}

/// The result of rendering a markdown document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderResult {
  /// The rendered HTML content.
  pub html: String,

  /// Table of contents entries for headings of level 3 and below.
  pub toc: Vec<TocEntry>,

  /// The document title, taken from the first level-1 heading if any.
  pub title: Option<String>,
}
