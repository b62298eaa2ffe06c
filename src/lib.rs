//! Markdown renderer for the A3KM Studio document viewers.
//!
//! Converts the markdown dialect used by the site's articles and project
//! pages into styled HTML fragments: fenced code blocks with syntax
//! highlighting and copy buttons, headings with deterministic anchors and a
//! table of contents, pipe tables, task lists, and emoji shortcodes.
//! Rendering is total; malformed input degrades to plain text instead of
//! failing.
//!
//! # Examples
//!
//! ```
//! use a3km_markdown::{MarkdownRenderer, RenderOptions};
//!
//! let renderer = MarkdownRenderer::new(RenderOptions::default());
//! let result = renderer.render("# Hello\n\nSome *emphasis* here.");
//!
//! assert!(result.html.contains("<h1 id=\"hello\""));
//! assert_eq!(result.title.as_deref(), Some("Hello"));
//! ```

mod emoji;
pub mod highlight;
pub mod renderer;
mod types;
pub mod utils;

pub use renderer::{
  collect_markdown_files, create_renderer, render_batch, render_markdown_file,
  render_markdown_string, render_safe, render_with_recovery, toc_to_html,
  MarkdownRenderer, RenderOptions, RenderOptionsBuilder, RendererPreset, Theme,
};
pub use types::{RenderResult, TocEntry};
