//! Markdown to HTML rendering.
//!
//! [`MarkdownRenderer`] runs a fixed pipeline of passes and returns a
//! [`crate::RenderResult`] with the HTML, the collected table of contents,
//! and the document title. [`RenderOptions`] selects which passes run; the
//! process layer adds presets, file and batch helpers, and panic-isolated
//! rendering on top.

mod core;
mod process;
mod tables;
mod types;

pub use self::core::toc_to_html;
pub use process::{
  collect_markdown_files, create_renderer, render_batch, render_markdown_file,
  render_markdown_string, render_safe, render_with_recovery, RendererPreset,
};
pub use types::{
  MarkdownRenderer, RenderOptions, RenderOptionsBuilder, Theme,
};
