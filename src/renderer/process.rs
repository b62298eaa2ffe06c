//! High-level rendering entry points.
//!
//! Convenience functions over [`MarkdownRenderer`] for common cases: one-off
//! strings, files, directory batches, and panic-isolated rendering for
//! untrusted input.

use std::{
  fs,
  panic::{self, AssertUnwindSafe},
  path::{Path, PathBuf},
};

use walkdir::WalkDir;

use super::types::{MarkdownRenderer, RenderOptions};
use crate::{types::RenderResult, utils::escape_html};

/// Ready-made option sets for the site's document kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RendererPreset {
  /// Bare markup conversion: no TOC, no highlighting, no code chrome.
  Plain,
  /// Long-form articles: TOC and highlighting, no line number gutter.
  Article,
  /// Project documentation: everything on.
  Project,
}

impl RendererPreset {
  /// The options this preset expands to.
  #[must_use]
  pub fn options(self) -> RenderOptions {
    match self {
      Self::Plain => RenderOptions::builder()
        .generate_toc(false)
        .highlight_code(false)
        .show_line_numbers(false)
        .copy_button(false)
        .build(),
      Self::Article => RenderOptions::builder().show_line_numbers(false).build(),
      Self::Project => RenderOptions::default(),
    }
  }
}

/// Create a renderer from a preset.
#[must_use]
pub fn create_renderer(preset: RendererPreset) -> MarkdownRenderer {
  MarkdownRenderer::new(preset.options())
}

/// Render markdown, returning `None` if rendering panics.
///
/// The pipeline itself is total, so this only trips on bugs; it exists so a
/// caller feeding untrusted documents can keep its own thread alive.
#[must_use]
pub fn render_safe(
  renderer: &MarkdownRenderer,
  markdown: &str,
) -> Option<RenderResult> {
  panic::catch_unwind(AssertUnwindSafe(|| renderer.render(markdown))).ok()
}

/// Render markdown, degrading to an error panel plus the escaped source if
/// rendering panics. Never fails.
#[must_use]
pub fn render_with_recovery(
  renderer: &MarkdownRenderer,
  markdown: &str,
) -> RenderResult {
  render_safe(renderer, markdown).unwrap_or_else(|| {
    log::error!("markdown rendering panicked, emitting fallback output");
    RenderResult {
      html:  format!(
        "<div class=\"md-error\">Unable to render document.</div>\
         <pre class=\"md-error-source\">{}</pre>",
        escape_html(markdown)
      ),
      toc:   Vec::new(),
      title: None,
    }
  })
}

/// Render a markdown string with the default renderer.
#[must_use]
pub fn render_markdown_string(markdown: &str) -> RenderResult {
  render_with_recovery(&MarkdownRenderer::default_renderer(), markdown)
}

/// Render a markdown file with the default renderer.
///
/// # Errors
///
/// Returns an error string if the file cannot be read.
pub fn render_markdown_file(path: &Path) -> Result<RenderResult, String> {
  let content = fs::read_to_string(path)
    .map_err(|err| format!("failed to read {}: {err}", path.display()))?;
  Ok(render_markdown_string(&content))
}

/// Render a batch of markdown documents with one shared renderer.
#[must_use]
pub fn render_batch<S: AsRef<str>>(
  renderer: &MarkdownRenderer,
  documents: &[S],
) -> Vec<RenderResult> {
  documents
    .iter()
    .map(|doc| render_with_recovery(renderer, doc.as_ref()))
    .collect()
}

/// Collect all markdown files under a directory, sorted by path.
#[must_use]
pub fn collect_markdown_files(dir: &Path) -> Vec<PathBuf> {
  let mut files: Vec<PathBuf> = WalkDir::new(dir)
    .into_iter()
    .filter_map(Result::ok)
    .filter(|entry| entry.file_type().is_file())
    .filter(|entry| {
      entry
        .path()
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
          ext.eq_ignore_ascii_case("md") || ext.eq_ignore_ascii_case("markdown")
        })
    })
    .map(walkdir::DirEntry::into_path)
    .collect();
  files.sort();
  files
}
