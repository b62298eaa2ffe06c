//! Renderer options and the renderer handle itself.

use std::sync::Arc;

use crate::highlight::HighlightManager;

/// Color theme hint embedded in rendered code block headers.
///
/// Purely cosmetic: themes select the class suffix stylesheets key off, the
/// markup structure is identical for all of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
  /// The site's dark red code theme.
  #[default]
  DarkRed,
}

impl Theme {
  /// The class fragment appended to `md-code-block`.
  #[must_use]
  pub const fn class_suffix(self) -> &'static str {
    match self {
      Self::DarkRed => "md-theme-dark-red",
    }
  }
}

/// Options controlling markdown rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
  /// Strip `<script>` blocks from the input before rendering.
  pub sanitize:          bool,
  /// Collect headings of level 3 and below into a table of contents.
  pub generate_toc:      bool,
  /// Apply syntax highlighting to fenced code blocks.
  pub highlight_code:    bool,
  /// Prefix each code block with a line number gutter.
  pub show_line_numbers: bool,
  /// Emit a copy button in each code block header.
  pub copy_button:       bool,
  /// Code block theme.
  pub theme:             Theme,
}

impl Default for RenderOptions {
  fn default() -> Self {
    Self {
      sanitize:          true,
      generate_toc:      true,
      highlight_code:    true,
      show_line_numbers: true,
      copy_button:       true,
      theme:             Theme::DarkRed,
    }
  }
}

impl RenderOptions {
  /// Create a builder for configuring options fluently.
  #[must_use]
  pub fn builder() -> RenderOptionsBuilder {
    RenderOptionsBuilder::new()
  }
}

/// Builder for [`RenderOptions`].
#[derive(Debug, Clone, Default)]
pub struct RenderOptionsBuilder {
  options: RenderOptions,
}

impl RenderOptionsBuilder {
  /// Create a new builder with default options.
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }

  /// Strip `<script>` blocks from the input.
  #[must_use]
  pub const fn sanitize(mut self, value: bool) -> Self {
    self.options.sanitize = value;
    self
  }

  /// Collect a table of contents from headings.
  #[must_use]
  pub const fn generate_toc(mut self, value: bool) -> Self {
    self.options.generate_toc = value;
    self
  }

  /// Apply syntax highlighting to fenced code blocks.
  #[must_use]
  pub const fn highlight_code(mut self, value: bool) -> Self {
    self.options.highlight_code = value;
    self
  }

  /// Prefix code blocks with a line number gutter.
  #[must_use]
  pub const fn show_line_numbers(mut self, value: bool) -> Self {
    self.options.show_line_numbers = value;
    self
  }

  /// Emit a copy button in code block headers.
  #[must_use]
  pub const fn copy_button(mut self, value: bool) -> Self {
    self.options.copy_button = value;
    self
  }

  /// Set the code block theme.
  #[must_use]
  pub const fn theme(mut self, theme: Theme) -> Self {
    self.options.theme = theme;
    self
  }

  /// Build the final options.
  #[must_use]
  pub fn build(self) -> RenderOptions {
    self.options
  }
}

/// Markdown renderer.
///
/// Cheap to clone: the highlighter backend is shared behind an [`Arc`], so
/// clones can render concurrently from multiple threads.
#[derive(Clone)]
pub struct MarkdownRenderer {
  pub(crate) options:     RenderOptions,
  pub(crate) highlighter: Option<Arc<HighlightManager>>,
}

impl MarkdownRenderer {
  /// Create a renderer with the given options.
  ///
  /// A highlighting backend is wired up only when `highlight_code` is set.
  #[must_use]
  pub fn new(options: RenderOptions) -> Self {
    let highlighter = options
      .highlight_code
      .then(|| Arc::new(crate::highlight::create_default_manager()));
    Self {
      options,
      highlighter,
    }
  }

  /// Create a renderer with default options.
  #[must_use]
  pub fn default_renderer() -> Self {
    Self::new(RenderOptions::default())
  }

  /// The options this renderer was built with.
  #[must_use]
  pub const fn options(&self) -> &RenderOptions {
    &self.options
  }
}

impl Default for MarkdownRenderer {
  fn default() -> Self {
    Self::default_renderer()
  }
}
