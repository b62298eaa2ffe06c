//! Core types and traits for syntax highlighting.

use std::collections::HashMap;

use super::error::HighlightResult;

/// Trait for syntax highlighting backends.
///
/// Implementations take raw code and a language name and return highlighted
/// HTML. The highlighted output must preserve the code text exactly: token
/// markers may be wrapped around substrings, and the text itself is
/// HTML-escaped, but nothing is added, dropped, or reordered.
pub trait SyntaxHighlighter: Send + Sync {
  /// Get the name of this highlighter backend.
  fn name(&self) -> &'static str;

  /// Get a list of supported languages.
  fn supported_languages(&self) -> Vec<String>;

  /// Check if a language is supported.
  fn supports_language(&self, language: &str) -> bool {
    self
      .supported_languages()
      .iter()
      .any(|lang| lang.eq_ignore_ascii_case(language))
  }

  /// Highlight code in the given language, returning an HTML fragment.
  ///
  /// # Errors
  ///
  /// Returns [`super::HighlightError::UnknownLanguage`] when no rule set
  /// exists for the language.
  fn highlight(&self, code: &str, language: &str) -> HighlightResult<String>;
}

/// Configuration for syntax highlighting.
#[derive(Debug, Clone)]
pub struct HighlightConfig {
  /// Language aliases mapping common names to rule-set names.
  pub language_aliases: HashMap<String, String>,

  /// Rule set used for any language name that resolves to nothing.
  pub fallback_language: String,
}

impl Default for HighlightConfig {
  fn default() -> Self {
    let mut language_aliases = HashMap::new();

    // Common aliases for the four built-in families.
    language_aliases.insert("js".to_string(), "javascript".to_string());
    language_aliases.insert("jsx".to_string(), "javascript".to_string());
    language_aliases.insert("ts".to_string(), "javascript".to_string());
    language_aliases.insert("tsx".to_string(), "javascript".to_string());
    language_aliases.insert("typescript".to_string(), "javascript".to_string());
    language_aliases.insert("py".to_string(), "python".to_string());
    language_aliases.insert("c".to_string(), "cpp".to_string());
    language_aliases.insert("c++".to_string(), "cpp".to_string());
    language_aliases.insert("h".to_string(), "cpp".to_string());
    language_aliases.insert("hpp".to_string(), "cpp".to_string());
    language_aliases.insert("arduino".to_string(), "ino".to_string());

    Self {
      language_aliases,
      fallback_language: "javascript".to_string(),
    }
  }
}

/// High-level syntax highlighting manager.
///
/// Resolves language aliases, applies the fallback rule set for unknown
/// languages, and delegates to the configured backend.
pub struct HighlightManager {
  highlighter: Box<dyn SyntaxHighlighter>,
  config:      HighlightConfig,
}

impl HighlightManager {
  /// Create a new manager with the given highlighter and config.
  #[must_use]
  pub fn new(
    highlighter: Box<dyn SyntaxHighlighter>,
    config: HighlightConfig,
  ) -> Self {
    Self {
      highlighter,
      config,
    }
  }

  /// Create a new manager with the default configuration.
  #[must_use]
  pub fn with_highlighter(highlighter: Box<dyn SyntaxHighlighter>) -> Self {
    Self::new(highlighter, HighlightConfig::default())
  }

  /// Get the underlying highlighter.
  #[must_use]
  pub fn highlighter(&self) -> &dyn SyntaxHighlighter {
    self.highlighter.as_ref()
  }

  /// Get the configuration.
  #[must_use]
  pub const fn config(&self) -> &HighlightConfig {
    &self.config
  }

  /// Resolve a language name using aliases.
  #[must_use]
  pub fn resolve_language(&self, language: &str) -> String {
    let lowered = language.to_lowercase();
    self
      .config
      .language_aliases
      .get(&lowered)
      .cloned()
      .unwrap_or(lowered)
  }

  /// Highlight code with alias resolution and unknown-language fallback.
  ///
  /// Unknown language names fall back silently to the configured fallback
  /// rule set. If the backend rejects even the fallback, the code is
  /// returned escaped but unhighlighted, so rendering never fails.
  #[must_use]
  pub fn highlight_code(&self, code: &str, language: &str) -> String {
    let resolved = self.resolve_language(language);

    let result = if self.highlighter.supports_language(&resolved) {
      self.highlighter.highlight(code, &resolved)
    } else {
      log::trace!(
        "no highlight rules for '{resolved}', falling back to '{}'",
        self.config.fallback_language
      );
      self
        .highlighter
        .highlight(code, &self.config.fallback_language)
    };

    result.unwrap_or_else(|err| {
      log::error!("highlighting failed for '{resolved}': {err}");
      crate::utils::escape_html(code)
    })
  }
}
