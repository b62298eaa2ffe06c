//! Built-in rule tables and the tokenizer that applies them.
//!
//! Each supported language family is a static [`LanguageRules`] table. The
//! tokenizer makes a single pass over the raw code, classifies every token
//! into at most one category, and emits HTML-escaped text with marker spans
//! around classified tokens. The concatenated token text always equals the
//! input code; highlighting never alters content.

use super::{
  error::{HighlightError, HighlightResult},
  types::SyntaxHighlighter,
};
use crate::utils::escape_html;

/// Token categories the highlighter distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TokenClass {
  Keyword,
  Boolean,
  Number,
  String,
  Comment,
  Function,
  Lifecycle,
  Serial,
}

impl TokenClass {
  const fn css_class(self) -> &'static str {
    match self {
      Self::Keyword => "syntax-keyword",
      Self::Boolean => "syntax-boolean",
      Self::Number => "syntax-number",
      Self::String => "syntax-string",
      Self::Comment => "syntax-comment",
      Self::Function => "syntax-function",
      Self::Lifecycle => "syntax-lifecycle",
      Self::Serial => "syntax-serial",
    }
  }
}

/// A per-language table of token classification rules.
pub struct LanguageRules {
  name:              &'static str,
  keywords:          &'static [&'static str],
  booleans:          &'static [&'static str],
  line_comments:     &'static [&'static str],
  block_comments:    &'static [(&'static str, &'static str)],
  string_delimiters: &'static [char],
  builtin_functions: &'static [&'static str],
  lifecycle:         &'static [&'static str],
  serial_object:     Option<&'static str>,
}

const C_FAMILY_KEYWORDS: &[&str] = &[
  "int", "float", "double", "char", "void", "return", "if", "else", "for",
  "while", "do", "include", "define", "ifdef", "ifndef", "endif", "struct",
  "class", "const", "static", "unsigned", "signed", "long", "short", "bool",
  "break", "continue", "switch", "case", "default", "sizeof", "namespace",
  "using", "template", "typename", "new", "delete", "public", "private",
  "protected", "virtual", "enum", "union", "typedef", "auto",
];

static JAVASCRIPT: LanguageRules = LanguageRules {
  name:              "javascript",
  keywords:          &[
    "const", "let", "var", "function", "return", "if", "else", "for",
    "while", "do", "class", "import", "export", "async", "await", "new",
    "this", "typeof", "instanceof", "switch", "case", "break", "continue",
    "try", "catch", "finally", "throw", "of", "in", "static", "extends",
    "implements", "interface", "type", "enum",
  ],
  booleans:          &["true", "false", "null", "undefined"],
  line_comments:     &["//"],
  block_comments:    &[("/*", "*/")],
  string_delimiters: &['\'', '"', '`'],
  builtin_functions: &[],
  lifecycle:         &[],
  serial_object:     None,
};

static PYTHON: LanguageRules = LanguageRules {
  name:              "python",
  keywords:          &[
    "def", "class", "return", "if", "elif", "else", "for", "while",
    "import", "from", "as", "with", "try", "except", "finally", "pass",
    "lambda", "yield", "raise", "global", "nonlocal", "assert", "del",
    "in", "not", "and", "or", "is", "break", "continue",
  ],
  booleans:          &["True", "False", "None"],
  line_comments:     &["#"],
  block_comments:    &[],
  string_delimiters: &['\'', '"'],
  builtin_functions: &[],
  lifecycle:         &[],
  serial_object:     None,
};

static CPP: LanguageRules = LanguageRules {
  name:              "cpp",
  keywords:          C_FAMILY_KEYWORDS,
  booleans:          &["true", "false", "NULL", "nullptr"],
  line_comments:     &["//"],
  block_comments:    &[("/*", "*/")],
  string_delimiters: &['"', '\''],
  builtin_functions: &[],
  lifecycle:         &[],
  serial_object:     None,
};

static INO: LanguageRules = LanguageRules {
  name:              "ino",
  keywords:          C_FAMILY_KEYWORDS,
  booleans:          &[
    "true", "false", "NULL", "HIGH", "LOW", "INPUT", "OUTPUT",
    "INPUT_PULLUP", "LED_BUILTIN",
  ],
  line_comments:     &["//"],
  block_comments:    &[("/*", "*/")],
  string_delimiters: &['"', '\''],
  builtin_functions: &[
    "pinMode", "digitalWrite", "digitalRead", "analogWrite", "analogRead",
    "analogReference", "delay", "delayMicroseconds", "millis", "micros",
    "map", "constrain", "tone", "noTone", "pulseIn", "shiftOut", "shiftIn",
    "attachInterrupt", "detachInterrupt", "randomSeed", "random",
  ],
  lifecycle:         &["setup", "loop"],
  serial_object:     Some("Serial"),
};

static FAMILIES: &[&LanguageRules] = &[&JAVASCRIPT, &PYTHON, &CPP, &INO];

impl LanguageRules {
  /// Look up the rule table for a (lowercased, alias-resolved) language.
  #[must_use]
  pub fn for_language(language: &str) -> Option<&'static Self> {
    FAMILIES.iter().find(|rules| rules.name == language).copied()
  }
}

/// Rule-table based syntax highlighter.
///
/// Classifies each token exactly once in a single scan, so later rules can
/// never re-match text produced by earlier ones.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenHighlighter;

impl TokenHighlighter {
  /// Create a new token highlighter.
  #[must_use]
  pub const fn new() -> Self {
    Self
  }
}

impl SyntaxHighlighter for TokenHighlighter {
  fn name(&self) -> &'static str {
    "token-rules"
  }

  fn supported_languages(&self) -> Vec<String> {
    FAMILIES.iter().map(|rules| rules.name.to_string()).collect()
  }

  fn highlight(&self, code: &str, language: &str) -> HighlightResult<String> {
    let rules = LanguageRules::for_language(&language.to_lowercase())
      .ok_or_else(|| HighlightError::UnknownLanguage(language.to_string()))?;
    Ok(highlight_with_rules(code, rules))
  }
}

fn flush_plain(out: &mut String, plain: &mut String) {
  if !plain.is_empty() {
    out.push_str(&escape_html(plain));
    plain.clear();
  }
}

fn push_token(out: &mut String, text: &str, class: TokenClass) {
  out.push_str("<span class=\"");
  out.push_str(class.css_class());
  out.push_str("\">");
  out.push_str(&escape_html(text));
  out.push_str("</span>");
}

/// Length in bytes of the identifier starting at the beginning of `text`.
fn ident_len(text: &str) -> usize {
  text
    .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
    .unwrap_or(text.len())
}

fn highlight_with_rules(code: &str, rules: &LanguageRules) -> String {
  let n = code.len();
  let mut out = String::with_capacity(n * 2);
  let mut plain = String::new();
  let mut i = 0;

  'outer: while i < n {
    let rest = &code[i..];

    for comment in rules.line_comments {
      if rest.starts_with(comment) {
        let end = rest.find('\n').map_or(n, |p| i + p);
        flush_plain(&mut out, &mut plain);
        push_token(&mut out, &code[i..end], TokenClass::Comment);
        i = end;
        continue 'outer;
      }
    }

    for &(open, close) in rules.block_comments {
      if rest.starts_with(open) {
        let end = rest[open.len()..]
          .find(close)
          .map_or(n, |p| i + open.len() + p + close.len());
        flush_plain(&mut out, &mut plain);
        push_token(&mut out, &code[i..end], TokenClass::Comment);
        i = end;
        continue 'outer;
      }
    }

    let Some(c) = rest.chars().next() else { break };

    if rules.string_delimiters.contains(&c) {
      // Scan to the matching unescaped delimiter, or end of input for an
      // unterminated literal.
      let mut j = i + c.len_utf8();
      let mut escaped = false;
      while j < n {
        let Some(d) = code[j..].chars().next() else { break };
        j += d.len_utf8();
        if escaped {
          escaped = false;
        } else if d == '\\' {
          escaped = true;
        } else if d == c {
          break;
        }
      }
      flush_plain(&mut out, &mut plain);
      push_token(&mut out, &code[i..j], TokenClass::String);
      i = j;
      continue;
    }

    if c.is_ascii_alphabetic() || c == '_' {
      let end = i + ident_len(rest);
      let word = &code[i..end];

      if rules.serial_object == Some(word) {
        // Fold a following `.method` into the same token.
        let mut j = end;
        if code[j..].starts_with('.') {
          let method = ident_len(&code[j + 1..]);
          if method > 0 {
            j += 1 + method;
          }
        }
        flush_plain(&mut out, &mut plain);
        push_token(&mut out, &code[i..j], TokenClass::Serial);
        i = j;
        continue;
      }

      let class = if rules.lifecycle.contains(&word) {
        Some(TokenClass::Lifecycle)
      } else if rules.builtin_functions.contains(&word) {
        Some(TokenClass::Function)
      } else if rules.keywords.contains(&word) {
        Some(TokenClass::Keyword)
      } else if rules.booleans.contains(&word) {
        Some(TokenClass::Boolean)
      } else {
        None
      };

      match class {
        Some(class) => {
          flush_plain(&mut out, &mut plain);
          push_token(&mut out, word, class);
        },
        None => plain.push_str(word),
      }
      i = end;
      continue;
    }

    if c.is_ascii_digit() {
      let mut j = i
        + rest
          .find(|d: char| !d.is_ascii_digit())
          .unwrap_or(rest.len());
      // Optional fraction part.
      if code[j..].starts_with('.')
        && code[j + 1..].starts_with(|d: char| d.is_ascii_digit())
      {
        j += 1;
        j += code[j..]
          .find(|d: char| !d.is_ascii_digit())
          .unwrap_or(n - j);
      }
      flush_plain(&mut out, &mut plain);
      push_token(&mut out, &code[i..j], TokenClass::Number);
      i = j;
      continue;
    }

    plain.push(c);
    i += c.len_utf8();
  }

  flush_plain(&mut out, &mut plain);
  out
}
