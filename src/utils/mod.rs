//! Shared helpers for anchor generation and HTML escaping.

pub mod codeblock;

/// Slugify heading text for use as an anchor ID.
///
/// The text is case-folded, common Latin diacritics are stripped, characters
/// that are neither alphanumeric nor `_`/`-` are removed, and whitespace runs
/// collapse to a single hyphen. The result is deterministic for a given
/// input. Identically-titled headings produce identical IDs; the renderer
/// does not deduplicate them, so for in-page navigation the last heading
/// with a given ID wins.
#[must_use]
pub fn slugify(text: &str) -> String {
  let mut folded = String::with_capacity(text.len());
  for c in text.chars() {
    for lower in c.to_lowercase() {
      match fold_diacritic(lower) {
        Some(replacement) => folded.push_str(replacement),
        None => folded.push(lower),
      }
    }
  }

  let mut slug = String::with_capacity(folded.len());
  let mut pending_hyphen = false;
  for c in folded.chars() {
    if c.is_whitespace() {
      pending_hyphen = true;
    } else if c.is_alphanumeric() || c == '_' || c == '-' {
      if pending_hyphen && !slug.is_empty() {
        slug.push('-');
      }
      pending_hyphen = false;
      slug.push(c);
    }
    // Everything else is dropped without breaking the current word.
  }

  slug.trim_matches('-').to_string()
}

/// Fold a single pre-lowercased character to its ASCII base form.
const fn fold_diacritic(c: char) -> Option<&'static str> {
  Some(match c {
    'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' | 'ă' => "a",
    'ç' | 'ć' | 'č' => "c",
    'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ė' | 'ę' => "e",
    'ì' | 'í' | 'î' | 'ï' | 'ī' => "i",
    'ñ' | 'ń' => "n",
    'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' => "o",
    'ù' | 'ú' | 'û' | 'ü' | 'ū' => "u",
    'ý' | 'ÿ' => "y",
    'ž' | 'ź' | 'ż' => "z",
    'š' | 'ś' => "s",
    'ł' => "l",
    'đ' => "d",
    'æ' => "ae",
    'œ' => "oe",
    'ß' => "ss",
    _ => return None,
  })
}

/// Escape text for inclusion in HTML content.
///
/// Covers `&`, `<`, `>` and both quote characters so the same helper is safe
/// for code content that later ends up inside attribute-bearing markup.
/// The helper is idempotent on its own output in the sense that entities it
/// produces contain no characters it would escape again except `&`, which is
/// the standard behavior for entity encoding.
#[must_use]
pub fn escape_html(text: &str) -> String {
  html_escape::encode_quoted_attribute(text).into_owned()
}

/// Create a regex that never matches anything.
///
/// Used as a fallback when a pattern fails to compile so the surrounding
/// pass degrades to a no-op instead of panicking.
///
/// # Panics
///
/// Panics only if the fallback pattern itself fails to compile, which cannot
/// happen for a constant, valid pattern.
#[must_use]
pub fn never_matching_regex() -> regex::Regex {
  // Asserts something impossible, so it matches no input at all.
  #[allow(clippy::unwrap_used, reason = "constant pattern is always valid")]
  let re = regex::Regex::new(r"[^\s\S]").unwrap();
  re
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn slugify_basic() {
    assert_eq!(slugify("Hello World"), "hello-world");
    assert_eq!(slugify("Step 1: Setup & Config"), "step-1-setup-config");
  }

  #[test]
  fn slugify_is_deterministic() {
    let a = slugify("Step 1: Setup & Config");
    let b = slugify("Step 1: Setup & Config");
    assert_eq!(a, b);
  }

  #[test]
  fn slugify_strips_diacritics() {
    assert_eq!(slugify("Résumé"), "resume");
    assert_eq!(slugify("Über älles"), "uber-alles");
  }

  #[test]
  fn slugify_collapses_whitespace() {
    assert_eq!(slugify("a  \t b"), "a-b");
  }

  #[test]
  fn slugify_keeps_underscores() {
    assert_eq!(slugify("my_function name"), "my_function-name");
  }

  #[test]
  fn escape_html_covers_specials() {
    let escaped = escape_html("<b> & \"q\"");
    assert!(!escaped.contains('<'));
    assert!(!escaped.contains('>'));
    assert!(!escaped.contains('"'));
    assert!(escaped.contains("&lt;"));
    assert!(escaped.contains("&gt;"));
    assert!(escaped.contains("&amp;"));
  }

  #[test]
  fn never_matching_regex_matches_nothing() {
    let re = never_matching_regex();
    assert!(!re.is_match(""));
    assert!(!re.is_match("anything at all"));
  }
}
