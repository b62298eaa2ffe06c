//! Fixed emoji shortcode table.
//!
//! The final pipeline stage maps known `:shortcode:` sequences to their
//! unicode glyph. Unknown shortcodes pass through unchanged.

use std::sync::LazyLock;

use regex::Regex;

use crate::utils::never_matching_regex;

static SHORTCODE_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r":\w+:").unwrap_or_else(|e| {
    log::error!("Failed to compile SHORTCODE_RE regex: {e}");
    never_matching_regex()
  })
});

/// Known shortcodes, matching the set the content hub uses in posts.
const EMOJI_MAP: &[(&str, &str)] = &[
  (":smile:", "\u{1f60a}"),
  (":heart:", "\u{2764}\u{fe0f}"),
  (":thumbsup:", "\u{1f44d}"),
  (":star:", "\u{2b50}"),
  (":fire:", "\u{1f525}"),
  (":rocket:", "\u{1f680}"),
  (":check:", "\u{2705}"),
  (":x:", "\u{274c}"),
  (":warning:", "\u{26a0}\u{fe0f}"),
  (":book:", "\u{1f4d6}"),
  (":bulb:", "\u{1f4a1}"),
  (":gear:", "\u{2699}\u{fe0f}"),
];

fn lookup(shortcode: &str) -> Option<&'static str> {
  EMOJI_MAP
    .iter()
    .find(|(code, _)| *code == shortcode)
    .map(|(_, glyph)| *glyph)
}

/// Replace known `:shortcode:` sequences with their unicode glyph.
pub(crate) fn replace_shortcodes(text: &str) -> String {
  SHORTCODE_RE
    .replace_all(text, |caps: &regex::Captures| {
      let matched = &caps[0];
      lookup(matched).map_or_else(|| matched.to_string(), str::to_string)
    })
    .into_owned()
}
