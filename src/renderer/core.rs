//! The rendering pipeline.
//!
//! Rendering is a fixed sequence of passes over the document text. Code
//! regions are extracted into placeholders first, so no markup pass can see
//! or rewrite code content, and are restored just before paragraph
//! wrapping. Every pass is regex or line-scan based and total: malformed
//! input degrades to plain text, it never aborts the pipeline.

use std::sync::LazyLock;

use regex::Regex;

use super::{tables, types::MarkdownRenderer};
use crate::{
  emoji,
  types::{RenderResult, TocEntry},
  utils::{
    codeblock::{FenceEvent, FenceTracker},
    escape_html, never_matching_regex, slugify,
  },
};

/// Placeholder delimiter. A C0 control character with no legitimate
/// rendering; any occurrence in the input is stripped during normalization
/// so document text can never collide with a generated placeholder.
const MARKER: char = '\u{1A}';

fn placeholder(index: usize) -> String {
  format!("{MARKER}md{index}{MARKER}")
}

/// A code region lifted out of the document before the markup passes run.
struct CodeToken {
  index: usize,
  /// The raw code text, used when heading text needs placeholder expansion.
  raw:   String,
  /// The final HTML substituted back in during restoration.
  html:  String,
}

/// Per-render state. Placeholder and task counters live here so concurrent
/// renders never interfere with each other.
#[derive(Default)]
struct RenderContext {
  code_tokens:  Vec<CodeToken>,
  toc:          Vec<TocEntry>,
  title:        Option<String>,
  counter:      usize,
  fence_index:  usize,
  task_counter: usize,
}

impl RenderContext {
  fn push_token(&mut self, raw: String, html: String) -> String {
    let index = self.counter;
    self.counter += 1;
    self.code_tokens.push(CodeToken {
      index,
      raw,
      html,
    });
    placeholder(index)
  }

  /// Replace placeholders in `text` with the raw code they stand for.
  fn expand_placeholders(&self, text: &str) -> String {
    if !text.contains(MARKER) {
      return text.to_string();
    }
    let mut expanded = text.to_string();
    for token in &self.code_tokens {
      expanded = expanded.replace(&placeholder(token.index), &token.raw);
    }
    expanded
  }
}

macro_rules! static_regex {
  ($name:ident, $pattern:expr) => {
    static $name: LazyLock<Regex> = LazyLock::new(|| {
      Regex::new($pattern).unwrap_or_else(|err| {
        log::error!("failed to compile regex {}: {err}", stringify!($name));
        never_matching_regex()
      })
    });
  };
}

static_regex!(SCRIPT_RE, r"(?is)<script[^>]*>.*?</script>");
static_regex!(INLINE_CODE_RE, r"`([^`\n]+)`");
static_regex!(TASK_ITEM_RE, r"(?m)^- \[([ xX])\] (.+)$");
static_regex!(HEADING_RE, r"(?m)^(#{1,6}) (.+)$");
static_regex!(BLOCKQUOTE_LINE_RE, r"(?m)^> ?(.*)$");
static_regex!(
  BLOCKQUOTE_MERGE_RE,
  r#"</blockquote>\s*<blockquote class="md-blockquote">"#
);
static_regex!(SECTION_RULE_RE, r"(?m)^ {0,3}(-{5,}|_{5,}|\*{5,})\s*$");
static_regex!(THEMATIC_RULE_RE, r"(?m)^ {0,3}(-{3,4}|_{3,4}|\*{3,4})\s*$");
static_regex!(STRIKETHROUGH_RE, r"~~([^~\n]+)~~");
static_regex!(BOLD_STAR_RE, r"\*\*([^*\n]+)\*\*");
static_regex!(BOLD_UNDERSCORE_RE, r"__([^_\n]+)__");
static_regex!(ITALIC_STAR_RE, r"\*([^*\n]+)\*");
static_regex!(ITALIC_UNDERSCORE_RE, r"_([^_\n]+)_");
static_regex!(IMAGE_RE, r"!\[([^\]]*)\]\(([^)\s]+)\)");
static_regex!(LINK_RE, r"\[([^\]]+)\]\(([^)\s]+)\)");
static_regex!(LIST_ITEM_RE, r"(?m)^[-*] (.+)$");
static_regex!(ORDERED_ITEM_RE, r"(?m)^\d+\. (.+)$");
static_regex!(
  LIST_RUN_RE,
  r#"(?s)(<li class="md-list-item">.*?</li>)(\n<li class="md-list-item">.*?</li>)*"#
);
static_regex!(
  BLOCK_START_RE,
  r"^<(div|nav|h[1-6]|ul|ol|pre|blockquote|table|hr)"
);

impl MarkdownRenderer {
  /// Render a markdown document to HTML.
  #[must_use]
  pub fn render(&self, markdown: &str) -> RenderResult {
    let mut ctx = RenderContext::default();

    let mut text = markdown.replace("\r\n", "\n");
    if text.contains(MARKER) {
      text = text.replace(MARKER, "");
    }
    if self.options.sanitize {
      text = SCRIPT_RE.replace_all(&text, "").into_owned();
    }

    text = self.extract_fenced_blocks(&text, &mut ctx);
    text = extract_inline_code(&text, &mut ctx);
    text = tables::convert_tables(&text);
    text = convert_task_lists(&text, &mut ctx);
    text = self.convert_headings(&text, &mut ctx);
    text = convert_blockquotes(&text);
    text = convert_rules(&text);
    text = convert_emphasis(&text);
    text = convert_images(&text);
    text = convert_links(&text);
    text = convert_lists(&text);
    text = restore_code_tokens(text, &ctx);
    text = wrap_paragraphs(&text);
    text = emoji::replace_shortcodes(&text);

    log::trace!(
      "rendered document: {} code regions, {} toc entries",
      ctx.code_tokens.len(),
      ctx.toc.len()
    );

    RenderResult {
      html:  text,
      toc:   ctx.toc,
      title: ctx.title,
    }
  }

  fn extract_fenced_blocks(
    &self,
    text: &str,
    ctx: &mut RenderContext,
  ) -> String {
    let mut out: Vec<String> = Vec::new();
    let mut tracker = FenceTracker::new();
    let mut language: Option<String> = None;
    let mut buffer: Vec<&str> = Vec::new();

    for line in text.split('\n') {
      let (next, event) = tracker.process_line(line);
      tracker = next;
      match event {
        FenceEvent::Open(tag) => {
          language = tag;
          buffer.clear();
        },
        FenceEvent::Close => {
          out.push(self.finish_code_block(&buffer, language.take(), ctx));
          buffer.clear();
        },
        FenceEvent::None => {
          if tracker.in_code_block() {
            buffer.push(line);
          } else {
            out.push(line.to_string());
          }
        },
      }
    }

    // An unterminated fence swallows the rest of the document as code.
    if tracker.in_code_block() {
      out.push(self.finish_code_block(&buffer, language.take(), ctx));
    }

    out.join("\n")
  }

  fn finish_code_block(
    &self,
    buffer: &[&str],
    language: Option<String>,
    ctx: &mut RenderContext,
  ) -> String {
    let code = buffer.join("\n").trim().to_string();
    let language = language.unwrap_or_else(|| "plaintext".to_string());
    let block_id = ctx.fence_index;
    ctx.fence_index += 1;
    let html = self.render_code_block(&code, &language, block_id);
    ctx.push_token(code, html)
  }

  fn render_code_block(
    &self,
    code: &str,
    language: &str,
    block_id: usize,
  ) -> String {
    let body = match &self.highlighter {
      Some(manager) => manager.highlight_code(code, language),
      None => escape_html(code),
    };

    let gutter = if self.options.show_line_numbers {
      let count = code.lines().count().max(1);
      let numbers: Vec<String> = (1..=count)
        .map(|n| format!("<span class=\"line-number\">{n}</span>"))
        .collect();
      format!(
        "<span class=\"line-numbers\">{}</span>",
        numbers.join("\n")
      )
    } else {
      String::new()
    };

    let copy = if self.options.copy_button {
      format!(
        "<button type=\"button\" class=\"md-code-copy\" \
         data-target=\"code-block-{block_id}\" title=\"Copy code\">Copy</button>"
      )
    } else {
      String::new()
    };

    format!(
      "<div class=\"md-code-block {theme}\">\
       <div class=\"md-code-header\">\
       <span class=\"md-code-language\">{language}</span>{copy}</div>\
       <pre class=\"md-code-pre\" id=\"code-block-{block_id}\">\
       <code class=\"md-code language-{language}\">{gutter}{body}</code>\
       </pre></div>",
      theme = self.options.theme.class_suffix(),
    )
  }

  fn convert_headings(&self, text: &str, ctx: &mut RenderContext) -> String {
    let generate_toc = self.options.generate_toc;
    HEADING_RE
      .replace_all(text, |caps: &regex::Captures<'_>| {
        let level = caps[1].len();
        let content = caps[2].trim();
        // Anchors and TOC text are computed over the expanded text so that
        // inline code in a heading contributes its characters, not its
        // placeholder.
        let expanded = ctx.expand_placeholders(content);
        let anchor = slugify(&expanded);

        if level == 1 && ctx.title.is_none() {
          ctx.title = Some(expanded.clone());
        }
        if generate_toc && level <= 3 {
          ctx.toc.push(TocEntry {
            text:      expanded,
            level:     u8::try_from(level).unwrap_or(6),
            anchor_id: anchor.clone(),
          });
        }

        format!(
          "<h{level} id=\"{anchor}\" class=\"md-heading md-h{level}\">\
           <span class=\"md-heading-content\">{content}</span>\
           <a href=\"#{anchor}\" class=\"md-heading-anchor\" \
           aria-label=\"Permalink\">#</a></h{level}>"
        )
      })
      .into_owned()
  }
}

fn extract_inline_code(text: &str, ctx: &mut RenderContext) -> String {
  INLINE_CODE_RE
    .replace_all(text, |caps: &regex::Captures<'_>| {
      let code = caps[1].to_string();
      let html =
        format!("<code class=\"md-inline-code\">{}</code>", escape_html(&code));
      ctx.push_token(code, html)
    })
    .into_owned()
}

fn convert_task_lists(text: &str, ctx: &mut RenderContext) -> String {
  TASK_ITEM_RE
    .replace_all(text, |caps: &regex::Captures<'_>| {
      ctx.task_counter += 1;
      let id = ctx.task_counter;
      let checked = if &caps[1] == "x" { " checked" } else { "" };
      format!(
        "<div class=\"md-task-item\">\
         <input type=\"checkbox\" id=\"task-{id}\" \
         class=\"md-task-checkbox\"{checked} disabled>\
         <label for=\"task-{id}\" class=\"md-task-label\">{}</label></div>",
        &caps[2]
      )
    })
    .into_owned()
}

fn convert_blockquotes(text: &str) -> String {
  let quoted = BLOCKQUOTE_LINE_RE
    .replace_all(text, "<blockquote class=\"md-blockquote\">$1</blockquote>");
  // Adjacent quote lines belong to one quote; fold the seams into breaks.
  BLOCKQUOTE_MERGE_RE.replace_all(&quoted, "<br>").into_owned()
}

fn convert_rules(text: &str) -> String {
  // Longer runs first, so a 5+ run is never claimed as a plain rule.
  let text = SECTION_RULE_RE
    .replace_all(text, "<hr class=\"md-hr md-section-separator\">");
  THEMATIC_RULE_RE
    .replace_all(&text, "<hr class=\"md-hr\">")
    .into_owned()
}

fn convert_emphasis(text: &str) -> String {
  let text = STRIKETHROUGH_RE
    .replace_all(text, "<del class=\"md-strikethrough\">$1</del>");
  let text =
    BOLD_STAR_RE.replace_all(&text, "<strong class=\"md-bold\">$1</strong>");
  let text = BOLD_UNDERSCORE_RE
    .replace_all(&text, "<strong class=\"md-bold\">$1</strong>");
  let text =
    ITALIC_STAR_RE.replace_all(&text, "<em class=\"md-italic\">$1</em>");
  ITALIC_UNDERSCORE_RE
    .replace_all(&text, "<em class=\"md-italic\">$1</em>")
    .into_owned()
}

fn convert_images(text: &str) -> String {
  IMAGE_RE
    .replace_all(
      text,
      "<img src=\"$2\" alt=\"$1\" class=\"md-image\" loading=\"lazy\">",
    )
    .into_owned()
}

fn convert_links(text: &str) -> String {
  // Every link opens in a new tab with an external-link affordance; the
  // rendered documents live inside an app shell where in-page navigation
  // would break the surrounding view.
  LINK_RE
    .replace_all(
      text,
      "<a href=\"$2\" class=\"md-link\" target=\"_blank\" \
       rel=\"noopener noreferrer\">$1<span class=\"md-link-external\" \
       aria-hidden=\"true\"> \u{2197}</span></a>",
    )
    .into_owned()
}

fn convert_lists(text: &str) -> String {
  let text = LIST_ITEM_RE
    .replace_all(text, "<li class=\"md-list-item\">$1</li>");
  let text = ORDERED_ITEM_RE
    .replace_all(&text, "<li class=\"md-list-item\">$1</li>");
  // Group consecutive items into one flat list.
  LIST_RUN_RE
    .replace_all(&text, "<ul class=\"md-list\">$0</ul>")
    .into_owned()
}

fn restore_code_tokens(mut text: String, ctx: &RenderContext) -> String {
  for token in &ctx.code_tokens {
    text = text.replacen(&placeholder(token.index), &token.html, 1);
  }
  if text.contains(MARKER) {
    log::warn!("unrestored code placeholder left in rendered output");
  }
  text
}

fn wrap_paragraphs(text: &str) -> String {
  let mut out: Vec<String> = Vec::new();
  let mut open_pre: usize = 0;

  for fragment in text.split("\n\n") {
    if open_pre > 0 {
      // Inside a multi-line code block whose blank lines were split on;
      // reattach verbatim.
      if let Some(last) = out.last_mut() {
        last.push_str("\n\n");
        last.push_str(fragment);
      } else {
        out.push(fragment.to_string());
      }
    } else {
      let trimmed = fragment.trim();
      if trimmed.is_empty() {
        continue;
      }
      if BLOCK_START_RE.is_match(trimmed) {
        out.push(trimmed.to_string());
      } else {
        out.push(format!("<p class=\"md-paragraph\">{trimmed}</p>"));
      }
    }

    let opens = fragment.matches("<pre").count();
    let closes = fragment.matches("</pre").count();
    open_pre = (open_pre + opens).saturating_sub(closes);
  }

  out.join("\n")
}

/// Render a collected table of contents as a navigation fragment.
#[must_use]
pub fn toc_to_html(toc: &[TocEntry]) -> String {
  if toc.is_empty() {
    return String::new();
  }

  let mut html = String::from(
    "<nav class=\"md-toc\"><div class=\"md-toc-title\">Contents</div>\
     <ul class=\"md-toc-list\">",
  );
  for entry in toc {
    html.push_str(&format!(
      "<li class=\"md-toc-item md-toc-level-{}\">\
       <a href=\"#{}\" class=\"md-toc-link\">{}</a></li>",
      entry.level,
      entry.anchor_id,
      escape_html(&entry.text)
    ));
  }
  html.push_str("</ul></nav>");
  html
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::renderer::types::RenderOptions;

  fn renderer() -> MarkdownRenderer {
    MarkdownRenderer::new(RenderOptions::default())
  }

  fn plain_renderer() -> MarkdownRenderer {
    MarkdownRenderer::new(
      RenderOptions::builder()
        .generate_toc(false)
        .highlight_code(false)
        .show_line_numbers(false)
        .copy_button(false)
        .build(),
    )
  }

  #[test]
  fn heading_gets_anchor_and_permalink() {
    let result = renderer().render("## Step 1: Setup & Config");
    assert!(result.html.contains(
      "<h2 id=\"step-1-setup-config\" class=\"md-heading md-h2\">"
    ));
    assert!(result.html.contains("class=\"md-heading-anchor\""));
    assert_eq!(result.toc.len(), 1);
    assert_eq!(result.toc[0].anchor_id, "step-1-setup-config");
  }

  #[test]
  fn title_comes_from_first_h1() {
    let result = renderer().render("# First\n\n# Second");
    assert_eq!(result.title.as_deref(), Some("First"));
  }

  #[test]
  fn toc_skips_deep_headings() {
    let result = renderer().render("# A\n\n#### Deep");
    assert_eq!(result.toc.len(), 1);
  }

  #[test]
  fn heading_with_inline_code_slugs_code_text() {
    let result = renderer().render("## Using `pinMode` calls");
    assert_eq!(result.toc[0].anchor_id, "using-pinmode-calls");
    assert_eq!(result.toc[0].text, "Using pinMode calls");
    assert!(result.html.contains("<code class=\"md-inline-code\">pinMode</code>"));
  }

  #[test]
  fn fenced_code_is_inert() {
    let result =
      plain_renderer().render("```\n# not a heading\n**not bold**\n```");
    assert!(result.html.contains("# not a heading"));
    assert!(result.html.contains("**not bold**"));
    assert!(!result.html.contains("<h1"));
    assert!(!result.html.contains("<strong"));
  }

  #[test]
  fn unterminated_fence_swallows_rest() {
    let result = plain_renderer().render("before\n\n```js\nlet x = 1;\n# tail");
    assert!(result.html.contains("let x = 1;"));
    assert!(result.html.contains("# tail"));
    assert!(!result.html.contains("<h1"));
  }

  #[test]
  fn code_block_ids_are_sequential() {
    let result = renderer().render("```\na\n```\n\n```\nb\n```");
    assert!(result.html.contains("id=\"code-block-0\""));
    assert!(result.html.contains("id=\"code-block-1\""));
    assert!(result.html.contains("data-target=\"code-block-1\""));
  }

  #[test]
  fn inline_code_is_escaped() {
    let result = renderer().render("Use `<div>` here");
    assert!(result.html.contains("<code class=\"md-inline-code\">&lt;div&gt;</code>"));
  }

  #[test]
  fn script_blocks_are_stripped() {
    let result = renderer().render("safe <script>alert(1)</script> text");
    assert!(!result.html.contains("<script>"));
    assert!(!result.html.contains("alert(1)"));
    assert!(result.html.contains("safe"));
  }

  #[test]
  fn sanitize_can_be_disabled() {
    let renderer =
      MarkdownRenderer::new(RenderOptions::builder().sanitize(false).build());
    let result = renderer.render("<script>alert(1)</script>");
    assert!(result.html.contains("alert(1)"));
  }

  #[test]
  fn task_items_get_stable_ids() {
    let result = renderer().render("- [x] done\n- [ ] open\n- [X] shouted");
    assert!(result.html.contains("id=\"task-1\""));
    assert!(result.html.contains("id=\"task-2\""));
    // Uppercase X still parses as a task item, but only lowercase x
    // marks it completed.
    assert!(result.html.contains("id=\"task-3\""));
    assert_eq!(result.html.matches(" checked disabled").count(), 1);
    assert!(!result.html.contains("<li"));
  }

  #[test]
  fn adjacent_blockquote_lines_merge() {
    let result = renderer().render("> first\n> second");
    assert_eq!(
      result.html.matches("<blockquote class=\"md-blockquote\">").count(),
      1
    );
    assert!(result.html.contains("first<br>second"));
  }

  #[test]
  fn rule_length_selects_class() {
    let result = renderer().render("---\n\n-----");
    assert!(result.html.contains("<hr class=\"md-hr\">"));
    assert!(result.html.contains("<hr class=\"md-hr md-section-separator\">"));
  }

  #[test]
  fn emphasis_variants_render() {
    let result = renderer().render("~~gone~~ **bold** __also__ *it* _al_");
    assert!(result.html.contains("<del class=\"md-strikethrough\">gone</del>"));
    assert!(result.html.contains("<strong class=\"md-bold\">bold</strong>"));
    assert!(result.html.contains("<strong class=\"md-bold\">also</strong>"));
    assert!(result.html.contains("<em class=\"md-italic\">it</em>"));
    assert!(result.html.contains("<em class=\"md-italic\">al</em>"));
  }

  #[test]
  fn images_are_lazy() {
    let result = renderer().render("![alt text](img.png)");
    assert!(result.html.contains(
      "<img src=\"img.png\" alt=\"alt text\" class=\"md-image\" loading=\"lazy\">"
    ));
  }

  #[test]
  fn links_open_externally() {
    let result = renderer().render("[docs](https://example.com)");
    assert!(result.html.contains("target=\"_blank\""));
    assert!(result.html.contains("rel=\"noopener noreferrer\""));
    assert!(result.html.contains("md-link-external"));
  }

  #[test]
  fn image_is_not_mistaken_for_link() {
    let result = renderer().render("![a](x.png)");
    assert!(!result.html.contains("<a href"));
  }

  #[test]
  fn list_items_group_into_one_list() {
    let result = renderer().render("- one\n- two\n* three");
    assert_eq!(result.html.matches("<ul class=\"md-list\">").count(), 1);
    assert_eq!(result.html.matches("<li class=\"md-list-item\">").count(), 3);
  }

  #[test]
  fn ordered_items_render_as_items() {
    let result = renderer().render("1. first\n2. second");
    assert_eq!(result.html.matches("<li class=\"md-list-item\">").count(), 2);
  }

  #[test]
  fn paragraphs_are_wrapped() {
    let result = renderer().render("first para\n\nsecond para");
    assert_eq!(result.html.matches("<p class=\"md-paragraph\">").count(), 2);
  }

  #[test]
  fn block_elements_are_not_wrapped() {
    let result = renderer().render("# Title\n\ntext");
    assert!(!result.html.contains("<p class=\"md-paragraph\"><h1"));
  }

  #[test]
  fn code_with_blank_lines_survives_wrapping() {
    let result = plain_renderer().render("```\nfirst\n\nsecond\n```");
    assert!(result.html.contains("first\n\nsecond"));
  }

  #[test]
  fn emoji_shortcodes_expand() {
    let result = plain_renderer().render("launch :rocket: at :noon:");
    assert!(result.html.contains('\u{1F680}'));
    // Unknown shortcodes pass through untouched.
    assert!(result.html.contains(":noon:"));
  }

  #[test]
  fn marker_bytes_in_input_cannot_forge_placeholders() {
    // A document that contains a literal placeholder-shaped sequence must
    // not capture another region's restoration or leak the marker.
    let result = renderer().render("```\n\u{1A}md1\u{1A}\n```\n\n`real`");
    assert!(!result.html.contains('\u{1A}'));
    assert_eq!(
      result.html.matches("<code class=\"md-inline-code\">real</code>").count(),
      1
    );
    // The code block keeps its own (stripped) text, nothing substituted in:
    // the inline-code markup may only appear after the block closes.
    let block_end = result.html.find("</pre>").unwrap();
    assert!(result.html.find("md-inline-code").unwrap() > block_end);
    assert!(result.html.contains("md1"));
  }

  #[test]
  fn no_placeholder_leaks() {
    let inputs = [
      "`a` and `b`",
      "```\nblock\n```\n\n`inline`",
      "## `code` heading",
    ];
    for input in inputs {
      let result = renderer().render(input);
      assert!(
        !result.html.contains('\u{1A}'),
        "placeholder leaked for {input:?}"
      );
    }
  }

  #[test]
  fn toc_html_lists_entries() {
    let result = renderer().render("# One\n\n## Two");
    let nav = toc_to_html(&result.toc);
    assert!(nav.contains("<nav class=\"md-toc\">"));
    assert!(nav.contains("md-toc-level-1"));
    assert!(nav.contains("md-toc-level-2"));
    assert!(nav.contains("href=\"#two\""));
    assert!(toc_to_html(&[]).is_empty());
  }

  #[test]
  fn empty_input_renders_empty() {
    let result = renderer().render("");
    assert!(result.html.is_empty());
    assert!(result.toc.is_empty());
    assert!(result.title.is_none());
  }
}
