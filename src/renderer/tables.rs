//! Pipe table conversion.
//!
//! Tables are recognized with a line scanner rather than one large regex: a
//! header row, an alignment separator row, and at least one data row. Pipe
//! runs that do not form a complete table are left as plain text for the
//! later passes to handle.

use crate::utils::escape_html;

/// Column alignment parsed from the separator row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Alignment {
  Left,
  Center,
  Right,
}

impl Alignment {
  const fn css(self) -> &'static str {
    match self {
      Self::Left => "left",
      Self::Center => "center",
      Self::Right => "right",
    }
  }
}

fn is_table_row(line: &str) -> bool {
  let trimmed = line.trim();
  trimmed.len() >= 2 && trimmed.starts_with('|') && trimmed.ends_with('|')
}

/// Split a pipe row into trimmed cells, dropping empty ones.
fn split_cells(line: &str) -> Vec<&str> {
  line
    .trim()
    .split('|')
    .map(str::trim)
    .filter(|cell| !cell.is_empty())
    .collect()
}

fn is_separator_row(line: &str) -> bool {
  let cells = split_cells(line);
  !cells.is_empty()
    && cells.iter().all(|cell| {
      let inner = cell.trim_start_matches(':').trim_end_matches(':');
      !inner.is_empty() && inner.chars().all(|c| c == '-')
    })
}

fn parse_alignment(cell: &str) -> Alignment {
  let starts = cell.starts_with(':');
  let ends = cell.ends_with(':');
  match (starts, ends) {
    (true, true) => Alignment::Center,
    (false, true) => Alignment::Right,
    _ => Alignment::Left,
  }
}

fn render_table(header: &str, separator: &str, rows: &[&str]) -> String {
  let alignments: Vec<Alignment> =
    split_cells(separator).iter().map(|c| parse_alignment(c)).collect();
  let align_for = |i: usize| {
    alignments.get(i).copied().unwrap_or(Alignment::Left).css()
  };

  let mut html =
    String::from("<div class=\"md-table-wrapper\"><table class=\"md-table\">");

  html.push_str("<thead><tr class=\"md-table-row\">");
  for (i, cell) in split_cells(header).iter().enumerate() {
    html.push_str(&format!(
      "<th class=\"md-table-header\" style=\"text-align:{}\">{}</th>",
      align_for(i),
      escape_html(cell)
    ));
  }
  html.push_str("</tr></thead><tbody>");

  for row in rows {
    html.push_str("<tr class=\"md-table-row\">");
    for (i, cell) in split_cells(row).iter().enumerate() {
      html.push_str(&format!(
        "<td class=\"md-table-cell\" style=\"text-align:{}\">{}</td>",
        align_for(i),
        escape_html(cell)
      ));
    }
    html.push_str("</tr>");
  }

  html.push_str("</tbody></table></div>");
  html
}

/// Convert pipe tables in `text` to HTML, leaving everything else intact.
pub(super) fn convert_tables(text: &str) -> String {
  let lines: Vec<&str> = text.split('\n').collect();
  let mut out: Vec<String> = Vec::with_capacity(lines.len());
  let mut i = 0;

  while i < lines.len() {
    let header_ok = is_table_row(lines[i]);
    let separator_ok = header_ok
      && i + 1 < lines.len()
      && is_table_row(lines[i + 1])
      && is_separator_row(lines[i + 1]);
    let first_data_ok =
      separator_ok && i + 2 < lines.len() && is_table_row(lines[i + 2]);

    if first_data_ok {
      let mut end = i + 2;
      while end < lines.len() && is_table_row(lines[end]) {
        end += 1;
      }
      out.push(render_table(lines[i], lines[i + 1], &lines[i + 2..end]));
      i = end;
    } else {
      out.push(lines[i].to_string());
      i += 1;
    }
  }

  out.join("\n")
}
