//! Fence detection state machine for the code-extraction pass.

/// What a line means for fence state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FenceEvent {
  /// The line opens a fenced block; carries the language tag, if any.
  Open(Option<String>),
  /// The line closes the currently open fenced block.
  Close,
  /// The line does not change fence state.
  None,
}

/// State tracking for fenced code regions in markdown.
///
/// Tracks whether we are inside a fenced block and remembers the fence
/// character and count so only a matching fence of at least the same length
/// closes the block. Both ``` and ~~~ fences are recognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FenceTracker {
  in_code_block: bool,
  fence_char:    Option<char>,
  fence_count:   usize,
}

impl FenceTracker {
  /// Create a new fence tracker.
  #[must_use]
  pub const fn new() -> Self {
    Self {
      in_code_block: false,
      fence_char:    None,
      fence_count:   0,
    }
  }

  /// Check if currently inside a fenced block.
  #[must_use]
  pub const fn in_code_block(&self) -> bool {
    self.in_code_block
  }

  /// Process a line, returning the updated state and what the line meant.
  #[must_use]
  pub fn process_line(&self, line: &str) -> (Self, FenceEvent) {
    let trimmed = line.trim_start();

    if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
      let Some(fence_char) = trimmed.chars().next() else {
        return (*self, FenceEvent::None);
      };
      let fence_count =
        trimmed.chars().take_while(|&c| c == fence_char).count();

      if fence_count >= 3 {
        if !self.in_code_block {
          let tag = trimmed[fence_count..]
            .trim()
            .split_whitespace()
            .next()
            .map(str::to_lowercase);
          return (
            Self {
              in_code_block: true,
              fence_char:    Some(fence_char),
              fence_count,
            },
            FenceEvent::Open(tag),
          );
        }
        if self.fence_char == Some(fence_char)
          && fence_count >= self.fence_count
        {
          return (Self::new(), FenceEvent::Close);
        }
      }
    }

    (*self, FenceEvent::None)
  }
}
