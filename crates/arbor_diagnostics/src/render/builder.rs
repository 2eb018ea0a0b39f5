//! Line builder that tracks per-line prefixes.

use std::ops::Range;

use crate::wrap::wrap_line;

/// Accumulates rendered text line by line.
///
/// The first line gets `prefix_line_one`; every later line gets the current
/// `prefix_other_lines`. Prefix increments requested mid-line take effect on
/// the next line. Text written with `allow_wrap` is recorded as a wrappable
/// range and word-wrapped when the line is finalized.
pub(crate) struct PrefixedStringBuilder {
    prefix_line_one: String,
    prefix_other_lines: String,
    next_prefix_other_lines: Option<String>,
    wrap_width: usize,
    buffer: String,
    current_line: String,
    /// Char ranges of `current_line` that may be wrapped.
    wrappable_ranges: Vec<Range<usize>>,
    num_lines: usize,
}

impl PrefixedStringBuilder {
    pub(crate) fn new(prefix_line_one: String, prefix_other_lines: String, wrap_width: usize) -> Self {
        PrefixedStringBuilder {
            prefix_line_one,
            prefix_other_lines,
            next_prefix_other_lines: None,
            wrap_width,
            buffer: String::new(),
            current_line: String::new(),
            wrappable_ranges: Vec::new(),
            num_lines: 0,
        }
    }

    pub(crate) fn wrap_width(&self) -> usize {
        self.wrap_width
    }

    /// Prefix the next finalized line will get.
    pub(crate) fn prefix_other_lines(&self) -> &str {
        self.next_prefix_other_lines
            .as_deref()
            .unwrap_or(&self.prefix_other_lines)
    }

    pub(crate) fn set_prefix_other_lines(&mut self, prefix: String) {
        self.prefix_other_lines = prefix;
        self.next_prefix_other_lines = None;
    }

    /// Append `suffix` to the other-lines prefix.
    ///
    /// Applies immediately when the current line is empty or
    /// `update_current_line` is set; otherwise from the next line on.
    pub(crate) fn increment_prefix_other_lines(&mut self, suffix: &str, update_current_line: bool) {
        let prefix = format!("{}{suffix}", self.prefix_other_lines());
        if self.current_line.is_empty() || update_current_line {
            self.prefix_other_lines = prefix;
            self.next_prefix_other_lines = None;
        } else {
            self.next_prefix_other_lines = Some(prefix);
        }
    }

    pub(crate) fn requires_multiple_lines(&self) -> bool {
        self.num_lines > 1
            || (self.num_lines == 1 && !self.current_line.is_empty())
            || self.current_line_len() + char_len(self.current_prefix()) > self.wrap_width
    }

    pub(crate) fn is_current_line_empty(&self) -> bool {
        self.current_line.is_empty()
    }

    fn current_line_len(&self) -> usize {
        char_len(&self.current_line)
    }

    fn current_prefix(&self) -> &str {
        if self.buffer.is_empty() {
            &self.prefix_line_one
        } else {
            &self.prefix_other_lines
        }
    }

    fn update_prefix(&mut self) {
        if let Some(next) = self.next_prefix_other_lines.take() {
            self.prefix_other_lines = next;
        }
    }

    fn finalize_line(&mut self, add_trailing_line_break: bool) {
        let first_line = self.buffer.is_empty();
        let text = std::mem::take(&mut self.current_line);

        if self.wrappable_ranges.is_empty() {
            self.write_line(&text, add_trailing_line_break);
            return;
        }
        let start_offset = if first_line {
            char_len(&self.prefix_line_one)
        } else {
            char_len(&self.prefix_other_lines)
        };
        let lines = wrap_line(
            &text,
            &self.wrappable_ranges,
            self.wrap_width,
            start_offset,
            char_len(&self.prefix_other_lines),
        );
        let count = lines.len();
        for (i, line) in lines.iter().enumerate() {
            self.write_line(line, add_trailing_line_break || i + 1 < count);
        }
        self.wrappable_ranges.clear();
    }

    fn write_line(&mut self, line: &str, include_line_break: bool) {
        let prefixed = format!("{}{line}", self.current_prefix());
        self.buffer.push_str(prefixed.trim_end());
        if include_line_break {
            self.buffer.push('\n');
        }
        self.num_lines += 1;
    }

    /// Append already-prefixed lines, e.g. a nested render.
    pub(crate) fn write_raw_lines(&mut self, lines: &str) {
        if lines.is_empty() {
            return;
        }
        if !self.current_line.is_empty() {
            self.finalize_line(true);
        }
        self.buffer.push_str(lines);
        if !lines.ends_with('\n') {
            self.buffer.push('\n');
        }
        self.num_lines += 1;
        self.update_prefix();
    }

    pub(crate) fn write(&mut self, text: &str, allow_wrap: bool) {
        if text.is_empty() {
            return;
        }
        for (i, line) in text.split('\n').enumerate() {
            if i > 0 {
                self.finalize_line(true);
                self.update_prefix();
            }
            if line.is_empty() {
                continue;
            }
            if allow_wrap {
                let wrap_start = self.current_line_len();
                let wrap_end = wrap_start + char_len(line);
                match self.wrappable_ranges.last_mut() {
                    Some(last) if last.end == wrap_start => last.end = wrap_end,
                    _ => self.wrappable_ranges.push(wrap_start..wrap_end),
                }
            }
            self.current_line.push_str(line);
        }
    }

    /// Write `text`, then repeat its last char until the line reaches
    /// `target_line_length` columns. The line becomes unwrappable.
    pub(crate) fn write_stretched(&mut self, text: &str, target_line_length: usize) {
        self.write(text, false);
        let current = self.current_line_len() + char_len(self.current_prefix());
        if let Some(last) = text.chars().last() {
            for _ in current..target_line_length {
                self.current_line.push(last);
            }
        }
        self.wrappable_ranges.clear();
    }

    pub(crate) fn build(mut self) -> String {
        if !self.current_line.is_empty() {
            self.finalize_line(false);
        }
        self.buffer
    }
}

#[inline]
fn char_len(s: &str) -> usize {
    s.chars().count()
}
