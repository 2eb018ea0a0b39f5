//! Greedy word wrap.
//!
//! Widths are measured in `char`s. Wrapping never splits a word: a word longer
//! than the width gets a line of its own and overflows.

use std::ops::Range;

#[derive(Copy, Clone, PartialEq, Eq)]
enum Mode {
    InSpace,
    InWord,
    AtBreak,
}

/// Wrap `text` to `width` columns.
///
/// Embedded newlines are hard breaks. A line starting with a list marker
/// (`- `, `* `, `+ `, `1. `, `2) `) indents its continuation lines to the
/// width of the marker.
pub fn word_wrap(text: &str, width: usize) -> Vec<String> {
    let mut out = Vec::new();
    for line in text.split('\n') {
        let chars: Vec<char> = line.chars().collect();
        let indent = list_marker_width(&chars);
        let all = [0..chars.len()];
        for (i, wrapped) in wrap_chars(&chars, &all, width, 0, indent)
            .into_iter()
            .enumerate()
        {
            if i == 0 {
                out.push(wrapped);
            } else {
                out.push(" ".repeat(indent) + &wrapped);
            }
        }
    }
    out
}

/// Width of a leading `^ *([-+*] |[0-9]+[.):] )?` marker.
fn list_marker_width(chars: &[char]) -> usize {
    let spaces = chars.iter().take_while(|&&c| c == ' ').count();
    let rest = &chars[spaces..];
    let marker = match rest {
        ['-' | '+' | '*', ' ', ..] => 2,
        _ => {
            let digits = rest.iter().take_while(|c| c.is_ascii_digit()).count();
            match rest.get(digits..digits + 2) {
                Some(['.' | ')' | ':', ' ']) if digits > 0 => digits + 2,
                _ => 0,
            }
        }
    };
    spaces + marker
}

/// Wrap one line, breaking only at spaces inside `wrap_ranges`.
///
/// `wrap_ranges` are sorted, non-overlapping char ranges. `start_offset` is the
/// width already used on the first line, `other_line_offset` the width used on
/// every later line.
pub(crate) fn wrap_line(
    line: &str,
    wrap_ranges: &[Range<usize>],
    width: usize,
    start_offset: usize,
    other_line_offset: usize,
) -> Vec<String> {
    let chars: Vec<char> = line.chars().collect();
    wrap_chars(&chars, wrap_ranges, width, start_offset, other_line_offset)
}

fn wrap_chars(
    chars: &[char],
    wrap_ranges: &[Range<usize>],
    width: usize,
    start_offset: usize,
    other_line_offset: usize,
) -> Vec<String> {
    let len = chars.len();
    if len.saturating_add(start_offset) < width {
        return vec![chars.iter().collect()];
    }

    let width = isize::try_from(width).unwrap_or(isize::MAX);
    let mut lines = Vec::new();
    // Column origin of the current line, shifted by the prefix width.
    let mut line_origin = -(start_offset as isize);
    let mut index = 0;
    let mut mode = Mode::InSpace;
    let mut last_word_start = 0;
    let mut last_word_end: Option<usize> = None;
    let mut start = 0;
    let mut chunk = 0;

    let mut no_wrap = |index: usize| -> bool {
        loop {
            let Some(range) = wrap_ranges.get(chunk) else {
                return true;
            };
            if index < range.end {
                return index < range.start;
            }
            chunk += 1;
        }
    };

    loop {
        match mode {
            Mode::InSpace => {
                while index < len && chars[index] == ' ' {
                    index += 1;
                }
                last_word_start = index;
                mode = Mode::InWord;
            }
            Mode::InWord => {
                while index < len && (chars[index] != ' ' || no_wrap(index)) {
                    index += 1;
                }
                mode = Mode::AtBreak;
            }
            Mode::AtBreak => {
                let column = index as isize - line_origin;
                if column > width || index == len {
                    let end = match last_word_end {
                        Some(end) if column > width => end,
                        _ => index,
                    };
                    lines.push(chars[start..end].iter().collect());
                    if end >= len {
                        return lines;
                    }
                    if end == index {
                        while index < len && chars[index] == ' ' {
                            index += 1;
                        }
                    } else {
                        index = last_word_start;
                    }
                    if index == len {
                        return lines;
                    }
                    start = index;
                    mode = Mode::InWord;
                    line_origin = start as isize - other_line_offset as isize;
                    last_word_end = None;
                } else {
                    last_word_end = Some(index);
                    mode = Mode::InSpace;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests;
