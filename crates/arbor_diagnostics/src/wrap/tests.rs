use super::*;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

#[test]
fn test_short_text_is_untouched() {
    assert_eq!(word_wrap("short", 80), vec!["short"]);
}

#[test]
fn test_greedy_fill() {
    assert_eq!(
        word_wrap("The quick brown fox jumps", 10),
        vec!["The quick", "brown fox", "jumps"]
    );
}

#[test]
fn test_newlines_are_hard_breaks() {
    assert_eq!(word_wrap("a\nb", 80), vec!["a", "b"]);
}

#[test]
fn test_long_word_overflows_on_its_own_line() {
    assert_eq!(
        word_wrap("supercalifragilistic word", 5),
        vec!["supercalifragilistic", "word"]
    );
}

#[test]
fn test_list_marker_indents_continuation() {
    assert_eq!(
        word_wrap("- alpha beta gamma", 10),
        vec!["- alpha", "  beta", "  gamma"]
    );
}

#[test]
fn test_list_marker_width() {
    let width = |s: &str| list_marker_width(&s.chars().collect::<Vec<_>>());
    assert_eq!(width("- item"), 2);
    assert_eq!(width("  * item"), 4);
    assert_eq!(width("12. item"), 4);
    assert_eq!(width("3) item"), 3);
    assert_eq!(width("plain"), 0);
    assert_eq!(width("1.5 apples"), 0);
}

#[test]
fn test_trailing_spaces_do_not_add_empty_line() {
    assert_eq!(word_wrap("aaaa bbbb    ", 6), vec!["aaaa", "bbbb"]);
}

#[test]
fn test_wrap_line_without_ranges_never_breaks() {
    assert_eq!(wrap_line("aaa bbb ccc", &[], 5, 0, 0), vec!["aaa bbb ccc"]);
}

#[test]
fn test_wrap_line_breaks_only_inside_ranges() {
    assert_eq!(
        wrap_line("aa bb cc dd", &[6..11], 5, 0, 0),
        vec!["aa bb cc", "dd"]
    );
}

#[test]
fn test_wrap_line_respects_start_offset() {
    assert_eq!(wrap_line("aa bb", &[0..5], 4, 2, 0), vec!["aa", "bb"]);
}

proptest! {
    #[test]
    fn prop_wrap_preserves_words(
        text in "[a-z]{1,12}( [a-z]{1,12}){0,20}",
        width in 1usize..60,
    ) {
        let lines = word_wrap(&text, width);
        let rejoined = lines.join(" ");
        let got: Vec<&str> = rejoined.split_whitespace().collect();
        let want: Vec<&str> = text.split_whitespace().collect();
        prop_assert_eq!(got, want);
    }

    #[test]
    fn prop_wrapped_lines_fit_or_hold_one_word(
        text in "[a-z]{1,12}( [a-z]{1,12}){0,20}",
        width in 1usize..60,
    ) {
        for line in word_wrap(&text, width) {
            prop_assert!(line.chars().count() <= width || !line.contains(' '), "{:?}", line);
        }
    }
}
