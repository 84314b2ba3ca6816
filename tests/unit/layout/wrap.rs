use proptest::prelude::*;

use super::*;

#[test]
fn empty_text_has_no_lines() {
    let mut engine = TextLayoutEngine::new();
    let font = ResolvedFont::library_default(100.0);
    assert!(wrap("", 1000.0, &font, &mut engine).is_empty());
    assert!(wrap_chars("", 10).is_empty());
}

#[test]
fn measured_glyph_width_drives_the_budget() {
    let mut engine = TextLayoutEngine::new();
    let font = ResolvedFont::library_default(100.0);
    let glyph = estimate_glyph_width(&mut engine, &font);
    assert!(glyph.is_finite() && glyph > 0.0);
    let text = "Track your daily habits easily";
    assert_eq!(
        wrap(text, 800.0, &font, &mut engine),
        wrap_chars(text, chars_per_line(800.0, glyph))
    );
}

#[test]
fn unmeasurable_font_uses_fallback_glyph_width() {
    let mut engine = TextLayoutEngine::new();
    let font = ResolvedFont::library_default(0.0);
    assert_eq!(estimate_glyph_width(&mut engine, &font), FALLBACK_GLYPH_WIDTH_PX);
    // 100px budget at 20px/glyph is 5 chars.
    assert_eq!(
        wrap("aaa bbb ccc", 100.0, &font, &mut engine),
        ["aaa", "bbb", "ccc"]
    );
}

#[test]
fn chars_per_line_floors_and_clamps() {
    assert_eq!(chars_per_line(1000.0, 100.0), 10);
    assert_eq!(chars_per_line(1099.0, 100.0), 10);
    assert_eq!(chars_per_line(50.0, 100.0), 1);
    assert_eq!(chars_per_line(-200.0, 100.0), 1);
    assert_eq!(chars_per_line(100.0, 0.0), 5);
    assert_eq!(chars_per_line(100.0, f32::NAN), 5);
}

#[test]
fn greedy_wrap_matches_expected_breaks() {
    assert_eq!(
        wrap_chars("Track your daily habits easily", 12),
        ["Track your", "daily habits", "easily"]
    );
    assert_eq!(wrap_chars("a  b\tc\n d", 80), ["a b c d"]);
}

#[test]
fn long_words_break_mid_word() {
    assert_eq!(wrap_chars("abcdefghij", 4), ["abcd", "efgh", "ij"]);
    assert_eq!(wrap_chars("ab cdefghijk", 5), ["ab cd", "efghi", "jk"]);
}

#[test]
fn cjk_counts_scalar_values() {
    assert_eq!(
        wrap_chars("하루 기록을 쉽게 남기세요", 6),
        ["하루 기록을", "쉽게", "남기세요"]
    );
}

#[test]
fn hyphenated_words_break_after_the_hyphen() {
    assert_eq!(
        wrap_chars("Offline-first notes", 10),
        ["Offline-", "first", "notes"]
    );
    assert_eq!(wrap_chars("Offline-first notes", 30), ["Offline-first notes"]);
    assert_eq!(wrap_chars("a well-known app", 7), ["a well-", "known", "app"]);
}

#[test]
fn hyphens_without_letters_on_both_sides_do_not_split() {
    assert_eq!(hyphen_pieces("state-of-the-art"), ["state-", "of-", "the-", "art"]);
    assert_eq!(hyphen_pieces("-flag"), ["-flag"]);
    assert_eq!(hyphen_pieces("2024-10"), ["2024-10"]);
    assert_eq!(hyphen_pieces("a--b"), ["a--b"]);
    assert_eq!(wrap_chars("2024-10-19 done", 8), ["2024-10-", "19 done"]);
}

proptest! {
    #[test]
    fn lines_never_exceed_budget(text in "[a-z ]{0,80}", width in 1usize..30) {
        for line in wrap_chars(&text, width) {
            prop_assert!(line.chars().count() <= width);
            prop_assert!(!line.is_empty());
        }
    }

    #[test]
    fn wrapping_preserves_non_space_content(text in "[a-zA-Z0-9 ]{0,80}", width in 1usize..30) {
        let joined: String = wrap_chars(&text, width).concat().chars().filter(|c| *c != ' ').collect();
        let original: String = text.chars().filter(|c| *c != ' ').collect();
        prop_assert_eq!(joined, original);
    }
}
