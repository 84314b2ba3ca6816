use crate::{fonts::face::ResolvedFont, text::engine::TextLayoutEngine};

/// Representative glyph whose advance stands in for the average glyph width.
pub const REFERENCE_GLYPH: &str = "\u{AC00}";
/// Glyph width used when the font cannot be measured.
pub const FALLBACK_GLYPH_WIDTH_PX: f32 = 20.0;

/// Estimated per-glyph width for `font` (reference glyph advance, else 20px).
pub fn estimate_glyph_width(engine: &mut TextLayoutEngine, font: &ResolvedFont) -> f32 {
    engine
        .measure_width(REFERENCE_GLYPH, font)
        .filter(|w| w.is_finite() && *w > 0.0)
        .unwrap_or(FALLBACK_GLYPH_WIDTH_PX)
}

/// `max(1, floor(max_width / glyph_width))`.
pub fn chars_per_line(max_width_px: f32, glyph_width_px: f32) -> usize {
    let glyph = if glyph_width_px.is_finite() && glyph_width_px > 0.0 {
        glyph_width_px
    } else {
        FALLBACK_GLYPH_WIDTH_PX
    };
    let raw = (max_width_px / glyph).floor();
    if raw.is_finite() && raw >= 1.0 {
        raw as usize
    } else {
        1
    }
}

/// Wrap `text` to fit `max_width_px` using the font-derived glyph estimate.
pub fn wrap(
    text: &str,
    max_width_px: f32,
    font: &ResolvedFont,
    engine: &mut TextLayoutEngine,
) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }
    let glyph = estimate_glyph_width(engine, font);
    wrap_chars(text, chars_per_line(max_width_px, glyph))
}

/// Greedy word wrap to a character budget.
///
/// Whitespace runs collapse to single spaces between words. A word may also
/// break after a hyphen that sits between two letters, keeping the hyphen on
/// the first line. A piece longer than the budget first fills the remainder of
/// the current line, then continues on fresh lines.
pub fn wrap_chars(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut cur = String::new();
    let mut cur_len = 0usize;

    for word in text.split_whitespace() {
        for (idx, piece) in hyphen_pieces(word).into_iter().enumerate() {
            let glued = idx > 0;
            let mut chars: Vec<char> = piece.chars().collect();
            loop {
                let sep = usize::from(cur_len > 0 && !glued);
                if cur_len + sep + chars.len() <= width {
                    if sep == 1 {
                        cur.push(' ');
                    }
                    cur.extend(chars.iter());
                    cur_len += sep + chars.len();
                    break;
                }
                if chars.len() <= width {
                    lines.push(std::mem::take(&mut cur));
                    cur_len = 0;
                    continue;
                }

                let room = width.saturating_sub(cur_len + sep);
                if room == 0 {
                    lines.push(std::mem::take(&mut cur));
                    cur_len = 0;
                    continue;
                }
                if sep == 1 {
                    cur.push(' ');
                }
                let rest = chars.split_off(room);
                cur.extend(chars.iter());
                lines.push(std::mem::take(&mut cur));
                cur_len = 0;
                chars = rest;
            }
        }
    }
    if cur_len > 0 {
        lines.push(cur);
    }
    lines
}

/// Split `word` after every hyphen that has a letter on both sides.
fn hyphen_pieces(word: &str) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut start = 0;
    let mut prev: Option<char> = None;
    let mut iter = word.char_indices().peekable();
    while let Some((pos, ch)) = iter.next() {
        let next = iter.peek().map(|&(_, c)| c);
        if ch == '-'
            && prev.is_some_and(char::is_alphabetic)
            && next.is_some_and(char::is_alphabetic)
        {
            let end = pos + ch.len_utf8();
            pieces.push(&word[start..end]);
            start = end;
        }
        prev = Some(ch);
    }
    pieces.push(&word[start..]);
    pieces
}

#[cfg(test)]
#[path = "../../tests/unit/layout/wrap.rs"]
mod tests;
