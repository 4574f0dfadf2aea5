//! Helvetica advance widths and greedy line wrapping.
//!
//! Widths are the standard base-14 AFM values in thousandths of an em, so
//! measurements match what a PDF viewer draws for the built-in font.

const ASCII_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // '0'..'9'
    278, 278, 584, 584, 584, 556, 1015, // ':'..'@'
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // 'A'..'M'
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // 'N'..'Z'
    278, 278, 278, 469, 556, 333, // '['..'`'
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // 'a'..'m'
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // 'n'..'z'
    334, 260, 334, 584, // '{'..'~'
];

const DEFAULT_WIDTH: u16 = 556;

fn char_width(c: char) -> u16 {
    match c {
        ' '..='~' => ASCII_WIDTHS[c as usize - 0x20],
        '\u{2018}' | '\u{2019}' => 222,
        '\u{201C}' | '\u{201D}' => 333,
        '\u{2013}' => 556,
        '\u{2014}' | '\u{2026}' => 1000,
        '\u{2022}' => 350,
        '\u{00A0}' => 278,
        _ => DEFAULT_WIDTH,
    }
}

/// Width of `text` in points when set in Helvetica at `font_size`.
pub fn text_width(text: &str, font_size: f32) -> f32 {
    let units: u32 = text.chars().map(|c| u32::from(char_width(c))).sum();
    units as f32 * font_size / 1000.0
}

/// Splits `text` into lines no wider than `max_width`.
///
/// Explicit newlines are kept as line breaks. A word wider than the column is
/// broken between characters; every returned line holds at least one
/// character so narrow columns still make progress.
pub fn wrap_text(text: &str, max_width: f32, font_size: f32) -> Vec<String> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    let mut lines = Vec::new();
    for source_line in text.trim().lines() {
        let mut current = String::new();
        for word in source_line.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{current} {word}")
            };

            if text_width(&candidate, font_size) <= max_width {
                current = candidate;
                continue;
            }

            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }

            if text_width(word, font_size) <= max_width {
                current = word.to_string();
            } else {
                let mut pieces = break_word(word, max_width, font_size);
                if let Some(last) = pieces.pop() {
                    lines.extend(pieces);
                    current = last;
                }
            }
        }
        lines.push(current);
    }
    lines
}

fn break_word(word: &str, max_width: f32, font_size: f32) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut current = String::new();
    for c in word.chars() {
        current.push(c);
        if current.chars().count() > 1 && text_width(&current, font_size) > max_width {
            current.pop();
            pieces.push(std::mem::take(&mut current));
            current.push(c);
        }
    }
    if !current.is_empty() {
        pieces.push(current);
    }
    pieces
}
