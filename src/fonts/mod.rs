//! Built-in font family and text metrics for the invoice_fixture crate.
//!
//! Documents use the PDF standard Helvetica family so no font files have to be shipped or found
//! at runtime. Layout needs advance widths for alignment and wrapping; those come from the Adobe
//! core font metrics below, expressed in 1/1000 em.

use std::borrow::Cow;

use genpdf::style::Style;
use genpdf::Mm;
use log::warn;
use printpdf::BuiltinFont;

use crate::layout::mm_from_f64;

/// Name of the font family used for every document.
pub const DEFAULT_FONT_FAMILY_NAME: &str = "Helvetica";

/// Character substituted for text the built-in fonts cannot encode.
pub const REPLACEMENT_CHAR: char = '?';

const MM_PER_POINT: f64 = 25.4 / 72.0;
const FALLBACK_WIDTH: u16 = 556;

/// Helvetica advance widths for U+0020..=U+007E.
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // 0..?
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // @..O
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // P.._
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // `..o
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // p..~
];

/// Helvetica-Bold advance widths for U+0020..=U+007E.
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // ' '../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611, // 0..?
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778, // @..O
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556, // P.._
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611, // `..o
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584, // p..~
];

fn char_width(ch: char, bold: bool) -> u16 {
    let table = if bold {
        &HELVETICA_BOLD_WIDTHS
    } else {
        &HELVETICA_WIDTHS
    };
    match ch {
        ' '..='~' => table[ch as usize - 0x20],
        _ => FALLBACK_WIDTH,
    }
}

/// Maps a text style to the matching built-in PDF font.
///
/// Oblique variants share the upright advance widths.
pub fn builtin_font(style: &Style) -> BuiltinFont {
    match (style.is_bold(), style.is_italic()) {
        (false, false) => BuiltinFont::Helvetica,
        (true, false) => BuiltinFont::HelveticaBold,
        (false, true) => BuiltinFont::HelveticaOblique,
        (true, true) => BuiltinFont::HelveticaBoldOblique,
    }
}

/// Converts a font size in points to millimetres.
pub fn font_size_mm(style: &Style) -> f64 {
    f64::from(style.font_size()) * MM_PER_POINT
}

/// Width of `text` in millimetres when set in `style`.
pub fn text_width(text: &str, style: &Style) -> Mm {
    let units: u32 = text
        .chars()
        .map(|ch| u32::from(char_width(ch, style.is_bold())))
        .sum();
    mm_from_f64(f64::from(units) / 1000.0 * font_size_mm(style))
}

/// Returns `text` restricted to characters the built-in fonts can encode.
///
/// Anything outside printable ASCII is replaced by [`REPLACEMENT_CHAR`] and reported once per call.
pub fn encodable_text(text: &str) -> Cow<'_, str> {
    if text.chars().all(|ch| matches!(ch, ' '..='~')) {
        return Cow::Borrowed(text);
    }

    warn!(
        "Replacing characters outside the {} character set in {:?}",
        DEFAULT_FONT_FAMILY_NAME, text
    );
    Cow::Owned(
        text.chars()
            .map(|ch| match ch {
                ' '..='~' => ch,
                '\t' | '\n' | '\r' => ' ',
                _ => REPLACEMENT_CHAR,
            })
            .collect(),
    )
}
