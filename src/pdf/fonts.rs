//! Standard Type1 fonts, WinAnsi text encoding and Helvetica metrics

use lopdf::{Dictionary, Document, Object, ObjectId};

use crate::layout::Font;

/// Add a standard (non-embedded) Type1 font with WinAnsiEncoding
pub fn add_standard_font(doc: &mut Document, font: Font) -> ObjectId {
    let mut dict = Dictionary::new();
    dict.set("Type", Object::Name(b"Font".to_vec()));
    dict.set("Subtype", Object::Name(b"Type1".to_vec()));
    dict.set("BaseFont", Object::Name(font.base_font().as_bytes().to_vec()));
    dict.set("Encoding", Object::Name(b"WinAnsiEncoding".to_vec()));

    doc.add_object(Object::Dictionary(dict))
}

/// Encode text as WinAnsi (Windows-1252) bytes
///
/// Latin-1 characters map to themselves; the 0x80..0x9F block holds the euro
/// sign, typographic quotes and dashes. Anything else becomes `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '\u{20}'..='\u{7E}' | '\u{A0}'..='\u{FF}' => c as u8,
            '€' => 0x80,
            '‚' => 0x82,
            '„' => 0x84,
            '…' => 0x85,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            '\t' => b' ',
            _ => b'?',
        })
        .collect()
}

/// Width of a WinAnsi code in Helvetica, in 1/1000 em
///
/// Helvetica-Oblique shares these metrics. Bold differs slightly but is only
/// ever left-aligned, so it is never measured.
fn helvetica_width(code: u8) -> u16 {
    match code {
        b' ' | b'!' | b',' | b'.' | b'/' | b':' | b';' | b'I' | b'[' | b'\\' | b']' | b'f' | b't' => 278,
        b'"' => 355,
        b'#' | b'$' | b'0'..=b'9' | b'?' | b'_' => 556,
        b'%' => 889,
        b'&' | b'A' | b'B' | b'E' | b'K' | b'P' | b'S' | b'V' | b'X' | b'Y' => 667,
        b'\'' => 191,
        b'(' | b')' | b'-' | b'`' | b'r' => 333,
        b'*' => 389,
        b'+' | b'<' | b'=' | b'>' | b'~' => 584,
        b'@' => 1015,
        b'C' | b'D' | b'H' | b'N' | b'R' | b'U' => 722,
        b'F' | b'T' | b'Z' => 611,
        b'G' | b'O' | b'Q' => 778,
        b'J' | b'c' | b'k' | b's' | b'v' | b'x' | b'y' | b'z' => 500,
        b'L' => 556,
        b'M' | b'm' => 833,
        b'W' => 944,
        b'^' => 469,
        b'a' | b'b' | b'd' | b'e' | b'g' | b'h' | b'n' | b'o' | b'p' | b'q' | b'u' => 556,
        b'i' | b'j' | b'l' => 222,
        b'w' => 722,
        b'{' | b'}' => 334,
        b'|' => 260,
        0x80 => 556,                    // euro
        0x84 | 0x93 | 0x94 => 333,      // double quotes
        0x82 | 0x91 | 0x92 => 222,      // single quotes
        0x85 | 0x97 => 1000,            // ellipsis, em dash
        0x95 => 350,                    // bullet
        0x96 => 556,                    // en dash
        0xC4 | 0xC9 => 667,             // Ä É
        0xD6 => 778,                    // Ö
        0xDC => 722,                    // Ü
        0xDF => 611,                    // ß
        _ => 556,
    }
}

/// Estimate the rendered width of `text` in points
pub fn text_width(text: &str, font: Font, font_size: f32) -> f32 {
    let units: u32 = encode_win_ansi(text)
        .into_iter()
        .map(|code| match font {
            Font::HelveticaBold => helvetica_width(code) as u32 * 105 / 100,
            Font::Helvetica | Font::HelveticaOblique => helvetica_width(code) as u32,
        })
        .sum();

    units as f32 * font_size / 1000.0
}
