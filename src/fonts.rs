//! Metrics for the standard Helvetica faces.
//!
//! Both the Word converter and the page-number stamper emit text in the
//! standard-14 Helvetica fonts, which every PDF viewer provides without
//! embedding. Widths come from the Adobe AFM files and are expressed in
//! thousandths of the font size.

use lopdf::{Dictionary, dictionary};

/// Descender depth of Helvetica as a fraction of the font size.
pub const HELVETICA_DESCENT: f32 = 0.207;

/// Width used for characters without a table entry.
const FALLBACK_WIDTH: u16 = 556;

/// WinAnsi characters in 0x80..=0x9F: character, byte, Helvetica width,
/// Helvetica-Bold width.
const WIN_ANSI_HIGH: [(char, u8, u16, u16); 27] = [
    ('\u{20AC}', 0x80, 556, 556),  // Euro
    ('\u{201A}', 0x82, 222, 278),  // quotesinglbase
    ('\u{0192}', 0x83, 556, 556),  // florin
    ('\u{201E}', 0x84, 333, 500),  // quotedblbase
    ('\u{2026}', 0x85, 1000, 1000), // ellipsis
    ('\u{2020}', 0x86, 556, 556),  // dagger
    ('\u{2021}', 0x87, 556, 556),  // daggerdbl
    ('\u{02C6}', 0x88, 333, 333),  // circumflex
    ('\u{2030}', 0x89, 1000, 1000), // perthousand
    ('\u{0160}', 0x8A, 667, 667),  // Scaron
    ('\u{2039}', 0x8B, 333, 333),  // guilsinglleft
    ('\u{0152}', 0x8C, 1000, 1000), // OE
    ('\u{017D}', 0x8E, 611, 611),  // Zcaron
    ('\u{2018}', 0x91, 222, 278),  // quoteleft
    ('\u{2019}', 0x92, 222, 278),  // quoteright
    ('\u{201C}', 0x93, 333, 500),  // quotedblleft
    ('\u{201D}', 0x94, 333, 500),  // quotedblright
    ('\u{2022}', 0x95, 350, 350),  // bullet
    ('\u{2013}', 0x96, 556, 556),  // endash
    ('\u{2014}', 0x97, 1000, 1000), // emdash
    ('\u{02DC}', 0x98, 333, 333),  // tilde
    ('\u{2122}', 0x99, 1000, 1000), // trademark
    ('\u{0161}', 0x9A, 500, 556),  // scaron
    ('\u{203A}', 0x9B, 333, 333),  // guilsinglright
    ('\u{0153}', 0x9C, 944, 944),  // oe
    ('\u{017E}', 0x9E, 500, 500),  // zcaron
    ('\u{0178}', 0x9F, 667, 667),  // Ydieresis
];

fn win_ansi_high(c: char) -> Option<&'static (char, u8, u16, u16)> {
    WIN_ANSI_HIGH.iter().find(|entry| entry.0 == c)
}

/// Advance widths for Helvetica, characters 0x20..=0x7E.
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // '0'..'?'
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // '@'..'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 'P'..'_'
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // '`'..'o'
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // 'p'..'~'
];

/// Advance widths for Helvetica-Bold, characters 0x20..=0x7E.
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611, // '0'..'?'
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778, // '@'..'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556, // 'P'..'_'
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611, // '`'..'o'
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584, // 'p'..'~'
];

/// One of the two Helvetica faces docmerge writes with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StandardFont {
    /// Helvetica.
    Regular,
    /// Helvetica-Bold.
    Bold,
}

impl StandardFont {
    /// PostScript name used as `BaseFont`.
    pub fn base_font(self) -> &'static str {
        match self {
            Self::Regular => "Helvetica",
            Self::Bold => "Helvetica-Bold",
        }
    }

    /// Resource name the converter uses for this face.
    pub fn resource_name(self) -> &'static str {
        match self {
            Self::Regular => "F1",
            Self::Bold => "F2",
        }
    }

    /// Width of `text` in points at `size`.
    pub fn text_width(self, text: &str, size: f32) -> f32 {
        let table = match self {
            Self::Regular => &HELVETICA_WIDTHS,
            Self::Bold => &HELVETICA_BOLD_WIDTHS,
        };

        let units: u32 = text
            .chars()
            .map(|c| match c {
                ' '..='~' => u32::from(table[c as usize - 0x20]),
                _ => match (win_ansi_high(c), self) {
                    (Some(&(_, _, regular, _)), Self::Regular) => u32::from(regular),
                    (Some(&(_, _, _, bold)), Self::Bold) => u32::from(bold),
                    (None, _) => u32::from(FALLBACK_WIDTH),
                },
            })
            .sum();

        units as f32 * size / 1000.0
    }

    /// Font dictionary for this face with WinAnsi encoding.
    pub fn dictionary(self) -> Dictionary {
        dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => self.base_font(),
            "Encoding" => "WinAnsiEncoding",
        }
    }
}

/// Encode text as WinAnsi bytes for a string literal.
///
/// Characters that have no single-byte representation become `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '\t' => b' ',
            c if (c as u32) < 0x20 => b' ',
            c if (c as u32) <= 0x7E => c as u8,
            c if (0xA0..=0xFF).contains(&(c as u32)) => c as u8,
            c => win_ansi_high(c).map_or(b'?', |entry| entry.1),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_label_width() {
        // "Page 1" = P(667) a(556) g(556) e(556) space(278) 1(556)
        let width = StandardFont::Regular.text_width("Page 1", 10.0);
        assert!((width - 31.69).abs() < 0.01);
    }

    #[test]
    fn test_bold_is_wider() {
        let regular = StandardFont::Regular.text_width("bold heading", 12.0);
        let bold = StandardFont::Bold.text_width("bold heading", 12.0);
        assert!(bold > regular);
    }

    #[test]
    fn test_encode_win_ansi() {
        assert_eq!(encode_win_ansi("abc"), b"abc".to_vec());
        assert_eq!(encode_win_ansi("caf\u{e9}"), vec![b'c', b'a', b'f', 0xE9]);
        assert_eq!(encode_win_ansi("\u{4e2d}"), b"?".to_vec());
        assert_eq!(encode_win_ansi("a\tb"), b"a b".to_vec());
    }

    #[test]
    fn test_encode_typographic_punctuation() {
        assert_eq!(
            encode_win_ansi("It\u{2019}s \u{201C}quoted\u{201D} \u{2013} 5\u{20AC}"),
            b"It\x92s \x93quoted\x94 \x96 5\x80".to_vec()
        );
        assert_eq!(encode_win_ansi("\u{2014}\u{2022}\u{2026}\u{2122}"), vec![0x97, 0x95, 0x85, 0x99]);
    }

    #[test]
    fn test_typographic_widths() {
        // quoteright is 222 in Helvetica, 278 in Helvetica-Bold
        let regular = StandardFont::Regular.text_width("\u{2019}", 10.0);
        let bold = StandardFont::Bold.text_width("\u{2019}", 10.0);
        assert!((regular - 2.22).abs() < 0.001);
        assert!((bold - 2.78).abs() < 0.001);

        let emdash = StandardFont::Regular.text_width("\u{2014}", 10.0);
        assert!((emdash - 10.0).abs() < 0.001);
    }

    #[test]
    fn test_font_dictionary() {
        let dict = StandardFont::Bold.dictionary();
        assert_eq!(
            dict.get(b"BaseFont").and_then(|o| o.as_name()).unwrap(),
            b"Helvetica-Bold"
        );
    }
}
