//! Caret color codes used by Darkplaces game servers.
//!
//! `^0`..`^9` select a fixed palette, `^xRGB` a direct color, and `^^` is a
//! literal caret. Code points U+E000..U+E0FF are glyphs of the game font.

use crate::string::{
    Color12, Context, FormatFlags, FormattedString, Formatter, QFont, Unicode,
};

/// Colors selected by `^0` through `^9`.
pub const DIGIT_PALETTE: [Color12; 10] = [
    Color12::BLACK,
    Color12::RED,
    Color12::GREEN,
    Color12::YELLOW,
    Color12::BLUE,
    Color12::CYAN,
    Color12::MAGENTA,
    Color12::WHITE,
    Color12::GRAY,
    Color12::SILVER,
];

/// Digit for a color that is exactly one of [`DIGIT_PALETTE`].
pub fn digit_for_color(color: Color12) -> Option<usize> {
    if !color.is_valid() {
        return None;
    }
    DIGIT_PALETTE.iter().position(|entry| *entry == color)
}

/// Color for a single palette digit.
pub fn color_for_digit(digit: char) -> Color12 {
    digit
        .to_digit(10)
        .and_then(|d| DIGIT_PALETTE.get(d as usize))
        .copied()
        .unwrap_or(Color12::NOCOLOR)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DarkplacesFormatter;

impl Formatter for DarkplacesFormatter {
    fn name(&self) -> &str {
        "dp"
    }

    fn ascii(&self, text: &str, _ctx: &mut Context<'_>) -> String {
        text.replace('^', "^^")
    }

    fn unicode(&self, c: &Unicode, _ctx: &mut Context<'_>) -> String {
        c.utf8().to_string()
    }

    fn qfont(&self, glyph: &QFont, _ctx: &mut Context<'_>) -> String {
        glyph.to_char().to_string()
    }

    fn color(&self, color: Color12, _ctx: &mut Context<'_>) -> String {
        if !color.is_valid() {
            return "^7".to_string();
        }
        match digit_for_color(color) {
            Some(digit) => format!("^{}", digit),
            None => format!("^x{}", color.to_hex()),
        }
    }

    fn format_flags(&self, _flags: FormatFlags, _ctx: &mut Context<'_>) -> String {
        String::new()
    }

    fn clear(&self, _ctx: &mut Context<'_>) -> String {
        "^7".to_string()
    }

    fn decode(&self, source: &str) -> FormattedString {
        let mut output = FormattedString::new();
        let mut run_start = 0;
        let mut chars = source.char_indices();

        while let Some((offset, c)) = chars.next() {
            if let Some(glyph) = QFont::from_char(c) {
                output.push_str(&source[run_start..offset]);
                output.push(glyph);
                run_start = offset + c.len_utf8();
                continue;
            }

            if c != '^' {
                continue;
            }

            let rest = &source[offset + 1..];
            let mut rest_chars = rest.chars();
            match rest_chars.next() {
                Some('^') => {
                    // keep the first caret as text, skip the second
                    output.push_str(&source[run_start..offset + 1]);
                    chars.next();
                    run_start = offset + 2;
                }
                Some(digit) if digit.is_ascii_digit() => {
                    output.push_str(&source[run_start..offset]);
                    output.push(color_for_digit(digit));
                    chars.next();
                    run_start = offset + 2;
                }
                Some('x') => {
                    let hex: String = rest_chars.take(3).take_while(|h| h.is_ascii_hexdigit()).collect();
                    if hex.len() == 3 {
                        output.push_str(&source[run_start..offset]);
                        output.push(Color12::from_hex(&hex));
                        for _ in 0..4 {
                            chars.next();
                        }
                        run_start = offset + 5;
                    }
                }
                _ => {}
            }
        }

        output.push_str(&source[run_start..]);
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::string::{Element, FilterRegistry};

    fn encode(string: &FormattedString) -> String {
        string.encode(&DarkplacesFormatter, &FilterRegistry::new())
    }

    #[test]
    fn test_decode() {
        let decoded = DarkplacesFormatter.decode("Hello ^1World ^^^2green^x00fblue^x00§\u{e012}");
        assert_eq!(decoded.len(), 9);
        assert_eq!(decoded[0].as_ascii().unwrap(), "Hello ");
        assert_eq!(*decoded[1].as_color().unwrap(), Color12::RED);
        assert_eq!(decoded[2].as_ascii().unwrap(), "World ^");
        assert_eq!(*decoded[3].as_color().unwrap(), Color12::GREEN);
        assert_eq!(decoded[4].as_ascii().unwrap(), "green");
        assert_eq!(*decoded[5].as_color().unwrap(), Color12::BLUE);
        assert_eq!(decoded[6].as_ascii().unwrap(), "blue^x00");
        assert_eq!(decoded[7].as_unicode().unwrap().point(), '§');
        assert_eq!(decoded[8].as_qfont().unwrap().index(), 0x12);
    }

    #[test]
    fn test_encode() {
        let decoded = DarkplacesFormatter.decode("Hello ^1World ^^^2green^x00fblue^x00§\u{e012}");
        assert_eq!(encode(&decoded), "Hello ^1World ^^^2green^4blue^^x00§\u{e012}");
    }

    #[test]
    fn test_encode_colors() {
        let mut string = FormattedString::new();
        string
            .push(Color12::rgb(0x1, 0x2, 0x3))
            .push(Color12::SILVER)
            .push(Color12::NOCOLOR)
            .push(FormatFlags::BOLD)
            .push(Element::ClearFormatting);
        assert_eq!(encode(&string), "^x123^9^7^7");
    }

    #[test]
    fn test_qfont_elsewhere_uses_fallback() {
        let decoded = DarkplacesFormatter.decode("\u{e012}");
        assert_eq!(decoded.to_plain(), ":)");
    }

    #[test]
    fn test_trailing_caret() {
        let decoded = DarkplacesFormatter.decode("a^");
        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded[0].as_ascii().unwrap(), "a^");
        assert_eq!(encode(&decoded), "a^^");
    }

    #[test]
    fn test_round_trip_is_stable() {
        let source = "^1red ^^ ^xf80orange^7\u{e001}";
        let decoded = DarkplacesFormatter.decode(source);
        assert_eq!(DarkplacesFormatter.decode(&encode(&decoded)), decoded);
    }
}
