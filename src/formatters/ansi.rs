//! ANSI terminal escape sequences (SGR).

use crate::string::encoding::to_ascii;
use crate::string::{
    Color12, Context, Element, FormatFlags, FormattedString, Formatter, Unicode,
};

const CSI: &str = "\x1b[";

/// Terminal output with 16 color SGR codes.
///
/// The ASCII variant transliterates non-ASCII characters; the black variant
/// renders black as silver for terminals with a dark background.
#[derive(Debug, Clone)]
pub struct AnsiFormatter {
    utf8: bool,
    black_as_silver: bool,
    name: String,
}

impl AnsiFormatter {
    pub fn new(utf8: bool) -> Self {
        Self {
            utf8,
            black_as_silver: false,
            name: if utf8 { "ansi-utf8" } else { "ansi-ascii" }.to_string(),
        }
    }

    /// Variant that never prints black text.
    pub fn black_as_silver(utf8: bool) -> Self {
        let mut formatter = Self::new(utf8);
        formatter.black_as_silver = true;
        formatter.name.push_str("-black");
        formatter
    }

    fn apply_codes(codes: &[u32], output: &mut FormattedString) {
        let mut flags = FormatFlags::empty();
        let mut use_flags = false;

        for &code in codes {
            match code {
                0 => {
                    output.push(Element::ClearFormatting);
                }
                1 => {
                    flags |= FormatFlags::BOLD;
                    use_flags = true;
                }
                22 => {
                    flags &= !FormatFlags::BOLD;
                    use_flags = true;
                }
                3 => {
                    flags |= FormatFlags::ITALIC;
                    use_flags = true;
                }
                23 => {
                    flags &= !FormatFlags::ITALIC;
                    use_flags = true;
                }
                4 => {
                    flags |= FormatFlags::UNDERLINE;
                    use_flags = true;
                }
                24 => {
                    flags &= !FormatFlags::UNDERLINE;
                    use_flags = true;
                }
                39 => {
                    output.push(Color12::NOCOLOR);
                }
                30..=37 => {
                    let mut index = (code - 30) as u8;
                    // bold + base color is how old terminals ask for bright
                    if flags == FormatFlags::BOLD {
                        index |= 8;
                        flags = FormatFlags::empty();
                        use_flags = false;
                    }
                    output.push(Color12::from_palette_index(index));
                }
                90..=97 => {
                    output.push(Color12::from_palette_index((code - 90) as u8 | 8));
                }
                _ => {}
            }
        }

        if use_flags {
            output.push(flags);
        }
    }
}

impl Formatter for AnsiFormatter {
    fn name(&self) -> &str {
        &self.name
    }

    fn ascii(&self, text: &str, _ctx: &mut Context<'_>) -> String {
        text.to_string()
    }

    fn unicode(&self, c: &Unicode, _ctx: &mut Context<'_>) -> String {
        if self.utf8 {
            c.utf8().to_string()
        } else {
            to_ascii(c.point())
        }
    }

    fn color(&self, color: Color12, _ctx: &mut Context<'_>) -> String {
        let Some(index) = color.to_palette_index() else {
            return format!("{}39m", CSI);
        };

        if index == 0 && self.black_as_silver {
            return format!("{}37m", CSI);
        }

        let bright = index & 8 != 0;
        format!("{}{}{}m", CSI, if bright { 9 } else { 3 }, index & 7)
    }

    fn format_flags(&self, flags: FormatFlags, _ctx: &mut Context<'_>) -> String {
        let bold = if flags.contains(FormatFlags::BOLD) { 1 } else { 22 };
        let underline = if flags.contains(FormatFlags::UNDERLINE) { 4 } else { 24 };
        let italic = if flags.contains(FormatFlags::ITALIC) { 3 } else { 23 };
        format!("{}{};{};{}m", CSI, bold, underline, italic)
    }

    fn clear(&self, _ctx: &mut Context<'_>) -> String {
        format!("{}0m", CSI)
    }

    fn decode(&self, source: &str) -> FormattedString {
        let mut output = FormattedString::new();
        let bytes = source.as_bytes();
        let mut run_start = 0;
        let mut i = 0;

        while i < bytes.len() {
            if bytes[i] != 0x1b || bytes.get(i + 1) != Some(&b'[') {
                i += 1;
                continue;
            }

            output.push_str(&source[run_start..i]);

            // parameters run up to the final byte (0x40..=0x7e)
            let params_start = i + 2;
            let mut end = params_start;
            while end < bytes.len() && !(0x40..=0x7e).contains(&bytes[end]) {
                end += 1;
            }

            if end < bytes.len() && bytes[end] == b'm' {
                // an empty parameter means 0, a malformed one is skipped
                let codes: Vec<u32> = source[params_start..end]
                    .split(';')
                    .map(str::trim)
                    .filter_map(|param| if param.is_empty() { Some(0) } else { param.parse().ok() })
                    .collect();
                Self::apply_codes(&codes, &mut output);
            }

            i = (end + 1).min(bytes.len());
            run_start = i;
        }

        output.push_str(&source[run_start..]);
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::string::FilterRegistry;

    fn encode(formatter: &AnsiFormatter, string: &FormattedString) -> String {
        string.encode(formatter, &FilterRegistry::new())
    }

    #[test]
    fn test_names() {
        assert_eq!(AnsiFormatter::new(true).name(), "ansi-utf8");
        assert_eq!(AnsiFormatter::new(false).name(), "ansi-ascii");
        assert_eq!(AnsiFormatter::black_as_silver(true).name(), "ansi-utf8-black");
        assert_eq!(AnsiFormatter::black_as_silver(false).name(), "ansi-ascii-black");
    }

    #[test]
    fn test_encode() {
        let ansi = AnsiFormatter::new(true);
        let mut string = FormattedString::new();
        string
            .push(Color12::RED)
            .push("a")
            .push(Color12::DARK_GREEN)
            .push(FormatFlags::BOLD | FormatFlags::UNDERLINE)
            .push("b")
            .push(Color12::NOCOLOR)
            .push(Element::ClearFormatting);
        assert_eq!(
            encode(&ansi, &string),
            "\x1b[91ma\x1b[32m\x1b[1;4;23mb\x1b[39m\x1b[0m"
        );
    }

    #[test]
    fn test_black_variant() {
        let string = FormattedString::from(Element::from(Color12::BLACK));
        assert_eq!(encode(&AnsiFormatter::new(true), &string), "\x1b[30m");
        assert_eq!(encode(&AnsiFormatter::black_as_silver(true), &string), "\x1b[37m");
    }

    #[test]
    fn test_ascii_variant() {
        let string = FormattedString::from("è");
        assert_eq!(encode(&AnsiFormatter::new(true), &string), "è");
        assert_eq!(encode(&AnsiFormatter::new(false), &string), "e");
    }

    #[test]
    fn test_decode() {
        let ansi = AnsiFormatter::new(true);
        let decoded = ansi.decode("a\x1b[0;1;4mb\x1b[31mc\x1b[92md\x1b[39m");
        assert_eq!(decoded.len(), 9);
        assert_eq!(decoded[0].as_ascii().unwrap(), "a");
        assert!(decoded[1].is_clear());
        assert_eq!(*decoded[2].as_format().unwrap(), FormatFlags::BOLD | FormatFlags::UNDERLINE);
        assert_eq!(*decoded[4].as_color().unwrap(), Color12::DARK_RED);
        assert_eq!(*decoded[6].as_color().unwrap(), Color12::GREEN);
        assert!(!decoded[8].as_color().unwrap().is_valid());
    }

    #[test]
    fn test_bold_makes_bright() {
        let ansi = AnsiFormatter::new(true);
        let decoded = ansi.decode("\x1b[1;34mHello\x1b[39m");
        assert_eq!(decoded.len(), 3);
        assert_eq!(*decoded[0].as_color().unwrap(), Color12::BLUE);
        assert_eq!(encode(&ansi, &decoded), "\x1b[94mHello\x1b[39m");
    }

    #[test]
    fn test_bold_with_other_flags_stays_bold() {
        let decoded = AnsiFormatter::new(true).decode("\x1b[1;4;34m");
        assert_eq!(*decoded[0].as_color().unwrap(), Color12::DARK_BLUE);
        assert_eq!(*decoded[1].as_format().unwrap(), FormatFlags::BOLD | FormatFlags::UNDERLINE);
    }

    #[test]
    fn test_decode_ignores_other_sequences() {
        let ansi = AnsiFormatter::new(true);
        let decoded = ansi.decode("a\x1b[2Kb\x1b[m");
        assert_eq!(decoded.len(), 2);
        assert_eq!(decoded[0].as_ascii().unwrap(), "ab");
        assert!(decoded[1].is_clear());
        assert_eq!(ansi.decode("\x1b[31").len(), 0);
    }

    #[test]
    fn test_decode_skips_malformed_parameters() {
        let ansi = AnsiFormatter::new(true);
        let decoded = ansi.decode("\x1b[4294967296mx");
        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded[0].as_ascii().unwrap(), "x");

        let decoded = ansi.decode("\x1b[zz;91mx\x1b[;mz");
        assert_eq!(*decoded[0].as_color().unwrap(), Color12::RED);
        assert_eq!(decoded[1].as_ascii().unwrap(), "x");
        assert!(decoded[2].is_clear());
    }

    #[test]
    fn test_round_trip_is_stable() {
        let ansi = AnsiFormatter::new(true);
        let decoded = ansi.decode("\x1b[91mred\x1b[1;24;3mè\x1b[0m");
        let encoded = encode(&ansi, &decoded);
        assert_eq!(ansi.decode(&encoded), decoded);
    }
}
