//! Plain text formatters.

use crate::string::encoding::{split_utf8, to_ascii, transliterate};
use crate::string::{Color12, Context, FormatFlags, FormattedString, Formatter, Unicode};

/// UTF-8 text without styling.
#[derive(Debug, Clone, Copy, Default)]
pub struct Utf8Formatter;

impl Formatter for Utf8Formatter {
    fn name(&self) -> &str {
        "utf8"
    }

    fn ascii(&self, text: &str, _ctx: &mut Context<'_>) -> String {
        text.to_string()
    }

    fn unicode(&self, c: &Unicode, _ctx: &mut Context<'_>) -> String {
        c.utf8().to_string()
    }

    fn color(&self, _color: Color12, _ctx: &mut Context<'_>) -> String {
        String::new()
    }

    fn format_flags(&self, _flags: FormatFlags, _ctx: &mut Context<'_>) -> String {
        String::new()
    }

    fn clear(&self, _ctx: &mut Context<'_>) -> String {
        String::new()
    }

    fn decode(&self, source: &str) -> FormattedString {
        split_utf8(source).into_iter().collect()
    }
}

/// ASCII text without styling; non-ASCII characters are transliterated.
#[derive(Debug, Clone, Copy, Default)]
pub struct AsciiFormatter;

impl Formatter for AsciiFormatter {
    fn name(&self) -> &str {
        "ascii"
    }

    fn ascii(&self, text: &str, _ctx: &mut Context<'_>) -> String {
        text.to_string()
    }

    fn unicode(&self, c: &Unicode, _ctx: &mut Context<'_>) -> String {
        to_ascii(c.point())
    }

    fn color(&self, _color: Color12, _ctx: &mut Context<'_>) -> String {
        String::new()
    }

    fn format_flags(&self, _flags: FormatFlags, _ctx: &mut Context<'_>) -> String {
        String::new()
    }

    fn clear(&self, _ctx: &mut Context<'_>) -> String {
        String::new()
    }

    fn decode(&self, source: &str) -> FormattedString {
        let text = transliterate(source);
        let mut string = FormattedString::new();
        if !text.is_empty() {
            string.push(text);
        }
        string
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::string::{FilterRegistry, QFont};

    #[test]
    fn test_utf8_decode() {
        let decoded = Utf8Formatter.decode("foo bar è");
        assert_eq!(decoded.len(), 2);
        assert_eq!(decoded[0].as_ascii().unwrap(), "foo bar ");
        assert_eq!(decoded[1].as_unicode().unwrap().utf8(), "è");
    }

    #[test]
    fn test_utf8_encode() {
        let mut string = FormattedString::new();
        string
            .push("Hello ")
            .push(Color12::RED)
            .push(FormatFlags::BOLD)
            .push('è')
            .push(QFont::new(0x12))
            .push(crate::string::Element::ClearFormatting);
        assert_eq!(string.encode(&Utf8Formatter, &FilterRegistry::new()), "Hello è:)");
    }

    #[test]
    fn test_ascii_decode() {
        let decoded = AsciiFormatter.decode("foo barè");
        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded[0].as_ascii().unwrap(), "foo bare");
        assert!(AsciiFormatter.decode("").is_empty());
    }

    #[test]
    fn test_ascii_encode() {
        let string = Utf8Formatter.decode("caffè 😀");
        assert_eq!(string.encode(&AsciiFormatter, &FilterRegistry::new()), "caffe :grinning:");
    }

    #[test]
    fn test_round_trip_is_stable() {
        let source = "plain è text";
        let decoded = Utf8Formatter.decode(source);
        let encoded = decoded.encode(&Utf8Formatter, &FilterRegistry::new());
        assert_eq!(Utf8Formatter.decode(&encoded), decoded);
    }

    #[test]
    fn test_ascii_round_trip_is_stable() {
        for source in ["caffè 😀 $x", "plain", "ñandú: ÷ §"] {
            let decoded = AsciiFormatter.decode(source);
            let encoded = decoded.encode(&AsciiFormatter, &FilterRegistry::new());
            assert!(encoded.is_ascii(), "{:?}", encoded);
            assert_eq!(AsciiFormatter.decode(&encoded), decoded, "{:?}", source);
        }
    }
}
