//! Telegram flavoured Markdown: `*bold*` and `_italic_`.

use std::any::Any;

use crate::string::{
    Color12, Context, FormatFlags, FormattedString, Formatter, Unicode,
};

/// Which markers are currently open.
#[derive(Debug, Default)]
struct TagContext {
    bold: bool,
    italic: bool,
}

impl TagContext {
    fn set_bold(&mut self, on: bool) -> &'static str {
        if self.bold == on {
            return "";
        }
        self.bold = on;
        "*"
    }

    fn set_italic(&mut self, on: bool) -> &'static str {
        if self.italic == on {
            return "";
        }
        self.italic = on;
        "_"
    }

    fn close_all(&mut self) -> String {
        let mut closing = String::new();
        closing.push_str(self.set_italic(false));
        closing.push_str(self.set_bold(false));
        closing
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownFormatter;

impl Formatter for MarkdownFormatter {
    fn name(&self) -> &str {
        "telegram-md"
    }

    fn context(&self) -> Box<dyn Any + Send> {
        Box::new(TagContext::default())
    }

    fn string_end(&self, ctx: &mut Context<'_>) -> String {
        ctx.scratch::<TagContext>()
            .map(TagContext::close_all)
            .unwrap_or_default()
    }

    fn ascii(&self, text: &str, _ctx: &mut Context<'_>) -> String {
        text.replace('*', "\\*").replace('_', "\\_")
    }

    fn unicode(&self, c: &Unicode, _ctx: &mut Context<'_>) -> String {
        c.utf8().to_string()
    }

    fn color(&self, _color: Color12, _ctx: &mut Context<'_>) -> String {
        String::new()
    }

    fn format_flags(&self, flags: FormatFlags, ctx: &mut Context<'_>) -> String {
        let Some(tags) = ctx.scratch::<TagContext>() else {
            return String::new();
        };
        let mut markers = String::new();
        markers.push_str(tags.set_bold(flags.contains(FormatFlags::BOLD)));
        markers.push_str(tags.set_italic(flags.contains(FormatFlags::ITALIC)));
        markers
    }

    fn clear(&self, ctx: &mut Context<'_>) -> String {
        ctx.scratch::<TagContext>()
            .map(TagContext::close_all)
            .unwrap_or_default()
    }

    fn decode(&self, source: &str) -> FormattedString {
        let mut output = FormattedString::new();
        let mut flags = FormatFlags::empty();
        let mut text = String::new();
        let mut chars = source.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '\\' if matches!(chars.peek(), Some('*') | Some('_')) => {
                    if let Some(escaped) = chars.next() {
                        text.push(escaped);
                    }
                }
                '*' | '_' => {
                    output.push_str(&text);
                    text.clear();
                    flags ^= if c == '*' {
                        FormatFlags::BOLD
                    } else {
                        FormatFlags::ITALIC
                    };
                    output.push(flags);
                }
                c => text.push(c),
            }
        }

        output.push_str(&text);
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::string::{Element, FilterRegistry};

    fn encode(string: &FormattedString) -> String {
        string.encode(&MarkdownFormatter, &FilterRegistry::new())
    }

    #[test]
    fn test_encode() {
        let mut string = FormattedString::new();
        string
            .push(FormatFlags::BOLD)
            .push("bold")
            .push(FormatFlags::BOLD | FormatFlags::ITALIC)
            .push("both")
            .push(Element::ClearFormatting)
            .push(" snake_case 2*3")
            .push(FormatFlags::ITALIC)
            .push("open");
        assert_eq!(
            encode(&string),
            "*bold_both_* snake\\_case 2\\*3_open_"
        );
    }

    #[test]
    fn test_underline_is_dropped() {
        let mut string = FormattedString::new();
        string.push(FormatFlags::UNDERLINE).push("u").push(Color12::RED);
        assert_eq!(encode(&string), "u");
    }

    #[test]
    fn test_decode() {
        let decoded = MarkdownFormatter.decode("*bold* and _it\\_alic_");
        assert_eq!(*decoded[0].as_format().unwrap(), FormatFlags::BOLD);
        assert_eq!(decoded[1].as_ascii().unwrap(), "bold");
        assert!(decoded[2].as_format().unwrap().is_empty());
        assert_eq!(decoded[3].as_ascii().unwrap(), " and ");
        assert_eq!(*decoded[4].as_format().unwrap(), FormatFlags::ITALIC);
        assert_eq!(decoded[5].as_ascii().unwrap(), "it_alic");
        assert_eq!(decoded.len(), 7);
    }

    #[test]
    fn test_round_trip_is_stable() {
        let decoded = MarkdownFormatter.decode("*a _b* c_ d\\*e è");
        assert_eq!(MarkdownFormatter.decode(&encode(&decoded)), decoded);
    }
}
