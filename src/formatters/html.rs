//! HTML with inline `<span>` styles.

use std::any::Any;

use crate::string::{
    Color12, Context, FormatFlags, FormattedString, Formatter, Unicode,
};

/// Open spans, closed in reverse order on clear and at end of string.
#[derive(Debug, Default)]
struct SpanContext {
    open: usize,
}

impl SpanContext {
    fn close_spans(&mut self) -> String {
        let closing = "</span>".repeat(self.open);
        self.open = 0;
        closing
    }
}

/// Escape the characters HTML gives meaning to.
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}

/// Reverse of [`escape`]; unknown entities are kept verbatim.
pub fn unescape(text: &str) -> String {
    const ENTITIES: [(&str, char); 6] = [
        ("&amp;", '&'),
        ("&lt;", '<'),
        ("&gt;", '>'),
        ("&quot;", '"'),
        ("&#39;", '\''),
        ("&apos;", '\''),
    ];

    let mut result = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(pos) = rest.find('&') {
        result.push_str(&rest[..pos]);
        rest = &rest[pos..];
        match ENTITIES.iter().find(|(entity, _)| rest.starts_with(entity)) {
            Some((entity, c)) => {
                result.push(*c);
                rest = &rest[entity.len()..];
            }
            None => {
                result.push('&');
                rest = &rest[1..];
            }
        }
    }
    result.push_str(rest);
    result
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlFormatter;

impl Formatter for HtmlFormatter {
    fn name(&self) -> &str {
        "html"
    }

    fn context(&self) -> Box<dyn Any + Send> {
        Box::new(SpanContext::default())
    }

    fn string_end(&self, ctx: &mut Context<'_>) -> String {
        ctx.scratch::<SpanContext>()
            .map(SpanContext::close_spans)
            .unwrap_or_default()
    }

    fn ascii(&self, text: &str, _ctx: &mut Context<'_>) -> String {
        escape(text)
    }

    fn unicode(&self, c: &Unicode, _ctx: &mut Context<'_>) -> String {
        c.utf8().to_string()
    }

    fn color(&self, color: Color12, ctx: &mut Context<'_>) -> String {
        if let Some(spans) = ctx.scratch::<SpanContext>() {
            spans.open += 1;
        }
        let value = if color.is_valid() {
            color.to_html()
        } else {
            "inherit".to_string()
        };
        format!("<span style='color:{}'>", value)
    }

    fn format_flags(&self, flags: FormatFlags, ctx: &mut Context<'_>) -> String {
        if let Some(spans) = ctx.scratch::<SpanContext>() {
            spans.open += 1;
        }
        let pick = |flag: FormatFlags, on: &'static str, off: &'static str| {
            if flags.contains(flag) {
                on
            } else {
                off
            }
        };
        format!(
            "<span style='font-weight:{};text-decoration:{};font-style:{};'>",
            pick(FormatFlags::BOLD, "bold", "normal"),
            pick(FormatFlags::UNDERLINE, "underline", "none"),
            pick(FormatFlags::ITALIC, "italic", "normal"),
        )
    }

    fn clear(&self, ctx: &mut Context<'_>) -> String {
        ctx.scratch::<SpanContext>()
            .map(SpanContext::close_spans)
            .unwrap_or_default()
    }

    /// Text content only: tags are skipped and entities unescaped.
    fn decode(&self, source: &str) -> FormattedString {
        let mut text = String::with_capacity(source.len());
        let mut in_tag = false;
        for c in source.chars() {
            match (in_tag, c) {
                (false, '<') => in_tag = true,
                (false, c) => text.push(c),
                (true, '>') => in_tag = false,
                (true, _) => {}
            }
        }
        FormattedString::from(unescape(&text))
    }
}
