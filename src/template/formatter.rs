//! The `config` formatter: encodes to the template syntax and parses it back.

use crate::formatters::darkplaces::digit_for_color;
use crate::string::{Color12, Context, FormatFlags, FormattedString, Formatter, Unicode};

use super::parser::parse;

#[derive(Debug, Clone, Copy, Default)]
pub struct ConfigFormatter;

impl Formatter for ConfigFormatter {
    fn name(&self) -> &str {
        "config"
    }

    fn ascii(&self, text: &str, _ctx: &mut Context<'_>) -> String {
        text.replace('$', "$$")
    }

    fn unicode(&self, c: &Unicode, _ctx: &mut Context<'_>) -> String {
        c.utf8().to_string()
    }

    fn color(&self, color: Color12, _ctx: &mut Context<'_>) -> String {
        if !color.is_valid() {
            return "$(nocolor)".to_string();
        }
        match digit_for_color(color) {
            Some(digit) => format!("$({})", digit),
            None => format!("$(x{})", color.to_hex()),
        }
    }

    fn format_flags(&self, flags: FormatFlags, _ctx: &mut Context<'_>) -> String {
        let mut code = String::from("$(-");
        if flags.contains(FormatFlags::BOLD) {
            code.push('b');
        }
        if flags.contains(FormatFlags::UNDERLINE) {
            code.push('u');
        }
        if flags.contains(FormatFlags::ITALIC) {
            code.push('i');
        }
        if flags.is_empty() {
            // "normal", since a bare `$(-)` is a full clear
            code.push('n');
        }
        code.push(')');
        code
    }

    fn clear(&self, _ctx: &mut Context<'_>) -> String {
        "$(-)".to_string()
    }

    fn decode(&self, source: &str) -> FormattedString {
        parse(source)
    }
}
