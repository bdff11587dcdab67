//! IRC control codes.
//!
//! See <https://modern.ircdocs.horse/formatting.html>. Only the foreground
//! color is kept; background colors, reverse, monospace and strikethrough
//! are dropped on decode.

use std::any::Any;

use crate::string::{
    Color12, Context, Element, FormatFlags, FormattedString, Formatter, Unicode,
};

const BOLD: u8 = 0x02;
const COLOR: u8 = 0x03;
const RESET: u8 = 0x0f;
const REVERSE: u8 = 0x16;
const MONOSPACE: u8 = 0x11;
const ITALIC: u8 = 0x1d;
const STRIKETHROUGH: u8 = 0x1e;
const UNDERLINE: u8 = 0x1f;

/// IRC color number for each palette index.
const PALETTE_TO_IRC: [u8; 16] = [1, 5, 3, 7, 2, 6, 10, 15, 14, 4, 9, 8, 12, 13, 11, 0];

/// Colors for IRC numbers 0 through 15.
const IRC_COLORS: [Color12; 16] = [
    Color12::WHITE,
    Color12::BLACK,
    Color12::DARK_BLUE,
    Color12::DARK_GREEN,
    Color12::RED,
    Color12::DARK_RED,
    Color12::DARK_MAGENTA,
    Color12::DARK_YELLOW,
    Color12::YELLOW,
    Color12::GREEN,
    Color12::DARK_CYAN,
    Color12::CYAN,
    Color12::BLUE,
    Color12::MAGENTA,
    Color12::GRAY,
    Color12::SILVER,
];

/// Style currently active on the line, flags are sent as toggles.
#[derive(Debug, Default)]
struct IrcState {
    flags: FormatFlags,
    /// The last thing written was a color code.
    after_color: bool,
}

impl IrcState {
    fn wrote(ctx: &mut Context<'_>, after_color: bool) {
        if let Some(state) = ctx.scratch::<IrcState>() {
            state.after_color = after_color;
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct IrcFormatter;

impl IrcFormatter {
    /// Color for an IRC color number; anything out of range is "no color".
    pub fn color_from_number(number: u32) -> Color12 {
        IRC_COLORS
            .get(number as usize)
            .copied()
            .unwrap_or(Color12::NOCOLOR)
    }

    fn toggle(output: &mut FormattedString, flags: &mut FormatFlags, pending: &mut Option<FormatFlags>, bit: FormatFlags) {
        // consecutive toggles collapse into a single Format element
        let base = match (output.last(), *pending) {
            (Some(Element::Format(_)), Some(base)) => {
                output.remove(output.len() - 1);
                base
            }
            _ => *flags,
        };

        *flags ^= bit;
        if *flags != base {
            output.push(*flags);
            *pending = Some(base);
        } else {
            *pending = None;
        }
    }
}

impl Formatter for IrcFormatter {
    fn name(&self) -> &str {
        "irc"
    }

    fn context(&self) -> Box<dyn Any + Send> {
        Box::new(IrcState::default())
    }

    fn ascii(&self, text: &str, ctx: &mut Context<'_>) -> String {
        if text.is_empty() {
            return String::new();
        }
        let after_color = ctx.scratch::<IrcState>().map_or(false, |state| state.after_color);
        IrcState::wrote(ctx, false);

        // ",N" right after a color code would be read as a background
        let mut chars = text.chars();
        if after_color && chars.next() == Some(',') && chars.next().map_or(false, |c| c.is_ascii_digit()) {
            return format!("{}{}{}", BOLD as char, BOLD as char, text);
        }
        text.to_string()
    }

    fn unicode(&self, c: &Unicode, ctx: &mut Context<'_>) -> String {
        IrcState::wrote(ctx, false);
        c.utf8().to_string()
    }

    fn color(&self, color: Color12, ctx: &mut Context<'_>) -> String {
        IrcState::wrote(ctx, true);
        match color.to_palette_index() {
            Some(index) => format!("\x03{:02}", PALETTE_TO_IRC[usize::from(index)]),
            None => "\x0399".to_string(),
        }
    }

    fn format_flags(&self, flags: FormatFlags, ctx: &mut Context<'_>) -> String {
        let Some(state) = ctx.scratch::<IrcState>() else {
            return String::new();
        };

        let changed = state.flags ^ flags;
        state.flags = flags;

        let mut output = String::new();
        if changed.contains(FormatFlags::BOLD) {
            output.push(BOLD as char);
        }
        if changed.contains(FormatFlags::UNDERLINE) {
            output.push(UNDERLINE as char);
        }
        if changed.contains(FormatFlags::ITALIC) {
            output.push(ITALIC as char);
        }
        if !output.is_empty() {
            state.after_color = false;
        }
        output
    }

    fn clear(&self, ctx: &mut Context<'_>) -> String {
        if let Some(state) = ctx.scratch::<IrcState>() {
            state.flags = FormatFlags::empty();
            state.after_color = false;
        }
        (RESET as char).to_string()
    }

    fn decode(&self, source: &str) -> FormattedString {
        let mut output = FormattedString::new();
        let mut flags = FormatFlags::empty();
        let mut pending = None;

        let bytes = source.as_bytes();
        let mut run_start = 0;
        let mut i = 0;

        while i < bytes.len() {
            let byte = bytes[i];
            if !matches!(
                byte,
                BOLD | COLOR | RESET | REVERSE | MONOSPACE | ITALIC | STRIKETHROUGH | UNDERLINE
            ) {
                i += 1;
                continue;
            }

            output.push_str(&source[run_start..i]);
            i += 1;

            match byte {
                BOLD => Self::toggle(&mut output, &mut flags, &mut pending, FormatFlags::BOLD),
                UNDERLINE => {
                    Self::toggle(&mut output, &mut flags, &mut pending, FormatFlags::UNDERLINE)
                }
                ITALIC => Self::toggle(&mut output, &mut flags, &mut pending, FormatFlags::ITALIC),
                RESET => {
                    flags = FormatFlags::empty();
                    output.push(Element::ClearFormatting);
                }
                COLOR => {
                    let digits_start = i;
                    while i < bytes.len() && i - digits_start < 2 && bytes[i].is_ascii_digit() {
                        i += 1;
                    }
                    let number = source[digits_start..i].parse::<u32>().ok();

                    // ",bg" is only a background if digits follow the comma
                    if number.is_some()
                        && bytes.get(i) == Some(&b',')
                        && bytes.get(i + 1).map_or(false, u8::is_ascii_digit)
                    {
                        i += 2;
                        if bytes.get(i).map_or(false, u8::is_ascii_digit) {
                            i += 1;
                        }
                    }

                    output.push(number.map_or(Color12::NOCOLOR, Self::color_from_number));
                }
                _ => {}
            }

            run_start = i;
        }

        output.push_str(&source[run_start..]);
        output
    }
}
