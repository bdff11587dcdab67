//! Decodes text into a rainbow: every character gets its own hue.

use crate::string::encoding::split_utf8;
use crate::string::{
    Color12, Context, Element, FormatFlags, FormattedString, Formatter, Unicode,
};

#[derive(Debug, Clone, Copy)]
pub struct RainbowFormatter {
    /// Starting hue in `[0, 1]`.
    pub hue: f64,
    pub saturation: f64,
    pub value: f64,
}

impl Default for RainbowFormatter {
    fn default() -> Self {
        Self {
            hue: 0.0,
            saturation: 1.0,
            value: 1.0,
        }
    }
}

impl Formatter for RainbowFormatter {
    fn name(&self) -> &str {
        "rainbow"
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
        let count = source.chars().count();
        let mut output = FormattedString::with_capacity(count * 2);

        for (i, element) in split_utf8(source)
            .into_iter()
            .flat_map(|element| match element {
                Element::Ascii(run) => run.chars().map(Element::from).collect::<Vec<_>>(),
                other => vec![other],
            })
            .enumerate()
        {
            let offset = i as f64 / count as f64;
            output.push(Color12::hsv(self.hue + offset, self.saturation, self.value));
            output.push(element);
        }

        output
    }
}
