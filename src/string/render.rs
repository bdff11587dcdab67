//! Evaluation and encoding.
//!
//! Encoding first resolves the template nodes (placeholders, filter and
//! method calls, conditionals, loops and padding) into plain elements,
//! then hands each of those to the formatter.

use crate::formatters::Utf8Formatter;

use super::element::{format_number, Conditional, Element, Loop, Padding};
use super::filters::FilterRegistry;
use super::formatted::FormattedString;
use super::formatter::{Context, Formatter};

impl FormattedString {
    /// Encode with a fresh context.
    pub fn encode(&self, formatter: &dyn Formatter, filters: &FilterRegistry) -> String {
        let mut ctx = Context::new(formatter, filters);
        self.encode_in(&mut ctx)
    }

    /// Encode within an existing context.
    pub fn encode_in(&self, ctx: &mut Context<'_>) -> String {
        let formatter = ctx.formatter();
        let mut output = formatter.string_begin(ctx);
        for element in self.resolved(ctx).iter() {
            output.push_str(&encode_leaf(element, ctx));
        }
        output.push_str(&formatter.string_end(ctx));
        output
    }

    /// Text content without styling.
    ///
    /// Filter calls that are still unevaluated pass their first argument
    /// through.
    pub fn to_plain(&self) -> String {
        self.encode(&Utf8Formatter, &FilterRegistry::new())
    }

    /// Copy containing only elements a formatter can encode directly.
    pub fn resolved(&self, ctx: &mut Context<'_>) -> FormattedString {
        let mut result = FormattedString::with_capacity(self.len());
        for element in self.iter() {
            resolve_element(element, ctx, &mut result);
        }
        result
    }

    /// Number of visible characters.
    pub fn char_count(&self) -> usize {
        self.iter()
            .map(|element| match element {
                Element::Ascii(text) => text.len(),
                Element::Unicode(_) | Element::QFont(_) => 1,
                Element::Number(value) => format_number(*value).len(),
                _ => 0,
            })
            .sum()
    }
}

fn encode_leaf(element: &Element, ctx: &mut Context<'_>) -> String {
    let formatter = ctx.formatter();
    match element {
        Element::Ascii(text) => formatter.ascii(text, ctx),
        Element::Unicode(unicode) => formatter.unicode(unicode, ctx),
        Element::QFont(glyph) => formatter.qfont(glyph, ctx),
        Element::Color(color) => formatter.color(*color, ctx),
        Element::Format(flags) => formatter.format_flags(*flags, ctx),
        Element::ClearFormatting => formatter.clear(ctx),
        Element::Number(value) => formatter.number(*value, ctx),
        // resolve() never leaves these behind
        Element::Placeholder(_)
        | Element::FilterCall(_)
        | Element::MethodCall(_)
        | Element::Conditional(_)
        | Element::Loop(_)
        | Element::Padding(_) => String::new(),
    }
}

fn resolve_element(element: &Element, ctx: &mut Context<'_>, out: &mut FormattedString) {
    match element {
        Element::Placeholder(placeholder) => {
            let value = match ctx.lookup(placeholder.name()) {
                Some(bound) => bound.clone(),
                None => placeholder.replacement().clone(),
            };
            out.append(value.resolved(ctx));
        }
        Element::FilterCall(call) => {
            let arguments: Vec<FormattedString> =
                call.arguments.iter().map(|arg| arg.resolved(ctx)).collect();
            let result = ctx.filters().apply(&call.name, &arguments);
            out.append(result.resolved(ctx));
        }
        Element::MethodCall(call) => {
            if let Some(result) = call.result() {
                out.append(result.resolved(ctx));
            }
        }
        Element::Conditional(conditional) => resolve_conditional(conditional, ctx, out),
        Element::Loop(lp) => resolve_loop(lp, ctx, out),
        Element::Padding(padding) => resolve_padding(padding, ctx, out),
        leaf => {
            out.push(leaf.clone());
        }
    }
}

/// Digit-only text is true when nonzero, anything else when non-empty.
pub fn is_truthy(text: &str) -> bool {
    if !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit()) {
        text.bytes().any(|b| b != b'0')
    } else {
        !text.is_empty()
    }
}

fn resolve_conditional(conditional: &Conditional, ctx: &mut Context<'_>, out: &mut FormattedString) {
    let condition = {
        let mut scratch = ctx.isolated();
        conditional.condition.encode_in(&mut scratch)
    };

    let branch = if is_truthy(&condition) {
        &conditional.if_true
    } else {
        &conditional.if_false
    };
    out.append(branch.resolved(ctx));
}

fn resolve_loop(lp: &Loop, ctx: &mut Context<'_>, out: &mut FormattedString) {
    let source = lp.source.resolved(ctx);
    for item in source {
        ctx.push_scope(&lp.variable, FormattedString::from(item));
        let body = lp.body.resolved(ctx);
        ctx.pop_scope();
        out.append(body);
    }
}

fn resolve_padding(padding: &Padding, ctx: &mut Context<'_>, out: &mut FormattedString) {
    let inner = padding.inner.resolved(ctx);
    let width = padding.width.min(Padding::MAX_WIDTH);
    let Some(count) = width.checked_sub(inner.char_count()).filter(|&count| count > 0) else {
        out.append(inner);
        return;
    };

    let before = ((count as f64 * padding.align) as usize).min(count);
    let after = count - before;

    let fill = |n: usize| -> FormattedString {
        FormattedString::from(std::iter::repeat(padding.fill).take(n).collect::<String>())
    };

    out.append(fill(before));
    out.append(inner);
    out.append(fill(after));
}
