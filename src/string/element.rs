//! String elements.
//!
//! An [`Element`] is one node of a [`FormattedString`]: a text run, a styling
//! change, or one of the template constructs produced by the config syntax.

use crate::common::error::{AccessError, AccessResult};

use super::color::Color12;
use super::flags::FormatFlags;
use super::formatted::FormattedString;

/// A single non-ASCII code point, with its UTF-8 encoding.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Unicode {
    point: char,
    utf8: String,
}

impl Unicode {
    pub fn new(point: char) -> Self {
        Self {
            point,
            utf8: point.to_string(),
        }
    }

    /// Build from already encoded bytes, as produced by a decoder.
    pub fn with_utf8(utf8: impl Into<String>, point: char) -> Self {
        Self {
            point,
            utf8: utf8.into(),
        }
    }

    pub fn point(&self) -> char {
        self.point
    }

    pub fn utf8(&self) -> &str {
        &self.utf8
    }
}

/// First code point of the private use block mapped to game font glyphs.
pub const QFONT_BASE: u32 = 0xE000;

/// A glyph from the legacy game font.
///
/// These live in U+E000..U+E0FF; most formatters can only show the
/// ASCII approximation from [`QFont::alternative`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QFont {
    index: u8,
}

impl QFont {
    pub fn new(index: u8) -> Self {
        Self { index }
    }

    /// Map a code point in the glyph block, `None` outside it.
    pub fn from_char(c: char) -> Option<Self> {
        let point = u32::from(c);
        if point & 0xff00 == QFONT_BASE {
            Some(Self::new((point & 0xff) as u8))
        } else {
            None
        }
    }

    pub fn index(&self) -> u8 {
        self.index
    }

    /// The glyph as a private use code point.
    pub fn unicode_point(&self) -> u32 {
        QFONT_BASE | u32::from(self.index)
    }

    pub fn to_char(&self) -> char {
        char::from_u32(self.unicode_point()).unwrap_or(char::REPLACEMENT_CHARACTER)
    }

    /// ASCII string approximating the glyph.
    pub fn alternative(&self) -> &'static str {
        QFONT_TABLE[usize::from(self.index)]
    }
}

#[rustfmt::skip]
static QFONT_TABLE: [&str; 256] = [
    "",   " ",  "-",  " ",  "_",  "#",  "+",  ".",  "F",  "T",  " ",  "#",  ".",  "<",  "#",  "#", // 0
    "[",  "]",  ":)", ":)", ":(", ":P", ":/", ":D", "<",  ">",  ".",  "-",  "#",  "-",  "-",  "-", // 1
    "?",  "?",  "?",  "?",  "?",  "?",  "?",  "?",  "?",  "?",  "?",  "?",  "?",  "?",  "?",  "?", // 2
    "?",  "?",  "?",  "?",  "?",  "?",  "?",  "?",  "?",  "?",  "?",  "?",  "?",  "?",  "?",  "?", // 3
    "?",  "?",  "?",  "?",  "?",  "?",  "?",  "?",  "?",  "?",  "?",  "?",  "?",  "?",  "?",  "?", // 4
    "?",  "?",  "?",  "?",  "?",  "?",  "?",  "?",  "?",  "?",  "?",  "?",  "?",  "?",  "?",  "?", // 5
    "?",  "?",  "?",  "?",  "?",  "?",  "?",  "?",  "?",  "?",  "?",  "?",  "?",  "?",  "?",  "?", // 6
    "?",  "?",  "?",  "?",  "?",  "?",  "?",  "?",  "?",  "?",  "?",  "?",  "?",  "?",  "?",  "?", // 7
    "=",  "=",  "=",  "#",  "!",  "[o]","[u]","[i]","[c]","[c]","[r]","#",  "?",  ">",  "#",  "#", // 8
    "[",  "]",  ":)", ":)", ":(", ":P", ":/", ":D", "<",  ">",  "#",  "X",  "#",  "-",  "-",  "-", // 9
    " ",  "!",  "\"", "#",  "$",  "%",  "&",  "\"", "(",  ")",  "*",  "+",  ",",  "-",  ".",  "/", // a
    "0",  "1",  "2",  "3",  "4",  "5",  "6",  "7",  "8",  "9",  ":",  ";",  "<",  "=",  ">",  "?", // b
    "@",  "A",  "B",  "C",  "D",  "E",  "F",  "G",  "H",  "I",  "J",  "K",  "L",  "M",  "N",  "O", // c
    "P",  "Q",  "R",  "S",  "T",  "U",  "V",  "W",  "X",  "Y",  "Z",  "[",  "\\", "]",  "^",  "_", // d
    ".",  "A",  "B",  "C",  "D",  "E",  "F",  "G",  "H",  "I",  "J",  "K",  "L",  "M",  "N",  "O", // e
    "P",  "Q",  "R",  "S",  "T",  "U",  "V",  "W",  "X",  "Y",  "Z",  "{",  "|",  "}",  "~",  "<", // f
];

/// Named slot bound to a replacement at render time.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Placeholder {
    name: String,
    replacement: FormattedString,
}

impl Placeholder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            replacement: FormattedString::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn replacement(&self) -> &FormattedString {
        &self.replacement
    }

    /// Rebind the replacement, dropping the previous one.
    pub fn bind(&mut self, value: FormattedString) {
        self.replacement = value;
    }
}

/// Call to a named filter.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterCall {
    pub name: String,
    pub arguments: Vec<FormattedString>,
}

impl FilterCall {
    pub fn new(name: impl Into<String>, arguments: Vec<FormattedString>) -> Self {
        Self {
            name: name.into(),
            arguments,
        }
    }
}

/// Call to a method on an object supplied by the caller (e.g. a connection).
///
/// The result is stored on the node by [`FormattedString::bind_methods`].
#[derive(Debug, Clone, PartialEq)]
pub struct MethodCall {
    pub target: String,
    pub method: String,
    pub arguments: Vec<FormattedString>,
    result: Option<FormattedString>,
}

impl MethodCall {
    pub fn new(
        target: impl Into<String>,
        method: impl Into<String>,
        arguments: Vec<FormattedString>,
    ) -> Self {
        Self {
            target: target.into(),
            method: method.into(),
            arguments,
            result: None,
        }
    }

    pub fn result(&self) -> Option<&FormattedString> {
        self.result.as_ref()
    }

    pub fn bind(&mut self, result: FormattedString) {
        self.result = Some(result);
    }
}

/// `$(if)` block.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Conditional {
    pub condition: FormattedString,
    pub if_true: FormattedString,
    pub if_false: FormattedString,
}

impl Conditional {
    pub fn new(
        condition: FormattedString,
        if_true: FormattedString,
        if_false: FormattedString,
    ) -> Self {
        Self {
            condition,
            if_true,
            if_false,
        }
    }
}

/// `$(for)` block: `body` is rendered once per element of `source`
/// with `variable` bound to that element.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Loop {
    pub variable: String,
    pub source: FormattedString,
    pub body: FormattedString,
}

impl Loop {
    pub fn new(variable: impl Into<String>, source: FormattedString, body: FormattedString) -> Self {
        Self {
            variable: variable.into(),
            source,
            body,
        }
    }
}

/// Pads the inner string to a minimum number of visible characters.
#[derive(Debug, Clone, PartialEq)]
pub struct Padding {
    pub inner: FormattedString,
    pub width: usize,
    /// 0 pads on the right (left aligned), 1 pads on the left (right aligned).
    pub align: f64,
    pub fill: char,
}

impl Padding {
    /// Widest padding that will be rendered.
    pub const MAX_WIDTH: usize = 1024;

    pub fn new(inner: impl Into<FormattedString>, width: usize) -> Self {
        Self {
            inner: inner.into(),
            width,
            align: 1.0,
            fill: ' ',
        }
    }

    pub fn with_align(mut self, align: f64) -> Self {
        self.align = align.clamp(0.0, 1.0);
        self
    }

    pub fn with_fill(mut self, fill: char) -> Self {
        self.fill = fill;
        self
    }
}

/// One node of a [`FormattedString`].
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    /// Literal ASCII run.
    Ascii(String),
    Unicode(Unicode),
    QFont(QFont),
    Color(Color12),
    Format(FormatFlags),
    ClearFormatting,
    Number(f64),
    Placeholder(Placeholder),
    FilterCall(FilterCall),
    MethodCall(MethodCall),
    Conditional(Conditional),
    Loop(Loop),
    Padding(Padding),
}

macro_rules! accessors {
    ($( $name:ident, $name_mut:ident => $variant:ident($ty:ty) ),* $(,)?) => {
        $(
            pub fn $name(&self) -> AccessResult<&$ty> {
                match self {
                    Element::$variant(value) => Ok(value),
                    other => Err(AccessError::new(stringify!($variant), other.kind())),
                }
            }

            pub fn $name_mut(&mut self) -> AccessResult<&mut $ty> {
                match self {
                    Element::$variant(value) => Ok(value),
                    other => Err(AccessError::new(stringify!($variant), other.kind())),
                }
            }
        )*
    };
}

impl Element {
    /// Name of the variant, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Element::Ascii(_) => "Ascii",
            Element::Unicode(_) => "Unicode",
            Element::QFont(_) => "QFont",
            Element::Color(_) => "Color",
            Element::Format(_) => "Format",
            Element::ClearFormatting => "ClearFormatting",
            Element::Number(_) => "Number",
            Element::Placeholder(_) => "Placeholder",
            Element::FilterCall(_) => "FilterCall",
            Element::MethodCall(_) => "MethodCall",
            Element::Conditional(_) => "Conditional",
            Element::Loop(_) => "Loop",
            Element::Padding(_) => "Padding",
        }
    }

    accessors! {
        as_ascii, as_ascii_mut => Ascii(String),
        as_unicode, as_unicode_mut => Unicode(Unicode),
        as_qfont, as_qfont_mut => QFont(QFont),
        as_color, as_color_mut => Color(Color12),
        as_format, as_format_mut => Format(FormatFlags),
        as_number, as_number_mut => Number(f64),
        as_placeholder, as_placeholder_mut => Placeholder(Placeholder),
        as_filter_call, as_filter_call_mut => FilterCall(FilterCall),
        as_method_call, as_method_call_mut => MethodCall(MethodCall),
        as_conditional, as_conditional_mut => Conditional(Conditional),
        as_loop, as_loop_mut => Loop(Loop),
        as_padding, as_padding_mut => Padding(Padding),
    }

    pub fn is_clear(&self) -> bool {
        matches!(self, Element::ClearFormatting)
    }

    /// Strings nested inside this element (arguments, branches, bodies).
    ///
    /// Bound replacements of placeholders and method results are values,
    /// not part of the template, so they are not listed.
    pub fn nested(&self) -> Vec<&FormattedString> {
        match self {
            Element::FilterCall(call) => call.arguments.iter().collect(),
            Element::MethodCall(call) => call.arguments.iter().collect(),
            Element::Conditional(cond) => vec![&cond.condition, &cond.if_true, &cond.if_false],
            Element::Loop(lp) => vec![&lp.source, &lp.body],
            Element::Padding(padding) => vec![&padding.inner],
            _ => Vec::new(),
        }
    }

    /// Mutable version of [`Element::nested`].
    pub fn nested_mut(&mut self) -> Vec<&mut FormattedString> {
        match self {
            Element::FilterCall(call) => call.arguments.iter_mut().collect(),
            Element::MethodCall(call) => call.arguments.iter_mut().collect(),
            Element::Conditional(cond) => {
                vec![&mut cond.condition, &mut cond.if_true, &mut cond.if_false]
            }
            Element::Loop(lp) => vec![&mut lp.source, &mut lp.body],
            Element::Padding(padding) => vec![&mut padding.inner],
            _ => Vec::new(),
        }
    }
}

/// Text form of a number element: integers without a fractional part.
pub fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

impl From<&str> for Element {
    fn from(s: &str) -> Self {
        Element::Ascii(s.to_string())
    }
}

impl From<String> for Element {
    fn from(s: String) -> Self {
        Element::Ascii(s)
    }
}

impl From<char> for Element {
    fn from(c: char) -> Self {
        if c.is_ascii() {
            Element::Ascii(c.to_string())
        } else {
            Element::Unicode(Unicode::new(c))
        }
    }
}

impl From<Color12> for Element {
    fn from(color: Color12) -> Self {
        Element::Color(color)
    }
}

impl From<FormatFlags> for Element {
    fn from(flags: FormatFlags) -> Self {
        Element::Format(flags)
    }
}

impl From<Unicode> for Element {
    fn from(unicode: Unicode) -> Self {
        Element::Unicode(unicode)
    }
}

impl From<QFont> for Element {
    fn from(qfont: QFont) -> Self {
        Element::QFont(qfont)
    }
}

impl From<Placeholder> for Element {
    fn from(placeholder: Placeholder) -> Self {
        Element::Placeholder(placeholder)
    }
}

impl From<FilterCall> for Element {
    fn from(call: FilterCall) -> Self {
        Element::FilterCall(call)
    }
}

impl From<MethodCall> for Element {
    fn from(call: MethodCall) -> Self {
        Element::MethodCall(call)
    }
}

impl From<Conditional> for Element {
    fn from(cond: Conditional) -> Self {
        Element::Conditional(cond)
    }
}

impl From<Loop> for Element {
    fn from(lp: Loop) -> Self {
        Element::Loop(lp)
    }
}

impl From<Padding> for Element {
    fn from(padding: Padding) -> Self {
        Element::Padding(padding)
    }
}

macro_rules! number_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Element {
                fn from(value: $ty) -> Self {
                    Element::Number(value as f64)
                }
            }
        )*
    };
}

number_from!(i32, i64, u32, u64, usize, f32, f64);
