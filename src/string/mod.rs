//! Formatted strings: the styled text model shared by every formatter.

pub mod color;
pub mod element;
pub mod encoding;
pub mod filters;
pub mod flags;
pub mod formatted;
pub mod formatter;
pub mod render;

pub use color::Color12;
pub use element::{
    Conditional, Element, FilterCall, Loop, MethodCall, Placeholder, QFont, Unicode,
};
pub use filters::FilterRegistry;
pub use flags::FormatFlags;
pub use formatted::{FormattedString, MethodResolver};
pub use formatter::{Context, Formatter, FormatterRegistry};
