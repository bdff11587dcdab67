//! The template language used in configuration files.
//!
//! `$name` and `${name}` are placeholders, `$(...)` is a call: a color, a
//! format change, a filter, a method of a bound object or a block keyword
//! (`if`, `else`, `endif`, `for`, `endfor`). `$$` is a literal dollar.

pub mod formatter;
pub mod lexer;
pub mod parser;

pub use formatter::ConfigFormatter;
