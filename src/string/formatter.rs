//! The formatter interface, its encode context and the formatter registry.

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

use super::color::Color12;
use super::element::{format_number, QFont, Unicode};
use super::filters::FilterRegistry;
use super::flags::FormatFlags;
use super::formatted::FormattedString;

/// A codec between [`FormattedString`] and one wire syntax.
///
/// Implementations must not keep mutable state: anything that has to be
/// remembered while encoding one string goes in the [`Context`] scratch
/// created by [`Formatter::context`].
pub trait Formatter: Send + Sync {
    /// Unique name used for registry lookups.
    fn name(&self) -> &str;

    /// Fresh scratch state for one encode.
    fn context(&self) -> Box<dyn Any + Send> {
        Box::new(())
    }

    fn string_begin(&self, _ctx: &mut Context<'_>) -> String {
        String::new()
    }

    fn string_end(&self, _ctx: &mut Context<'_>) -> String {
        String::new()
    }

    fn ascii(&self, text: &str, ctx: &mut Context<'_>) -> String;

    fn unicode(&self, c: &Unicode, ctx: &mut Context<'_>) -> String;

    fn qfont(&self, glyph: &QFont, ctx: &mut Context<'_>) -> String {
        self.ascii(glyph.alternative(), ctx)
    }

    fn color(&self, color: Color12, ctx: &mut Context<'_>) -> String;

    fn format_flags(&self, flags: FormatFlags, ctx: &mut Context<'_>) -> String;

    fn clear(&self, ctx: &mut Context<'_>) -> String;

    fn number(&self, value: f64, ctx: &mut Context<'_>) -> String {
        self.ascii(&format_number(value), ctx)
    }

    /// Parse wire text.
    fn decode(&self, source: &str) -> FormattedString;
}

/// Mutable state for a single encode call.
///
/// Holds the formatter scratch and the loop variable scopes. It is created
/// per top-level encode and threaded through every nested evaluation.
pub struct Context<'a> {
    formatter: &'a dyn Formatter,
    filters: &'a FilterRegistry,
    scratch: Box<dyn Any + Send>,
    scopes: Vec<(String, FormattedString)>,
}

impl<'a> Context<'a> {
    pub fn new(formatter: &'a dyn Formatter, filters: &'a FilterRegistry) -> Self {
        Self {
            formatter,
            filters,
            scratch: formatter.context(),
            scopes: Vec::new(),
        }
    }

    pub fn formatter(&self) -> &'a dyn Formatter {
        self.formatter
    }

    pub fn filters(&self) -> &'a FilterRegistry {
        self.filters
    }

    /// The formatter scratch, if it has type `T`.
    pub fn scratch<T: Any>(&mut self) -> Option<&mut T> {
        self.scratch.downcast_mut::<T>()
    }

    /// A context with the same scopes but fresh scratch, for encoding a
    /// sub-expression without disturbing the enclosing output state.
    pub fn isolated(&self) -> Context<'a> {
        Self {
            formatter: self.formatter,
            filters: self.filters,
            scratch: self.formatter.context(),
            scopes: self.scopes.clone(),
        }
    }

    /// Innermost binding for a loop variable.
    pub fn lookup(&self, name: &str) -> Option<&FormattedString> {
        self.scopes
            .iter()
            .rev()
            .find(|(bound, _)| bound == name)
            .map(|(_, value)| value)
    }

    pub fn push_scope(&mut self, name: &str, value: FormattedString) {
        self.scopes.push((name.to_string(), value));
    }

    pub fn pop_scope(&mut self) {
        self.scopes.pop();
    }

    pub fn scope_depth(&self) -> usize {
        self.scopes.len()
    }
}

/// Formatters by name.
///
/// Built once at startup and then only read; lookups of unknown names
/// fall back to the default formatter.
pub struct FormatterRegistry {
    formatters: HashMap<String, Arc<dyn Formatter>>,
    default: Arc<dyn Formatter>,
}

impl FormatterRegistry {
    /// A registry that only knows `default`.
    pub fn new(default: Arc<dyn Formatter>) -> Self {
        let mut formatters = HashMap::new();
        formatters.insert(default.name().to_string(), default.clone());
        Self {
            formatters,
            default,
        }
    }

    /// Register a formatter, replacing any with the same name.
    pub fn add(&mut self, formatter: Arc<dyn Formatter>) {
        let name = formatter.name().to_string();
        if self.formatters.contains_key(&name) {
            warn!(formatter = %name, "Overwriting formatter");
        } else {
            debug!(formatter = %name, "Registered formatter");
        }
        self.formatters.insert(name, formatter);
    }

    /// Make a registered formatter the fallback. Returns false if unknown.
    pub fn set_default(&mut self, name: &str) -> bool {
        match self.formatters.get(name) {
            Some(formatter) => {
                self.default = formatter.clone();
                true
            }
            None => false,
        }
    }

    /// Formatter called `name`, or the default one.
    pub fn get(&self, name: &str) -> Arc<dyn Formatter> {
        match self.formatters.get(name) {
            Some(formatter) => formatter.clone(),
            None => {
                warn!(
                    formatter = %name,
                    fallback = %self.default.name(),
                    "Unknown formatter, using default"
                );
                self.default.clone()
            }
        }
    }

    pub fn find(&self, name: &str) -> Option<Arc<dyn Formatter>> {
        self.formatters.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.formatters.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.formatters.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl std::fmt::Debug for FormatterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormatterRegistry")
            .field("formatters", &self.names())
            .field("default", &self.default.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formatters::{AnsiFormatter, Utf8Formatter};

    #[test]
    fn test_registry_lookup() {
        let mut registry = FormatterRegistry::new(Arc::new(Utf8Formatter));
        registry.add(Arc::new(AnsiFormatter::new(true)));

        assert!(registry.contains("utf8"));
        assert!(registry.contains("ansi-utf8"));
        assert_eq!(registry.get("ansi-utf8").name(), "ansi-utf8");
        assert!(registry.find("nope").is_none());
        assert_eq!(registry.names(), vec!["ansi-utf8", "utf8"]);
    }

    #[test]
    fn test_registry_fallback() {
        let mut registry = FormatterRegistry::new(Arc::new(Utf8Formatter));
        assert_eq!(registry.get("does-not-exist").name(), "utf8");

        registry.add(Arc::new(AnsiFormatter::new(false)));
        assert!(registry.set_default("ansi-ascii"));
        assert!(!registry.set_default("nope"));
        assert_eq!(registry.get("does-not-exist").name(), "ansi-ascii");
    }

    #[test]
    fn test_context_scopes() {
        let filters = FilterRegistry::new();
        let mut ctx = Context::new(&Utf8Formatter, &filters);
        assert!(ctx.lookup("x").is_none());

        ctx.push_scope("x", FormattedString::from("outer"));
        ctx.push_scope("x", FormattedString::from("inner"));
        assert_eq!(ctx.lookup("x"), Some(&FormattedString::from("inner")));

        let isolated = ctx.isolated();
        assert_eq!(isolated.scope_depth(), 2);

        ctx.pop_scope();
        assert_eq!(ctx.lookup("x"), Some(&FormattedString::from("outer")));
        ctx.pop_scope();
        assert_eq!(ctx.scope_depth(), 0);
    }
}
