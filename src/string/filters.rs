//! Named filters callable from templates as `$(name args...)`.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};

use super::element::{Element, Padding};
use super::formatted::FormattedString;

/// A filter receives fully evaluated arguments.
pub type FilterFn = Arc<dyn Fn(&[FormattedString]) -> FormattedString + Send + Sync>;

/// Filters by name.
#[derive(Clone, Default)]
pub struct FilterRegistry {
    filters: HashMap<String, FilterFn>,
}

impl FilterRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with `plural`, `ucfirst`, `ifeq` and `pad`.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("plural", plural);
        registry.register("ucfirst", ucfirst);
        registry.register("ifeq", ifeq);
        registry.register("pad", pad);
        registry
    }

    pub fn register<F>(&mut self, name: &str, filter: F)
    where
        F: Fn(&[FormattedString]) -> FormattedString + Send + Sync + 'static,
    {
        if self.filters.insert(name.to_string(), Arc::new(filter)).is_some() {
            warn!(filter = %name, "Overwriting filter");
        }
    }

    pub fn unregister(&mut self, name: &str) -> bool {
        self.filters.remove(name).is_some()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.filters.contains_key(name)
    }

    /// Call `name` on `arguments`.
    ///
    /// Unknown filters pass their first argument through.
    pub fn apply(&self, name: &str, arguments: &[FormattedString]) -> FormattedString {
        match self.filters.get(name) {
            Some(filter) => filter(arguments),
            None => {
                debug!(filter = %name, "Unknown filter");
                arguments.first().cloned().unwrap_or_default()
            }
        }
    }
}

impl fmt::Debug for FilterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.filters.keys().collect();
        names.sort();
        f.debug_struct("FilterRegistry").field("filters", &names).finish()
    }
}

/// `plural number word`
fn plural(args: &[FormattedString]) -> FormattedString {
    if args.len() < 2 {
        return FormattedString::new();
    }

    let is_one = args[0]
        .to_plain()
        .trim()
        .parse::<f64>()
        .map(|n| n == 1.0)
        .unwrap_or(false);

    if is_one {
        args[1].clone()
    } else {
        FormattedString::from(pluralize(&args[1].to_plain()))
    }
}

/// English plural of a single noun.
pub fn pluralize(noun: &str) -> String {
    const CONSONANTS: &str = "bcdfghjklmnpqrstvwxyz";

    let lower = noun.to_lowercase();
    let mut tail = lower.chars().rev();
    let last = tail.next();
    let before_last = tail.next();
    let after_consonant = before_last.map_or(false, |c| CONSONANTS.contains(c));

    match last {
        None => String::new(),
        Some('o') if after_consonant => format!("{}es", noun),
        Some('y') if after_consonant => format!("{}ies", &noun[..noun.len() - 1]),
        _ if ["z", "s", "ch", "sh", "j", "zh", "x"]
            .iter()
            .any(|suffix| lower.ends_with(suffix)) =>
        {
            format!("{}es", noun)
        }
        _ => format!("{}s", noun),
    }
}

/// `ucfirst text`
fn ucfirst(args: &[FormattedString]) -> FormattedString {
    let Some(first) = args.first() else {
        return FormattedString::new();
    };

    let mut result = FormattedString::new();
    let mut done = false;
    for element in first.iter() {
        if done {
            result.push(element.clone());
            continue;
        }
        match element {
            Element::Ascii(text) if !text.is_empty() => {
                let mut chars = text.chars();
                if let Some(c) = chars.next() {
                    let mut upper = c.to_ascii_uppercase().to_string();
                    upper.push_str(chars.as_str());
                    result.push(Element::Ascii(upper));
                }
                done = true;
            }
            Element::Unicode(unicode) => {
                let upper: String = unicode.point().to_uppercase().collect();
                result.push_str(&upper);
                done = true;
            }
            other => {
                result.push(other.clone());
            }
        }
    }
    result
}

/// `ifeq lhs rhs if_true [if_false]`
fn ifeq(args: &[FormattedString]) -> FormattedString {
    if args.len() < 3 {
        return FormattedString::new();
    }

    if args[0].to_plain() == args[1].to_plain() {
        args[2].clone()
    } else {
        args.get(3).cloned().unwrap_or_default()
    }
}

/// `pad width text [align [fill]]`
///
/// `align` is a fraction, or one of `left`, `center` or `right`.
fn pad(args: &[FormattedString]) -> FormattedString {
    if args.len() < 2 {
        return args.first().cloned().unwrap_or_default();
    }

    let width = match args[0].to_plain().trim().parse::<usize>() {
        Ok(width) if width <= Padding::MAX_WIDTH => width,
        _ => return args[1].clone(),
    };

    let mut padding = Padding::new(args[1].clone(), width);

    if let Some(align) = args.get(2) {
        let align = align.to_plain();
        let fraction = match align.trim() {
            "left" => Some(0.0),
            "center" => Some(0.5),
            "right" => Some(1.0),
            other => other.parse::<f64>().ok(),
        };
        if let Some(fraction) = fraction {
            padding = padding.with_align(fraction);
        }
    }

    if let Some(fill) = args.get(3).and_then(|fill| fill.to_plain().chars().next()) {
        padding = padding.with_fill(fill);
    }

    FormattedString::from(Element::Padding(padding))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<FormattedString> {
        values.iter().map(|v| FormattedString::from(*v)).collect()
    }

    fn call(name: &str, values: &[&str]) -> String {
        FilterRegistry::with_builtins()
            .apply(name, &args(values))
            .to_plain()
    }

    #[test]
    fn test_plural() {
        assert_eq!(call("plural", &["1", "pony"]), "pony");
        assert_eq!(call("plural", &["6", "pony"]), "ponies");
        assert_eq!(call("plural", &["0", "cat"]), "cats");
        assert_eq!(call("plural", &["pony"]), "");
    }

    #[test]
    fn test_pluralize_rules() {
        assert_eq!(pluralize("potato"), "potatoes");
        assert_eq!(pluralize("radio"), "radios");
        assert_eq!(pluralize("bus"), "buses");
        assert_eq!(pluralize("church"), "churches");
        assert_eq!(pluralize("day"), "days");
        assert_eq!(pluralize("city"), "cities");
        assert_eq!(pluralize("box"), "boxes");
        assert_eq!(pluralize("pony"), "ponies");
        assert_eq!(pluralize(""), "");
    }

    #[test]
    fn test_ucfirst() {
        assert_eq!(call("ucfirst", &["pony princess"]), "Pony princess");
        assert_eq!(call("ucfirst", &["ébène"]), "Ébène");
        assert_eq!(call("ucfirst", &[]), "");
    }

    #[test]
    fn test_ifeq() {
        assert_eq!(call("ifeq", &["cmp", "cmp", "hello", "nope"]), "hello");
        assert_eq!(call("ifeq", &["fail", "cmp", "hello", "nope"]), "nope");
        assert_eq!(call("ifeq", &["fail", "cmp", "hello"]), "");
        assert_eq!(call("ifeq", &["cmp", "cmp"]), "");
    }

    #[test]
    fn test_pad_builds_padding() {
        let result = FilterRegistry::with_builtins().apply("pad", &args(&["7", "hello", "left", "."]));
        let padding = result[0].as_padding().unwrap();
        assert_eq!(padding.width, 7);
        assert_eq!(padding.align, 0.0);
        assert_eq!(padding.fill, '.');
    }

    #[test]
    fn test_pad_rejects_huge_width() {
        let registry = FilterRegistry::with_builtins();
        for width in ["18446744073709551615", "99999999999999999999", "1025", "-3"] {
            let result = registry.apply("pad", &args(&[width, "x"]));
            assert_eq!(result.len(), 1, "{}", width);
            assert_eq!(result[0].as_ascii().unwrap(), "x");
        }
        assert!(registry.apply("pad", &args(&["1024", "x"]))[0].as_padding().is_ok());
    }

    #[test]
    fn test_unknown_filter_is_identity() {
        assert_eq!(call("fake", &["pony", "other"]), "pony");
        assert_eq!(call("fake", &[]), "");
    }

    #[test]
    fn test_register_and_unregister() {
        let mut registry = FilterRegistry::new();
        registry.register("shout", |args: &[FormattedString]| {
            FormattedString::from(args.first().map(|a| a.to_plain().to_uppercase()).unwrap_or_default())
        });
        assert!(registry.contains("shout"));
        assert_eq!(registry.apply("shout", &args(&["hey"])).to_plain(), "HEY");
        assert!(registry.unregister("shout"));
        assert!(!registry.unregister("shout"));
        assert_eq!(registry.apply("shout", &args(&["hey"])).to_plain(), "hey");
    }
}
