//! Concrete formatters for each backend syntax.

pub mod ansi;
pub mod darkplaces;
pub mod html;
pub mod irc;
pub mod markdown;
pub mod plain;
pub mod rainbow;

use std::sync::Arc;

pub use ansi::AnsiFormatter;
pub use darkplaces::DarkplacesFormatter;
pub use html::HtmlFormatter;
pub use irc::IrcFormatter;
pub use markdown::MarkdownFormatter;
pub use plain::{AsciiFormatter, Utf8Formatter};
pub use rainbow::RainbowFormatter;

use crate::string::FormatterRegistry;
use crate::template::ConfigFormatter;

/// Registry with every built-in formatter, `utf8` being the default.
pub fn default_registry() -> FormatterRegistry {
    let mut registry = FormatterRegistry::new(Arc::new(Utf8Formatter));
    registry.add(Arc::new(AsciiFormatter));
    registry.add(Arc::new(AnsiFormatter::new(true)));
    registry.add(Arc::new(AnsiFormatter::new(false)));
    registry.add(Arc::new(AnsiFormatter::black_as_silver(true)));
    registry.add(Arc::new(AnsiFormatter::black_as_silver(false)));
    registry.add(Arc::new(ConfigFormatter));
    registry.add(Arc::new(IrcFormatter));
    registry.add(Arc::new(DarkplacesFormatter));
    registry.add(Arc::new(HtmlFormatter));
    registry.add(Arc::new(MarkdownFormatter));
    registry.add(Arc::new(RainbowFormatter::default()));
    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_registry() {
        let registry = default_registry();
        for name in [
            "utf8",
            "ascii",
            "ansi-utf8",
            "ansi-ascii",
            "ansi-utf8-black",
            "ansi-ascii-black",
            "config",
            "irc",
            "dp",
            "html",
            "telegram-md",
            "rainbow",
        ] {
            assert!(registry.contains(name), "missing {}", name);
            assert_eq!(registry.get(name).name(), name);
        }
        assert_eq!(registry.names().len(), 12);
        assert_eq!(registry.get("xmpp").name(), "utf8");
    }
}
