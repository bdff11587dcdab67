//! Text style flags.

use bitflags::bitflags;

bitflags! {
    /// Bitmask of text styles. The empty set is "no format".
    pub struct FormatFlags: u8 {
        const BOLD = 0b0000_0001;
        const UNDERLINE = 0b0000_0010;
        const ITALIC = 0b0000_0100;
    }
}

impl Default for FormatFlags {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_operations() {
        let mut flags = FormatFlags::BOLD | FormatFlags::UNDERLINE;
        flags &= !FormatFlags::BOLD;
        assert_eq!(flags, FormatFlags::UNDERLINE);
        assert_eq!(
            flags | FormatFlags::BOLD,
            FormatFlags::BOLD | FormatFlags::UNDERLINE
        );
        assert!(!flags.is_empty());
        assert!(flags.contains(FormatFlags::UNDERLINE));
        assert!((!flags).contains(FormatFlags::BOLD));
        assert!(!(!flags).contains(FormatFlags::UNDERLINE));
    }

    #[test]
    fn test_negation_stays_in_range() {
        assert_eq!(!FormatFlags::empty(), FormatFlags::all());
        assert_eq!(!FormatFlags::empty(), FormatFlags::BOLD | FormatFlags::UNDERLINE | FormatFlags::ITALIC);
        assert_eq!(!(!FormatFlags::ITALIC), FormatFlags::ITALIC);
    }

    #[test]
    fn test_toggle() {
        let mut flags = FormatFlags::default();
        flags ^= FormatFlags::ITALIC;
        assert_eq!(flags, FormatFlags::ITALIC);
        flags ^= FormatFlags::ITALIC;
        assert!(flags.is_empty());
    }
}
