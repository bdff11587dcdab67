//! UTF-8 splitting and ASCII transliteration.

use deunicode::deunicode_char;

use super::element::{Element, Unicode};

/// Split text into maximal ASCII runs and one [`Element::Unicode`] per
/// non-ASCII code point.
pub fn split_utf8(text: &str) -> Vec<Element> {
    let mut elements = Vec::new();
    let mut run_start = 0;

    for (offset, c) in text.char_indices() {
        if c.is_ascii() {
            continue;
        }
        if run_start < offset {
            elements.push(Element::Ascii(text[run_start..offset].to_string()));
        }
        let end = offset + c.len_utf8();
        elements.push(Element::Unicode(Unicode::with_utf8(&text[offset..end], c)));
        run_start = end;
    }

    if run_start < text.len() {
        elements.push(Element::Ascii(text[run_start..].to_string()));
    }

    elements
}

/// Nearest ASCII rendition of a single code point.
///
/// Emoji become their `:shortcode:`, other characters are transliterated,
/// and anything without an equivalent becomes `?`.
pub fn to_ascii(c: char) -> String {
    if c.is_ascii() {
        return c.to_string();
    }

    let mut buffer = [0u8; 4];
    if let Some(shortcode) = emojis::get(c.encode_utf8(&mut buffer)).and_then(|e| e.shortcode()) {
        return format!(":{}:", shortcode);
    }

    match deunicode_char(c) {
        Some(ascii) if !ascii.is_empty() && ascii.is_ascii() => ascii.to_string(),
        _ => "?".to_string(),
    }
}

/// Transliterate a whole string with [`to_ascii`].
pub fn transliterate(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_ascii() {
            result.push(c);
        } else {
            result.push_str(&to_ascii(c));
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_utf8() {
        let elements = split_utf8("foo bar è baz");
        assert_eq!(elements.len(), 3);
        assert_eq!(elements[1].as_unicode().unwrap().utf8(), "è");

        let elements = split_utf8("èé");
        assert_eq!(elements.len(), 2);

        assert!(split_utf8("").is_empty());
        assert_eq!(split_utf8("plain").len(), 1);
    }

    #[test]
    fn test_to_ascii() {
        assert_eq!(to_ascii('a'), "a");
        assert_eq!(to_ascii('è'), "e");
        assert_eq!(to_ascii('😀'), ":grinning:");
    }

    #[test]
    fn test_transliterate() {
        assert_eq!(transliterate("foo barè"), "foo bare");
        assert_eq!(transliterate("Æon"), "AEon");
    }
}
