//! 12-bit color values.
//!
//! Colors carry 4 bits per channel plus a validity flag. "No color" is a
//! distinct value (the default), not black.

use std::fmt;

/// 12 bit color with an explicit "no color" state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color12 {
    valid: bool,
    r: u8,
    g: u8,
    b: u8,
}

/// The 16 palette entries, indexed as `bright << 3 | blue << 2 | green << 1 | red`.
const PALETTE: [Color12; 16] = [
    Color12::BLACK,
    Color12::DARK_RED,
    Color12::DARK_GREEN,
    Color12::DARK_YELLOW,
    Color12::DARK_BLUE,
    Color12::DARK_MAGENTA,
    Color12::DARK_CYAN,
    Color12::SILVER,
    Color12::GRAY,
    Color12::RED,
    Color12::GREEN,
    Color12::YELLOW,
    Color12::BLUE,
    Color12::MAGENTA,
    Color12::CYAN,
    Color12::WHITE,
];

impl Color12 {
    pub const NOCOLOR: Self = Self {
        valid: false,
        r: 0,
        g: 0,
        b: 0,
    };
    pub const BLACK: Self = Self::rgb(0x0, 0x0, 0x0);
    pub const RED: Self = Self::rgb(0xf, 0x0, 0x0);
    pub const GREEN: Self = Self::rgb(0x0, 0xf, 0x0);
    pub const YELLOW: Self = Self::rgb(0xf, 0xf, 0x0);
    pub const BLUE: Self = Self::rgb(0x0, 0x0, 0xf);
    pub const MAGENTA: Self = Self::rgb(0xf, 0x0, 0xf);
    pub const CYAN: Self = Self::rgb(0x0, 0xf, 0xf);
    pub const WHITE: Self = Self::rgb(0xf, 0xf, 0xf);
    pub const SILVER: Self = Self::rgb(0xc, 0xc, 0xc);
    pub const GRAY: Self = Self::rgb(0x8, 0x8, 0x8);
    pub const DARK_RED: Self = Self::rgb(0x8, 0x0, 0x0);
    pub const DARK_GREEN: Self = Self::rgb(0x0, 0x8, 0x0);
    pub const DARK_YELLOW: Self = Self::rgb(0x8, 0x8, 0x0);
    pub const DARK_BLUE: Self = Self::rgb(0x0, 0x0, 0x8);
    pub const DARK_MAGENTA: Self = Self::rgb(0x8, 0x0, 0x8);
    pub const DARK_CYAN: Self = Self::rgb(0x0, 0x8, 0x8);

    /// Create a color from its components, each clamped to 4 bits.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self {
            valid: true,
            r: clamp_component(r),
            g: clamp_component(g),
            b: clamp_component(b),
        }
    }

    /// Create a color from a 12 bit mask (`0xf00` is red).
    pub const fn from_bit_mask(mask: u16) -> Self {
        Self::rgb(
            ((mask >> 8) & 0xf) as u8,
            ((mask >> 4) & 0xf) as u8,
            (mask & 0xf) as u8,
        )
    }

    /// Parse a hex color: 3 digits (`f80`) or 6 digits (`ff8800`, low nibbles dropped).
    ///
    /// Anything else yields [`Color12::NOCOLOR`].
    pub fn from_hex(hex: &str) -> Self {
        let digits: Option<Vec<u8>> = hex.chars().map(hex_value).collect();
        match digits.as_deref() {
            Some([r, g, b]) => Self::rgb(*r, *g, *b),
            Some([r, _, g, _, b, _]) => Self::rgb(*r, *g, *b),
            _ => Self::NOCOLOR,
        }
    }

    /// Resolve a color name, case insensitive.
    ///
    /// Accepts the eight base names, `silver`, `gray`/`grey` and `dark_`/`bright_`
    /// variants (separators `_`, `-` and spaces are ignored). Unknown names
    /// yield [`Color12::NOCOLOR`].
    pub fn from_name(name: &str) -> Self {
        let normalized: String = name
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .map(|c| c.to_ascii_lowercase())
            .collect();

        let (dark, base) = if let Some(rest) = normalized.strip_prefix("dark") {
            (true, rest)
        } else if let Some(rest) = normalized.strip_prefix("bright") {
            (false, rest)
        } else {
            (false, normalized.as_str())
        };

        let bright = match base {
            "black" => Self::BLACK,
            "red" => Self::RED,
            "green" => Self::GREEN,
            "yellow" => Self::YELLOW,
            "blue" => Self::BLUE,
            "magenta" => Self::MAGENTA,
            "cyan" => Self::CYAN,
            "white" => Self::WHITE,
            "silver" => Self::SILVER,
            "gray" | "grey" => Self::GRAY,
            _ => return Self::NOCOLOR,
        };

        if !dark {
            return bright;
        }
        match bright {
            Self::WHITE => Self::SILVER,
            Self::SILVER | Self::GRAY => Self::GRAY,
            c => {
                let dim = |channel: u8| if channel > 0 { 0x8 } else { 0x0 };
                Self::rgb(dim(c.r), dim(c.g), dim(c.b))
            }
        }
    }

    /// Map a palette index (0..16) to its color; out of range gives no color.
    pub fn from_palette_index(index: u8) -> Self {
        PALETTE
            .get(usize::from(index))
            .copied()
            .unwrap_or(Self::NOCOLOR)
    }

    /// Reduce to the nearest of the 16 palette colors.
    ///
    /// Least to most significant bit: red, green, blue, bright.
    /// Returns `None` for an invalid color.
    pub fn to_palette_index(&self) -> Option<u8> {
        if !self.valid {
            return None;
        }

        let distance = |other: &Color12| {
            let dr = i32::from(self.r) - i32::from(other.r);
            let dg = i32::from(self.g) - i32::from(other.g);
            let db = i32::from(self.b) - i32::from(other.b);
            dr * dr + dg * dg + db * db
        };

        PALETTE
            .iter()
            .enumerate()
            .min_by_key(|(_, entry)| distance(entry))
            .map(|(index, _)| index as u8)
    }

    /// Create a color from hue, saturation and value, all in `[0, 1]`.
    ///
    /// The hue wraps around, so `1.25` is the same as `0.25`.
    pub fn hsv(hue: f64, saturation: f64, value: f64) -> Self {
        let h = hue.rem_euclid(1.0) * 6.0;
        let s = saturation.clamp(0.0, 1.0);
        let v = value.clamp(0.0, 1.0);

        let chroma = v * s;
        let x = chroma * (1.0 - (h % 2.0 - 1.0).abs());
        let (r, g, b) = match h as u32 {
            0 => (chroma, x, 0.0),
            1 => (x, chroma, 0.0),
            2 => (0.0, chroma, x),
            3 => (0.0, x, chroma),
            4 => (x, 0.0, chroma),
            _ => (chroma, 0.0, x),
        };
        let m = v - chroma;
        let scale = |c: f64| ((c + m) * 15.0).round() as u8;
        Self::rgb(scale(r), scale(g), scale(b))
    }

    /// Blend two colors, `factor` 0 gives `a` and 1 gives `b`.
    pub fn blend(a: Color12, b: Color12, factor: f64) -> Self {
        let mix = |x: u8, y: u8| (f64::from(x) * (1.0 - factor) + f64::from(y) * factor).round() as u8;
        Self::rgb(mix(a.r, b.r), mix(a.g, b.g), mix(a.b, b.b))
    }

    /// Whether the color is an actual color.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// The 12 bit mask (`0xrgb`).
    pub fn to_bit_mask(&self) -> u16 {
        (u16::from(self.r) << 8) | (u16::from(self.g) << 4) | u16::from(self.b)
    }

    pub fn red(&self) -> u8 {
        self.r
    }

    pub fn green(&self) -> u8 {
        self.g
    }

    pub fn blue(&self) -> u8 {
        self.b
    }

    pub fn hex_red(&self) -> char {
        hex_digit(self.r)
    }

    pub fn hex_green(&self) -> char {
        hex_digit(self.g)
    }

    pub fn hex_blue(&self) -> char {
        hex_digit(self.b)
    }

    /// Three hex digits, `rgb`.
    pub fn to_hex(&self) -> String {
        [self.hex_red(), self.hex_green(), self.hex_blue()]
            .iter()
            .collect()
    }

    /// HTML short form, `#rgb`.
    pub fn to_html(&self) -> String {
        format!("#{}", self.to_hex())
    }
}

impl fmt::Display for Color12 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.valid {
            write!(f, "{}", self.to_html())
        } else {
            write!(f, "nocolor")
        }
    }
}

const fn clamp_component(c: u8) -> u8 {
    if c > 0xf {
        0xf
    } else {
        c
    }
}

fn hex_value(c: char) -> Option<u8> {
    c.to_digit(16).map(|d| d as u8)
}

fn hex_digit(c: u8) -> char {
    char::from_digit(u32::from(c), 16).unwrap_or('0')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_round_trip() {
        for i in 0..16u8 {
            assert_eq!(Color12::from_palette_index(i).to_palette_index(), Some(i));
        }
        assert!(!Color12::from_palette_index(16).is_valid());
    }

    #[test]
    fn test_nocolor_has_no_palette_index() {
        assert_eq!(Color12::NOCOLOR.to_palette_index(), None);
        assert_eq!(Color12::default(), Color12::NOCOLOR);
        assert_ne!(Color12::NOCOLOR, Color12::BLACK);
    }

    #[test]
    fn test_nearest_palette_entry() {
        assert_eq!(Color12::rgb(0xe, 0x1, 0x0).to_palette_index(), Some(9));
        assert_eq!(Color12::rgb(0x7, 0x0, 0x1).to_palette_index(), Some(1));
        assert_eq!(Color12::rgb(0xd, 0xd, 0xd).to_palette_index(), Some(7));
    }

    #[test]
    fn test_from_name() {
        assert_eq!(Color12::from_name("red"), Color12::RED);
        assert_eq!(Color12::from_name("RED"), Color12::RED);
        assert_eq!(Color12::from_name("dark_red"), Color12::DARK_RED);
        assert_eq!(Color12::from_name("Dark Cyan"), Color12::DARK_CYAN);
        assert_eq!(Color12::from_name("bright-blue"), Color12::BLUE);
        assert_eq!(Color12::from_name("grey"), Color12::GRAY);
        assert_eq!(Color12::from_name("dark white"), Color12::SILVER);
        assert!(!Color12::from_name("pony").is_valid());
    }

    #[test]
    fn test_from_hex() {
        assert_eq!(Color12::from_hex("00f"), Color12::BLUE);
        assert_eq!(Color12::from_hex("ff8800"), Color12::rgb(0xf, 0x8, 0x0));
        assert!(!Color12::from_hex("00").is_valid());
        assert!(!Color12::from_hex("0g0").is_valid());
    }

    #[test]
    fn test_hex_channels() {
        let color = Color12::from_bit_mask(0xa5c);
        assert_eq!(color.to_bit_mask(), 0xa5c);
        assert_eq!(color.hex_red(), 'a');
        assert_eq!(color.hex_green(), '5');
        assert_eq!(color.hex_blue(), 'c');
        assert_eq!(color.to_html(), "#a5c");
    }

    #[test]
    fn test_components_clamped() {
        let color = Color12::rgb(0x20, 0x1, 0xf);
        assert_eq!(color.red(), 0xf);
    }

    #[test]
    fn test_hsv() {
        assert_eq!(Color12::hsv(0.0, 1.0, 1.0), Color12::RED);
        assert_eq!(Color12::hsv(1.0 / 3.0, 1.0, 1.0), Color12::GREEN);
        assert_eq!(Color12::hsv(2.0 / 3.0, 1.0, 1.0), Color12::BLUE);
        assert_eq!(Color12::hsv(1.0, 1.0, 1.0), Color12::RED);
        assert_eq!(Color12::hsv(0.5, 0.0, 1.0), Color12::WHITE);
    }

    #[test]
    fn test_blend() {
        assert_eq!(Color12::blend(Color12::BLACK, Color12::WHITE, 0.0), Color12::BLACK);
        assert_eq!(Color12::blend(Color12::BLACK, Color12::WHITE, 1.0), Color12::WHITE);
    }
}
