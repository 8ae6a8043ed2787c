//! Color model
//!
//! A codel is either one of the twelve chromatic colors (a [`Hue`] paired with
//! a [`Lightness`]) or one of the two achromatic colors, [`Color::White`] and
//! [`Color::Black`]. Hue and lightness are both cyclic, which is what makes
//! the color-transition table in [`crate::interpreter::operation`] work.

use std::fmt;
use std::str::FromStr;

/// Hue component of a chromatic color, in cyclic order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Hue {
    Red,
    Yellow,
    Green,
    Cyan,
    Blue,
    Magenta,
}

impl Hue {
    pub const ALL: [Hue; 6] = [
        Hue::Red,
        Hue::Yellow,
        Hue::Green,
        Hue::Cyan,
        Hue::Blue,
        Hue::Magenta,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Hue `steps` positions further around the cycle (negative goes back)
    pub fn shifted(self, steps: i64) -> Hue {
        let idx = (self.index() + steps.rem_euclid(6) as usize) % 6;
        Hue::ALL[idx]
    }

    fn letter(self) -> char {
        match self {
            Hue::Red => 'R',
            Hue::Yellow => 'Y',
            Hue::Green => 'G',
            Hue::Cyan => 'C',
            Hue::Blue => 'B',
            Hue::Magenta => 'M',
        }
    }
}

/// Lightness component of a chromatic color, in cyclic order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Lightness {
    Light,
    Normal,
    Dark,
}

impl Lightness {
    pub const ALL: [Lightness; 3] = [Lightness::Light, Lightness::Normal, Lightness::Dark];

    pub fn index(self) -> usize {
        self as usize
    }
}

/// Color of a single codel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Chromatic(Hue, Lightness),
    White,
    Black,
}

impl Color {
    /// Every color in palette order: the chromatic colors hue by hue, then white and black
    pub const ALL: [Color; 20] = {
        use Hue::*;
        use Lightness::*;
        [
            Color::Chromatic(Red, Light),
            Color::Chromatic(Red, Normal),
            Color::Chromatic(Red, Dark),
            Color::Chromatic(Yellow, Light),
            Color::Chromatic(Yellow, Normal),
            Color::Chromatic(Yellow, Dark),
            Color::Chromatic(Green, Light),
            Color::Chromatic(Green, Normal),
            Color::Chromatic(Green, Dark),
            Color::Chromatic(Cyan, Light),
            Color::Chromatic(Cyan, Normal),
            Color::Chromatic(Cyan, Dark),
            Color::Chromatic(Blue, Light),
            Color::Chromatic(Blue, Normal),
            Color::Chromatic(Blue, Dark),
            Color::Chromatic(Magenta, Light),
            Color::Chromatic(Magenta, Normal),
            Color::Chromatic(Magenta, Dark),
            Color::White,
            Color::Black,
        ]
    };

    pub const fn chromatic(hue: Hue, lightness: Lightness) -> Self {
        Color::Chromatic(hue, lightness)
    }

    pub fn is_white(self) -> bool {
        matches!(self, Color::White)
    }

    pub fn is_black(self) -> bool {
        matches!(self, Color::Black)
    }

    /// Canonical display color as `(r, g, b)`
    pub fn rgb(self) -> (u8, u8, u8) {
        // Light variants raise the zero channels to 0xC0, dark variants lower the
        // full channels to 0xC0.
        let (hue, lightness) = match self {
            Color::White => return (0xFF, 0xFF, 0xFF),
            Color::Black => return (0x00, 0x00, 0x00),
            Color::Chromatic(hue, lightness) => (hue, lightness),
        };
        let (r, g, b) = match hue {
            Hue::Red => (true, false, false),
            Hue::Yellow => (true, true, false),
            Hue::Green => (false, true, false),
            Hue::Cyan => (false, true, true),
            Hue::Blue => (false, false, true),
            Hue::Magenta => (true, false, true),
        };
        let (on, off) = match lightness {
            Lightness::Light => (0xFF, 0xC0),
            Lightness::Normal => (0xFF, 0x00),
            Lightness::Dark => (0xC0, 0x00),
        };
        let channel = |lit: bool| if lit { on } else { off };
        (channel(r), channel(g), channel(b))
    }

    /// Canonical `#RRGGBB` code
    pub fn hex(self) -> String {
        let (r, g, b) = self.rgb();
        format!("#{:02X}{:02X}{:02X}", r, g, b)
    }

    /// Same color with its hue shifted; achromatic colors are unchanged
    pub fn with_hue_shift(self, steps: i64) -> Color {
        match self {
            Color::Chromatic(hue, lightness) => Color::Chromatic(hue.shifted(steps), lightness),
            other => other,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Color::White => "W".to_string(),
            Color::Black => "K".to_string(),
            Color::Chromatic(hue, Lightness::Light) => format!("l{}", hue.letter()),
            Color::Chromatic(hue, Lightness::Normal) => hue.letter().to_string(),
            Color::Chromatic(hue, Lightness::Dark) => format!("d{}", hue.letter()),
        };
        f.pad(&text)
    }
}

/// Error returned when a color mnemonic or hex code is not recognized
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseColorError {
    pub token: String,
}

impl fmt::Display for ParseColorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown color '{}'", self.token)
    }
}

impl std::error::Error for ParseColorError {}

impl FromStr for Color {
    type Err = ParseColorError;

    /// Parse a mnemonic (`lR`, `R`, `dR`, ..., `W`, `K`) or a canonical `#RRGGBB` code
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.starts_with('#') {
            return Color::ALL
                .iter()
                .copied()
                .find(|c| c.hex().eq_ignore_ascii_case(s))
                .ok_or_else(|| ParseColorError {
                    token: s.to_string(),
                });
        }

        let (lightness, rest) = match s.as_bytes().first() {
            Some(b'l') => (Lightness::Light, &s[1..]),
            Some(b'd') => (Lightness::Dark, &s[1..]),
            _ => (Lightness::Normal, s),
        };

        let hue = match rest {
            "W" if lightness == Lightness::Normal => return Ok(Color::White),
            "K" if lightness == Lightness::Normal => return Ok(Color::Black),
            "R" => Hue::Red,
            "Y" => Hue::Yellow,
            "G" => Hue::Green,
            "C" => Hue::Cyan,
            "B" => Hue::Blue,
            "M" => Hue::Magenta,
            _ => {
                return Err(ParseColorError {
                    token: s.to_string(),
                })
            }
        };

        Ok(Color::Chromatic(hue, lightness))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_codes() {
        assert_eq!(Color::chromatic(Hue::Red, Lightness::Light).hex(), "#FFC0C0");
        assert_eq!(Color::chromatic(Hue::Red, Lightness::Normal).hex(), "#FF0000");
        assert_eq!(Color::chromatic(Hue::Red, Lightness::Dark).hex(), "#C00000");
        assert_eq!(Color::chromatic(Hue::Cyan, Lightness::Dark).hex(), "#00C0C0");
        assert_eq!(Color::chromatic(Hue::Magenta, Lightness::Light).hex(), "#FFC0FF");
        assert_eq!(Color::White.hex(), "#FFFFFF");
        assert_eq!(Color::Black.hex(), "#000000");
    }

    #[test]
    fn test_mnemonic_round_trip() {
        for color in Color::ALL {
            let text = color.to_string();
            assert_eq!(text.parse::<Color>(), Ok(color), "mnemonic {}", text);
            assert_eq!(color.hex().parse::<Color>(), Ok(color));
        }
    }

    #[test]
    fn test_rejects_unknown_tokens() {
        assert!("lW".parse::<Color>().is_err());
        assert!("X".parse::<Color>().is_err());
        assert!("#123456".parse::<Color>().is_err());
        assert!("".parse::<Color>().is_err());
    }

    #[test]
    fn test_hue_shift_wraps() {
        assert_eq!(Hue::Magenta.shifted(1), Hue::Red);
        assert_eq!(Hue::Red.shifted(-1), Hue::Magenta);
        assert_eq!(Hue::Green.shifted(12), Hue::Green);
        assert_eq!(Color::White.with_hue_shift(3), Color::White);
    }
}
