//! Backlight colour and pattern types

use std::fmt;

/// RGB color value
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RgbColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl RgbColor {
    /// Create a new RGB color
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Black (all LEDs off)
    pub const BLACK: Self = Self { r: 0, g: 0, b: 0 };
    /// White (all LEDs full)
    pub const WHITE: Self = Self {
        r: 255,
        g: 255,
        b: 255,
    };
    /// Red
    pub const RED: Self = Self { r: 255, g: 0, b: 0 };
}

impl fmt::Display for RgbColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Backlight pattern opcode
///
/// The firmware accepts any byte here; only the named values have been
/// observed to do something useful.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pattern(pub u8);

impl Pattern {
    /// Solid colour at the given RGB and brightness
    pub const STATIC: Self = Self(0x00);
    /// Colour fading in and out (unused by the daemon)
    pub const BREATHING: Self = Self(0x01);
    /// Cycling rainbow; colour and brightness bytes are ignored by the device
    pub const RAINBOW: Self = Self(0x02);

    /// Raw opcode byte
    pub fn opcode(self) -> u8 {
        self.0
    }

    /// Get the display name for this pattern
    pub fn name(self) -> &'static str {
        match self {
            Self::STATIC => "static",
            Self::BREATHING => "breathing",
            Self::RAINBOW => "rainbow",
            _ => "unknown",
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (0x{:02x})", self.name(), self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_names() {
        assert_eq!(Pattern::STATIC.name(), "static");
        assert_eq!(Pattern::RAINBOW.name(), "rainbow");
        assert_eq!(Pattern(0x7f).name(), "unknown");
        assert_eq!(Pattern::RAINBOW.to_string(), "rainbow (0x02)");
    }

    #[test]
    fn test_color_display() {
        assert_eq!(RgbColor::RED.to_string(), "#ff0000");
        assert_eq!(RgbColor::new(0x12, 0xab, 0x00).to_string(), "#12ab00");
    }
}
