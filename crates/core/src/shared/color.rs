use std::str::FromStr;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ColorParseError {
    #[error("color value is empty")]
    Empty,
    #[error("invalid hex color '{0}': expected #RRGGBB or #RGB")]
    InvalidHex(String),
}

/// Rectangle outline color as an RGB triple.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RectColor {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl RectColor {
    pub const GREEN: RectColor = RectColor::new(0, 255, 0);

    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    pub fn rgb(self) -> [u8; 3] {
        [self.red, self.green, self.blue]
    }

    /// Parses `#RRGGBB`, `RRGGBB`, or the `#RGB` shorthand.
    pub fn from_hex(input: &str) -> Result<Self, ColorParseError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ColorParseError::Empty);
        }
        let hex = trimmed.strip_prefix('#').unwrap_or(trimmed);
        let invalid = || ColorParseError::InvalidHex(trimmed.to_string());
        if !hex.is_ascii() {
            return Err(invalid());
        }

        match hex.len() {
            3 => {
                let nibble = |i: usize| {
                    u8::from_str_radix(&hex[i..i + 1], 16)
                        .map(|v| v * 17)
                        .map_err(|_| invalid())
                };
                Ok(Self::new(nibble(0)?, nibble(1)?, nibble(2)?))
            }
            6 => {
                let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
                Ok(Self::new(byte(0)?, byte(2)?, byte(4)?))
            }
            _ => Err(invalid()),
        }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.red, self.green, self.blue)
    }
}

impl Default for RectColor {
    fn default() -> Self {
        Self::GREEN
    }
}

impl FromStr for RectColor {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl std::fmt::Display for RectColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}
