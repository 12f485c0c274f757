use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ColorError {
    #[error("Color channel '{channel}' is out of range [0, 1] (value: {value})")]
    ChannelOutOfRange { channel: char, value: f64 },
    #[error("Malformed hex color '{0}' (expected six hexadecimal digits, e.g. 'FF00FF')")]
    MalformedHex(String),
}

/// A display color stored as normalized RGB, every channel within `[0, 1]`.
///
/// Channels are snapped to the nearest multiple of 1/255, the resolution of the
/// hex form RRNG files carry, so a color survives a write and re-read unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Color {
    r: f64,
    g: f64,
    b: f64,
}

impl Color {
    pub const BLACK: Color = Color {
        r: 0.0,
        g: 0.0,
        b: 0.0,
    };

    pub fn new(r: f64, g: f64, b: f64) -> Result<Self, ColorError> {
        for (channel, value) in [('r', r), ('g', g), ('b', b)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ColorError::ChannelOutOfRange { channel, value });
            }
        }
        let snap = |v: f64| (v * 255.0).round() / 255.0;
        Ok(Self {
            r: snap(r),
            g: snap(g),
            b: snap(b),
        })
    }

    /// Decodes a six digit hex color such as `FF00FF` or `#33ffcc`.
    pub fn from_hex(hex: &str) -> Result<Self, ColorError> {
        let digits = hex.trim();
        let digits = digits.strip_prefix('#').unwrap_or(digits);
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ColorError::MalformedHex(hex.to_string()));
        }
        let channel = |i: usize| -> Result<f64, ColorError> {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .map(|v| f64::from(v) / 255.0)
                .map_err(|_| ColorError::MalformedHex(hex.to_string()))
        };
        Self::new(channel(0)?, channel(2)?, channel(4)?)
    }

    /// Upper-case six digit hex without a leading `#`.
    pub fn to_hex(&self) -> String {
        let byte = |v: f64| (v * 255.0).round() as u8;
        format!("{:02X}{:02X}{:02X}", byte(self.r), byte(self.g), byte(self.b))
    }

    pub fn r(&self) -> f64 {
        self.r
    }

    pub fn g(&self) -> f64 {
        self.g
    }

    pub fn b(&self) -> f64 {
        self.b
    }

    pub fn as_tuple(&self) -> (f64, f64, f64) {
        (self.r, self.g, self.b)
    }
}

impl FromStr for Color {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.to_hex())
    }
}

/// Either form a color may be supplied in; normalized with [`ColorSpec::resolve`].
#[derive(Debug, Clone, PartialEq)]
pub enum ColorSpec {
    Rgb(f64, f64, f64),
    Hex(String),
}

impl ColorSpec {
    pub fn resolve(self) -> Result<Color, ColorError> {
        match self {
            ColorSpec::Rgb(r, g, b) => Color::new(r, g, b),
            ColorSpec::Hex(hex) => Color::from_hex(&hex),
        }
    }
}

impl From<(f64, f64, f64)> for ColorSpec {
    fn from((r, g, b): (f64, f64, f64)) -> Self {
        ColorSpec::Rgb(r, g, b)
    }
}

impl From<&str> for ColorSpec {
    fn from(hex: &str) -> Self {
        ColorSpec::Hex(hex.to_string())
    }
}

impl From<String> for ColorSpec {
    fn from(hex: String) -> Self {
        ColorSpec::Hex(hex)
    }
}

impl From<Color> for ColorSpec {
    fn from(color: Color) -> Self {
        ColorSpec::Rgb(color.r, color.g, color.b)
    }
}
