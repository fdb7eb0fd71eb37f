use palette::{LinSrgb, Srgb};
use thiserror::Error;

/// Straight-alpha sRGB color, the unit every theme slot is stored in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorParseError {
    #[error("color must start with '#'")]
    MissingHash,
    #[error("color must have 3, 6 or 8 hex digits, got {0}")]
    BadLength(usize),
    #[error("invalid hex digit in {0:?}")]
    BadDigit(String),
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);
    pub const BLACK: Rgba = Rgba::rgb(0, 0, 0);
    pub const TRANSPARENT: Rgba = Rgba::rgba(0, 0, 0, 0);

    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    #[inline]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Linear blend toward `other`; `t` is clamped to `[0, 1]` so hover and
    /// fade animations can overshoot without wrapping channels.
    pub fn mix(self, other: Rgba, t: f32) -> Rgba {
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        let lerp = |a: u8, b: u8| -> u8 {
            (a as f32 + (b as f32 - a as f32) * t).round().clamp(0.0, 255.0) as u8
        };
        Rgba {
            r: lerp(self.r, other.r),
            g: lerp(self.g, other.g),
            b: lerp(self.b, other.b),
            a: lerp(self.a, other.a),
        }
    }

    /// Scale the alpha channel by `factor` (used for fades).
    pub fn fade(self, factor: f32) -> Rgba {
        let a = (self.a as f32 * factor.clamp(0.0, 1.0)).round() as u8;
        self.with_alpha(a)
    }

    /// WCAG relative luminance computed in linear light.
    pub fn relative_luminance(&self) -> f32 {
        let lin: LinSrgb<f32> = Srgb::new(
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        )
        .into_linear();
        0.2126 * lin.red + 0.7152 * lin.green + 0.0722 * lin.blue
    }

    /// Pick whichever of `light` / `dark` reads better on `self`.
    pub fn readable_text_on(&self, light: Rgba, dark: Rgba) -> Rgba {
        if self.relative_luminance() > 0.45 { dark } else { light }
    }

    /// Parse `#RGB`, `#RRGGBB` or `#RRGGBBAA`. Surrounding whitespace is ignored.
    pub fn parse_hex(input: &str) -> Result<Rgba, ColorParseError> {
        let s = input.trim();
        let digits = s.strip_prefix('#').ok_or(ColorParseError::MissingHash)?;
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ColorParseError::BadDigit(s.to_string()));
        }
        let byte = |i: usize| -> Result<u8, ColorParseError> {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .map_err(|_| ColorParseError::BadDigit(s.to_string()))
        };
        match digits.len() {
            3 => {
                let mut out = [0u8; 3];
                for (slot, c) in out.iter_mut().zip(digits.chars()) {
                    // to_digit cannot fail after the is_ascii_hexdigit check above
                    let v = c.to_digit(16).unwrap_or(0) as u8;
                    *slot = v * 17;
                }
                Ok(Rgba::rgb(out[0], out[1], out[2]))
            }
            6 => Ok(Rgba::rgb(byte(0)?, byte(2)?, byte(4)?)),
            8 => Ok(Rgba::rgba(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
            n => Err(ColorParseError::BadLength(n)),
        }
    }

    /// Uppercase `#RRGGBB`, or `#RRGGBBAA` when not fully opaque.
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            format!("#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        }
    }

    /// Packed `0x00RRGGBB`, the layout softbuffer expects.
    pub fn to_xrgb_u32(&self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }
}

/// True for `#RGB` / `#RRGGBB`, the two syntaxes the edit dialog accepts.
pub fn is_rgb_hex(input: &str) -> bool {
    let s = input.trim();
    matches!(s.len(), 4 | 7) && Rgba::parse_hex(s).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_short_and_long_forms() {
        assert_eq!(Rgba::parse_hex("#fff"), Ok(Rgba::WHITE));
        assert_eq!(Rgba::parse_hex("#1A2b3C"), Ok(Rgba::rgb(0x1a, 0x2b, 0x3c)));
        assert_eq!(Rgba::parse_hex("#00000080"), Ok(Rgba::rgba(0, 0, 0, 128)));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert_eq!(Rgba::parse_hex("fff"), Err(ColorParseError::MissingHash));
        assert_eq!(Rgba::parse_hex("#ff"), Err(ColorParseError::BadLength(2)));
        assert!(matches!(Rgba::parse_hex("#gggggg"), Err(ColorParseError::BadDigit(_))));
        assert!(matches!(Rgba::parse_hex("#ééé"), Err(ColorParseError::BadDigit(_))));
    }

    #[test]
    fn hex_round_trip_all_channels() {
        for v in (0..=255u16).step_by(17) {
            let c = Rgba::rgb(v as u8, 255 - v as u8, (v as u8).wrapping_mul(3));
            assert_eq!(Rgba::parse_hex(&c.to_hex()), Ok(c));
        }
    }

    #[test]
    fn mix_endpoints_and_midpoint() {
        let a = Rgba::rgb(0, 0, 0);
        let b = Rgba::rgb(200, 100, 50);
        assert_eq!(a.mix(b, 0.0), a);
        assert_eq!(a.mix(b, 1.0), b);
        assert_eq!(a.mix(b, 0.5), Rgba::rgb(100, 50, 25));
        assert_eq!(a.mix(b, 7.0), b);
    }

    #[test]
    fn readable_text_prefers_dark_on_white() {
        let light = Rgba::WHITE;
        let dark = Rgba::BLACK;
        assert_eq!(Rgba::WHITE.readable_text_on(light, dark), dark);
        assert_eq!(Rgba::rgb(20, 20, 30).readable_text_on(light, dark), light);
    }

    #[test]
    fn rgb_hex_validator() {
        assert!(is_rgb_hex("#abc"));
        assert!(is_rgb_hex("#A0B1C2"));
        assert!(!is_rgb_hex("#A0B1C2FF"));
        assert!(!is_rgb_hex("A0B1C2"));
    }
}
