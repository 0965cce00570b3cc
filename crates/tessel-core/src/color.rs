//! Straight-alpha RGBA colors
//!
//! Every shape carries one of these, the background is one, and the PNG
//! palette is a list of them. Channels are stored non-premultiplied; the
//! blending helpers weight by alpha so a half-covered red pixel over
//! transparency stays red instead of drifting toward black.

use std::fmt;
use std::str::FromStr;

use crate::error::TesselError;

/// Simple RGBA color that works everywhere
///
/// Equality is exact channel equality, which is what palette
/// deduplication relies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    pub const fn black() -> Self {
        Self::rgba(0, 0, 0, 255)
    }

    pub const fn white() -> Self {
        Self::rgba(255, 255, 255, 255)
    }

    pub const fn transparent() -> Self {
        Self::rgba(0, 0, 0, 0)
    }

    #[inline]
    pub const fn is_opaque(self) -> bool {
        self.a == 255
    }

    /// Interpolate from `from` (t = 0) to `to` (t = 1)
    ///
    /// Alpha is interpolated linearly. Color channels are interpolated in
    /// premultiplied space and divided back out, so a fully transparent
    /// endpoint contributes coverage but no hue.
    pub fn mix(from: Color, to: Color, t: f32) -> Color {
        let t = t.clamp(0.0, 1.0);
        let wf = f32::from(from.a) * (1.0 - t);
        let wt = f32::from(to.a) * t;
        let alpha = wf + wt;
        if alpha <= 0.0 {
            return Color::transparent();
        }

        let channel = |cf: u8, ct: u8| -> u8 {
            ((f32::from(cf) * wf + f32::from(ct) * wt) / alpha).round() as u8
        };

        Color::rgba(
            channel(from.r, to.r),
            channel(from.g, to.g),
            channel(from.b, to.b),
            alpha.round() as u8,
        )
    }

    /// Source-over: paint `self` on top of `dst`
    pub fn over(self, dst: Color) -> Color {
        if self.a == 255 || dst.a == 0 {
            return self;
        }
        if self.a == 0 {
            return dst;
        }

        let sa = f32::from(self.a) / 255.0;
        let da = f32::from(dst.a) / 255.0;
        let out_a = sa + da * (1.0 - sa);

        let channel = |s: u8, d: u8| -> u8 {
            ((f32::from(s) * sa + f32::from(d) * da * (1.0 - sa)) / out_a).round() as u8
        };

        Color::rgba(
            channel(self.r, dst.r),
            channel(self.g, dst.g),
            channel(self.b, dst.b),
            (out_a * 255.0).round() as u8,
        )
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
    }
}

impl FromStr for Color {
    type Err = TesselError;

    /// Accepts `#rgb`, `#rgba`, `#rrggbb` and `#rrggbbaa` (the `#` is optional)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim().trim_start_matches('#');
        let invalid = || TesselError::ConfigError(format!("Invalid color: {s:?}"));

        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let nibble = |i: usize| -> Result<u8, TesselError> {
            u8::from_str_radix(&hex[i..i + 1], 16)
                .map(|v| v * 17)
                .map_err(|_| invalid())
        };
        let byte = |i: usize| -> Result<u8, TesselError> {
            u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid())
        };

        match hex.len() {
            3 => Ok(Color::rgb(nibble(0)?, nibble(1)?, nibble(2)?)),
            4 => Ok(Color::rgba(nibble(0)?, nibble(1)?, nibble(2)?, nibble(3)?)),
            6 => Ok(Color::rgb(byte(0)?, byte(2)?, byte(4)?)),
            8 => Ok(Color::rgba(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
            _ => Err(invalid()),
        }
    }
}
