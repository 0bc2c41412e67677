#![forbid(unsafe_code)]

//! Palettes and tile color mapping.
//!
//! A tile is colored one of two ways: by department identity (a stable
//! categorical color) or by priority alignment intensity (a position on
//! a two-color ramp). Which mode applies is the caller's decision; this
//! module only guarantees that the same input always yields the same
//! color for a given scheme.

use serde::{Deserialize, Serialize};

use crate::color::Rgb;

/// Enumerated palette id selected through the configuration surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorScheme {
    /// Muted municipal blues and greens.
    #[default]
    Civic,
    /// Cool blue range.
    Ocean,
    /// Warm amber range.
    Sunset,
}

impl ColorScheme {
    /// All schemes.
    pub const ALL: [ColorScheme; 3] = [ColorScheme::Civic, ColorScheme::Ocean, ColorScheme::Sunset];

    /// Stable string id for the configuration surface.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            ColorScheme::Civic => "civic",
            ColorScheme::Ocean => "ocean",
            ColorScheme::Sunset => "sunset",
        }
    }

    /// Look up a scheme by id, returning `None` for unknown ids.
    #[must_use]
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.id() == id)
    }

    /// Categorical colors for department identity, cycled by index.
    #[must_use]
    pub const fn categorical(self) -> &'static [Rgb] {
        const CIVIC: &[Rgb] = &[
            Rgb::new(0x1f, 0x77, 0xb4),
            Rgb::new(0x2c, 0xa0, 0x2c),
            Rgb::new(0xff, 0x7f, 0x0e),
            Rgb::new(0xd6, 0x27, 0x28),
            Rgb::new(0x94, 0x67, 0xbd),
            Rgb::new(0x8c, 0x56, 0x4b),
            Rgb::new(0xe3, 0x77, 0xc2),
            Rgb::new(0x7f, 0x7f, 0x7f),
            Rgb::new(0xbc, 0xbd, 0x22),
            Rgb::new(0x17, 0xbe, 0xcf),
        ];
        const OCEAN: &[Rgb] = &[
            Rgb::new(0x03, 0x45, 0x6b),
            Rgb::new(0x0a, 0x66, 0x94),
            Rgb::new(0x18, 0x87, 0xb8),
            Rgb::new(0x3c, 0xa7, 0xd1),
            Rgb::new(0x6e, 0xc4, 0xe0),
            Rgb::new(0xa5, 0xdd, 0xeb),
        ];
        const SUNSET: &[Rgb] = &[
            Rgb::new(0x7a, 0x1f, 0x0c),
            Rgb::new(0xa8, 0x3a, 0x0e),
            Rgb::new(0xd1, 0x5c, 0x13),
            Rgb::new(0xed, 0x85, 0x2e),
            Rgb::new(0xf6, 0xae, 0x5c),
            Rgb::new(0xfb, 0xd2, 0x9c),
        ];
        match self {
            ColorScheme::Civic => CIVIC,
            ColorScheme::Ocean => OCEAN,
            ColorScheme::Sunset => SUNSET,
        }
    }

    /// Intensity ramp endpoints `(low, high)` for alignment shading.
    #[must_use]
    pub const fn ramp(self) -> (Rgb, Rgb) {
        match self {
            ColorScheme::Civic => (Rgb::new(0xde, 0xeb, 0xf7), Rgb::new(0x08, 0x51, 0x9c)),
            ColorScheme::Ocean => (Rgb::new(0xe0, 0xf3, 0xf8), Rgb::new(0x01, 0x36, 0x52)),
            ColorScheme::Sunset => (Rgb::new(0xfe, 0xed, 0xde), Rgb::new(0x8c, 0x2d, 0x04)),
        }
    }
}

/// Maps tiles to display colors for one scheme.
#[derive(Debug, Clone, Copy, Default)]
pub struct ColorMapper {
    scheme: ColorScheme,
}

impl ColorMapper {
    /// Create a mapper for the given scheme.
    #[must_use]
    pub const fn new(scheme: ColorScheme) -> Self {
        Self { scheme }
    }

    /// The scheme in use.
    #[must_use]
    pub const fn scheme(&self) -> ColorScheme {
        self.scheme
    }

    /// Categorical color for a department's position in the group order.
    ///
    /// Indices beyond the palette wrap around, so every index gets a
    /// color and equal indices always get equal colors.
    #[must_use]
    pub fn categorical(&self, index: usize) -> Rgb {
        let palette = self.scheme.categorical();
        palette[index % palette.len()]
    }

    /// Ramp color for a normalized alignment intensity in `[0, 1]`.
    #[must_use]
    pub fn intensity(&self, t: f64) -> Rgb {
        let (low, high) = self.scheme.ramp();
        low.lerp(high, t)
    }

    /// Label color (black or white) with readable contrast on `fill`.
    #[must_use]
    pub fn label_on(&self, fill: Rgb) -> Rgb {
        if fill.luminance_u8() >= 140 {
            Rgb::new(0, 0, 0)
        } else {
            Rgb::new(255, 255, 255)
        }
    }
}
