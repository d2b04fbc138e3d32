//! Per-pixel blend rule for watermark overlay.
//!
//! Each covered channel is mixed linearly by an integer percentage:
//! `out = (weight * watermark + (100 - weight) * base) / 100`
//!
//! Division truncates. Watermark pixels excluded by the alpha or chroma-key
//! rule leave the base pixel untouched. Output pixels are always opaque RGB.

use image::{Rgb, Rgba};

/// Blend weight as an integer percentage in `0..=100`.
///
/// `0` leaves the base image untouched, `100` replaces covered pixels with the
/// watermark color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Weight(u8);

impl Weight {
    /// Largest accepted percentage.
    pub const MAX: u8 = 100;

    /// Create a weight, or `None` if `percent` exceeds [`Weight::MAX`].
    #[must_use]
    pub fn new(percent: u8) -> Option<Self> {
        (percent <= Self::MAX).then_some(Self(percent))
    }

    /// The percentage this weight holds.
    #[must_use]
    pub fn percent(self) -> u8 {
        self.0
    }
}

/// Which watermark pixels are treated as fully transparent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Transparency {
    /// Every covered watermark pixel is blended.
    #[default]
    None,
    /// Watermark pixels with alpha `0` are skipped. Non-zero alpha is ignored.
    Alpha,
    /// Watermark pixels whose RGB equals this color are skipped.
    ChromaKey(Rgb<u8>),
}

/// Parameters of the blend applied to every covered pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlendConfig {
    /// How strongly the watermark color contributes.
    pub weight: Weight,
    /// Exclusion rule for watermark pixels.
    pub transparency: Transparency,
}

impl BlendConfig {
    /// Blend with `weight` and no transparency rule.
    #[must_use]
    pub fn new(weight: Weight) -> Self {
        Self {
            weight,
            transparency: Transparency::None,
        }
    }

    /// Replace the transparency rule.
    #[must_use]
    pub fn with_transparency(mut self, transparency: Transparency) -> Self {
        self.transparency = transparency;
        self
    }

    /// Whether `watermark` is transparent under this config and must not touch the base.
    #[must_use]
    pub fn excludes(&self, watermark: Rgba<u8>) -> bool {
        let Rgba([r, g, b, a]) = watermark;
        match self.transparency {
            Transparency::None => false,
            Transparency::Alpha => a == 0,
            Transparency::ChromaKey(key) => key == Rgb([r, g, b]),
        }
    }
}

/// Mix one channel. `weight` must be at most 100.
#[inline]
#[allow(clippy::cast_possible_truncation)] // a convex mix of two u8 values stays <= 255
fn blend_channel(watermark: u8, base: u8, weight: u16) -> u8 {
    ((weight * u16::from(watermark) + (100 - weight) * u16::from(base)) / 100) as u8
}

/// Compute one output pixel.
///
/// `watermark` is the watermark pixel mapped onto this coordinate, or `None`
/// when the watermark does not cover it. Uncovered and excluded pixels yield
/// the base color with its alpha dropped.
#[must_use]
pub fn composite_pixel(
    base: Rgba<u8>,
    watermark: Option<Rgba<u8>>,
    config: &BlendConfig,
) -> Rgb<u8> {
    let Rgba([br, bg, bb, _]) = base;

    let Some(wm) = watermark.filter(|wm| !config.excludes(*wm)) else {
        return Rgb([br, bg, bb]);
    };

    let weight = u16::from(config.weight.percent());
    Rgb([
        blend_channel(wm[0], br, weight),
        blend_channel(wm[1], bg, weight),
        blend_channel(wm[2], bb, weight),
    ])
}
