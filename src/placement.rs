//! Mapping from base-image coordinates to watermark coordinates.
//!
//! - **Single**: one watermark with its top-left corner at `(x, y)`
//! - **Grid**: the watermark tiled from `(0, 0)` across the whole base image

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Where the watermark is drawn on the base image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// One watermark instance, top-left corner at `(x, y)`.
    Single {
        /// Column offset within the base image.
        x: u32,
        /// Row offset within the base image.
        y: u32,
    },
    /// The watermark repeated every `width` columns and `height` rows.
    Grid,
}

impl Placement {
    /// Map a base coordinate to the watermark pixel covering it.
    ///
    /// Returns `None` when no watermark pixel lands on `(col, row)`. Grid
    /// placement covers every coordinate unless the watermark is empty.
    #[must_use]
    pub fn source(self, col: u32, row: u32, wm_width: u32, wm_height: u32) -> Option<(u32, u32)> {
        match self {
            Self::Grid => Some((col.checked_rem(wm_width)?, row.checked_rem(wm_height)?)),
            Self::Single { x, y } => {
                let dx = col.checked_sub(x)?;
                let dy = row.checked_sub(y)?;
                (dx < wm_width && dy < wm_height).then_some((dx, dy))
            }
        }
    }

    /// Largest valid single-placement offset for the given dimensions.
    ///
    /// Returns `None` when the watermark is larger than the base image.
    #[must_use]
    pub fn max_offset(base: (u32, u32), watermark: (u32, u32)) -> Option<(u32, u32)> {
        Some((
            base.0.checked_sub(watermark.0)?,
            base.1.checked_sub(watermark.1)?,
        ))
    }
}

/// Placement keyword as typed by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementMode {
    /// `single`
    Single,
    /// `grid`
    Grid,
}

impl FromStr for PlacementMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "single" => Ok(Self::Single),
            "grid" => Ok(Self::Grid),
            other => Err(Error::InvalidPlacementMode(other.to_string())),
        }
    }
}

impl fmt::Display for PlacementMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single => f.write_str("single"),
            Self::Grid => f.write_str("grid"),
        }
    }
}
