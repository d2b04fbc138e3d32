//! Parsing and range-checking of textual blend parameters.
//!
//! Every parser trims surrounding whitespace and splits on runs of
//! whitespace, so `"10  20"` and `" 10 20 "` are equivalent.

use image::Rgb;

use crate::blending::Weight;
use crate::error::{Error, Result};

/// Parse a transparency percentage (integer `0..=100`).
///
/// # Errors
///
/// Returns [`Error::InvalidWeight`] if the text is not an integer or is out of range.
pub fn parse_weight(input: &str) -> Result<Weight> {
    let invalid = |reason| Error::InvalidWeight {
        input: input.to_string(),
        reason,
    };

    let value: i64 = input
        .trim()
        .parse()
        .map_err(|_| invalid("not an integer number"))?;

    u8::try_from(value)
        .ok()
        .and_then(Weight::new)
        .ok_or_else(|| invalid("out of range 0-100"))
}

/// Parse a chroma-key color written as `"R G B"`, each channel `0..=255`.
///
/// # Errors
///
/// Returns [`Error::InvalidColorInput`] if there are not exactly three integer
/// channels or any channel is out of range.
pub fn parse_color(input: &str) -> Result<Rgb<u8>> {
    let invalid = |reason| Error::InvalidColorInput {
        input: input.to_string(),
        reason,
    };

    let values = parse_integers(input).ok_or_else(|| invalid("channels must be integers"))?;
    let [r, g, b] = values[..] else {
        return Err(invalid("expected three channels [Red] [Green] [Blue]"));
    };

    let channel = |v: i64| u8::try_from(v).map_err(|_| invalid("channels must be within 0-255"));
    Ok(Rgb([channel(r)?, channel(g)?, channel(b)?]))
}

/// Parse a watermark position written as `"X Y"`, bounded by `0..=max_x` and `0..=max_y`.
///
/// # Errors
///
/// Returns [`Error::InvalidPosition`] if the text is not two integers or the
/// point falls outside the allowed range.
pub fn parse_position(input: &str, max_x: u32, max_y: u32) -> Result<(u32, u32)> {
    let invalid = |reason: String| Error::InvalidPosition {
        input: input.to_string(),
        reason,
    };

    let values =
        parse_integers(input).ok_or_else(|| invalid("coordinates must be integers".to_string()))?;
    let [x, y] = values[..] else {
        return Err(invalid("expected two coordinates [x] [y]".to_string()));
    };

    let x = bounded(x, max_x).ok_or_else(|| invalid(format!("x must be within 0-{max_x}")))?;
    let y = bounded(y, max_y).ok_or_else(|| invalid(format!("y must be within 0-{max_y}")))?;
    Ok((x, y))
}

/// Split on whitespace and parse each token, or `None` if any token is not an integer.
fn parse_integers(input: &str) -> Option<Vec<i64>> {
    input
        .split_whitespace()
        .map(|token| token.parse().ok())
        .collect()
}

fn bounded(value: i64, max: u32) -> Option<u32> {
    u32::try_from(value).ok().filter(|&v| v <= max)
}
