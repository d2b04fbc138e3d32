//! Whole-image watermark compositing.

use image::{RgbImage, RgbaImage};

use crate::blending::{composite_pixel, BlendConfig};
use crate::placement::Placement;

/// Channels per output pixel.
const RGB_CHANNELS: usize = 3;

/// Overlay `watermark` onto `base` and return the opaque result.
///
/// The output always has the base image's dimensions. Callers must make sure
/// the watermark fits inside the base and that a [`Placement::Single`] offset
/// keeps it fully inside; no further validation happens here.
///
/// Rows are rendered in parallel when the `parallel` feature is enabled.
#[must_use]
pub fn composite(
    base: &RgbaImage,
    watermark: &RgbaImage,
    placement: Placement,
    config: &BlendConfig,
) -> RgbImage {
    let (width, height) = base.dimensions();
    let (wm_width, wm_height) = watermark.dimensions();
    debug_assert!(wm_width <= width && wm_height <= height);

    tracing::debug!(
        width,
        height,
        wm_width,
        wm_height,
        ?placement,
        weight = config.weight.percent(),
        transparency = ?config.transparency,
        "compositing watermark"
    );

    let mut output = RgbImage::new(width, height);
    if width == 0 || height == 0 {
        return output;
    }

    let render_row = |(row, line): (usize, &mut [u8])| {
        #[allow(clippy::cast_possible_truncation)]
        let row = row as u32;
        for (col, px) in line.chunks_exact_mut(RGB_CHANNELS).enumerate() {
            #[allow(clippy::cast_possible_truncation)]
            let col = col as u32;
            let overlay = placement
                .source(col, row, wm_width, wm_height)
                .map(|(x, y)| *watermark.get_pixel(x, y));
            let out = composite_pixel(*base.get_pixel(col, row), overlay, config);
            px.copy_from_slice(&out.0);
        }
    };

    let row_len = width as usize * RGB_CHANNELS;

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        output
            .par_chunks_exact_mut(row_len)
            .enumerate()
            .for_each(render_row);
    }

    #[cfg(not(feature = "parallel"))]
    {
        output
            .chunks_exact_mut(row_len)
            .enumerate()
            .for_each(render_row);
    }

    output
}
