use image::{Rgb, Rgba, RgbaImage};
use proptest::prelude::*;
use watermark_overlay::{composite, BlendConfig, Placement, Transparency, Weight};

fn image_of(width: u32, height: u32) -> impl Strategy<Value = RgbaImage> {
    prop::collection::vec(any::<u8>(), (width * height * 4) as usize)
        .prop_map(move |raw| RgbaImage::from_raw(width, height, raw).unwrap())
}

/// A base image with a watermark no larger than it.
fn base_and_watermark() -> impl Strategy<Value = (RgbaImage, RgbaImage)> {
    (1u32..=12, 1u32..=12).prop_flat_map(|(w, h)| {
        (
            image_of(w, h),
            (1..=w, 1..=h).prop_flat_map(|(ww, wh)| image_of(ww, wh)),
        )
    })
}

/// Images plus an in-bounds single placement.
fn single_setup() -> impl Strategy<Value = (RgbaImage, RgbaImage, Placement)> {
    base_and_watermark().prop_flat_map(|(base, wm)| {
        let max_x = base.width() - wm.width();
        let max_y = base.height() - wm.height();
        (Just(base), Just(wm), (0..=max_x, 0..=max_y))
            .prop_map(|(base, wm, (x, y))| (base, wm, Placement::Single { x, y }))
    })
}

fn weight() -> impl Strategy<Value = Weight> {
    (0u8..=100).prop_map(|p| Weight::new(p).unwrap())
}

fn rgb(px: Rgba<u8>) -> Rgb<u8> {
    Rgb([px[0], px[1], px[2]])
}

proptest! {
    #[test]
    fn output_matches_base_dimensions((base, wm) in base_and_watermark(), w in weight()) {
        let out = composite(&base, &wm, Placement::Grid, &BlendConfig::new(w));
        prop_assert_eq!(out.dimensions(), base.dimensions());
    }

    #[test]
    fn zero_weight_is_identity((base, wm, placement) in single_setup(), grid in any::<bool>()) {
        let placement = if grid { Placement::Grid } else { placement };
        let config = BlendConfig::new(Weight::new(0).unwrap());
        let out = composite(&base, &wm, placement, &config);
        for (col, row, px) in out.enumerate_pixels() {
            prop_assert_eq!(*px, rgb(*base.get_pixel(col, row)));
        }
    }

    #[test]
    fn full_weight_copies_watermark_rgb((base, wm, placement) in single_setup()) {
        let config = BlendConfig::new(Weight::new(100).unwrap());
        let out = composite(&base, &wm, placement, &config);
        for (col, row, px) in out.enumerate_pixels() {
            let expected = match placement.source(col, row, wm.width(), wm.height()) {
                Some((x, y)) => rgb(*wm.get_pixel(x, y)),
                None => rgb(*base.get_pixel(col, row)),
            };
            prop_assert_eq!(*px, expected);
        }
    }

    #[test]
    fn pixels_outside_single_rectangle_are_base(
        (base, wm, placement) in single_setup(),
        w in weight(),
    ) {
        let Placement::Single { x, y } = placement else { unreachable!() };
        let out = composite(&base, &wm, placement, &BlendConfig::new(w));
        for (col, row, px) in out.enumerate_pixels() {
            let inside = (x..x + wm.width()).contains(&col) && (y..y + wm.height()).contains(&row);
            if !inside {
                prop_assert_eq!(*px, rgb(*base.get_pixel(col, row)));
            }
        }
    }

    #[test]
    fn grid_output_repeats_every_tile_period(
        (base, wm) in base_and_watermark(),
        w in weight(),
        fill in any::<[u8; 3]>(),
    ) {
        // Uniform base so the output depends only on the watermark source.
        let [r, g, b] = fill;
        let base = RgbaImage::from_pixel(base.width(), base.height(), Rgba([r, g, b, 255]));
        let out = composite(&base, &wm, Placement::Grid, &BlendConfig::new(w));
        for (col, row, px) in out.enumerate_pixels() {
            if col + wm.width() < out.width() {
                prop_assert_eq!(px, out.get_pixel(col + wm.width(), row));
            }
            if row + wm.height() < out.height() {
                prop_assert_eq!(px, out.get_pixel(col, row + wm.height()));
            }
        }
    }

    #[test]
    fn chroma_keyed_pixels_never_change_base(
        (base, wm) in base_and_watermark(),
        w in weight(),
    ) {
        // Key on the first watermark pixel so at least one pixel per tile matches.
        let key = rgb(*wm.get_pixel(0, 0));
        let config = BlendConfig::new(w).with_transparency(Transparency::ChromaKey(key));
        let out = composite(&base, &wm, Placement::Grid, &config);
        for (col, row, px) in out.enumerate_pixels() {
            let src = wm.get_pixel(col % wm.width(), row % wm.height());
            if rgb(*src) == key {
                prop_assert_eq!(*px, rgb(*base.get_pixel(col, row)));
            }
        }
    }

    #[test]
    fn transparent_pixels_never_change_base_in_alpha_mode(
        (base, wm) in base_and_watermark(),
        w in weight(),
    ) {
        let config = BlendConfig::new(w).with_transparency(Transparency::Alpha);
        let out = composite(&base, &wm, Placement::Grid, &config);
        for (col, row, px) in out.enumerate_pixels() {
            let src = wm.get_pixel(col % wm.width(), row % wm.height());
            if src[3] == 0 {
                prop_assert_eq!(*px, rgb(*base.get_pixel(col, row)));
            }
        }
    }
}
