//! Input validation pipeline, job execution and output writing.

use std::fmt;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::codecs::jpeg::JpegEncoder;
use image::{ColorType, ImageError, ImageFormat, ImageReader, RgbImage, RgbaImage};

use crate::blending::{BlendConfig, Transparency};
use crate::compositor;
use crate::error::{Error, Result};
use crate::params;
use crate::placement::{Placement, PlacementMode};

/// JPEG quality used when writing output.
const JPEG_QUALITY: u8 = 100;

/// Which of the two input images an operation refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageRole {
    /// The image being watermarked.
    Base,
    /// The image drawn on top.
    Watermark,
}

impl fmt::Display for ImageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Base => f.write_str("image"),
            Self::Watermark => f.write_str("watermark"),
        }
    }
}

/// A decoded input image.
#[derive(Debug, Clone)]
pub struct SourceImage {
    /// Pixels expanded to RGBA. Sources without alpha are fully opaque.
    pub pixels: RgbaImage,
    /// Whether the source file carried an alpha channel.
    pub has_alpha: bool,
}

impl SourceImage {
    /// `(width, height)` of the image.
    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }
}

/// Load an image and check that it is 8-bit RGB or RGBA.
///
/// The decoder is chosen from the file contents, so the extension does not
/// have to match the format.
///
/// # Errors
///
/// Returns [`Error::MissingFile`] if the file cannot be read and
/// [`Error::UnsupportedFormat`] if it cannot be decoded or has the wrong layout.
pub fn load_image(path: &Path, role: ImageRole) -> Result<SourceImage> {
    let missing = |_: std::io::Error| Error::MissingFile {
        path: path.to_path_buf(),
    };

    let img = ImageReader::open(path)
        .map_err(missing)?
        .with_guessed_format()
        .map_err(missing)?
        .decode()
        .map_err(|e| match e {
            ImageError::IoError(err) => missing(err),
            other => Error::UnsupportedFormat {
                role,
                reason: other.to_string(),
            },
        })?;

    let color = img.color();
    check_color_layout(color, role)?;

    let source = SourceImage {
        has_alpha: color.has_alpha(),
        pixels: img.into_rgba8(),
    };
    tracing::debug!(
        %role,
        path = %path.display(),
        width = source.pixels.width(),
        height = source.pixels.height(),
        has_alpha = source.has_alpha,
        "loaded image"
    );
    Ok(source)
}

/// Accept only 3 or 4 color components at 24 or 32 bits per pixel.
fn check_color_layout(color: ColorType, role: ImageRole) -> Result<()> {
    let channels = color.channel_count();
    if channels != 3 && channels != 4 {
        return Err(Error::UnsupportedFormat {
            role,
            reason: format!("{channels} color components, expected 3 or 4"),
        });
    }

    let bits = color.bits_per_pixel();
    if bits != 24 && bits != 32 {
        return Err(Error::UnsupportedFormat {
            role,
            reason: format!("{bits}-bit pixels, expected 24 or 32"),
        });
    }

    Ok(())
}

/// Encoding of the output file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// `.jpg`
    Jpeg,
    /// `.png`
    Png,
}

impl OutputFormat {
    /// Pick the format from the file extension, which must be exactly `jpg` or `png`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidOutputExtension`] for any other extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("jpg") => Ok(Self::Jpeg),
            Some("png") => Ok(Self::Png),
            _ => Err(Error::InvalidOutputExtension(path.to_path_buf())),
        }
    }

    /// File extension for this format.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
        }
    }
}

/// Raw, unvalidated inputs for one watermarking run.
#[derive(Debug, Clone, Default)]
pub struct JobRequest {
    /// Path of the base image.
    pub image: PathBuf,
    /// Path of the watermark image.
    pub watermark: PathBuf,
    /// Honor the watermark's alpha channel (only if it has one).
    pub use_alpha: bool,
    /// Chroma-key color as `"R G B"` (only if the watermark has no alpha).
    pub chroma_key: Option<String>,
    /// Transparency percentage as typed.
    pub weight: String,
    /// `single` or `grid`.
    pub mode: String,
    /// Position as `"X Y"`, required for `single`.
    pub position: Option<String>,
    /// Output path ending in `.jpg` or `.png`.
    pub output: PathBuf,
}

impl JobRequest {
    /// Run every validation stage in order and build a ready-to-run job.
    ///
    /// Stops at the first failing stage.
    ///
    /// # Errors
    ///
    /// Returns the error of the first stage that fails: file loading, format
    /// checks, dimension check, chroma-key color, weight, placement mode,
    /// position, then output extension.
    pub fn validate(&self) -> Result<WatermarkJob> {
        let base = load_image(&self.image, ImageRole::Base)?;
        let watermark = load_image(&self.watermark, ImageRole::Watermark)?;

        let Some((max_x, max_y)) =
            Placement::max_offset(base.dimensions(), watermark.dimensions())
        else {
            return Err(Error::DimensionMismatch {
                image: base.dimensions(),
                watermark: watermark.dimensions(),
            });
        };

        let transparency = self.transparency(watermark.has_alpha)?;
        let weight = params::parse_weight(&self.weight)?;

        let placement = match self.mode.parse::<PlacementMode>()? {
            PlacementMode::Grid => Placement::Grid,
            PlacementMode::Single => {
                let text = self.position.as_deref().ok_or_else(|| Error::InvalidPosition {
                    input: String::new(),
                    reason: format!("single placement needs a position within 0-{max_x} 0-{max_y}"),
                })?;
                let (x, y) = params::parse_position(text, max_x, max_y)?;
                Placement::Single { x, y }
            }
        };

        let format = OutputFormat::from_path(&self.output)?;

        Ok(WatermarkJob {
            base: base.pixels,
            watermark: watermark.pixels,
            placement,
            config: BlendConfig::new(weight).with_transparency(transparency),
            output: self.output.clone(),
            format,
        })
    }

    /// Alpha mode applies only to watermarks with alpha, chroma key only to those without.
    fn transparency(&self, watermark_has_alpha: bool) -> Result<Transparency> {
        if watermark_has_alpha {
            if self.chroma_key.is_some() {
                tracing::warn!("watermark has an alpha channel; ignoring chroma key");
            }
            return Ok(if self.use_alpha {
                Transparency::Alpha
            } else {
                Transparency::None
            });
        }

        if self.use_alpha {
            tracing::warn!("watermark has no alpha channel; ignoring alpha mode");
        }
        match self.chroma_key.as_deref() {
            Some(text) => Ok(Transparency::ChromaKey(params::parse_color(text)?)),
            None => Ok(Transparency::None),
        }
    }
}

/// A fully validated watermarking run.
#[derive(Debug, Clone)]
pub struct WatermarkJob {
    /// Base image pixels.
    pub base: RgbaImage,
    /// Watermark pixels, guaranteed to fit inside `base`.
    pub watermark: RgbaImage,
    /// Where the watermark goes, guaranteed in bounds.
    pub placement: Placement,
    /// How pixels are blended.
    pub config: BlendConfig,
    /// Destination file.
    pub output: PathBuf,
    /// Encoding of `output`.
    pub format: OutputFormat,
}

impl WatermarkJob {
    /// Composite the watermark onto the base image.
    #[must_use]
    pub fn render(&self) -> RgbImage {
        compositor::composite(&self.base, &self.watermark, self.placement, &self.config)
    }

    /// Composite and write the result, returning the written path.
    ///
    /// # Errors
    ///
    /// Returns an error if the output directory cannot be created or encoding fails.
    pub fn run(&self) -> Result<&Path> {
        let rendered = self.render();

        if let Some(parent) = self.output.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        save_image(&rendered, &self.output, self.format)?;
        tracing::info!(path = %self.output.display(), "wrote watermarked image");
        Ok(self.output.as_path())
    }
}

/// Save an RGB image in the given format.
///
/// The image is encoded in memory first; nothing is written when encoding fails.
///
/// # Errors
///
/// Returns an error if encoding fails or the file cannot be written.
pub fn save_image(img: &RgbImage, path: &Path, format: OutputFormat) -> Result<()> {
    let mut encoded = Vec::new();
    match format {
        OutputFormat::Jpeg => {
            let mut encoder = JpegEncoder::new_with_quality(&mut encoded, JPEG_QUALITY);
            encoder.encode_image(img)?;
        }
        OutputFormat::Png => {
            img.write_to(&mut Cursor::new(&mut encoded), ImageFormat::Png)?;
        }
    }

    std::fs::write(path, encoded)?;
    Ok(())
}

/// Generate a default output path next to the base image.
///
/// Example: `"photo.jpg"` becomes `"photo_watermarked.jpg"`. Extensions other
/// than `jpg`/`png` fall back to `png`.
#[must_use]
pub fn default_output_path(image: &Path) -> PathBuf {
    let stem = image.file_stem().unwrap_or_default().to_string_lossy();
    let format = OutputFormat::from_path(image).unwrap_or(OutputFormat::Png);
    let parent = image.parent().unwrap_or(Path::new("."));
    parent.join(format!("{stem}_watermarked.{}", format.extension()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_layout_accepts_rgb8_and_rgba8() {
        assert!(check_color_layout(ColorType::Rgb8, ImageRole::Base).is_ok());
        assert!(check_color_layout(ColorType::Rgba8, ImageRole::Watermark).is_ok());
    }

    #[test]
    fn color_layout_rejects_wrong_channel_count() {
        for color in [ColorType::L8, ColorType::La8, ColorType::L16] {
            let err = check_color_layout(color, ImageRole::Base).unwrap_err();
            let Error::UnsupportedFormat { reason, .. } = err else {
                panic!("expected UnsupportedFormat, got {err:?}");
            };
            assert!(reason.contains("components"), "{color:?}: {reason}");
        }
    }

    #[test]
    fn color_layout_rejects_wide_pixels() {
        for color in [ColorType::Rgb16, ColorType::Rgba16, ColorType::Rgb32F] {
            let err = check_color_layout(color, ImageRole::Watermark).unwrap_err();
            let Error::UnsupportedFormat { reason, .. } = err else {
                panic!("expected UnsupportedFormat, got {err:?}");
            };
            assert!(reason.contains("-bit"), "{color:?}: {reason}");
        }
    }

    #[test]
    fn output_format_requires_exact_extension() {
        assert_eq!(OutputFormat::from_path(Path::new("out.jpg")).unwrap(), OutputFormat::Jpeg);
        assert_eq!(OutputFormat::from_path(Path::new("a/b.png")).unwrap(), OutputFormat::Png);

        for bad in ["out.jpeg", "out.JPG", "out.gif", "out", "png"] {
            assert!(
                matches!(
                    OutputFormat::from_path(Path::new(bad)),
                    Err(Error::InvalidOutputExtension(_))
                ),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn default_output_path_appends_watermarked_suffix() {
        let p = default_output_path(Path::new("/tmp/photo.jpg"));
        assert_eq!(p, PathBuf::from("/tmp/photo_watermarked.jpg"));

        let p = default_output_path(Path::new("scan.bmp"));
        assert_eq!(
            p.file_name().unwrap().to_str().unwrap(),
            "scan_watermarked.png"
        );
    }

    #[test]
    fn missing_image_is_reported_before_anything_else() {
        let request = JobRequest {
            image: PathBuf::from("/definitely/not/here.png"),
            watermark: PathBuf::from("/also/not/here.png"),
            weight: "oops".to_string(),
            mode: "nonsense".to_string(),
            output: PathBuf::from("out.gif"),
            ..JobRequest::default()
        };
        let err = request.validate().unwrap_err();
        assert!(matches!(err, Error::MissingFile { ref path } if path.ends_with("here.png")));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn failed_encode_leaves_no_file_behind() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("empty.jpg");

        // JPEG cannot encode a zero-sized frame.
        let err = save_image(&RgbImage::new(0, 0), &path, OutputFormat::Jpeg).unwrap_err();
        assert!(matches!(err, Error::Image(_)), "{err:?}");
        assert!(!path.exists());
    }

    #[test]
    fn save_writes_decodable_png_and_jpeg() {
        let dir = tempfile::TempDir::new().unwrap();
        let img = RgbImage::from_pixel(3, 2, image::Rgb([10, 200, 30]));

        for format in [OutputFormat::Png, OutputFormat::Jpeg] {
            let path = dir.path().join(format!("out.{}", format.extension()));
            save_image(&img, &path, format).unwrap();
            let decoded = image::open(&path).unwrap();
            assert_eq!((decoded.width(), decoded.height()), (3, 2));
        }
    }

    #[test]
    fn role_display_names() {
        assert_eq!(ImageRole::Base.to_string(), "image");
        assert_eq!(ImageRole::Watermark.to_string(), "watermark");
    }
}
