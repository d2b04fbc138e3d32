//! Error types for the watermark-overlay crate.

use std::path::PathBuf;

use crate::engine::ImageRole;

/// Errors that can occur while validating inputs and writing the composite.
///
/// Every variant except [`Error::Io`] and [`Error::Image`] is raised while
/// collecting inputs, before any pixel is composited.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An input file does not resolve to a readable image.
    #[error("the file {} doesn't exist or can't be read", .path.display())]
    MissingFile {
        /// Path that failed to open.
        path: PathBuf,
    },

    /// The image could not be decoded, or its color layout is not 8-bit RGB/RGBA.
    #[error("unsupported {role} format: {reason}")]
    UnsupportedFormat {
        /// Which input image was rejected.
        role: ImageRole,
        /// Why the image was rejected.
        reason: String,
    },

    /// The watermark does not fit inside the base image.
    #[error(
        "the watermark's dimensions ({}x{}) are larger than the image ({}x{})",
        .watermark.0, .watermark.1, .image.0, .image.1
    )]
    DimensionMismatch {
        /// Base image `(width, height)`.
        image: (u32, u32),
        /// Watermark `(width, height)`.
        watermark: (u32, u32),
    },

    /// The chroma-key color text is not three integers in `0..=255`.
    #[error("the transparency color input {input:?} is invalid: {reason}")]
    InvalidColorInput {
        /// Raw text as given.
        input: String,
        /// What was wrong with it.
        reason: &'static str,
    },

    /// The transparency percentage is not an integer in `0..=100`.
    #[error("the transparency percentage {input:?} is invalid: {reason}")]
    InvalidWeight {
        /// Raw text as given.
        input: String,
        /// What was wrong with it.
        reason: &'static str,
    },

    /// The position text is malformed, missing, or places the watermark out of bounds.
    #[error("the position input {input:?} is invalid: {reason}")]
    InvalidPosition {
        /// Raw text as given (empty when no position was supplied).
        input: String,
        /// What was wrong with it.
        reason: String,
    },

    /// The placement keyword is neither `single` nor `grid`.
    #[error("the position method {0:?} is invalid (expected \"single\" or \"grid\")")]
    InvalidPlacementMode(String),

    /// The output file extension is neither `jpg` nor `png`.
    #[error("the output file extension of {} isn't \"jpg\" or \"png\"", .0.display())]
    InvalidOutputExtension(PathBuf),

    /// An I/O error occurred while writing the output.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The image encoder failed while writing the output.
    #[error("image processing error: {0}")]
    Image(#[from] image::ImageError),
}

impl Error {
    /// Process exit status for this error kind. Each kind maps to its own code.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::MissingFile { .. } => 1,
            Self::UnsupportedFormat { .. } => 2,
            Self::DimensionMismatch { .. } => 3,
            Self::InvalidColorInput { .. } => 4,
            Self::InvalidWeight { .. } => 5,
            Self::InvalidPosition { .. } => 6,
            Self::InvalidPlacementMode(_) => 7,
            Self::InvalidOutputExtension(_) => 8,
            Self::Io(_) => 9,
            Self::Image(_) => 10,
        }
    }
}

/// A specialized `Result` type for this crate.
pub type Result<T> = std::result::Result<T, Error>;
