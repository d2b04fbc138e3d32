//! Overlay a watermark image onto a base image.
//!
//! The watermark is drawn once at a fixed offset or tiled across the whole
//! base image. Each covered pixel is mixed by an integer percentage, and
//! watermark pixels can be made transparent through their alpha channel or a
//! chroma-key color.
//!
//! # Quick Start
//!
//! ```no_run
//! use watermark_overlay::{composite, BlendConfig, Placement, Weight};
//!
//! let base = image::open("photo.jpg").unwrap().to_rgba8();
//! let logo = image::open("logo.png").unwrap().to_rgba8();
//! let config = BlendConfig::new(Weight::new(40).unwrap());
//! let out = composite(&base, &logo, Placement::Single { x: 16, y: 16 }, &config);
//! out.save("watermarked.png").unwrap();
//! ```
//!
//! # Validated Jobs
//!
//! [`JobRequest`] takes raw text parameters, checks them stage by stage, and
//! yields a [`WatermarkJob`] that renders and writes the output.
//!
//! ```no_run
//! use watermark_overlay::JobRequest;
//!
//! let request = JobRequest {
//!     image: "photo.jpg".into(),
//!     watermark: "logo.png".into(),
//!     use_alpha: true,
//!     weight: "40".to_string(),
//!     mode: "grid".to_string(),
//!     output: "watermarked.png".into(),
//!     ..JobRequest::default()
//! };
//! let job = request.validate().expect("invalid parameters");
//! job.run().expect("failed to write output");
//! ```

#![deny(missing_docs)]

pub mod blending;
pub mod compositor;
mod engine;
pub mod error;
pub mod params;
pub mod placement;

pub use blending::{composite_pixel, BlendConfig, Transparency, Weight};
pub use compositor::composite;
pub use engine::{
    default_output_path, load_image, save_image, ImageRole, JobRequest, OutputFormat, SourceImage,
    WatermarkJob,
};
pub use error::{Error, Result};
pub use placement::{Placement, PlacementMode};
