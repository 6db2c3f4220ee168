//! Captured image buffers for the overlay workspace.
//!
//! An `Image` is a raw frame as delivered by a capture backend, tagged with
//! its pixel format. Everything downstream of capture works on packed RGB,
//! so this crate also carries the conversions into `PixelFormat::Rgb8`.

pub mod error;
pub mod image;
pub mod pixelformat;
pub mod rgb;

pub use error::ImageError;
pub use image::Image;
pub use pixelformat::{PixelFormat, fourcc_to_string};
pub use rgb::{jpeg_to_rgb, to_rgb, yuyv_to_rgb};
