//! Semantic segmentation overlay pipeline.
//!
//! Turns the per-pixel class-index tensor produced by an external
//! segmentation model into a color-mapped, oriented and resized bitmap,
//! and swaps it atomically into the single visible overlay while the
//! camera keeps streaming.
//!
//! Data flow:
//!
//! ```text
//! capture -> Orchestrator::on_frame -> Segmenter (at most one in flight)
//!         -> decode -> compose -> OverlayCell::swap -> RenderSurface
//! ```

pub mod bitmap;
pub mod capture;
pub mod cell;
pub mod compose;
pub mod config;
pub mod decoder;
pub mod error;
pub mod frame;
pub mod lut;
pub mod orientation;
pub mod pipeline;
pub mod segmenter;

pub use bitmap::{BYTES_PER_PIXEL, MaskBitmap};
pub use capture::{CaptureSource, FrameSource, OrientationSensor, SharedOrientation};
pub use cell::{OverlayCell, OverlayWatch, RenderSurface};
pub use compose::{OVERLAY_OPACITY, RenderableOverlay, ResizeFilter, compose, present};
pub use config::OverlayConfig;
pub use decoder::{ClassIndexTensor, decode};
pub use error::{BitmapError, ComposeError, DecodeError, FrameError, InferenceError, PipelineError};
pub use frame::Frame;
pub use lut::{ColorLut, FALLBACK_COLOR, PASCAL_VOC_LABELS, Rgb};
pub use orientation::{DeviceOrientation, ImageOrientation, OrientationMapping, resolve};
pub use pipeline::{FrameOutcome, Orchestrator, PipelineState, PipelineStats};
pub use segmenter::Segmenter;
