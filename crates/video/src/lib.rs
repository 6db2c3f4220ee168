//! Video capture for the overlay workspace.
//!
//! `VideoIn` pumps frames from a `VideoInDevice` on a blocking worker and
//! delivers them with discard-late-frames semantics: if the consumer has
//! not taken the previous frame yet, the new one is dropped at the source.

pub mod error;
pub mod videoframe;
pub mod videoin;

pub use error::VideoError;
pub use videoframe::VideoFrame;
pub use videoin::{VideoIn, VideoInDevice, VideoInfo};

#[cfg(feature = "v4l2")]
pub use videoin::v4l2;
