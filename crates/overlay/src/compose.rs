use crate::*;
use base::Rect;
use crates_image::imageops::{self, FilterType};

/// Blend factor the overlay is presented with.
pub const OVERLAY_OPACITY: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResizeFilter {
    /// Keeps class colors exact, edges stay blocky.
    #[default]
    Nearest,
    /// Bilinear, smoother edges with blended colors along class borders.
    Triangle,
}

impl ResizeFilter {
    fn filter_type(self) -> FilterType {
        match self {
            ResizeFilter::Nearest => FilterType::Nearest,
            ResizeFilter::Triangle => FilterType::Triangle,
        }
    }
}

/// A finished mask, ready to be blended over the live video.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderableOverlay {
    pub bitmap: MaskBitmap,
    pub dest: Rect<usize>,
    pub opacity: f32,
}

/// Stretch `bitmap` to fill `dest` and package it with `opacity`.
///
/// The source aspect ratio is not preserved, matching the fill scaling
/// used on the model input.
pub fn present(
    bitmap: MaskBitmap,
    dest: Rect<usize>,
    opacity: f32,
    filter: ResizeFilter,
) -> Result<RenderableOverlay, ComposeError> {
    if dest.is_empty() {
        return Err(ComposeError::EmptyDestination(dest.size));
    }
    if !(0.0..=1.0).contains(&opacity) {
        return Err(ComposeError::Opacity(opacity));
    }

    let bitmap = if bitmap.size() == dest.size {
        bitmap
    } else {
        let (Ok(width), Ok(height)) = (u32::try_from(dest.size.x), u32::try_from(dest.size.y))
        else {
            return Err(ComposeError::OversizedDestination(dest.size));
        };
        let source = bitmap.into_rgb_image()?;
        let resized = imageops::resize(&source, width, height, filter.filter_type());
        MaskBitmap::from_rgb_image(resized)?
    };

    Ok(RenderableOverlay {
        bitmap,
        dest,
        opacity,
    })
}

/// Orient `bitmap` for display, then present it at `OVERLAY_OPACITY`.
pub fn compose(
    bitmap: MaskBitmap,
    display: ImageOrientation,
    dest: Rect<usize>,
    filter: ResizeFilter,
) -> Result<RenderableOverlay, ComposeError> {
    let oriented = display.apply(bitmap)?;
    present(oriented, dest, OVERLAY_OPACITY, filter)
}
