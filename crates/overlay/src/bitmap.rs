use crate::*;
use base::Vec2;
use crates_image::RgbImage;

pub const BYTES_PER_PIXEL: usize = 3;

/// Packed RGB mask, row-major, `size.x` pixels per row, no padding, no alpha.
#[derive(Debug, Clone, PartialEq)]
pub struct MaskBitmap {
    size: Vec2<usize>,
    data: Vec<u8>,
}

impl MaskBitmap {
    pub fn new(size: Vec2<usize>, data: Vec<u8>) -> Result<Self, BitmapError> {
        let expected = size
            .checked_area()
            .and_then(|area| area.checked_mul(BYTES_PER_PIXEL));
        if expected != Some(data.len()) {
            return Err(BitmapError {
                size,
                len: data.len(),
            });
        }
        Ok(Self { size, data })
    }

    pub fn size(&self) -> Vec2<usize> {
        self.size
    }

    pub fn width(&self) -> usize {
        self.size.x
    }

    pub fn height(&self) -> usize {
        self.size.y
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Color at column `x`, row `y`.
    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgb> {
        if x >= self.size.x || y >= self.size.y {
            return None;
        }
        let offset = (y * self.size.x + x) * BYTES_PER_PIXEL;
        let px = &self.data[offset..offset + BYTES_PER_PIXEL];
        Some(Rgb::new(px[0], px[1], px[2]))
    }

    pub(crate) fn into_rgb_image(self) -> Result<RgbImage, BitmapError> {
        let size = self.size;
        let len = self.data.len();
        let (Ok(width), Ok(height)) = (u32::try_from(size.x), u32::try_from(size.y)) else {
            return Err(BitmapError { size, len });
        };
        RgbImage::from_raw(width, height, self.data).ok_or(BitmapError { size, len })
    }

    pub(crate) fn from_rgb_image(image: RgbImage) -> Result<Self, BitmapError> {
        let (width, height) = image.dimensions();
        Self::new(
            Vec2::new(width as usize, height as usize),
            image.into_raw(),
        )
    }
}
