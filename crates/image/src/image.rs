use crate::*;
use base::Vec2;

/// A frame buffer as it came off the capture device.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    pub size: Vec2<usize>,
    pub data: Vec<u8>,
    pub format: PixelFormat,
}

impl Image {
    pub fn new(size: Vec2<usize>, data: Vec<u8>, format: PixelFormat) -> Self {
        Self { size, data, format }
    }

    /// Byte length a well-formed buffer of this size and format has.
    /// Compressed formats have no fixed length and return `None`.
    pub fn expected_len(&self) -> Option<usize> {
        let bpp = self.format.bytes_per_pixel()?;
        self.size.checked_area()?.checked_mul(bpp)
    }

    /// Check that the buffer length agrees with the declared size.
    pub fn validate(&self) -> Result<(), ImageError> {
        match self.expected_len() {
            Some(expected) if expected != self.data.len() => Err(ImageError::Size {
                expected,
                got: self.data.len(),
            }),
            _ => Ok(()),
        }
    }
}
