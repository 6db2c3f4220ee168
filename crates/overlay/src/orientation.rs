use crate::*;
use crates_image::imageops;

/// Physical orientation of the device as reported by its motion sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DeviceOrientation {
    #[default]
    Unknown,
    Portrait,
    PortraitUpsideDown,
    LandscapeLeft,
    LandscapeRight,
    FaceUp,
    FaceDown,
}

impl DeviceOrientation {
    pub(crate) fn to_u8(self) -> u8 {
        match self {
            DeviceOrientation::Unknown => 0,
            DeviceOrientation::Portrait => 1,
            DeviceOrientation::PortraitUpsideDown => 2,
            DeviceOrientation::LandscapeLeft => 3,
            DeviceOrientation::LandscapeRight => 4,
            DeviceOrientation::FaceUp => 5,
            DeviceOrientation::FaceDown => 6,
        }
    }

    pub(crate) fn from_u8(value: u8) -> Self {
        match value {
            1 => DeviceOrientation::Portrait,
            2 => DeviceOrientation::PortraitUpsideDown,
            3 => DeviceOrientation::LandscapeLeft,
            4 => DeviceOrientation::LandscapeRight,
            5 => DeviceOrientation::FaceUp,
            6 => DeviceOrientation::FaceDown,
            _ => DeviceOrientation::Unknown,
        }
    }
}

/// How stored pixels must be transformed to appear upright, EXIF style.
///
/// `Up` is the natural landscape orientation of the capture hardware.
/// `Left` and `Right` name the side the top of the image currently points
/// to, so `Right` is undone by a clockwise quarter turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ImageOrientation {
    #[default]
    Up,
    UpMirrored,
    Down,
    DownMirrored,
    Left,
    LeftMirrored,
    Right,
    RightMirrored,
}

impl ImageOrientation {
    /// True when applying this orientation swaps width and height.
    pub fn is_transposing(self) -> bool {
        matches!(
            self,
            ImageOrientation::Left
                | ImageOrientation::LeftMirrored
                | ImageOrientation::Right
                | ImageOrientation::RightMirrored
        )
    }

    /// Produce an upright copy of `bitmap`. Mirrored variants flip
    /// horizontally before rotating.
    pub fn apply(self, bitmap: MaskBitmap) -> Result<MaskBitmap, BitmapError> {
        if self == ImageOrientation::Up {
            return Ok(bitmap);
        }
        let size = if self.is_transposing() {
            bitmap.size().transposed()
        } else {
            bitmap.size()
        };
        let image = bitmap.into_rgb_image()?;
        let oriented = match self {
            ImageOrientation::Up => image,
            ImageOrientation::UpMirrored => imageops::flip_horizontal(&image),
            ImageOrientation::Down => imageops::rotate180(&image),
            ImageOrientation::DownMirrored => imageops::flip_vertical(&image),
            ImageOrientation::Left => imageops::rotate270(&image),
            ImageOrientation::LeftMirrored => imageops::rotate270(&imageops::flip_horizontal(&image)),
            ImageOrientation::Right => imageops::rotate90(&image),
            ImageOrientation::RightMirrored => imageops::rotate90(&imageops::flip_horizontal(&image)),
        };
        MaskBitmap::new(size, oriented.into_raw())
    }
}

/// Orientation handed to the model with the captured image, and the one
/// applied to the decoded mask before it is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrientationMapping {
    pub capture: ImageOrientation,
    pub display: ImageOrientation,
}

/// Map a device orientation reading to capture and display orientations.
///
/// Flat and unknown readings fall back to the hardware's natural landscape
/// orientation.
pub fn resolve(device: DeviceOrientation) -> OrientationMapping {
    use ImageOrientation::*;
    let (capture, display) = match device {
        DeviceOrientation::Portrait => (Up, Right),
        DeviceOrientation::PortraitUpsideDown => (Left, Left),
        DeviceOrientation::LandscapeLeft => (UpMirrored, Up),
        DeviceOrientation::LandscapeRight => (Down, Down),
        DeviceOrientation::Unknown | DeviceOrientation::FaceUp | DeviceOrientation::FaceDown => {
            (Up, Up)
        }
    };
    OrientationMapping { capture, display }
}
