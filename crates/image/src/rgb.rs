use crate::{pixelformat::yuv_to_rgb, *};
use base::Vec2;

/// Unpack YUYV 4:2:2 into packed RGB. Two pixels share one chroma pair.
pub fn yuyv_to_rgb(size: Vec2<usize>, data: &[u8]) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(size.x * size.y * 3);
    for chunk in data.chunks_exact(4) {
        let (r0, g0, b0) = yuv_to_rgb(chunk[0], chunk[1], chunk[3]);
        let (r1, g1, b1) = yuv_to_rgb(chunk[2], chunk[1], chunk[3]);
        rgb.extend_from_slice(&[r0, g0, b0, r1, g1, b1]);
    }
    rgb
}

pub fn jpeg_to_rgb(data: &[u8]) -> Result<Image, ImageError> {
    let decoded = crates_image::load_from_memory(data)?.to_rgb8();
    let (width, height) = decoded.dimensions();
    Ok(Image::new(
        Vec2::new(width as usize, height as usize),
        decoded.into_raw(),
        PixelFormat::Rgb8,
    ))
}

/// Convert any captured image into packed RGB.
pub fn to_rgb(image: Image) -> Result<Image, ImageError> {
    image.validate()?;
    match image.format {
        PixelFormat::Rgb8 => Ok(image),
        PixelFormat::Yuyv => {
            let data = yuyv_to_rgb(image.size, &image.data);
            Ok(Image::new(image.size, data, PixelFormat::Rgb8))
        }
        PixelFormat::Jpeg => jpeg_to_rgb(&image.data),
    }
}
