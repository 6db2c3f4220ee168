use base::Vec2;
use crates_image::ImageEncoder;
use image::{Image, ImageError, PixelFormat, to_rgb, yuyv_to_rgb};

#[test]
fn test_expected_len_per_format() {
    let size = Vec2::new(4, 2);
    assert_eq!(Image::new(size, vec![], PixelFormat::Rgb8).expected_len(), Some(24));
    assert_eq!(Image::new(size, vec![], PixelFormat::Yuyv).expected_len(), Some(16));
    assert_eq!(Image::new(size, vec![], PixelFormat::Jpeg).expected_len(), None);
}

#[test]
fn test_validate_rejects_short_buffer() {
    let image = Image::new(Vec2::new(2, 2), vec![0; 11], PixelFormat::Rgb8);
    assert!(matches!(
        image.validate(),
        Err(ImageError::Size {
            expected: 12,
            got: 11
        })
    ));
}

#[test]
fn test_fourcc_round_trip_and_unknown() {
    for format in [PixelFormat::Rgb8, PixelFormat::Yuyv, PixelFormat::Jpeg] {
        assert_eq!(PixelFormat::from_fourcc(format.as_fourcc()).unwrap(), format);
    }
    let nv12 = u32::from_le_bytes(*b"NV12");
    assert!(matches!(
        PixelFormat::from_fourcc(nv12),
        Err(ImageError::Format(_))
    ));
}

#[test]
fn test_yuyv_grey_stays_grey() {
    // Y=128 with neutral chroma decodes to mid grey for both pixels
    let rgb = yuyv_to_rgb(Vec2::new(2, 1), &[128, 128, 128, 128]);
    assert_eq!(rgb, vec![128; 6]);
}

#[test]
fn test_to_rgb_converts_yuyv_chroma() {
    // one red-ish pixel pair: Y=81, U=90, V=240
    let image = Image::new(Vec2::new(2, 1), vec![81, 90, 81, 240], PixelFormat::Yuyv);
    let rgb = to_rgb(image).unwrap();
    assert_eq!(rgb.format, PixelFormat::Rgb8);
    assert_eq!(rgb.data, vec![238, 14, 13, 238, 14, 13]);
}

#[test]
fn test_to_rgb_passes_rgb_through() {
    let image = Image::new(Vec2::new(1, 1), vec![1, 2, 3], PixelFormat::Rgb8);
    assert_eq!(to_rgb(image.clone()).unwrap(), image);
}

#[test]
fn test_to_rgb_decodes_png_payload() {
    // payloads are sniffed, and PNG is lossless so colors survive exactly
    let img = crates_image::RgbImage::from_fn(3, 2, |x, y| crates_image::Rgb([x as u8 * 80, y as u8 * 100, 7]));
    let mut buffer = Vec::new();
    crates_image::codecs::png::PngEncoder::new(&mut buffer)
        .write_image(img.as_raw(), 3, 2, crates_image::ExtendedColorType::Rgb8)
        .unwrap();

    let image = Image::new(Vec2::new(3, 2), buffer, PixelFormat::Jpeg);
    let rgb = to_rgb(image).unwrap();
    assert_eq!(rgb.size, Vec2::new(3, 2));
    assert_eq!(rgb.format, PixelFormat::Rgb8);
    assert_eq!(rgb.data, img.into_raw());
}
