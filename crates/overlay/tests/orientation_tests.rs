use base::Vec2;
use overlay::{DeviceOrientation, ImageOrientation, MaskBitmap, OrientationMapping, Rgb, resolve};

// 3x2 bitmap whose red channel numbers the pixels row-major
//   0 1 2
//   3 4 5
fn numbered() -> MaskBitmap {
    let data = (0..6u8).flat_map(|i| [i, 0, 0]).collect();
    MaskBitmap::new(Vec2::new(3, 2), data).unwrap()
}

fn rows(bitmap: &MaskBitmap) -> Vec<Vec<u8>> {
    (0..bitmap.height())
        .map(|y| {
            (0..bitmap.width())
                .map(|x| bitmap.pixel(x, y).unwrap().r)
                .collect()
        })
        .collect()
}

#[test]
fn test_resolve_table() {
    use ImageOrientation::*;
    let cases = [
        (DeviceOrientation::Portrait, Up, Right),
        (DeviceOrientation::PortraitUpsideDown, Left, Left),
        (DeviceOrientation::LandscapeLeft, UpMirrored, Up),
        (DeviceOrientation::LandscapeRight, Down, Down),
        (DeviceOrientation::Unknown, Up, Up),
        (DeviceOrientation::FaceUp, Up, Up),
        (DeviceOrientation::FaceDown, Up, Up),
    ];
    for (device, capture, display) in cases {
        assert_eq!(resolve(device), OrientationMapping { capture, display }, "{device:?}");
    }
}

#[test]
fn test_resolve_is_deterministic() {
    assert_eq!(
        resolve(DeviceOrientation::Portrait),
        resolve(DeviceOrientation::Portrait)
    );
}

#[test]
fn test_up_is_identity() {
    let bitmap = numbered();
    assert_eq!(ImageOrientation::Up.apply(bitmap.clone()).unwrap(), bitmap);
}

#[test]
fn test_quarter_turns_swap_dimensions() {
    for orientation in [
        ImageOrientation::Left,
        ImageOrientation::LeftMirrored,
        ImageOrientation::Right,
        ImageOrientation::RightMirrored,
    ] {
        assert!(orientation.is_transposing());
        let turned = orientation.apply(numbered()).unwrap();
        assert_eq!(turned.size(), Vec2::new(2, 3), "{orientation:?}");
    }
    assert!(!ImageOrientation::Down.is_transposing());
}

#[test]
fn test_right_turns_clockwise() {
    let turned = ImageOrientation::Right.apply(numbered()).unwrap();
    assert_eq!(rows(&turned), vec![vec![3, 0], vec![4, 1], vec![5, 2]]);
}

#[test]
fn test_left_turns_counter_clockwise() {
    let turned = ImageOrientation::Left.apply(numbered()).unwrap();
    assert_eq!(rows(&turned), vec![vec![2, 5], vec![1, 4], vec![0, 3]]);
}

#[test]
fn test_half_turn_and_mirrors() {
    let down = ImageOrientation::Down.apply(numbered()).unwrap();
    assert_eq!(rows(&down), vec![vec![5, 4, 3], vec![2, 1, 0]]);

    let mirrored = ImageOrientation::UpMirrored.apply(numbered()).unwrap();
    assert_eq!(rows(&mirrored), vec![vec![2, 1, 0], vec![5, 4, 3]]);

    let flipped = ImageOrientation::DownMirrored.apply(numbered()).unwrap();
    assert_eq!(rows(&flipped), vec![vec![3, 4, 5], vec![0, 1, 2]]);
}

#[test]
fn test_orientation_keeps_colors() {
    let bitmap = MaskBitmap::new(Vec2::new(1, 1), vec![192, 128, 128]).unwrap();
    let turned = ImageOrientation::RightMirrored.apply(bitmap).unwrap();
    assert_eq!(turned.pixel(0, 0), Some(Rgb::new(192, 128, 128)));
}
