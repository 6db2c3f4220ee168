use overlay::{ColorLut, FALLBACK_COLOR, PASCAL_VOC_LABELS, Rgb};

#[test]
fn test_every_class_index_gets_a_color() {
    let lut = ColorLut::pascal_voc();
    let expected = [
        (i32::MIN, FALLBACK_COLOR),
        (-1, FALLBACK_COLOR),
        (0, Rgb::new(0, 0, 0)),
        (7, Rgb::new(128, 128, 128)),
        (15, Rgb::new(192, 128, 128)),
        (20, Rgb::new(0, 0, 0)),
        (21, FALLBACK_COLOR),
        (255, FALLBACK_COLOR),
        (i32::MAX, FALLBACK_COLOR),
    ];
    for (class, color) in expected {
        assert_eq!(lut.color_for(class), color, "class {class}");
    }

    // a table without black entries tells table hits from the fallback
    let lut = ColorLut::new(vec![Rgb::new(9, 9, 9); 3]);
    for class in [i32::MIN, -1, 3, i32::MAX] {
        assert_eq!(lut.color_for(class), FALLBACK_COLOR, "class {class}");
    }
    for class in 0..3 {
        assert_eq!(lut.color_for(class), Rgb::new(9, 9, 9), "class {class}");
    }
}

#[test]
fn test_unknown_classes_use_fallback() {
    let lut = ColorLut::pascal_voc();
    assert_eq!(lut.color_for(-1), FALLBACK_COLOR);
    assert_eq!(lut.color_for(21), FALLBACK_COLOR);
    assert_eq!(lut.color_for(i32::MAX), FALLBACK_COLOR);
}

#[test]
fn test_grouped_classes_share_colors() {
    let lut = ColorLut::pascal_voc();
    // animals
    for class in [3, 8, 10, 12, 13, 17] {
        assert_eq!(lut.color_for(class), Rgb::new(192, 0, 128), "class {class}");
    }
    // vehicles
    for class in [6, 7, 19] {
        assert_eq!(lut.color_for(class), Rgb::new(128, 128, 128), "class {class}");
    }
    assert_eq!(lut.color_for(2), lut.color_for(14));
    assert_eq!(lut.color_for(9), lut.color_for(18));
}

#[test]
fn test_lookup_is_stable() {
    let lut = ColorLut::default();
    let first: Vec<Rgb> = (0..21).map(|class| lut.color_for(class)).collect();
    let second: Vec<Rgb> = (0..21).map(|class| lut.color_for(class)).collect();
    assert_eq!(first, second);
}

#[test]
fn test_custom_table() {
    let lut = ColorLut::new(vec![Rgb::new(1, 2, 3), Rgb::new(4, 5, 6)]);
    assert_eq!(lut.len(), 2);
    assert_eq!(lut.color_for(1), Rgb::new(4, 5, 6));
    assert_eq!(lut.color_for(2), FALLBACK_COLOR);
    assert!(ColorLut::new(Vec::new()).is_empty());
}

#[test]
fn test_labels() {
    assert_eq!(PASCAL_VOC_LABELS[0], "background");
    assert_eq!(ColorLut::label_for(20), Some("tvmonitor"));
    assert_eq!(ColorLut::label_for(-3), None);
    assert_eq!(ColorLut::label_for(21), None);
}
