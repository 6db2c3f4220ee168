#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

/// Color of every class index the table does not know, negatives included.
pub const FALLBACK_COLOR: Rgb = Rgb::new(0, 0, 0);

/// Class labels of the Pascal VOC segmentation models, by class index.
pub const PASCAL_VOC_LABELS: [&str; 21] = [
    "background",
    "aeroplane",
    "bicycle",
    "bird",
    "boat",
    "bottle",
    "bus",
    "car",
    "cat",
    "chair",
    "cow",
    "diningtable",
    "dog",
    "horse",
    "motorbike",
    "person",
    "pottedplant",
    "sheep",
    "sofa",
    "train",
    "tvmonitor",
];

// grouped classes share a color, unhighlighted ones are black
const PASCAL_VOC_COLORS: [Rgb; 21] = [
    Rgb::new(0, 0, 0),       // background
    Rgb::new(0, 0, 0),       // aeroplane
    Rgb::new(64, 128, 128),  // bicycle
    Rgb::new(192, 0, 128),   // bird
    Rgb::new(0, 0, 0),       // boat
    Rgb::new(128, 0, 128),   // bottle
    Rgb::new(128, 128, 128), // bus
    Rgb::new(128, 128, 128), // car
    Rgb::new(192, 0, 128),   // cat
    Rgb::new(192, 0, 0),     // chair
    Rgb::new(192, 0, 128),   // cow
    Rgb::new(0, 0, 0),       // diningtable
    Rgb::new(192, 0, 128),   // dog
    Rgb::new(192, 0, 128),   // horse
    Rgb::new(64, 128, 128),  // motorbike
    Rgb::new(192, 128, 128), // person
    Rgb::new(0, 64, 0),      // pottedplant
    Rgb::new(192, 0, 128),   // sheep
    Rgb::new(192, 0, 0),     // sofa
    Rgb::new(128, 128, 128), // train
    Rgb::new(0, 0, 0),       // tvmonitor
];

/// Immutable class index to color table.
///
/// Built once and shared behind an `Arc`; there is no way to change an
/// entry after construction, so the same class always gets the same color.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorLut {
    colors: Box<[Rgb]>,
}

impl ColorLut {
    /// Entry `i` is the color of class `i`.
    pub fn new(colors: impl Into<Vec<Rgb>>) -> Self {
        Self {
            colors: colors.into().into_boxed_slice(),
        }
    }

    /// Palette for the 21 Pascal VOC classes.
    pub fn pascal_voc() -> Self {
        Self::new(PASCAL_VOC_COLORS)
    }

    /// Color for `class`, `FALLBACK_COLOR` outside the table.
    #[inline]
    pub fn color_for(&self, class: i32) -> Rgb {
        usize::try_from(class)
            .ok()
            .and_then(|index| self.colors.get(index))
            .copied()
            .unwrap_or(FALLBACK_COLOR)
    }

    /// Number of known classes.
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Pascal VOC label for `class`, if it has one.
    pub fn label_for(class: i32) -> Option<&'static str> {
        usize::try_from(class)
            .ok()
            .and_then(|index| PASCAL_VOC_LABELS.get(index))
            .copied()
    }
}

impl Default for ColorLut {
    fn default() -> Self {
        Self::pascal_voc()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_and_labels_line_up() {
        assert_eq!(PASCAL_VOC_COLORS.len(), PASCAL_VOC_LABELS.len());
        assert_eq!(ColorLut::pascal_voc().len(), 21);
    }

    #[test]
    fn test_person_color() {
        assert_eq!(ColorLut::label_for(15), Some("person"));
        assert_eq!(ColorLut::pascal_voc().color_for(15), Rgb::new(192, 128, 128));
    }
}
