use crate::Vec2;

/// Axis-aligned rectangle given by its top-left origin and its size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect<T> {
    pub origin: Vec2<T>,
    pub size: Vec2<T>,
}

impl<T> Rect<T> {
    pub const fn new(origin: Vec2<T>, size: Vec2<T>) -> Self {
        Self { origin, size }
    }
}

impl<T: Default> Rect<T> {
    /// Rectangle of the given size anchored at the origin.
    pub fn from_size(size: Vec2<T>) -> Self {
        Self {
            origin: Vec2::zero(),
            size,
        }
    }
}

impl Rect<usize> {
    /// True when the rectangle covers no pixels.
    pub fn is_empty(&self) -> bool {
        self.size.x == 0 || self.size.y == 0
    }

    /// Pixel count, or `None` on overflow.
    pub fn area(&self) -> Option<usize> {
        self.size.checked_area()
    }
}
