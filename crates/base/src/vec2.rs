use std::fmt;

/// Two-component vector. For image sizes `x` is the width and `y` the height.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Vec2<T> {
    pub x: T,
    pub y: T,
}

impl<T: fmt::Debug> fmt::Debug for Vec2<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:?}, {:?})", self.x, self.y)
    }
}

impl<T> Vec2<T> {
    pub const fn new(x: T, y: T) -> Self {
        Self { x, y }
    }
}

impl<T: Default> Vec2<T> {
    pub fn zero() -> Self {
        Self::default()
    }
}

impl<T: Copy> Vec2<T> {
    /// Swap the components, e.g. the size of an image after a quarter turn.
    pub fn transposed(self) -> Self {
        Self::new(self.y, self.x)
    }
}

impl Vec2<usize> {
    /// `x * y`, or `None` if it overflows.
    pub fn checked_area(&self) -> Option<usize> {
        self.x.checked_mul(self.y)
    }
}
