/// Size of a drawable area, in pixels of whatever space the caller works in.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Positive and finite in both dimensions.
    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }

    /// The same area measured in units `factor` times larger.
    #[inline]
    pub fn shrink(self, factor: f32) -> Self {
        Self::new(self.width / factor, self.height / factor)
    }

    /// `true` if `(x, y)`, relative to the top-left corner, lies inside.
    #[inline]
    pub fn contains(self, x: f32, y: f32) -> bool {
        (0.0..self.width).contains(&x) && (0.0..self.height).contains(&y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_and_nan_sizes_are_invalid() {
        assert!(Viewport::new(1.0, 1.0).is_valid());
        assert!(!Viewport::new(0.0, 10.0).is_valid());
        assert!(!Viewport::new(10.0, f32::NAN).is_valid());
        assert!(!Viewport::new(f32::INFINITY, 10.0).is_valid());
    }

    #[test]
    fn contains_is_half_open() {
        let v = Viewport::new(4.0, 2.0);
        assert!(v.contains(0.0, 0.0));
        assert!(v.contains(3.9, 1.9));
        assert!(!v.contains(4.0, 1.0));
        assert!(!v.contains(1.0, -0.1));
    }

    #[test]
    fn shrink_divides_both_sides() {
        assert_eq!(Viewport::new(640.0, 480.0).shrink(2.0), Viewport::new(320.0, 240.0));
    }
}
