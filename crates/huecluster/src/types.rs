use rgb::RGB8;

/// A point in RGB space. Channels are nominally in `0.0..=255.0`, but a
/// centroid is a mean and is generally not integral.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Color {
    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    #[inline]
    pub fn squared_distance(self, other: Self) -> f64 {
        let dr = self.r - other.r;
        let dg = self.g - other.g;
        let db = self.b - other.b;
        dr.mul_add(dr, dg.mul_add(dg, db * db))
    }

    /// Euclidean distance in RGB space.
    #[inline]
    pub fn distance(self, other: Self) -> f64 {
        self.squared_distance(other).sqrt()
    }

    /// Drops the fractional part of every channel, the way a float buffer is
    /// cast to bytes. Out-of-range values saturate.
    pub fn truncate(self) -> RGB8 {
        RGB8::new(self.r as u8, self.g as u8, self.b as u8)
    }
}

impl From<RGB8> for Color {
    #[inline]
    fn from(px: RGB8) -> Self {
        Self::new(px.r as f64, px.g as f64, px.b as f64)
    }
}
