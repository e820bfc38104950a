use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in layout units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub const EMPTY: Bounds = Bounds {
        x: 0.0,
        y: 0.0,
        width: 0.0,
        height: 0.0,
    };

    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_corners(minx: f64, miny: f64, maxx: f64, maxy: f64) -> Self {
        Self::new(minx, miny, maxx - minx, maxy - miny)
    }

    /// Content has been laid out: both extents positive and finite.
    pub fn has_area(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds::from_corners(
            self.x.min(other.x),
            self.y.min(other.y),
            self.right().max(other.right()),
            self.bottom().max(other.bottom()),
        )
    }
}

/// Source of the rendered content's true bounding box, in the rendering
/// surface's own coordinate space (before zoom/translate).
pub trait GeometryProvider {
    fn content_bounds(&self) -> Bounds;
}

impl GeometryProvider for Bounds {
    fn content_bounds(&self) -> Bounds {
        *self
    }
}

impl<G: GeometryProvider + ?Sized> GeometryProvider for &G {
    fn content_bounds(&self) -> Bounds {
        (**self).content_bounds()
    }
}
