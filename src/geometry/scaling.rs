use super::Point2D;

/// Axis-aligned rectangle on the local plane (meters)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            max_x,
            min_y,
            max_y,
        }
    }

    /// Create bounds from a set of points
    pub fn from_points(points: &[Point2D]) -> Option<Self> {
        if points.is_empty() {
            return None;
        }

        let mut bounds = Self {
            min_x: f64::MAX,
            max_x: f64::MIN,
            min_y: f64::MAX,
            max_y: f64::MIN,
        };
        bounds.expand(points);
        Some(bounds)
    }

    /// Expand bounds to include another set of points
    pub fn expand(&mut self, points: &[Point2D]) {
        for p in points {
            self.min_x = self.min_x.min(p.x);
            self.max_x = self.max_x.max(p.x);
            self.min_y = self.min_y.min(p.y);
            self.max_y = self.max_y.max(p.y);
        }
    }

    /// Grow the rectangle on every side by `percent` of its extent
    pub fn enlarged_by_percent(&self, percent: f64) -> Self {
        let dx = self.width() * percent / 100.0;
        let dy = self.height() * percent / 100.0;
        Self {
            min_x: self.min_x - dx,
            max_x: self.max_x + dx,
            min_y: self.min_y - dy,
            max_y: self.max_y + dy,
        }
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn is_empty(&self) -> bool {
        !(self.min_x < self.max_x && self.min_y < self.max_y)
    }

    pub fn center(&self) -> Point2D {
        Point2D::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    pub fn contains(&self, p: Point2D) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }

    /// Position of a point relative to the rectangle, one code per axis.
    ///
    /// ```text
    /// horizontal:  vertical:
    /// -1  0  1      1  1  1
    /// -1  0  1      0  0  0
    /// -1  0  1     -1 -1 -1
    /// ```
    pub fn zone(&self, p: Point2D) -> (i8, i8) {
        let horiz = if p.x < self.min_x {
            -1
        } else if p.x > self.max_x {
            1
        } else {
            0
        };
        let vert = if p.y < self.min_y {
            -1
        } else if p.y > self.max_y {
            1
        } else {
            0
        };
        (horiz, vert)
    }
}

/// Scales local coordinates (meters) to scene units
#[derive(Debug, Clone)]
pub struct Scaler {
    /// Scene units per meter
    scale: f64,
    offset_x: f64,
    offset_y: f64,
}

impl Scaler {
    /// Fit `bounds` into a square of `target_size` scene units.
    ///
    /// The larger dimension spans the square; the map is centred on the other.
    pub fn from_bounds(bounds: &Bounds, target_size: f64) -> Self {
        let max_dim = bounds.width().max(bounds.height());

        let scale = if max_dim > 0.0 {
            target_size / max_dim
        } else {
            1.0
        };

        let offset_x = (target_size - bounds.width() * scale) / 2.0 - bounds.min_x * scale;
        let offset_y = (target_size - bounds.height() * scale) / 2.0 - bounds.min_y * scale;

        Self {
            scale,
            offset_x,
            offset_y,
        }
    }

    /// Scale a point from meters to scene units
    pub fn scale(&self, p: Point2D) -> (f64, f64) {
        (p.x * self.scale + self.offset_x, p.y * self.scale + self.offset_y)
    }

    /// Scale a length (width, height, radius) from meters to scene units
    pub fn scale_length(&self, meters: f64) -> f64 {
        meters * self.scale
    }

    /// Get the scale factor (scene units per meter)
    pub fn scale_factor(&self) -> f64 {
        self.scale
    }
}
