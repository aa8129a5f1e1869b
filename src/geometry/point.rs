/// A point on the local plane (x = east, y = north)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Point2D) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Lexicographic (x, then y) ordering used for sweeps and canonical starts
    pub fn cmp_xy(&self, other: &Point2D) -> std::cmp::Ordering {
        self.x
            .total_cmp(&other.x)
            .then_with(|| self.y.total_cmp(&other.y))
    }
}

impl From<(f64, f64)> for Point2D {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Twice the signed area of triangle (a, b, c); positive when counter-clockwise
pub fn orient(a: Point2D, b: Point2D, c: Point2D) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

/// Shoelace signed area of a point sequence read as a cycle.
///
/// A repeated closing point contributes nothing, so open and closed
/// representations of a ring give the same result.
pub fn signed_area(points: impl IntoIterator<Item = Point2D>) -> f64 {
    let points: Vec<Point2D> = points.into_iter().collect();
    if points.len() < 3 {
        return 0.0;
    }

    let mut sum = 0.0;
    let mut prev = points[points.len() - 1];
    for &p in &points {
        sum += prev.x * p.y - p.x * prev.y;
        prev = p;
    }
    sum * 0.5
}

/// Owning storage for every point of one polygon.
///
/// Rings and triangles hold indices into the arena, so splitting or splicing
/// during triangulation never invalidates a reference.
#[derive(Debug, Clone, Default)]
pub struct PointArena {
    points: Vec<Point2D>,
}

impl PointArena {
    pub fn new() -> Self {
        Self { points: Vec::new() }
    }

    pub fn push(&mut self, point: Point2D) -> usize {
        self.points.push(point);
        self.points.len() - 1
    }

    pub fn get(&self, index: usize) -> Point2D {
        self.points[index]
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[Point2D] {
        &self.points
    }
}
