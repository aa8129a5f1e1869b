//! Spatial occupancy index: every drawn footprint leaves points with a
//! clearance radius behind, and later placements keep out of them.

use rstar::primitives::GeomWithData;
use rstar::{AABB, RTree};

use super::Point2D;

/// Indexed point carrying its clearance radius
type OccupancyRecord = GeomWithData<[f64; 2], f64>;

/// Append-only R-tree of occupied points for one conversion run
#[derive(Debug, Default)]
pub struct OccupancyIndex {
    tree: RTree<OccupancyRecord>,
    /// Largest clearance stored so far; bounds the search envelope
    max_radius: f64,
}

impl OccupancyIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Occupy a single point
    pub fn add_point(&mut self, p: Point2D, clearance: f64) {
        self.tree.insert(GeomWithData::new([p.x, p.y], clearance));
        if clearance > self.max_radius {
            self.max_radius = clearance;
        }
    }

    /// Occupy the segment `from -> to`, excluding `from` itself.
    ///
    /// Intermediate points are spaced at most half a clearance apart so the
    /// whole segment is covered, then `to` is added.
    pub fn add_segment(&mut self, from: Point2D, to: Point2D, clearance: f64) {
        let spacing = clearance / 2.0;
        let dx = to.x - from.x;
        let dy = to.y - from.y;
        let length = dx.hypot(dy);

        if spacing > 0.0 && length > spacing {
            let extra = (length / spacing).ceil() as usize - 1;
            let step = 1.0 / (extra as f64 + 1.0);
            for i in 1..=extra {
                let t = step * i as f64;
                self.add_point(Point2D::new(from.x + dx * t, from.y + dy * t), clearance);
            }
        }

        self.add_point(to, clearance);
    }

    /// Occupy a whole polyline
    pub fn add_polyline(&mut self, points: &[Point2D], clearance: f64) {
        let Some(&first) = points.first() else {
            return;
        };
        self.add_point(first, clearance);
        for pair in points.windows(2) {
            self.add_segment(pair[0], pair[1], clearance);
        }
    }

    /// True when `p` lies within the clearance of any stored point
    pub fn is_near_other(&self, p: Point2D) -> bool {
        if self.tree.size() == 0 {
            return false;
        }
        let r = self.max_radius;
        let envelope = AABB::from_corners([p.x - r, p.y - r], [p.x + r, p.y + r]);
        self.tree.locate_in_envelope(&envelope).any(|record| {
            let [x, y] = *record.geom();
            (x - p.x).hypot(y - p.y) <= record.data
        })
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}
