//! Jittered placement of decorative objects (trees) over a triangulated area.
//!
//! A row of pressure columns spans the area's width. The sweep walks down the
//! bounding box in small steps and proposes one candidate per step at a random
//! column position; crowded columns reject candidates, accepted ones add
//! pressure, and every column relaxes as the sweep moves on.

use rand::Rng;

use super::triangulation::Triangle;
use crate::geometry::{Bounds, OccupancyIndex, Point2D, PointArena, orient};

/// Pressure above which a column takes no more candidates
const PRESSURE_LIMIT: f64 = 0.3;
/// Sub-column resolution of candidate positions
const POSITION_RESOLUTION: u64 = 1000;

#[derive(Debug, Clone, PartialEq)]
pub struct ScatterParams {
    /// Columns per unit length; also the relaxation rate
    pub density: f64,
    /// Radius every placed object keeps free around itself
    pub clearance: f64,
    pub min_variant: usize,
    pub max_variant: usize,
}

impl Default for ScatterParams {
    fn default() -> Self {
        Self {
            density: 0.1,
            clearance: 2.5,
            min_variant: 0,
            max_variant: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScatterPoint {
    pub position: Point2D,
    pub variant: usize,
}

/// Column pressure with lazy linear relaxation
#[derive(Debug, Clone, Copy, Default)]
struct Column {
    pressure: f64,
    /// Step at which `pressure` was stored
    since: usize,
}

impl Column {
    fn at(&self, step: usize, decay: f64) -> f64 {
        (self.pressure - (step - self.since) as f64 * decay).max(0.0)
    }

    fn bump(&mut self, step: usize, decay: f64, amount: f64) {
        self.pressure = self.at(step, decay) + amount;
        self.since = step;
    }
}

/// Place objects inside `triangles`.
///
/// Candidates within the clearance of anything already in `occupancy` are
/// skipped; every placed object is added to it. Output depends only on the rng
/// state, the triangles and the occupancy contents.
pub fn scatter(
    arena: &PointArena,
    triangles: &[Triangle],
    params: &ScatterParams,
    occupancy: &mut OccupancyIndex,
    rng: &mut impl Rng,
) -> Vec<ScatterPoint> {
    let mut placed = Vec::new();
    if triangles.is_empty() || params.density <= 0.0 || params.min_variant > params.max_variant {
        return placed;
    }

    let shapes: Vec<([Point2D; 3], Bounds)> = triangles
        .iter()
        .filter_map(|t| {
            let points = t.points(arena);
            Bounds::from_points(&points).map(|bounds| (points, bounds))
        })
        .collect();
    let corners: Vec<Point2D> = shapes.iter().flat_map(|(points, _)| *points).collect();
    let Some(area) = Bounds::from_points(&corners) else {
        return placed;
    };

    let columns = (area.width() * params.density + 1.0).ceil() as usize;
    let mut pressure = vec![Column::default(); columns + 1];
    let y_step = (1.0 / params.density) / columns as f64;
    let decay = y_step * params.density;
    let span = columns as u64 * POSITION_RESOLUTION;

    let mut step = 0;
    loop {
        let y = area.max_y - step as f64 * y_step;
        if y < area.min_y {
            break;
        }

        let relative = rng.random_range(0..span) as f64 / POSITION_RESOLUTION as f64;
        let column = relative.floor() as usize;
        let weight_right = relative - column as f64;
        let current = pressure[column].at(step, decay) * (1.0 - weight_right)
            + pressure[column + 1].at(step, decay) * weight_right;

        if current < PRESSURE_LIMIT
            && current * 1000.0 < rng.random_range(0..1000) as f64
        {
            let candidate = Point2D::new(
                area.min_x + relative / columns as f64 * area.width(),
                y,
            );
            if !occupancy.is_near_other(candidate) {
                pressure[column].bump(step, decay, 1.0 - weight_right);
                pressure[column + 1].bump(step, decay, weight_right);

                if shapes.iter().any(|(points, bounds)| {
                    bounds.contains(candidate) && strictly_inside(points, candidate)
                }) {
                    let variant = rng.random_range(params.min_variant..=params.max_variant);
                    occupancy.add_point(candidate, params.clearance);
                    placed.push(ScatterPoint {
                        position: candidate,
                        variant,
                    });
                }
            }
        }

        step += 1;
    }

    placed
}

fn strictly_inside(&[a, b, c]: &[Point2D; 3], p: Point2D) -> bool {
    orient(a, b, p) > 0.0 && orient(b, c, p) > 0.0 && orient(c, a, p) > 0.0
}
