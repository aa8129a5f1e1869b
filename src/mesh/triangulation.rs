//! Sweep triangulation of polygons with holes.
//!
//! Every outer ring becomes a doubly linked cycle walked counter-clockwise and
//! every hole a cycle walked clockwise, so the filled area is always on the
//! left. The sweep repeatedly takes the lowest (x, y) vertex of a cycle. That
//! vertex is always convex, so it is either cut off as an ear, or joined by a
//! diagonal to the vertex intruding deepest into its ear: a hole vertex merges
//! the hole into the cycle, a cycle vertex splits the cycle in two.

use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, VecDeque};

use geo::{Contains, InteriorPoint, LineString, Point as GeoPoint, Polygon as GeoPolygon};

use crate::diagnostics::Diagnostics;
use crate::error::GeometryError;
use crate::geometry::{MultiPolygon, Point2D, PointArena, orient};

/// Relative tolerance under which `a, v, b` count as collinear
const COLLINEAR_TOLERANCE: f64 = 1e-10;

/// Triangle as three indices into the polygon's point arena, counter-clockwise
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Triangle {
    pub vertices: [usize; 3],
}

impl Triangle {
    pub fn new(a: usize, b: usize, c: usize) -> Self {
        Self { vertices: [a, b, c] }
    }

    pub fn points(&self, arena: &PointArena) -> [Point2D; 3] {
        self.vertices.map(|i| arena.get(i))
    }

    pub fn area(&self, arena: &PointArena) -> f64 {
        let [a, b, c] = self.points(arena);
        orient(a, b, c).abs() * 0.5
    }

    /// Strictly inside test; points on an edge are outside
    pub fn contains(&self, arena: &PointArena, p: Point2D) -> bool {
        let [a, b, c] = self.points(arena);
        orient(a, b, p) > 0.0 && orient(b, c, p) > 0.0 && orient(c, a, p) > 0.0
    }
}

/// Triangulate all outer rings of `polygon` minus its holes.
///
/// Holes that no outer ring contains are dropped and counted in
/// `diag.dropped_holes`. Broken cycle links or a runaway sweep are reported as
/// [`GeometryError::InvariantViolation`].
pub fn triangulate(
    polygon: &MultiPolygon,
    diag: &mut Diagnostics,
) -> Result<Vec<Triangle>, GeometryError> {
    let mut sweep = Sweep::new(polygon.id(), polygon.arena(), polygon.points_count());
    let mut worklist = VecDeque::new();

    let outlines: Vec<GeoPolygon<f64>> = polygon
        .outer_rings()
        .iter()
        .map(|ring| to_geo(&polygon.ring_points(ring)))
        .collect();

    let mut cycles: Vec<Cycle> = polygon
        .outer_rings()
        .iter()
        .map(|ring| {
            let distinct = &ring[..ring.len() - 1];
            sweep.build_cycle(distinct.iter().rev().copied())
        })
        .collect();

    for hole in polygon.holes() {
        let distinct = &hole[..hole.len() - 1];
        match holding_outline(&outlines, &polygon.ring_points(hole)) {
            Some(index) => {
                let pending = sweep.build_hole(distinct.iter().copied());
                cycles[index].holes.push(pending);
            }
            None => {
                diag.dropped_holes += 1;
                diag.note(format!(
                    "Polygon {} has a hole outside of all its outer rings, ignoring it",
                    polygon.id()
                ));
            }
        }
    }

    worklist.extend(cycles);
    while let Some(cycle) = worklist.pop_front() {
        sweep.run(cycle, &mut worklist, diag)?;
    }

    Ok(sweep.triangles)
}

fn to_geo(points: &[Point2D]) -> GeoPolygon<f64> {
    let coords: Vec<(f64, f64)> = points.iter().map(|p| (p.x, p.y)).collect();
    GeoPolygon::new(LineString::from(coords), vec![])
}

/// First outline holding the hole ring `hole`.
///
/// Tested with a point inside the hole rather than one of its vertices, since
/// holes may touch the outline or each other at their vertices.
fn holding_outline(outlines: &[GeoPolygon<f64>], hole: &[Point2D]) -> Option<usize> {
    match to_geo(hole).interior_point() {
        Some(inner) => outlines.iter().position(|outline| outline.contains(&inner)),
        None => outlines.iter().position(|outline| {
            hole.iter()
                .any(|p| outline.contains(&GeoPoint::new(p.x, p.y)))
        }),
    }
}

#[derive(Debug, Clone, Copy)]
struct Node {
    /// Index into the point arena
    point: usize,
    prev: usize,
    next: usize,
    cycle: usize,
    removed: bool,
}

/// Heap entry ordering vertices by (x, y), then by node index
#[derive(Debug, Clone, Copy)]
struct SweepKey {
    x: f64,
    y: f64,
    node: usize,
}

impl Ord for SweepKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.x
            .total_cmp(&other.x)
            .then_with(|| self.y.total_cmp(&other.y))
            .then_with(|| self.node.cmp(&other.node))
    }
}

impl PartialOrd for SweepKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for SweepKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SweepKey {}

/// A hole waiting to be merged into the cycle that contains it
#[derive(Debug)]
struct PendingHole {
    id: usize,
    entry: usize,
    len: usize,
}

#[derive(Debug)]
struct Cycle {
    id: usize,
    len: usize,
    holes: Vec<PendingHole>,
    /// May hold stale entries for removed or relabelled nodes
    queue: BinaryHeap<Reverse<SweepKey>>,
}

struct Sweep<'p> {
    polygon_id: u64,
    points: &'p PointArena,
    nodes: Vec<Node>,
    next_cycle_id: usize,
    steps: usize,
    max_steps: usize,
    triangles: Vec<Triangle>,
}

impl<'p> Sweep<'p> {
    fn new(polygon_id: u64, points: &'p PointArena, vertex_count: usize) -> Self {
        Self {
            polygon_id,
            points,
            nodes: Vec::with_capacity(vertex_count * 2),
            next_cycle_id: 0,
            steps: 0,
            max_steps: 16 * (vertex_count + 8),
            triangles: Vec::new(),
        }
    }

    fn violation(&self, detail: String) -> GeometryError {
        GeometryError::InvariantViolation {
            polygon_id: self.polygon_id,
            detail,
        }
    }

    fn point(&self, node: usize) -> Point2D {
        self.points.get(self.nodes[node].point)
    }

    fn key(&self, node: usize) -> Reverse<SweepKey> {
        let p = self.point(node);
        Reverse(SweepKey {
            x: p.x,
            y: p.y,
            node,
        })
    }

    fn fresh_cycle_id(&mut self) -> usize {
        self.next_cycle_id += 1;
        self.next_cycle_id
    }

    fn add_node(&mut self, point: usize, cycle: usize) -> usize {
        let index = self.nodes.len();
        self.nodes.push(Node {
            point,
            prev: index,
            next: index,
            cycle,
            removed: false,
        });
        index
    }

    /// Link arena indices into a cycle in the given order; returns the nodes
    fn link(&mut self, points: impl Iterator<Item = usize>, cycle: usize) -> Vec<usize> {
        let members: Vec<usize> = points.map(|p| self.add_node(p, cycle)).collect();
        for (i, &node) in members.iter().enumerate() {
            let next = members[(i + 1) % members.len()];
            self.nodes[node].next = next;
            self.nodes[next].prev = node;
        }
        members
    }

    fn build_cycle(&mut self, points: impl Iterator<Item = usize>) -> Cycle {
        let id = self.fresh_cycle_id();
        let members = self.link(points, id);
        self.make_cycle(id, &members, Vec::new())
    }

    fn build_hole(&mut self, points: impl Iterator<Item = usize>) -> PendingHole {
        let id = self.fresh_cycle_id();
        let members = self.link(points, id);
        PendingHole {
            id,
            entry: members[0],
            len: members.len(),
        }
    }

    fn make_cycle(&mut self, id: usize, members: &[usize], holes: Vec<PendingHole>) -> Cycle {
        for &node in members {
            self.nodes[node].cycle = id;
        }
        Cycle {
            id,
            len: members.len(),
            holes,
            queue: members.iter().map(|&n| self.key(n)).collect(),
        }
    }

    /// Nodes of the cycle through `entry`, following `next`
    fn walk(&self, entry: usize, limit: usize) -> Result<Vec<usize>, GeometryError> {
        let mut members = Vec::with_capacity(limit);
        let mut node = entry;
        loop {
            members.push(node);
            node = self.nodes[node].next;
            if node == entry {
                return Ok(members);
            }
            if members.len() > limit {
                return Err(self.violation(format!(
                    "cycle through point {} does not close within {} vertices",
                    self.nodes[entry].point, limit
                )));
            }
        }
    }

    fn pop_lowest(&self, cycle: &mut Cycle) -> Option<usize> {
        while let Some(Reverse(key)) = cycle.queue.pop() {
            let node = &self.nodes[key.node];
            if !node.removed && node.cycle == cycle.id {
                return Some(key.node);
            }
        }
        None
    }

    fn unlink(&mut self, node: usize) {
        let Node { prev, next, .. } = self.nodes[node];
        self.nodes[prev].next = next;
        self.nodes[next].prev = prev;
        self.nodes[node].removed = true;
    }

    /// Unlink spike tips and zero-length edges around `around`, following the
    /// removals outwards. They enclose no area, but left in place a spike makes
    /// the corner at its base look wider than it is. Straight corners stay.
    fn tidy(&mut self, cycle: &mut Cycle, around: &[usize]) {
        let mut pending = around.to_vec();
        while let Some(node) = pending.pop() {
            if cycle.len < 3 || self.nodes[node].removed {
                continue;
            }
            let Node { prev, next, .. } = self.nodes[node];
            let (pp, p, pn) = (self.point(prev), self.point(node), self.point(next));
            let (din, dout) = ((p.x - pp.x, p.y - pp.y), (pn.x - p.x, pn.y - p.y));
            let turns_back = din.0 * dout.0 + din.1 * dout.1 < 0.0
                && orient(pp, p, pn).abs()
                    <= COLLINEAR_TOLERANCE * p.distance(&pp) * p.distance(&pn);
            if p == pp || p == pn || turns_back {
                self.unlink(node);
                cycle.len -= 1;
                pending.push(prev);
                pending.push(next);
            }
        }
    }

    /// Connect `a` and `b` by a doubled diagonal.
    ///
    /// `a` continues to `b`; the returned copies `(a2, b2)` close the other
    /// side as `b2 -> a2`. On one cycle this splits it, across a hole it
    /// merges the two.
    fn split(&mut self, a: usize, b: usize) -> (usize, usize) {
        let (a_point, a_cycle) = (self.nodes[a].point, self.nodes[a].cycle);
        let (b_point, b_cycle) = (self.nodes[b].point, self.nodes[b].cycle);
        let a2 = self.add_node(a_point, a_cycle);
        let b2 = self.add_node(b_point, b_cycle);
        let an = self.nodes[a].next;
        let bp = self.nodes[b].prev;

        self.nodes[a].next = b;
        self.nodes[b].prev = a;
        self.nodes[a2].next = an;
        self.nodes[an].prev = a2;
        self.nodes[b2].next = a2;
        self.nodes[a2].prev = b2;
        self.nodes[bp].next = b2;
        self.nodes[b2].prev = bp;
        (a2, b2)
    }

    /// True when the direction towards `target` leaves `node` into the filled
    /// side of its corner. Picks the right copy among coincident vertices.
    fn locally_inside(&self, node: usize, target: usize) -> bool {
        let prev = self.point(self.nodes[node].prev);
        let here = self.point(node);
        let next = self.point(self.nodes[node].next);
        let t = self.point(target);

        if orient(prev, here, next) >= 0.0 {
            orient(here, next, t) >= 0.0 && orient(prev, here, t) >= 0.0
        } else {
            orient(here, next, t) > 0.0 || orient(prev, here, t) > 0.0
        }
    }

    fn run(
        &mut self,
        mut cycle: Cycle,
        worklist: &mut VecDeque<Cycle>,
        diag: &mut Diagnostics,
    ) -> Result<(), GeometryError> {
        loop {
            if cycle.len < 3 {
                if !cycle.holes.is_empty() {
                    diag.dropped_holes += cycle.holes.len();
                    diag.note(format!(
                        "Polygon {} collapsed around {} holes, ignoring them",
                        self.polygon_id,
                        cycle.holes.len()
                    ));
                }
                return Ok(());
            }

            self.steps += 1;
            if self.steps > self.max_steps {
                return Err(self.violation(format!("sweep exceeded {} steps", self.max_steps)));
            }

            let Some(v) = self.pop_lowest(&mut cycle) else {
                return Err(self.violation(format!(
                    "cycle {} has {} vertices but none left in the queue",
                    cycle.id, cycle.len
                )));
            };
            let a = self.nodes[v].prev;
            let b = self.nodes[v].next;
            if self.nodes[a].next != v
                || self.nodes[b].prev != v
                || self.nodes[a].removed
                || self.nodes[b].removed
            {
                return Err(self.violation(format!(
                    "broken links around point {}",
                    self.nodes[v].point
                )));
            }

            let (pa, pv, pb) = (self.point(a), self.point(v), self.point(b));
            let cross = orient(pa, pv, pb);
            if cross <= COLLINEAR_TOLERANCE * pv.distance(&pa) * pv.distance(&pb) {
                self.unlink(v);
                cycle.len -= 1;
                self.tidy(&mut cycle, &[a, b]);
                continue;
            }

            match self.find_intruder(&cycle, a, v, b)? {
                None => {
                    self.triangles.push(Triangle::new(
                        self.nodes[a].point,
                        self.nodes[v].point,
                        self.nodes[b].point,
                    ));
                    self.unlink(v);
                    cycle.len -= 1;
                    self.tidy(&mut cycle, &[a, b]);
                }
                Some(q) if self.nodes[q].cycle == cycle.id => {
                    self.split_cycle(cycle, v, q, worklist)?;
                    return Ok(());
                }
                Some(q) => {
                    self.merge_hole(&mut cycle, v, q)?;
                }
            }
        }
    }

    /// Vertex of the cycle or of a pending hole lying deepest inside the ear
    /// `(a, v, b)`, if any.
    ///
    /// The ear is closed: vertices on its edges count, so holes touching the
    /// outline get merged before an ear is cut across them. Copies of `a`, `v`
    /// and `b` on the cycle are pinch points and never intrude; a pending hole
    /// sharing one of those points does, and one sharing `v` wins outright.
    fn find_intruder(
        &self,
        cycle: &Cycle,
        a: usize,
        v: usize,
        b: usize,
    ) -> Result<Option<usize>, GeometryError> {
        let (pa, pv, pb) = (self.point(a), self.point(v), self.point(b));

        let mut candidates = self.walk(b, cycle.len)?;
        candidates.retain(|&n| n != a && n != v && n != b);
        for hole in &cycle.holes {
            candidates.extend(self.walk(hole.entry, hole.len)?);
        }

        let mut deepest: Vec<usize> = Vec::new();
        let mut best = f64::NEG_INFINITY;
        for node in candidates {
            let on_hole = self.nodes[node].cycle != cycle.id;
            let p = self.point(node);
            let depth = if p == pv {
                if on_hole {
                    return Ok(Some(node));
                }
                continue;
            } else if p == pa || p == pb {
                if !on_hole {
                    continue;
                }
                0.0
            } else {
                if orient(pa, pv, p) < 0.0 || orient(pv, pb, p) < 0.0 {
                    continue;
                }
                orient(pb, pa, p)
            };
            if depth < 0.0 || depth < best {
                continue;
            }
            if depth > best {
                best = depth;
                deepest.clear();
            }
            deepest.push(node);
        }

        // among coincident copies prefer a cycle corner opening towards v,
        // so a hole touching the cycle there is left for the sub-cycle
        let opens_to_v = |n: usize| self.locally_inside(n, v);
        let pick = deepest
            .iter()
            .find(|&&n| self.nodes[n].cycle == cycle.id && opens_to_v(n))
            .or_else(|| deepest.iter().find(|&&n| opens_to_v(n)))
            .or_else(|| deepest.first())
            .copied();
        Ok(pick)
    }

    fn merge_hole(&mut self, cycle: &mut Cycle, v: usize, q: usize) -> Result<(), GeometryError> {
        let hole_id = self.nodes[q].cycle;
        let Some(pos) = cycle.holes.iter().position(|h| h.id == hole_id) else {
            return Err(self.violation(format!(
                "point {} belongs to no pending hole",
                self.nodes[q].point
            )));
        };
        let hole = cycle.holes.remove(pos);
        let members = self.walk(hole.entry, hole.len)?;

        let (v2, q2) = self.split(v, q);
        for node in members.into_iter().chain([v2, q2]) {
            self.nodes[node].cycle = cycle.id;
            cycle.queue.push(self.key(node));
        }
        cycle.queue.push(self.key(v));
        cycle.len += hole.len + 2;
        self.tidy(cycle, &[v, q, v2, q2]);
        Ok(())
    }

    fn split_cycle(
        &mut self,
        cycle: Cycle,
        v: usize,
        q: usize,
        worklist: &mut VecDeque<Cycle>,
    ) -> Result<(), GeometryError> {
        let (v2, q2) = self.split(v, q);
        let first = self.walk(v, cycle.len + 2)?;
        let second = self.walk(v2, cycle.len + 2)?;

        let outline = [to_geo(&first.iter().map(|&n| self.point(n)).collect::<Vec<_>>())];
        let mut first_holes = Vec::new();
        let mut second_holes = Vec::new();
        for hole in cycle.holes {
            let members = self.walk(hole.entry, hole.len)?;
            let points: Vec<Point2D> = members.iter().map(|&n| self.point(n)).collect();
            if holding_outline(&outline, &points).is_some() {
                first_holes.push(hole);
            } else {
                second_holes.push(hole);
            }
        }

        let first_id = self.fresh_cycle_id();
        let second_id = self.fresh_cycle_id();
        let mut first = self.make_cycle(first_id, &first, first_holes);
        let mut second = self.make_cycle(second_id, &second, second_holes);
        self.tidy(&mut first, &[v, q]);
        self.tidy(&mut second, &[v2, q2]);
        worklist.push_back(first);
        worklist.push_back(second);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::TAU;

    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;
    use crate::geometry::{Bounds, Fragment, Ring, assemble_rings};

    fn ring(coords: &[(f64, f64)]) -> Ring {
        let mut points: Vec<Point2D> = coords.iter().map(|&c| Point2D::from(c)).collect();
        points.push(points[0]);
        Ring::from_closed(points).unwrap()
    }

    fn total_area(polygon: &MultiPolygon, triangles: &[Triangle]) -> f64 {
        triangles.iter().map(|t| t.area(polygon.arena())).sum()
    }

    /// Area of the same rings triangulated by earcut
    fn earcut_area(outer: &[(f64, f64)], holes: &[&[(f64, f64)]]) -> f64 {
        let mut flat: Vec<f64> = outer.iter().flat_map(|&(x, y)| [x, y]).collect();
        let mut hole_starts = Vec::new();
        for hole in holes {
            hole_starts.push(flat.len() / 2);
            flat.extend(hole.iter().flat_map(|&(x, y)| [x, y]));
        }
        let indices = earcutr::earcut(&flat, &hole_starts, 2).unwrap();
        indices
            .chunks(3)
            .map(|t| {
                let p = |i: usize| Point2D::new(flat[2 * i], flat[2 * i + 1]);
                orient(p(t[0]), p(t[1]), p(t[2])).abs() * 0.5
            })
            .sum()
    }

    /// Sampled check that triangles never overlap and cover the filled area
    fn assert_partition(polygon: &MultiPolygon, triangles: &[Triangle]) {
        let arena = polygon.arena();
        let outers: Vec<GeoPolygon<f64>> = polygon
            .outer_rings()
            .iter()
            .map(|r| to_geo(&polygon.ring_points(r)))
            .collect();
        let holes: Vec<GeoPolygon<f64>> = polygon
            .holes()
            .iter()
            .map(|r| to_geo(&polygon.ring_points(r)))
            .collect();

        for i in 0..60 {
            for j in 0..60 {
                let p = Point2D::new(-0.5 + i as f64 * 0.2731, -0.5 + j as f64 * 0.2917);
                let gp = GeoPoint::new(p.x, p.y);
                let filled = outers.iter().any(|o| o.contains(&gp))
                    && !holes.iter().any(|h| h.contains(&gp));
                let covering = triangles.iter().filter(|t| t.contains(arena, p)).count();
                assert!(covering <= 1, "overlap at {:?}", p);
                if filled {
                    assert_eq!(covering, 1, "gap at {:?}", p);
                } else {
                    assert_eq!(covering, 0, "triangle outside the polygon at {:?}", p);
                }
            }
        }
    }

    fn assert_well_formed(polygon: &MultiPolygon, triangles: &[Triangle]) {
        let arena = polygon.arena();
        let ring_points: Vec<usize> = polygon
            .outer_rings()
            .iter()
            .chain(polygon.holes())
            .flatten()
            .copied()
            .collect();
        for t in triangles {
            let [a, b, c] = t.points(arena);
            assert!(orient(a, b, c) > 0.0, "degenerate or clockwise triangle {:?}", t);
            for v in t.vertices {
                assert!(ring_points.contains(&v));
            }
        }
    }

    const SQUARE: [(f64, f64); 4] = [(0.0, 0.0), (0.0, 10.0), (10.0, 10.0), (10.0, 0.0)];

    #[test]
    fn test_square_with_triangular_hole() {
        let hole = [(2.0, 2.0), (2.0, 4.0), (4.0, 2.0)];
        let polygon = MultiPolygon::from_rings(1, &[ring(&SQUARE)], &[ring(&hole)]);
        let mut diag = Diagnostics::quiet();

        let triangles = triangulate(&polygon, &mut diag).unwrap();
        assert!((total_area(&polygon, &triangles) - 98.0).abs() < 1e-9);
        assert_well_formed(&polygon, &triangles);
        assert_partition(&polygon, &triangles);
        assert_eq!(diag.dropped_holes, 0);
    }

    #[test]
    fn test_plain_square() {
        let polygon = MultiPolygon::from_rings(1, &[ring(&SQUARE)], &[]);
        let triangles = triangulate(&polygon, &mut Diagnostics::quiet()).unwrap();
        assert_eq!(triangles.len(), 2);
        assert!((total_area(&polygon, &triangles) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_matches_earcut_on_concave_shapes() {
        let chevron: &[(f64, f64)] = &[(0.0, 5.0), (10.0, 0.0), (3.0, 5.0), (10.0, 10.0)];
        let comb: &[(f64, f64)] = &[
            (0.0, 0.0),
            (9.0, 0.0),
            (9.0, 6.0),
            (7.0, 6.0),
            (7.0, 2.0),
            (5.0, 2.0),
            (5.0, 6.0),
            (3.0, 6.0),
            (3.0, 2.0),
            (1.0, 2.0),
            (1.0, 6.0),
            (0.0, 6.0),
        ];
        let spiral: &[(f64, f64)] = &[
            (0.0, 0.0),
            (12.0, 0.0),
            (12.0, 12.0),
            (2.0, 12.0),
            (2.0, 4.0),
            (8.0, 4.0),
            (8.0, 8.0),
            (5.0, 8.0),
            (5.0, 6.0),
            (6.0, 6.0),
            (6.0, 5.0),
            (3.0, 5.0),
            (3.0, 11.0),
            (11.0, 11.0),
            (11.0, 1.0),
            (0.0, 1.0),
        ];

        for shape in [chevron, comb, spiral] {
            let polygon = MultiPolygon::from_rings(1, &[ring(shape)], &[]);
            let triangles = triangulate(&polygon, &mut Diagnostics::quiet()).unwrap();
            let area = total_area(&polygon, &triangles);
            assert!((area - earcut_area(shape, &[])).abs() < 1e-9);
            assert!((area - polygon.area()).abs() < 1e-9);
            assert_eq!(triangles.len(), shape.len() - 2);
            assert_well_formed(&polygon, &triangles);
            assert_partition(&polygon, &triangles);
        }
    }

    #[test]
    fn test_several_holes() {
        let hole_a: &[(f64, f64)] = &[(1.0, 1.0), (1.0, 3.0), (3.0, 3.0), (3.0, 1.0)];
        let hole_b: &[(f64, f64)] = &[(5.0, 5.0), (6.0, 8.0), (8.0, 6.0)];
        let hole_c: &[(f64, f64)] = &[(1.5, 6.0), (1.5, 9.0), (2.5, 9.0), (2.5, 6.0)];
        let polygon = MultiPolygon::from_rings(
            7,
            &[ring(&SQUARE)],
            &[ring(hole_a), ring(hole_b), ring(hole_c)],
        );

        let triangles = triangulate(&polygon, &mut Diagnostics::quiet()).unwrap();
        let expected = earcut_area(&SQUARE, &[hole_a, hole_b, hole_c]);
        assert!((total_area(&polygon, &triangles) - expected).abs() < 1e-9);
        assert!((total_area(&polygon, &triangles) - polygon.area()).abs() < 1e-9);
        assert_well_formed(&polygon, &triangles);
        assert_partition(&polygon, &triangles);
    }

    #[test]
    fn test_multiple_outer_rings() {
        let right = [(12.0, 0.0), (12.0, 4.0), (15.0, 4.0), (15.0, 0.0)];
        let hole = [(13.0, 1.0), (13.0, 3.0), (14.0, 2.0)];
        let polygon = MultiPolygon::from_rings(
            1,
            &[ring(&SQUARE), ring(&right)],
            &[ring(&hole)],
        );

        let mut diag = Diagnostics::quiet();
        let triangles = triangulate(&polygon, &mut diag).unwrap();
        assert!((total_area(&polygon, &triangles) - (100.0 + 12.0 - 1.0)).abs() < 1e-9);
        assert_eq!(diag.dropped_holes, 0);
        assert_well_formed(&polygon, &triangles);
    }

    #[test]
    fn test_collinear_vertices_make_no_degenerate_triangles() {
        let outline = [
            (0.0, 0.0),
            (0.0, 5.0),
            (0.0, 10.0),
            (5.0, 10.0),
            (10.0, 10.0),
            (10.0, 5.0),
            (10.0, 0.0),
            (5.0, 0.0),
        ];
        let polygon = MultiPolygon::from_rings(1, &[ring(&outline)], &[]);
        let triangles = triangulate(&polygon, &mut Diagnostics::quiet()).unwrap();
        assert!((total_area(&polygon, &triangles) - 100.0).abs() < 1e-9);
        assert_well_formed(&polygon, &triangles);
        assert_partition(&polygon, &triangles);
    }

    #[test]
    fn test_holes_touching_the_outline() {
        let cases: [(&[(f64, f64)], f64); 6] = [
            (&[(0.0, 5.0), (3.0, 3.0), (3.0, 7.0)], 94.0),
            (&[(10.0, 5.0), (7.0, 7.0), (7.0, 3.0)], 94.0),
            (&[(5.0, 10.0), (3.0, 7.0), (7.0, 7.0)], 94.0),
            (&[(5.0, 0.0), (3.0, 3.0), (7.0, 3.0)], 94.0),
            // sharing an outer corner
            (&[(0.0, 10.0), (2.0, 5.0), (5.0, 8.0)], 89.5),
            (&[(0.0, 0.0), (2.0, 5.0), (5.0, 2.0)], 89.5),
        ];

        for (hole, expected) in cases {
            let polygon = MultiPolygon::from_rings(1, &[ring(&SQUARE)], &[ring(hole)]);
            let mut diag = Diagnostics::quiet();

            let triangles = triangulate(&polygon, &mut diag).unwrap();
            let area = total_area(&polygon, &triangles);
            assert!((area - expected).abs() < 1e-9, "hole {:?} gave area {}", hole, area);
            assert!((area - polygon.area()).abs() < 1e-9);
            assert_eq!(diag.dropped_holes, 0);
            assert_well_formed(&polygon, &triangles);
            assert_partition(&polygon, &triangles);
        }
    }

    #[test]
    fn test_holes_sharing_corner_or_edge() {
        let first: &[(f64, f64)] = &[(1.0, 1.0), (1.0, 3.0), (3.0, 3.0), (3.0, 1.0)];
        let corner: &[(f64, f64)] = &[(3.0, 3.0), (3.0, 5.0), (5.0, 5.0), (5.0, 3.0)];
        let edge: &[(f64, f64)] = &[(3.0, 1.0), (3.0, 3.0), (5.0, 3.0), (5.0, 1.0)];

        for second in [corner, edge] {
            let polygon =
                MultiPolygon::from_rings(1, &[ring(&SQUARE)], &[ring(first), ring(second)]);
            let mut diag = Diagnostics::quiet();

            let triangles = triangulate(&polygon, &mut diag).unwrap();
            let area = total_area(&polygon, &triangles);
            assert_eq!(diag.dropped_holes, 0);
            assert!((area - 92.0).abs() < 1e-9, "second hole {:?} gave area {}", second, area);
            assert!((area - polygon.area()).abs() < 1e-9);
            assert_well_formed(&polygon, &triangles);
            assert_partition(&polygon, &triangles);
        }
    }

    #[test]
    fn test_random_holes_match_earcut() {
        let mut rng = StdRng::seed_from_u64(5);
        let center = (8.0, 8.0);
        let around = |rng: &mut StdRng, (cx, cy): (f64, f64), count: usize, radius: (f64, f64)| {
            let turn = rng.random_range(0.0..TAU);
            (0..count)
                .map(|i| {
                    let jitter = rng.random_range(-0.2..0.2);
                    let angle = turn + (i as f64 + jitter) / count as f64 * TAU;
                    let r = rng.random_range(radius.0..radius.1);
                    (cx + r * angle.cos(), cy + r * angle.sin())
                })
                .collect::<Vec<_>>()
        };

        for _ in 0..100 {
            let count = rng.random_range(8..20);
            let outer = around(&mut rng, center, count, (6.0, 8.0));
            // at most one small hole per quadrant, well inside the outline
            let mut holes: Vec<Vec<(f64, f64)>> = Vec::new();
            for (dx, dy) in [(-2.0, -2.0), (-2.0, 2.0), (2.0, 2.0), (2.0, -2.0)] {
                if rng.random_bool(0.7) {
                    let sides = rng.random_range(3..7);
                    let r = rng.random_range(0.3..1.0);
                    holes.push(around(&mut rng, (center.0 + dx, center.1 + dy), sides, (0.9 * r, r)));
                }
            }
            let hole_refs: Vec<&[(f64, f64)]> = holes.iter().map(Vec::as_slice).collect();
            let hole_rings: Vec<Ring> = holes.iter().map(|h| ring(h)).collect();
            let polygon = MultiPolygon::from_rings(1, &[ring(&outer)], &hole_rings);
            let mut diag = Diagnostics::quiet();

            let triangles = triangulate(&polygon, &mut diag).unwrap();
            let area = total_area(&polygon, &triangles);
            assert_eq!(diag.dropped_holes, 0);
            assert!((area - earcut_area(&outer, &hole_refs)).abs() < 1e-6);
            assert!((area - polygon.area()).abs() < 1e-6);
            assert_well_formed(&polygon, &triangles);
            assert_partition(&polygon, &triangles);
        }
    }

    #[test]
    fn test_orphan_hole_dropped() {
        let far = [(20.0, 20.0), (20.0, 22.0), (22.0, 22.0)];
        let polygon = MultiPolygon::from_rings(1, &[ring(&SQUARE)], &[ring(&far)]);
        let mut diag = Diagnostics::quiet();

        let triangles = triangulate(&polygon, &mut diag).unwrap();
        assert_eq!(diag.dropped_holes, 1);
        assert!((total_area(&polygon, &triangles) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_clipped_ring_keeps_area() {
        let ids = [1, 2, 3, 4, 5, 1];
        let coords = [(0.0, 0.0), (0.0, 10.0), (20.0, 10.0), (20.0, 5.0), (20.0, 0.0)];
        let nodes = ids
            .iter()
            .map(|&id| (id, Point2D::from(coords[(id - 1) as usize])))
            .collect();
        let fragment = Fragment::new(1, nodes);
        let rect = Bounds::new(0.0, 0.0, 15.0, 15.0);

        let full = assemble_rings(&[fragment.clone()], None, &mut Diagnostics::quiet()).rings;
        let clipped =
            assemble_rings(&[fragment], Some(&rect), &mut Diagnostics::quiet()).rings;
        assert_eq!(full[0].len(), 6);
        assert_eq!(clipped[0].len(), 5);

        let before = MultiPolygon::from_rings(1, &full, &[]);
        let after = MultiPolygon::from_rings(1, &clipped, &[]);
        let area_before =
            total_area(&before, &triangulate(&before, &mut Diagnostics::quiet()).unwrap());
        let area_after =
            total_area(&after, &triangulate(&after, &mut Diagnostics::quiet()).unwrap());
        assert!((area_before - 200.0).abs() < 1e-9);
        assert!((area_after - area_before).abs() < 1e-9);
    }
}
