//! Ring assembly: join directed way fragments into closed, clockwise rings.

use super::clip::clip_ring;
use super::{Bounds, Point2D, signed_area};
use crate::diagnostics::Diagnostics;

/// One directed polyline taking part in a ring, with its node ids resolved
/// to coordinates.
#[derive(Debug, Clone)]
pub struct Fragment {
    pub way_id: u64,
    pub nodes: Vec<(u64, Point2D)>,
}

impl Fragment {
    pub fn new(way_id: u64, nodes: Vec<(u64, Point2D)>) -> Self {
        Self { way_id, nodes }
    }

    pub fn first_id(&self) -> Option<u64> {
        self.nodes.first().map(|&(id, _)| id)
    }

    pub fn last_id(&self) -> Option<u64> {
        self.nodes.last().map(|&(id, _)| id)
    }

    pub fn is_closed(&self) -> bool {
        self.nodes.len() > 1 && self.first_id() == self.last_id()
    }
}

/// A closed ring of points, clockwise, starting at its lowest (x, y) point.
///
/// The first point is repeated as the last one.
#[derive(Debug, Clone, PartialEq)]
pub struct Ring {
    points: Vec<Point2D>,
}

impl Ring {
    /// Smallest valid ring: 3 distinct points plus the closing repeat
    pub const MIN_POINTS: usize = 4;

    pub fn points(&self) -> &[Point2D] {
        &self.points
    }

    /// Points without the closing repeat
    pub fn distinct_points(&self) -> &[Point2D] {
        &self.points[..self.points.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn signed_area(&self) -> f64 {
        signed_area(self.points.iter().copied())
    }

    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    /// Build a ring from an already closed point list, normalising winding
    /// and start point. Returns `None` for fewer than 4 points.
    pub fn from_closed(points: Vec<Point2D>) -> Option<Self> {
        if points.len() < Self::MIN_POINTS || points.first() != points.last() {
            return None;
        }
        let mut ring = Self { points };
        ring.normalize();
        Some(ring)
    }

    fn normalize(&mut self) {
        canonicalize(&mut self.points);
    }
}

/// Turn a closed point list clockwise and rotate it to start at its lowest
/// (x, y) point. Among repeated lowest points the one followed by the lower
/// point wins.
fn canonicalize(points: &mut Vec<Point2D>) {
    if points.len() < 2 {
        return;
    }
    if signed_area(points.iter().copied()) > 0.0 {
        points.reverse();
    }

    let mut open: Vec<Point2D> = points[..points.len() - 1].to_vec();
    let n = open.len();
    let start = (0..n)
        .min_by(|&i, &j| {
            open[i]
                .cmp_xy(&open[j])
                .then_with(|| open[(i + 1) % n].cmp_xy(&open[(j + 1) % n]))
        })
        .unwrap_or(0);
    open.rotate_left(start);
    open.push(open[0]);
    *points = open;
}

/// Outcome of joining a set of fragments
#[derive(Debug, Default)]
pub struct RingAssembly {
    pub rings: Vec<Ring>,
    /// Chains of several fragments whose ends never met
    pub open_chains: usize,
}

impl RingAssembly {
    /// True when at least one ring was produced
    pub fn success(&self) -> bool {
        !self.rings.is_empty()
    }
}

/// Join fragments end-to-end into closed rings.
///
/// A chain grows from a seed fragment by appending any remaining fragment
/// whose first or last node id matches the chain's last node id (reversed when
/// it attaches tail-to-tail), until the chain closes or nothing attaches. Every
/// chain is then de-duplicated, closed when it is a single unclosed way,
/// rejected below 4 points, turned clockwise from its lowest point and
/// clipped against `interest`. The result does not depend on fragment order
/// or direction, with or without clipping.
pub fn assemble_rings(
    fragments: &[Fragment],
    interest: Option<&Bounds>,
    diag: &mut Diagnostics,
) -> RingAssembly {
    let mut remaining: Vec<&Fragment> = fragments.iter().filter(|f| !f.nodes.is_empty()).collect();
    let mut assembly = RingAssembly::default();

    while !remaining.is_empty() {
        let seed = remaining.remove(0);
        let mut chain = seed.nodes.clone();
        let mut pieces = 1;

        while !is_closed_chain(&chain) {
            let last_id = chain[chain.len() - 1].0;
            let Some(pos) = remaining
                .iter()
                .position(|f| f.first_id() == Some(last_id) || f.last_id() == Some(last_id))
            else {
                break;
            };

            let next = remaining.remove(pos);
            if next.first_id() == Some(last_id) {
                chain.extend(next.nodes.iter().skip(1).copied());
            } else {
                chain.extend(next.nodes.iter().rev().skip(1).copied());
            }
            pieces += 1;
        }

        match finish_chain(&chain, pieces, seed.way_id, interest, diag) {
            ChainOutcome::Ring(ring) => assembly.rings.push(ring),
            ChainOutcome::Open => assembly.open_chains += 1,
            ChainOutcome::Dropped => {}
        }
    }

    assembly
}

fn is_closed_chain(chain: &[(u64, Point2D)]) -> bool {
    chain.len() > 1 && chain[0].0 == chain[chain.len() - 1].0
}

enum ChainOutcome {
    Ring(Ring),
    Open,
    Dropped,
}

fn finish_chain(
    chain: &[(u64, Point2D)],
    pieces: usize,
    way_id: u64,
    interest: Option<&Bounds>,
    diag: &mut Diagnostics,
) -> ChainOutcome {
    let mut points: Vec<Point2D> = Vec::with_capacity(chain.len() + 1);
    let mut duplicates = 0;
    for &(_, p) in chain {
        if points.last() == Some(&p) {
            duplicates += 1;
        } else {
            points.push(p);
        }
    }
    if duplicates > 0 {
        diag.duplicates += duplicates;
        diag.note(format!(
            "Polygon with way {} has {} duplicate points next to each other",
            way_id, duplicates
        ));
    }

    if points.len() >= 2 && points.first() != points.last() {
        if pieces > 1 {
            diag.topology_error(format!(
                "Ways joined from way {} cannot be closed; ends at nodes {} and {}",
                way_id,
                chain[0].0,
                chain[chain.len() - 1].0
            ));
            return ChainOutcome::Open;
        }
        points.push(points[0]);
        diag.repairs += 1;
        diag.note(format!("Polygon with way {} isn't closed, closing", way_id));
    }

    if points.len() < Ring::MIN_POINTS {
        diag.degenerate_rings += 1;
        return ChainOutcome::Dropped;
    }

    if let Some(rect) = interest {
        // clipping keeps different points depending on where the walk starts
        canonicalize(&mut points);
        points = clip_ring(&points, rect);
    }

    match Ring::from_closed(points) {
        Some(ring) => ChainOutcome::Ring(ring),
        None => ChainOutcome::Dropped,
    }
}
