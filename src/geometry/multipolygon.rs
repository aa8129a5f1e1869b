//! Multipolygon assembly: outer and inner ways of one area feature become a
//! polygon-with-holes that owns its points.

use std::collections::VecDeque;

use super::ring::{Fragment, Ring, assemble_rings};
use super::{Bounds, Point2D, PointArena, signed_area};
use crate::diagnostics::Diagnostics;
use crate::domain::{NodeLookup, Relation, Tagged, Way};

/// An area feature ready for triangulation.
///
/// Rings are closed index lists into the polygon's own point arena; the
/// source relation and ways are only borrowed for attribute resolution.
#[derive(Debug)]
pub struct MultiPolygon<'a> {
    id: u64,
    relation: Option<&'a Relation>,
    outer_ways: Vec<&'a Way>,
    arena: PointArena,
    outers: Vec<Vec<usize>>,
    holes: Vec<Vec<usize>>,
}

impl<'a> MultiPolygon<'a> {
    /// Build a polygon from a relation's members (or a lone way when
    /// `relation` is `None`).
    ///
    /// Returns `None` when no outer ring survives assembly.
    pub fn assemble(
        relation: Option<&'a Relation>,
        outer_ways: Vec<&'a Way>,
        inner_ways: Vec<&'a Way>,
        nodes: &impl NodeLookup,
        interest: Option<&Bounds>,
        diag: &mut Diagnostics,
    ) -> Option<Self> {
        let id = outer_ways.first()?.id;
        let context = relation.map_or(id, |r| r.id);

        let outer_rings = rings_from_ways(&outer_ways, nodes, interest, context, diag);
        if outer_rings.is_empty() {
            return None;
        }
        let hole_rings = rings_from_ways(&inner_ways, nodes, interest, context, diag);

        let mut arena = PointArena::new();
        let outers = outer_rings.iter().map(|r| push_ring(&mut arena, r)).collect();
        let holes = hole_rings.iter().map(|r| push_ring(&mut arena, r)).collect();

        Some(Self {
            id,
            relation,
            outer_ways,
            arena,
            outers,
            holes,
        })
    }

    /// Polygon from already assembled rings, with no source features to
    /// resolve attributes against.
    pub fn from_rings(id: u64, outer_rings: &[Ring], hole_rings: &[Ring]) -> MultiPolygon<'static> {
        let mut arena = PointArena::new();
        let outers = outer_rings.iter().map(|r| push_ring(&mut arena, r)).collect();
        let holes = hole_rings.iter().map(|r| push_ring(&mut arena, r)).collect();
        MultiPolygon {
            id,
            relation: None,
            outer_ways: Vec::new(),
            arena,
            outers,
            holes,
        }
    }

    /// Id of the first outer way
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn relation(&self) -> Option<&'a Relation> {
        self.relation
    }

    pub fn arena(&self) -> &PointArena {
        &self.arena
    }

    pub fn point(&self, index: usize) -> Point2D {
        self.arena.get(index)
    }

    /// Closed outer rings as arena indices
    pub fn outer_rings(&self) -> &[Vec<usize>] {
        &self.outers
    }

    /// Closed hole rings as arena indices
    pub fn holes(&self) -> &[Vec<usize>] {
        &self.holes
    }

    pub fn ring_points(&self, ring: &[usize]) -> Vec<Point2D> {
        ring.iter().map(|&i| self.arena.get(i)).collect()
    }

    pub fn points_count(&self) -> usize {
        self.outers.iter().chain(&self.holes).map(Vec::len).sum()
    }

    /// Filled area: outer rings minus holes
    pub fn area(&self) -> f64 {
        let ring_area = |ring: &Vec<usize>| signed_area(ring.iter().map(|&i| self.arena.get(i))).abs();
        let outer: f64 = self.outers.iter().map(ring_area).sum();
        let holes: f64 = self.holes.iter().map(ring_area).sum();
        outer - holes
    }

    /// Relation tags win; otherwise the value every outer way agrees on.
    pub fn attribute(&self, key: &str) -> Option<&'a str> {
        if let Some(relation) = self.relation
            && let Some(value) = relation.attribute(key)
        {
            return Some(value);
        }

        let mut agreed: Option<&'a str> = None;
        for way in self.outer_ways.iter().copied() {
            let value = way.attribute(key)?;
            if agreed.is_some_and(|prev| prev != value) {
                return None;
            }
            agreed = Some(value);
        }
        agreed
    }

    pub fn has_attribute(&self, key: &str, value: Option<&str>) -> bool {
        if let Some(relation) = self.relation
            && relation.has_attribute(key, value)
        {
            return true;
        }
        !self.outer_ways.is_empty() && self.outer_ways.iter().all(|w| w.has_attribute(key, value))
    }
}

fn push_ring(arena: &mut PointArena, ring: &Ring) -> Vec<usize> {
    let mut indices: Vec<usize> = ring.distinct_points().iter().map(|&p| arena.push(p)).collect();
    indices.push(indices[0]);
    indices
}

/// Join ways into closed groups, then each group into rings
fn rings_from_ways(
    ways: &[&Way],
    nodes: &impl NodeLookup,
    interest: Option<&Bounds>,
    context: u64,
    diag: &mut Diagnostics,
) -> Vec<Ring> {
    let mut rings = Vec::new();
    for group in group_ways(ways, context, diag) {
        let fragments: Vec<Fragment> = group.iter().map(|w| fragment(w, nodes)).collect();
        rings.extend(assemble_rings(&fragments, interest, diag).rings);
    }
    rings
}

fn fragment(way: &Way, nodes: &impl NodeLookup) -> Fragment {
    let resolved = way
        .nodes
        .iter()
        .filter_map(|&id| nodes.position(id).map(|p| (id, p)))
        .collect();
    Fragment::new(way.id, resolved)
}

/// Join ways at shared end nodes, growing each group at both ends until it
/// closes. Groups of several ways that stay open are topology errors and are
/// dropped; a single open way passes through to be closed by ring assembly.
fn group_ways<'w>(ways: &[&'w Way], context: u64, diag: &mut Diagnostics) -> Vec<Vec<&'w Way>> {
    let mut remaining: Vec<&'w Way> = ways.iter().copied().filter(|w| !w.nodes.is_empty()).collect();
    let mut groups = Vec::new();

    while !remaining.is_empty() {
        let seed = remaining.remove(0);
        let (Some(mut first), Some(mut last)) = (seed.first_node(), seed.last_node()) else {
            continue;
        };
        let mut group = VecDeque::from([seed]);

        while first != last {
            let Some(pos) = remaining.iter().position(|w| {
                let (f, l) = (w.first_node(), w.last_node());
                f == Some(last) || l == Some(last) || f == Some(first) || l == Some(first)
            }) else {
                break;
            };

            let way = remaining.remove(pos);
            let (f, l) = (way.first_node(), way.last_node());
            if f == Some(last) {
                last = l.unwrap_or(last);
                group.push_back(way);
            } else if l == Some(last) {
                last = f.unwrap_or(last);
                group.push_back(way);
            } else if l == Some(first) {
                first = f.unwrap_or(first);
                group.push_front(way);
            } else {
                first = l.unwrap_or(first);
                group.push_front(way);
            }
        }

        if first != last && group.len() > 1 {
            diag.topology_error(format!(
                "Ways of feature {} starting with way {} cannot be joined; open ends at nodes {} and {}",
                context, seed.id, first, last
            ));
            continue;
        }
        groups.push(group.into_iter().collect());
    }

    groups
}
