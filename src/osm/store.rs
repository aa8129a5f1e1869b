//! In-memory feature store with attribute queries.
//!
//! Features are kept in id order so every query, and with it the whole scene,
//! comes out in the same order on every run.

use std::collections::{BTreeMap, HashSet};

use log::debug;

use crate::diagnostics::Diagnostics;
use crate::domain::{MemberKind, Node, NodeLookup, Relation, Tagged, Way};
use crate::geometry::{Bounds, MultiPolygon, Point2D};

#[derive(Debug)]
pub struct FeatureStore {
    nodes: BTreeMap<u64, Node>,
    ways: BTreeMap<u64, Way>,
    relations: BTreeMap<u64, Relation>,
    /// Relations each way takes part in, in relation id order
    way_relations: BTreeMap<u64, Vec<u64>>,
    /// Area of interest on the local plane
    bounds: Bounds,
}

impl FeatureStore {
    pub fn new(bounds: Bounds) -> Self {
        Self {
            nodes: BTreeMap::new(),
            ways: BTreeMap::new(),
            relations: BTreeMap::new(),
            way_relations: BTreeMap::new(),
            bounds,
        }
    }

    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    pub fn insert_node(&mut self, node: Node) {
        self.nodes.insert(node.id, node);
    }

    pub fn insert_way(&mut self, way: Way) {
        self.ways.insert(way.id, way);
    }

    pub fn insert_relation(&mut self, relation: Relation) {
        for member in &relation.members {
            if member.kind == MemberKind::Way {
                let ids = self.way_relations.entry(member.id).or_default();
                if !ids.contains(&relation.id) {
                    ids.push(relation.id);
                    ids.sort_unstable();
                }
            }
        }
        self.relations.insert(relation.id, relation);
    }

    pub fn node(&self, id: u64) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn way(&self, id: u64) -> Option<&Way> {
        self.ways.get(&id)
    }

    pub fn relation(&self, id: u64) -> Option<&Relation> {
        self.relations.get(&id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn way_count(&self) -> usize {
        self.ways.len()
    }

    pub fn relation_count(&self) -> usize {
        self.relations.len()
    }

    /// Nodes carrying `key` (with exactly `value` when given)
    pub fn nodes_with<'s>(
        &'s self,
        key: &'s str,
        value: Option<&'s str>,
    ) -> impl Iterator<Item = &'s Node> + 's {
        self.nodes.values().filter(move |n| n.has_attribute(key, value))
    }

    /// Ways carrying `key` (with exactly `value` when given)
    pub fn ways_with<'s>(
        &'s self,
        key: &'s str,
        value: Option<&'s str>,
    ) -> impl Iterator<Item = &'s Way> + 's {
        self.ways.values().filter(move |w| w.has_attribute(key, value))
    }

    /// Resolved positions of a way's nodes
    pub fn way_points(&self, way: &Way) -> Vec<Point2D> {
        way.nodes.iter().filter_map(|&id| self.position(id)).collect()
    }

    /// Area features carrying `key` (with exactly `value` when given).
    ///
    /// Every matching relation yields its polygon. A matching way that is an
    /// outer member of a matching relation is already drawn by it. A matching
    /// way that is an outer member of some other relation yields that
    /// relation's polygon, once, from the relation's lowest-id outer way. Any
    /// other matching way is a polygon of its own.
    pub fn multipolygons_with(
        &self,
        key: &str,
        value: Option<&str>,
        interest: Option<&Bounds>,
        diag: &mut Diagnostics,
    ) -> Vec<MultiPolygon<'_>> {
        let mut polygons = Vec::new();
        let mut consumed: HashSet<u64> = HashSet::new();

        for relation in self.relations.values().filter(|r| r.has_attribute(key, value)) {
            let (outer, inner) = self.relation_parts(relation, diag);
            if outer.is_empty() {
                diag.topology_error(format!(
                    "Relation with id {} has no \"outer\" member, ignoring",
                    relation.id
                ));
                continue;
            }
            consumed.extend(outer.iter().map(|w| w.id));
            polygons.extend(MultiPolygon::assemble(
                Some(relation),
                outer,
                inner,
                self,
                interest,
                diag,
            ));
        }

        for way in self.ways.values().filter(|w| w.has_attribute(key, value)) {
            if consumed.contains(&way.id) {
                continue;
            }

            let owner = self
                .way_relations
                .get(&way.id)
                .into_iter()
                .flatten()
                .filter_map(|id| self.relations.get(id))
                .find(|r| r.role_of_way(way.id) == Some("outer"));

            match owner {
                Some(relation) => {
                    let (outer, inner) = self.relation_parts(relation, diag);
                    if outer.iter().any(|w| w.id < way.id) {
                        debug!(
                            "Relation {} is built from a lower outer way than {}",
                            relation.id, way.id
                        );
                        continue;
                    }
                    polygons.extend(MultiPolygon::assemble(
                        Some(relation),
                        outer,
                        inner,
                        self,
                        interest,
                        diag,
                    ));
                }
                None => {
                    polygons.extend(MultiPolygon::assemble(
                        None,
                        vec![way],
                        vec![],
                        self,
                        interest,
                        diag,
                    ));
                }
            }
        }

        polygons
    }

    /// Outer and inner ways of a relation, in member order
    fn relation_parts<'s>(
        &'s self,
        relation: &Relation,
        diag: &mut Diagnostics,
    ) -> (Vec<&'s Way>, Vec<&'s Way>) {
        let mut outer = Vec::new();
        let mut inner = Vec::new();

        for member in &relation.members {
            let target = match member.role.as_str() {
                "outer" => &mut outer,
                "inner" => &mut inner,
                _ => continue,
            };
            if member.kind != MemberKind::Way {
                diag.topology_error(format!(
                    "Member with id {} of relation {} has role {} and isn't a way, ignoring",
                    member.id, relation.id, member.role
                ));
                continue;
            }
            match self.ways.get(&member.id) {
                Some(way) => target.push(way),
                None => debug!(
                    "Way {} of relation {} is not in the source data",
                    member.id, relation.id
                ),
            }
        }

        (outer, inner)
    }
}

impl NodeLookup for FeatureStore {
    fn position(&self, node_id: u64) -> Option<Point2D> {
        self.nodes.get(&node_id).map(|n| n.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Member, Tags};

    fn tags(pairs: &[(&str, &str)]) -> Tags {
        pairs
            .iter()
            .map(|&(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn member(kind: MemberKind, id: u64, role: &str) -> Member {
        Member {
            kind,
            id,
            role: role.to_string(),
        }
    }

    /// Two squares side by side (ways 10 and 11) and a hole in the first (12)
    fn store() -> FeatureStore {
        let mut store = FeatureStore::new(Bounds::new(-100.0, -100.0, 100.0, 100.0));
        let coords = [
            (1, (0.0, 0.0)),
            (2, (0.0, 10.0)),
            (3, (10.0, 10.0)),
            (4, (10.0, 0.0)),
            (5, (20.0, 10.0)),
            (6, (20.0, 0.0)),
            (7, (2.0, 2.0)),
            (8, (2.0, 4.0)),
            (9, (4.0, 2.0)),
        ];
        for (id, (x, y)) in coords {
            store.insert_node(Node {
                id,
                position: Point2D::new(x, y),
                tags: Tags::new(),
            });
        }
        store.insert_node(Node {
            id: 50,
            position: Point2D::new(5.0, 5.0),
            tags: tags(&[("natural", "tree")]),
        });
        store.insert_way(Way {
            id: 10,
            nodes: vec![1, 2, 3, 4, 1],
            tags: tags(&[("landuse", "forest")]),
        });
        store.insert_way(Way {
            id: 11,
            nodes: vec![4, 3, 5, 6, 4],
            tags: tags(&[("landuse", "meadow")]),
        });
        store.insert_way(Way {
            id: 12,
            nodes: vec![7, 8, 9, 7],
            tags: Tags::new(),
        });
        store
    }

    #[test]
    fn test_nodes_and_ways_with() {
        let store = store();
        let trees: Vec<u64> = store.nodes_with("natural", Some("tree")).map(|n| n.id).collect();
        assert_eq!(trees, vec![50]);

        let landuse: Vec<u64> = store.ways_with("landuse", None).map(|w| w.id).collect();
        assert_eq!(landuse, vec![10, 11]);
        assert_eq!(store.ways_with("landuse", Some("farmland")).count(), 0);
    }

    #[test]
    fn test_single_way_polygons() {
        let store = store();
        let mut diag = Diagnostics::quiet();
        let polygons = store.multipolygons_with("landuse", None, None, &mut diag);
        assert_eq!(polygons.len(), 2);
        assert_eq!(polygons[0].id(), 10);
        assert!(polygons[0].relation().is_none());
        assert!((polygons[1].area() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_matching_relation_consumes_its_ways() {
        let mut store = store();
        store.insert_relation(Relation {
            id: 100,
            members: vec![
                member(MemberKind::Way, 10, "outer"),
                member(MemberKind::Way, 12, "inner"),
            ],
            tags: tags(&[("type", "multipolygon"), ("landuse", "forest")]),
        });

        let mut diag = Diagnostics::quiet();
        let polygons = store.multipolygons_with("landuse", Some("forest"), None, &mut diag);
        assert_eq!(polygons.len(), 1);
        assert_eq!(polygons[0].relation().map(|r| r.id), Some(100));
        assert!((polygons[0].area() - 98.0).abs() < 1e-9);
    }

    #[test]
    fn test_tagged_outer_way_builds_relation_once() {
        let mut store = store();
        // untagged relation; both outer ways carry the tag themselves
        store.insert_way(Way {
            id: 13,
            nodes: vec![4, 3, 5, 6, 4],
            tags: tags(&[("landuse", "forest")]),
        });
        store.insert_relation(Relation {
            id: 100,
            members: vec![
                member(MemberKind::Way, 13, "outer"),
                member(MemberKind::Way, 10, "outer"),
                member(MemberKind::Way, 12, "inner"),
            ],
            tags: tags(&[("type", "multipolygon")]),
        });

        let mut diag = Diagnostics::quiet();
        let polygons = store.multipolygons_with("landuse", Some("forest"), None, &mut diag);
        assert_eq!(polygons.len(), 1);
        assert_eq!(polygons[0].outer_rings().len(), 2);
        assert!((polygons[0].area() - 198.0).abs() < 1e-9);
        assert_eq!(polygons[0].attribute("landuse"), Some("forest"));
    }

    #[test]
    fn test_relation_without_outer_is_reported() {
        let mut store = store();
        store.insert_relation(Relation {
            id: 100,
            members: vec![
                member(MemberKind::Way, 12, "inner"),
                member(MemberKind::Node, 50, "outer"),
            ],
            tags: tags(&[("natural", "water")]),
        });

        let mut diag = Diagnostics::quiet();
        let polygons = store.multipolygons_with("natural", Some("water"), None, &mut diag);
        assert!(polygons.is_empty());
        // the node member and the missing outer ring
        assert_eq!(diag.topology_errors, 2);
    }

    #[test]
    fn test_way_points_skip_unknown_nodes() {
        let store = store();
        let way = Way {
            id: 99,
            nodes: vec![1, 1000, 2],
            tags: Tags::new(),
        };
        assert_eq!(store.way_points(&way).len(), 2);
    }
}
