use crate::diagnostics::Diagnostics;
use crate::domain::{Member, MemberKind, Node, Relation, Tags, Way};
use crate::error::InputError;
use crate::geometry::{Bounds, Projector};
use anyhow::{Context, Result};
use log::debug;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use std::str::FromStr;

use super::FeatureStore;

/// Overpass JSON document (`[out:json]` output)
#[derive(Debug, Deserialize)]
pub struct OverpassDocument {
    #[serde(default)]
    pub bounds: Option<GeoBounds>,
    pub elements: Vec<Element>,
}

/// Geographic bounding box in degrees
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct GeoBounds {
    pub minlat: f64,
    pub minlon: f64,
    pub maxlat: f64,
    pub maxlon: f64,
}

impl GeoBounds {
    pub fn is_empty(&self) -> bool {
        !(self.minlat < self.maxlat && self.minlon < self.maxlon)
    }

    pub fn center(&self) -> (f64, f64) {
        (
            (self.minlat + self.maxlat) / 2.0,
            (self.minlon + self.maxlon) / 2.0,
        )
    }
}

/// `minlat,minlon,maxlat,maxlon`
impl FromStr for GeoBounds {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let values = s
            .split(',')
            .map(|part| part.trim().parse::<f64>())
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| format!("invalid coordinate in bounds: {}", e))?;
        let &[minlat, minlon, maxlat, maxlon] = values.as_slice() else {
            return Err(format!(
                "expected minlat,minlon,maxlat,maxlon, got {} values",
                values.len()
            ));
        };
        Ok(Self {
            minlat,
            minlon,
            maxlat,
            maxlon,
        })
    }
}

/// A single element from Overpass (node, way or relation)
#[derive(Debug, Deserialize)]
pub struct Element {
    #[serde(rename = "type")]
    pub type_: String,
    pub id: u64,
    #[serde(default)]
    pub nodes: Option<Vec<u64>>,
    #[serde(default)]
    pub members: Option<Vec<MemberRecord>>,
    #[serde(default)]
    pub tags: Option<Tags>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct MemberRecord {
    #[serde(rename = "type")]
    pub type_: String,
    #[serde(rename = "ref", default)]
    pub ref_: Option<u64>,
    #[serde(default)]
    pub role: String,
}

/// Read and parse an Overpass JSON file; `bounds` replaces the document's own
pub fn load_file(
    path: &Path,
    bounds: Option<GeoBounds>,
    diag: &mut Diagnostics,
) -> Result<FeatureStore> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read source file: {}", path.display()))?;
    parse_document_within(&text, bounds, diag)
        .with_context(|| format!("Failed to load source file: {}", path.display()))
}

/// Parse an Overpass JSON document into a feature store on the local plane.
///
/// # Algorithm
/// 1. Take the document bounds, or the extent of all nodes when absent
/// 2. Project every node around the bounds centre
/// 3. Keep ways with their known nodes, relations with their node and way
///    members
///
/// Records missing mandatory fields are skipped and counted.
pub fn parse_document(json: &str, diag: &mut Diagnostics) -> Result<FeatureStore, InputError> {
    parse_document_within(json, None, diag)
}

/// [`parse_document`] with the area bounds given by the caller
pub fn parse_document_within(
    json: &str,
    bounds: Option<GeoBounds>,
    diag: &mut Diagnostics,
) -> Result<FeatureStore, InputError> {
    let document: OverpassDocument = serde_json::from_str(json)?;
    let geo_bounds = bounds
        .or(document.bounds)
        .or_else(|| node_extent(&document.elements))
        .filter(|b| !b.is_empty())
        .ok_or(InputError::EmptyBounds)?;

    let projector = Projector::new(geo_bounds.center());
    let low = projector.project(geo_bounds.minlat, geo_bounds.minlon);
    let high = projector.project(geo_bounds.maxlat, geo_bounds.maxlon);
    let mut store = FeatureStore::new(Bounds::new(low.x, low.y, high.x, high.y));

    for element in document.elements.iter().filter(|e| e.type_ == "node") {
        let (Some(lat), Some(lon)) = (element.lat, element.lon) else {
            diag.skipped_record(format!("Node {} has no coordinates, skipping", element.id));
            continue;
        };
        store.insert_node(Node {
            id: element.id,
            position: projector.project(lat, lon),
            tags: element.tags.clone().unwrap_or_default(),
        });
    }

    let mut way_ids = HashSet::new();
    for element in document.elements.iter().filter(|e| e.type_ == "way") {
        let Some(refs) = &element.nodes else {
            diag.skipped_record(format!("Way {} has no node list, skipping", element.id));
            continue;
        };
        let nodes: Vec<u64> = refs
            .iter()
            .copied()
            .filter(|&id| store.node(id).is_some())
            .collect();
        if nodes.len() < refs.len() {
            debug!(
                "Way {} references {} nodes outside the source data",
                element.id,
                refs.len() - nodes.len()
            );
        }
        way_ids.insert(element.id);
        store.insert_way(Way {
            id: element.id,
            nodes,
            tags: element.tags.clone().unwrap_or_default(),
        });
    }

    for element in document.elements.iter().filter(|e| e.type_ == "relation") {
        let mut members = Vec::new();
        for record in element.members.iter().flatten() {
            let Some(id) = record.ref_ else {
                diag.skipped_record(format!(
                    "Member of relation {} has no reference, skipping",
                    element.id
                ));
                continue;
            };
            let kind = match record.type_.as_str() {
                "node" if store.node(id).is_some() => MemberKind::Node,
                "way" if way_ids.contains(&id) => MemberKind::Way,
                _ => {
                    debug!(
                        "Member {} {} of relation {} ignored",
                        record.type_, id, element.id
                    );
                    continue;
                }
            };
            members.push(Member {
                kind,
                id,
                role: record.role.clone(),
            });
        }
        store.insert_relation(Relation {
            id: element.id,
            members,
            tags: element.tags.clone().unwrap_or_default(),
        });
    }

    Ok(store)
}

fn node_extent(elements: &[Element]) -> Option<GeoBounds> {
    let mut extent: Option<GeoBounds> = None;
    for element in elements.iter().filter(|e| e.type_ == "node") {
        let (Some(lat), Some(lon)) = (element.lat, element.lon) else {
            continue;
        };
        let b = extent.get_or_insert(GeoBounds {
            minlat: lat,
            minlon: lon,
            maxlat: lat,
            maxlon: lon,
        });
        b.minlat = b.minlat.min(lat);
        b.minlon = b.minlon.min(lon);
        b.maxlat = b.maxlat.max(lat);
        b.maxlon = b.maxlon.max(lon);
    }
    extent
}
