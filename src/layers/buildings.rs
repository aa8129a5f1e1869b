//! Extruded buildings: walls along every ring, a roof at the top and a floor
//! for buildings that do not stand on the ground.

use super::{Converter, layer_offset, leading_number, read_dimension, tag_label};
use crate::config::BuildingLayer;
use crate::error::GeometryError;
use crate::geometry::MultiPolygon;

/// Footprint above which an unclassified building counts as non-residential,
/// square meters
const LARGE_FOOTPRINT: f64 = 640.0;
/// Buildings of unknown use taller than this count as non-residential
const TALL_BUILDING: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildingType {
    Living,
    NonLiving,
    Worship,
}

const NONLIVING_USES: &[&str] = &[
    "bunker",
    "collapsed",
    "commercial",
    "detached",
    "entrance",
    "farm",
    "garage",
    "greenhouse",
    "hangar",
    "industrial",
    "manufacture",
    "office",
    "public",
    "retail",
    "roof",
    "school",
    "service",
    "storage_tank",
    "terasse",
    "transportation",
    "train_station",
    "university",
];

/// Classify a building by its use tags, else guess by its size
pub fn building_type(building: &MultiPolygon, height: f64, min_height: f64) -> BuildingType {
    let usage = match building.attribute("building") {
        None | Some("yes") => building.attribute("building:use"),
        usage => usage,
    };

    if let Some(usage) = usage {
        match usage {
            "house" | "residential" | "hut" => return BuildingType::Living,
            "church" => return BuildingType::Worship,
            _ if building.has_attribute("amenity", Some("place_of_worship")) => {
                return BuildingType::Worship;
            }
            _ if NONLIVING_USES.contains(&usage) => return BuildingType::NonLiving,
            _ => {}
        }
    }
    if building.attribute("amenity").is_some() {
        return BuildingType::NonLiving;
    }

    if height > TALL_BUILDING || min_height != 0.0 || building.area() > LARGE_FOOTPRINT {
        BuildingType::NonLiving
    } else {
        BuildingType::Living
    }
}

/// Height from `building:levels`, then `building:height` or `height`;
/// the flag tells whether any tag was found
fn building_height(building: &MultiPolygon, default_height: f64) -> (f64, bool) {
    let mut height = default_height;
    let mut defined = false;

    if let Some(levels) = building.attribute("building:levels") {
        height = 4.0 + (leading_number(levels) - 1.0) * 3.0;
        defined = true;
    }
    if let Some(text) = building
        .attribute("building:height")
        .or_else(|| building.attribute("height"))
    {
        height = read_dimension(text);
        defined = true;
    }
    (height, defined)
}

impl Converter<'_> {
    pub fn draw_buildings(&mut self, layer: &BuildingLayer) -> Result<(), GeometryError> {
        let label = tag_label(&layer.key, layer.value.as_deref());

        for building in self.polygons(&layer.key, layer.value.as_deref()) {
            let mut extra = layer_offset(building.attribute("layer"));
            if extra < 0.0 {
                continue;
            }
            // towers and chimneys have layers of their own
            if !layer.special
                && (building.has_attribute("man_made", Some("tower"))
                    || building.has_attribute("amenity", Some("tower"))
                    || building.has_attribute("man_made", Some("chimney")))
            {
                continue;
            }

            let (mut height, height_defined) = building_height(&building, layer.default_height);
            let mut min_height = 0.0;
            if let Some(text) = building.attribute("min_height") {
                min_height = leading_number(text);
                extra = 0.0;
            }

            self.scene
                .comment(format!("Building {} ({})", building.id(), label));

            let mut roof_style = layer.roof_style.as_deref();
            if !layer.special {
                match building_type(&building, height, min_height) {
                    BuildingType::Living => {
                        if !height_defined {
                            // slightly varied heights for plain houses
                            height += (building.id() % 5) as f64 / 2.0 - 1.0;
                        }
                    }
                    BuildingType::NonLiving => {}
                    BuildingType::Worship => {
                        roof_style = layer.worship_roof_style.as_deref().or(roof_style);
                        if !height_defined {
                            height *= 2.0;
                        }
                    }
                }
            }

            self.draw_building(
                &building,
                min_height,
                height + extra,
                &layer.style,
                roof_style,
                layer.clearance,
            )?;
        }
        Ok(())
    }

    fn draw_building(
        &mut self,
        building: &MultiPolygon,
        min_height: f64,
        height: f64,
        style: &str,
        roof_style: Option<&str>,
        clearance: f64,
    ) -> Result<(), GeometryError> {
        for ring in building.outer_rings().iter().chain(building.holes()) {
            let points = building.ring_points(ring);
            self.occupancy.add_polyline(&points, clearance);
            for pair in points.windows(2) {
                self.scene
                    .add_wall(pair[0], pair[1], min_height, height, style);
            }
        }

        if roof_style.is_none() && min_height == 0.0 {
            return Ok(());
        }
        let triangles = self.triangles_of(building)?;
        if min_height != 0.0 {
            self.scene.add_triangles(style, min_height, triangles.clone());
        }
        if let Some(roof_style) = roof_style {
            self.scene.add_triangles(roof_style, height, triangles);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::{StoreBuilder, square};
    use super::*;
    use crate::config::ScatterConfig;
    use crate::diagnostics::Diagnostics;
    use crate::geometry::{Point2D, Ring};
    use crate::mesh::SceneCommand;
    use crate::osm::FeatureStore;

    fn layer() -> BuildingLayer {
        BuildingLayer {
            key: "building".to_string(),
            value: None,
            default_height: 4.5,
            style: "building".to_string(),
            roof_style: Some("building_roof".to_string()),
            worship_roof_style: Some("building_religious_roof".to_string()),
            special: false,
            clearance: 7.0,
        }
    }

    fn run(store: &FeatureStore, layer: &BuildingLayer) -> Vec<SceneCommand> {
        let mut converter =
            Converter::new(store, None, ScatterConfig::default(), 1, Diagnostics::quiet());
        converter.draw_buildings(layer).unwrap();
        converter.finish().commands
    }

    fn walls(commands: &[SceneCommand]) -> Vec<(f64, f64)> {
        commands
            .iter()
            .filter_map(|c| match c {
                SceneCommand::Wall { bottom, top, .. } => Some((*bottom, *top)),
                _ => None,
            })
            .collect()
    }

    fn triangle_batches(commands: &[SceneCommand]) -> Vec<(&str, f64)> {
        commands
            .iter()
            .filter_map(|c| match c {
                SceneCommand::Triangles {
                    style, elevation, ..
                } => Some((style.as_str(), *elevation)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_building_type() {
        let ring = |size: f64| {
            let points = [(0.0, 0.0), (0.0, size), (size, size), (size, 0.0), (0.0, 0.0)]
                .map(Point2D::from)
                .to_vec();
            Ring::from_closed(points).unwrap()
        };
        // without source features no tags resolve, so only size counts
        let small = MultiPolygon::from_rings(1, &[ring(10.0)], &[]);
        let large = MultiPolygon::from_rings(2, &[ring(30.0)], &[]);
        assert_eq!(building_type(&small, 4.5, 0.0), BuildingType::Living);
        assert_eq!(building_type(&small, 12.0, 0.0), BuildingType::NonLiving);
        assert_eq!(building_type(&small, 4.5, 3.0), BuildingType::NonLiving);
        assert_eq!(building_type(&large, 4.5, 0.0), BuildingType::NonLiving);
    }

    #[test]
    fn test_house_walls_and_roof() {
        let mut builder = StoreBuilder::new();
        // id 13: 13 % 5 = 3, so the height grows by half a meter
        builder.closed_way(13, &square(0.0, 0.0, 10.0), &[("building", "house")]);
        let store = builder.build();

        let commands = run(&store, &layer());
        assert_eq!(
            commands[0],
            SceneCommand::Comment("Building 13 (tag building)".to_string())
        );
        assert_eq!(walls(&commands), vec![(0.0, 5.0); 4]);
        assert_eq!(triangle_batches(&commands), vec![("building_roof", 5.0)]);
    }

    #[test]
    fn test_tagged_heights() {
        let mut builder = StoreBuilder::new();
        builder
            .closed_way(1, &square(0.0, 0.0, 10.0), &[("building", "yes"), ("building:levels", "3")])
            .closed_way(2, &square(20.0, 0.0, 10.0), &[("building", "office"), ("height", "30 ft")])
            .closed_way(
                3,
                &square(40.0, 0.0, 10.0),
                &[("building", "yes"), ("min_height", "3"), ("height", "8"), ("layer", "2")],
            );
        let store = builder.build();

        let commands = run(&store, &layer());
        let tops: Vec<f64> = walls(&commands).iter().map(|w| w.1).collect();
        assert_eq!(tops[0], 10.0);
        assert!((tops[4] - 9.144).abs() < 1e-9);
        // min_height replaces the layer offset and adds a floor
        assert_eq!(walls(&commands)[8], (3.0, 8.0));
        assert_eq!(
            triangle_batches(&commands)[2..],
            [("building", 3.0), ("building_roof", 8.0)]
        );
    }

    #[test]
    fn test_worship_and_skipped_buildings() {
        let mut builder = StoreBuilder::new();
        builder
            .closed_way(1, &square(0.0, 0.0, 10.0), &[("building", "church")])
            .closed_way(2, &square(20.0, 0.0, 10.0), &[("building", "yes"), ("man_made", "tower")])
            .closed_way(3, &square(40.0, 0.0, 10.0), &[("building", "yes"), ("layer", "-1")]);
        let store = builder.build();

        let commands = run(&store, &layer());
        assert_eq!(walls(&commands), vec![(0.0, 9.0); 4]);
        assert_eq!(
            triangle_batches(&commands),
            vec![("building_religious_roof", 9.0)]
        );
    }

    #[test]
    fn test_special_buildings_skip_classification() {
        let mut builder = StoreBuilder::new();
        builder.closed_way(4, &square(0.0, 0.0, 6.0), &[("man_made", "tower")]);
        let store = builder.build();

        let layer = BuildingLayer {
            key: "man_made".to_string(),
            value: Some("tower".to_string()),
            default_height: 25.0,
            worship_roof_style: None,
            special: true,
            ..layer()
        };
        let commands = run(&store, &layer);
        assert_eq!(walls(&commands), vec![(0.0, 25.0); 4]);
    }

    #[test]
    fn test_walls_register_occupancy() {
        let mut builder = StoreBuilder::new();
        builder.closed_way(1, &square(0.0, 0.0, 40.0), &[("building", "yes")]);
        let store = builder.build();

        let mut converter =
            Converter::new(&store, None, ScatterConfig::default(), 1, Diagnostics::quiet());
        converter
            .draw_buildings(&BuildingLayer {
                roof_style: None,
                ..layer()
            })
            .unwrap();
        assert!(converter.occupancy().is_near_other(Point2D::new(20.0, 5.0)));
        assert!(!converter.occupancy().is_near_other(Point2D::new(20.0, 20.0)));
        // no roof and on the ground: walls only
        assert_eq!(converter.stats().triangles, 0);
        assert_eq!(converter.stats().walls, 4);
    }
}
