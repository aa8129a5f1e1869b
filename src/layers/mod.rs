//! Layer converter: runs layer directives against the feature store and
//! collects the resulting scene.
//!
//! Directives run in list order and share one occupancy index, so whatever
//! is drawn first keeps later scattered objects out of its footprint.

pub mod areas;
pub mod buildings;
pub mod dimensions;
pub mod nodes;
pub mod ways;

pub use dimensions::{compute_way_width, layer_offset, leading_number, read_dimension};

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::config::{LayerDirective, ScatterConfig};
use crate::diagnostics::Diagnostics;
use crate::error::GeometryError;
use crate::geometry::{Bounds, MultiPolygon, OccupancyIndex, Point2D};
use crate::mesh::{SceneBuilder, SceneCommand, SceneStats, Triangle, triangulate};
use crate::osm::FeatureStore;

/// Result of a whole conversion run
#[derive(Debug)]
pub struct Conversion {
    pub commands: Vec<SceneCommand>,
    pub stats: SceneStats,
    pub diagnostics: Diagnostics,
    /// Points left in the occupancy index
    pub occupied_points: usize,
}

pub struct Converter<'s> {
    store: &'s FeatureStore,
    /// Rings are clipped to this rectangle
    interest: Option<Bounds>,
    scatter: ScatterConfig,
    occupancy: OccupancyIndex,
    scene: SceneBuilder,
    rng: StdRng,
    diag: Diagnostics,
}

impl<'s> Converter<'s> {
    pub fn new(
        store: &'s FeatureStore,
        interest: Option<Bounds>,
        scatter: ScatterConfig,
        seed: u64,
        diag: Diagnostics,
    ) -> Self {
        Self {
            store,
            interest,
            scatter,
            occupancy: OccupancyIndex::new(),
            scene: SceneBuilder::new(),
            rng: StdRng::seed_from_u64(seed),
            diag,
        }
    }

    /// Run one directive to completion
    pub fn draw(&mut self, layer: &LayerDirective) -> Result<(), GeometryError> {
        match layer {
            LayerDirective::Area(area) => self.draw_areas(area),
            LayerDirective::Forest(forest) => self.draw_forests(forest),
            LayerDirective::Way(way) => self.draw_ways(way),
            LayerDirective::Tower(tower) => {
                self.draw_towers(tower);
                Ok(())
            }
            LayerDirective::Object(object) => {
                self.draw_objects(object);
                Ok(())
            }
            LayerDirective::Building(building) => self.draw_buildings(building),
        }
    }

    /// Run every directive in order
    pub fn draw_all(&mut self, layers: &[LayerDirective]) -> Result<(), GeometryError> {
        for layer in layers {
            self.draw(layer)?;
        }
        Ok(())
    }

    pub fn stats(&self) -> SceneStats {
        self.scene.stats()
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diag
    }

    pub fn occupancy(&self) -> &OccupancyIndex {
        &self.occupancy
    }

    pub fn finish(self) -> Conversion {
        Conversion {
            stats: self.scene.stats(),
            occupied_points: self.occupancy.len(),
            commands: self.scene.finish(),
            diagnostics: self.diag,
        }
    }

    fn polygons(&mut self, key: &str, value: Option<&str>) -> Vec<MultiPolygon<'s>> {
        let store = self.store;
        store.multipolygons_with(key, value, self.interest.as_ref(), &mut self.diag)
    }

    fn triangulate_polygon(&mut self, polygon: &MultiPolygon) -> Result<Vec<Triangle>, GeometryError> {
        triangulate(polygon, &mut self.diag)
    }

    /// Triangulate a polygon into plain point triples
    fn triangles_of(&mut self, polygon: &MultiPolygon) -> Result<Vec<[Point2D; 3]>, GeometryError> {
        let triangles = self.triangulate_polygon(polygon)?;
        Ok(triangles.iter().map(|t| t.points(polygon.arena())).collect())
    }
}

/// `tag key=value` text for feature comments
fn tag_label(key: &str, value: Option<&str>) -> String {
    match value {
        Some(value) => format!("tag {}={}", key, value),
        None => format!("tag {}", key),
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::{StoreBuilder, square};
    use super::*;
    use crate::config::default_layers;

    #[test]
    fn test_tag_label() {
        assert_eq!(tag_label("natural", Some("wood")), "tag natural=wood");
        assert_eq!(tag_label("building", None), "tag building");
    }

    #[test]
    fn test_default_layers_run_deterministically() {
        let mut builder = StoreBuilder::new();
        builder
            .way(1, &[(-100.0, 0.0), (0.0, 0.0), (100.0, 50.0)], &[("highway", "residential")])
            .closed_way(2, &square(-80.0, 20.0, 60.0), &[("landuse", "forest")])
            .closed_way(3, &square(40.0, -80.0, 20.0), &[("building", "yes")])
            .closed_way(4, &square(-200.0, -200.0, 50.0), &[("natural", "water")]);
        builder.node(10.0, -10.0, &[("natural", "tree")]);
        builder.node(150.0, 150.0, &[("man_made", "tower"), ("height", "30")]);
        let store = builder.build();

        let run = |seed| {
            let mut converter = Converter::new(
                &store,
                Some(store.bounds().enlarged_by_percent(10.0)),
                ScatterConfig::default(),
                seed,
                Diagnostics::quiet(),
            );
            converter.draw_all(&default_layers()).unwrap();
            converter.finish()
        };

        let first = run(7);
        let second = run(7);
        assert_eq!(first.commands, second.commands);
        assert_eq!(first.stats.boxes, 2);
        // building walls, tower cylinder and road joints
        assert_eq!(first.stats.walls, 4);
        assert!(first.stats.cylinders >= 4);
        assert!(first.stats.sprites > 1);
        assert!(first.occupied_points > 0);
        assert!(!first.diagnostics.has_issues());
    }
}
