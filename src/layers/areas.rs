use log::debug;

use super::{Converter, layer_offset, tag_label};
use crate::config::{AreaLayer, ForestLayer};
use crate::error::GeometryError;
use crate::mesh::scatter;

impl Converter<'_> {
    /// Flat areas at the layer elevation, raised by a positive `layer` tag
    pub fn draw_areas(&mut self, layer: &AreaLayer) -> Result<(), GeometryError> {
        let label = tag_label(&layer.key, layer.value.as_deref());

        for polygon in self.polygons(&layer.key, layer.value.as_deref()) {
            let extra = layer_offset(polygon.attribute("layer")).max(0.0);
            self.scene
                .comment(format!("Area (closed way) {} ({})", polygon.id(), label));

            let triangles = self.triangles_of(&polygon)?;
            self.scene
                .add_triangles(&layer.style, layer.elevation + extra, triangles);

            if layer.register_outline {
                for ring in polygon.outer_rings().iter().chain(polygon.holes()) {
                    self.occupancy
                        .add_polyline(&polygon.ring_points(ring), layer.clearance);
                }
            }
        }
        Ok(())
    }

    /// Area floor plus trees scattered over it.
    ///
    /// `wood=coniferous` limits the variants to conifers, `wood=deciduous`
    /// to the rest.
    pub fn draw_forests(&mut self, layer: &ForestLayer) -> Result<(), GeometryError> {
        let label = tag_label(&layer.key, layer.value.as_deref());

        for polygon in self.polygons(&layer.key, layer.value.as_deref()) {
            let extra = layer_offset(polygon.attribute("layer")).max(0.0);
            self.scene.comment(format!(
                "Forest with id {} - outline ({})",
                polygon.id(),
                label
            ));

            let triangles = self.triangulate_polygon(&polygon)?;
            let floor = triangles.iter().map(|t| t.points(polygon.arena())).collect();
            self.scene
                .add_triangles(&layer.floor_style, layer.floor_elevation + extra, floor);

            self.scene.comment(format!(
                "Forest with id {} - trees ({})",
                polygon.id(),
                label
            ));

            let (min_variant, max_variant) = match polygon.attribute("wood") {
                Some("coniferous") => (layer.min_variant, layer.coniferous_max),
                Some("deciduous") => (layer.coniferous_max + 1, layer.max_variant),
                _ => (layer.min_variant, layer.max_variant),
            };
            let params = self.scatter.params(layer, min_variant, max_variant);
            let trees = scatter(
                polygon.arena(),
                &triangles,
                &params,
                &mut self.occupancy,
                &mut self.rng,
            );
            debug!("Forest {}: {} trees", polygon.id(), trees.len());

            for tree in trees {
                self.scene.add_sprite(
                    tree.position,
                    &layer.tree_style,
                    tree.variant,
                    layer.sprite_scale,
                );
            }
        }
        Ok(())
    }
}
