use rand::Rng;

use super::{Converter, read_dimension, tag_label};
use crate::config::{ObjectLayer, TowerLayer};
use crate::domain::Tagged;

impl Converter<'_> {
    /// One cylinder per node; a `height` tag overrides the layer height
    pub fn draw_towers(&mut self, layer: &TowerLayer) {
        let store = self.store;
        let label = tag_label(&layer.key, layer.value.as_deref());

        for node in store.nodes_with(&layer.key, layer.value.as_deref()) {
            self.scene.comment(format!("Node {} ({})", node.id, label));
            self.occupancy
                .add_point(node.position, (layer.width + layer.margin) * 2.0);

            let height = node.attribute("height").map_or(layer.height, read_dimension);
            self.scene
                .add_cylinder(node.position, layer.width / 2.0, height, &layer.style);
        }
    }

    /// One sprite per node with a random variant
    pub fn draw_objects(&mut self, layer: &ObjectLayer) {
        let store = self.store;
        let label = tag_label(&layer.key, layer.value.as_deref());
        let max_variant = layer.max_variant.max(layer.min_variant);

        for node in store.nodes_with(&layer.key, layer.value.as_deref()) {
            self.scene.comment(format!("Node {} ({})", node.id, label));
            let variant = self.rng.random_range(layer.min_variant..=max_variant);
            self.scene
                .add_sprite(node.position, &layer.style, variant, layer.scale);
        }
    }
}
