use serde::Deserialize;
use std::path::PathBuf;

pub mod layers;

pub use layers::{
    AreaLayer, BuildingLayer, ForestLayer, LayerDirective, ObjectLayer, TowerLayer, WayBorder,
    WayLayer, default_layers,
};

use crate::mesh::ScatterParams;

fn default_scene_size() -> f64 {
    200.0
}
fn default_margin_percent() -> f64 {
    10.0
}
fn default_seed() -> u64 {
    1
}
fn default_style_include() -> String {
    "osm2scene-styles.inc".to_string()
}
fn default_density() -> f64 {
    0.1
}
fn default_tree_clearance() -> f64 {
    2.5
}

#[derive(Debug, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub output: Option<PathBuf>,
    /// Edge length of the square the map is fitted into, in scene units
    #[serde(default = "default_scene_size")]
    pub scene_size: f64,
    /// Rings are clipped to the source bounds grown by this percentage
    #[serde(default = "default_margin_percent")]
    pub margin_percent: f64,
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default)]
    pub quiet: bool,
    #[serde(default)]
    pub verbose: bool,
    #[serde(default = "default_style_include")]
    pub style_include: String,
    #[serde(default)]
    pub scatter: ScatterConfig,
    #[serde(default = "default_layers")]
    pub layers: Vec<LayerDirective>,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            output: None,
            scene_size: default_scene_size(),
            margin_percent: default_margin_percent(),
            seed: default_seed(),
            quiet: false,
            verbose: false,
            style_include: default_style_include(),
            scatter: ScatterConfig::default(),
            layers: default_layers(),
        }
    }
}

/// Tree placement defaults shared by all forest layers
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ScatterConfig {
    /// Columns per meter of forest width
    #[serde(default = "default_density")]
    pub density: f64,
    /// Free radius around each tree, meters
    #[serde(default = "default_tree_clearance")]
    pub clearance: f64,
}

impl Default for ScatterConfig {
    fn default() -> Self {
        Self {
            density: default_density(),
            clearance: default_tree_clearance(),
        }
    }
}

impl ScatterConfig {
    /// Scatter parameters for one forest layer
    pub fn params(&self, forest: &ForestLayer, min_variant: usize, max_variant: usize) -> ScatterParams {
        ScatterParams {
            density: forest.density.unwrap_or(self.density),
            clearance: forest.clearance.unwrap_or(self.clearance),
            min_variant,
            max_variant,
        }
    }
}

impl FileConfig {
    pub fn load() -> Option<Self> {
        let config_paths = get_config_paths();

        for path in config_paths {
            if path.exists()
                && let Ok(contents) = std::fs::read_to_string(&path)
            {
                match toml::from_str(&contents) {
                    Ok(config) => return Some(config),
                    Err(e) => {
                        log::warn!("Failed to parse config file {:?}: {}", path, e);
                    }
                }
            }
        }
        None
    }

    /// Load an explicitly named config file
    pub fn load_from(path: &std::path::Path) -> anyhow::Result<Self> {
        use anyhow::Context;

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }
}

fn get_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    paths.push(PathBuf::from("osm2scene.toml"));
    paths.push(PathBuf::from(".osm2scene.toml"));

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("osm2scene").join("config.toml"));
        paths.push(config_dir.join("osm2scene.toml"));
    }

    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".osm2scene.toml"));
        paths.push(home.join(".config").join("osm2scene").join("config.toml"));
    }

    paths
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_empty_file_gets_defaults() {
        let config: FileConfig = toml::from_str("").unwrap();
        assert_eq!(config.scene_size, 200.0);
        assert_eq!(config.seed, 1);
        assert_eq!(config.scatter, ScatterConfig::default());
        assert_eq!(config.layers, default_layers());
    }

    #[test]
    fn test_layers_replace_defaults() {
        let config: FileConfig = toml::from_str(
            r#"
            seed = 9
            [scatter]
            density = 0.05

            [[layers]]
            kind = "object"
            key = "natural"
            value = "tree"
            style = "tree"
            "#,
        )
        .unwrap();
        assert_eq!(config.seed, 9);
        assert_eq!(config.scatter.density, 0.05);
        assert_eq!(config.scatter.clearance, 2.5);
        assert_eq!(config.layers.len(), 1);
    }

    #[test]
    fn test_scatter_params_override() {
        let LayerDirective::Forest(mut forest) = default_layers()
            .into_iter()
            .find(|l| matches!(l, LayerDirective::Forest(_)))
            .unwrap()
        else {
            unreachable!()
        };
        let scatter = ScatterConfig::default();
        assert_eq!(scatter.params(&forest, 1, 6).density, 0.1);

        forest.density = Some(0.3);
        let params = scatter.params(&forest, 2, 4);
        assert_eq!(params.density, 0.3);
        assert_eq!((params.min_variant, params.max_variant), (2, 4));
    }

    #[test]
    fn test_load_from() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("osm2scene.toml");
        fs::write(&path, "scene_size = 100.0\n").unwrap();
        assert_eq!(FileConfig::load_from(&path).unwrap().scene_size, 100.0);

        fs::write(&path, "scene_size = \"big\"\n").unwrap();
        let err = FileConfig::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}
