//! Layer directives: which features are drawn, in which order and how.
//!
//! ```toml
//! [[layers]]
//! kind = "way"
//! key = "highway"
//! value = "residential"
//! width = 5.0
//! height = 0.06
//! style = "highway"
//! ```

use serde::Deserialize;

fn default_margin() -> f64 {
    1.5
}
fn default_outline_clearance() -> f64 {
    3.0
}
fn default_true() -> bool {
    true
}
fn default_sprite_scale() -> f64 {
    0.3
}
fn default_building_clearance() -> f64 {
    7.0
}
fn default_tower_width() -> f64 {
    4.0
}
fn default_tower_height() -> f64 {
    25.0
}

/// One drawing step, run in list order
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LayerDirective {
    Area(AreaLayer),
    Forest(ForestLayer),
    Way(WayLayer),
    Tower(TowerLayer),
    Object(ObjectLayer),
    Building(BuildingLayer),
}

impl LayerDirective {
    pub fn key(&self) -> &str {
        match self {
            Self::Area(l) => &l.key,
            Self::Forest(l) => &l.key,
            Self::Way(l) => &l.key,
            Self::Tower(l) => &l.key,
            Self::Object(l) => &l.key,
            Self::Building(l) => &l.key,
        }
    }

    pub fn value(&self) -> Option<&str> {
        match self {
            Self::Area(l) => l.value.as_deref(),
            Self::Forest(l) => l.value.as_deref(),
            Self::Way(l) => l.value.as_deref(),
            Self::Tower(l) => l.value.as_deref(),
            Self::Object(l) => l.value.as_deref(),
            Self::Building(l) => l.value.as_deref(),
        }
    }

    /// `key=value` (or just `key`) for comments and logs
    pub fn selector(&self) -> String {
        match self.value() {
            Some(value) => format!("{}={}", self.key(), value),
            None => self.key().to_string(),
        }
    }
}

/// Flat area at a fixed elevation
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AreaLayer {
    pub key: String,
    #[serde(default)]
    pub value: Option<String>,
    pub style: String,
    #[serde(default)]
    pub elevation: f64,
    /// Occupy the outline so later objects keep out of it
    #[serde(default)]
    pub register_outline: bool,
    /// Occupancy radius of outline points
    #[serde(default = "default_outline_clearance")]
    pub clearance: f64,
}

/// Area floor with scattered trees
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ForestLayer {
    pub key: String,
    #[serde(default)]
    pub value: Option<String>,
    pub floor_style: String,
    #[serde(default)]
    pub floor_elevation: f64,
    pub tree_style: String,
    /// Variants `min_variant..=coniferous_max` are conifers, the rest up to
    /// `max_variant` broadleaved
    pub min_variant: usize,
    pub coniferous_max: usize,
    pub max_variant: usize,
    #[serde(default = "default_sprite_scale")]
    pub sprite_scale: f64,
    /// Overrides the global scatter density
    #[serde(default)]
    pub density: Option<f64>,
    /// Overrides the global tree clearance
    #[serde(default)]
    pub clearance: Option<f64>,
}

/// Darker outline drawn under a way
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WayBorder {
    /// Border width on each side, percent of the way width
    pub percent: f64,
    pub style: String,
}

/// Polyline drawn as boxes per segment
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WayLayer {
    pub key: String,
    #[serde(default)]
    pub value: Option<String>,
    /// Default width in meters, used without `width`/`lanes` tags
    pub width: f64,
    pub height: f64,
    pub style: String,
    /// Round joints between segments
    #[serde(default = "default_true")]
    pub links: bool,
    /// Style for closed ways tagged `area=yes`; without it they are drawn as
    /// plain ways
    #[serde(default)]
    pub area_style: Option<String>,
    #[serde(default)]
    pub border: Option<WayBorder>,
    /// Style for `tunnel=yes` ways, which are then drawn even below ground
    #[serde(default)]
    pub tunnel_style: Option<String>,
    /// Occupancy radius is `(width + margin) * 2`
    #[serde(default = "default_margin")]
    pub margin: f64,
}

/// Vertical cylinder per node
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TowerLayer {
    pub key: String,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default = "default_tower_width")]
    pub width: f64,
    #[serde(default = "default_tower_height")]
    pub height: f64,
    pub style: String,
    /// Occupancy radius is `(width + margin) * 2`
    #[serde(default = "default_margin")]
    pub margin: f64,
}

/// Sprite per node
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ObjectLayer {
    pub key: String,
    #[serde(default)]
    pub value: Option<String>,
    pub style: String,
    #[serde(default = "default_sprite_scale")]
    pub scale: f64,
    #[serde(default)]
    pub min_variant: usize,
    #[serde(default)]
    pub max_variant: usize,
}

/// Extruded area with walls and roof
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BuildingLayer {
    pub key: String,
    #[serde(default)]
    pub value: Option<String>,
    pub default_height: f64,
    pub style: String,
    #[serde(default)]
    pub roof_style: Option<String>,
    /// Roof of churches and other places of worship
    #[serde(default)]
    pub worship_roof_style: Option<String>,
    /// Draw every match as is: no type guessing, towers included
    #[serde(default)]
    pub special: bool,
    /// Occupancy radius of wall points
    #[serde(default = "default_building_clearance")]
    pub clearance: f64,
}

fn area(key: &str, value: &str, elevation: f64, style: &str) -> LayerDirective {
    LayerDirective::Area(AreaLayer {
        key: key.to_string(),
        value: Some(value.to_string()),
        style: style.to_string(),
        elevation,
        register_outline: false,
        clearance: default_outline_clearance(),
    })
}

fn way(key: &str, value: &str, width: f64, height: f64, style: &str, links: bool) -> WayLayer {
    WayLayer {
        key: key.to_string(),
        value: Some(value.to_string()),
        width,
        height,
        style: style.to_string(),
        links,
        area_style: None,
        border: None,
        tunnel_style: None,
        margin: default_margin(),
    }
}

fn road(value: &str, width: f64, border_style: &str) -> LayerDirective {
    LayerDirective::Way(WayLayer {
        area_style: Some("highway_area".to_string()),
        border: Some(WayBorder {
            percent: 10.0,
            style: border_style.to_string(),
        }),
        tunnel_style: Some("highway_tunnel".to_string()),
        ..way("highway", value, width, 0.06, "highway", true)
    })
}

fn street(value: &str, width: f64, height: f64, style: &str) -> LayerDirective {
    LayerDirective::Way(WayLayer {
        area_style: Some(format!("{}_area", style)),
        ..way("highway", value, width, height, style, true)
    })
}

fn forest(key: &str, value: &str, elevation: f64, floor_style: &str) -> LayerDirective {
    LayerDirective::Forest(ForestLayer {
        key: key.to_string(),
        value: Some(value.to_string()),
        floor_style: floor_style.to_string(),
        floor_elevation: elevation,
        tree_style: "tree".to_string(),
        min_variant: 1,
        coniferous_max: 1,
        max_variant: 6,
        sprite_scale: default_sprite_scale(),
        density: None,
        clearance: None,
    })
}

fn object(key: &str, value: &str, style: &str, scale: f64, max_variant: usize) -> LayerDirective {
    LayerDirective::Object(ObjectLayer {
        key: key.to_string(),
        value: Some(value.to_string()),
        style: style.to_string(),
        scale,
        min_variant: 1,
        max_variant,
    })
}

fn tower(key: &str, value: &str) -> LayerDirective {
    LayerDirective::Tower(TowerLayer {
        key: key.to_string(),
        value: Some(value.to_string()),
        width: default_tower_width(),
        height: default_tower_height(),
        style: "man_made_tower".to_string(),
        margin: default_margin(),
    })
}

fn building(key: &str, value: Option<&str>, height: f64, special: bool) -> LayerDirective {
    LayerDirective::Building(BuildingLayer {
        key: key.to_string(),
        value: value.map(str::to_string),
        default_height: height,
        style: if special { "man_made_tower" } else { "building" }.to_string(),
        roof_style: Some("building_roof".to_string()),
        worship_roof_style: (!special).then(|| "building_religious_roof".to_string()),
        special,
        clearance: default_building_clearance(),
    })
}

/// Layer list used when the config file has none.
///
/// Roads come first so that everything drawn later keeps out of them.
pub fn default_layers() -> Vec<LayerDirective> {
    vec![
        road("motorway", 10.0, "highway_secondary_border"),
        road("motorway_link", 5.0, "highway_border"),
        road("trunk", 7.0, "highway_secondary_border"),
        road("trunk_link", 4.0, "highway_border"),
        road("primary", 8.0, "highway_secondary_border"),
        road("primary_link", 5.0, "highway_border"),
        road("secondary", 6.0, "highway_secondary_border"),
        road("tertiary", 5.5, "highway_border"),
        road("unclassified", 5.0, "highway_border"),
        road("road", 5.0, "highway_border"),
        street("residential", 5.0, 0.06, "highway"),
        street("living_street", 5.0, 0.06, "highway"),
        street("service", 4.0, 0.06, "highway"),
        street("pedestrian", 4.0, 0.06, "highway"),
        street("track", 3.0, 0.045, "path"),
        street("footway", 1.2, 0.03, "footway"),
        street("steps", 1.2, 0.03, "footway"),
        street("cycleway", 1.5, 0.03, "footway"),
        street("path", 1.0, 0.015, "path"),
        area("amenity", "parking", 0.0009, "highway_area"),
        LayerDirective::Way(way("railway", "rail", 4.5, 0.09, "railway", false)),
        LayerDirective::Way(way("railway", "tram", 2.25, 0.12, "railway_tram", true)),
        area("leisure", "playground", 0.013, "playground"),
        area("leisure", "pitch", 0.013, "playground"),
        LayerDirective::Way(way("aeroway", "runway", 40.0, 0.07, "highway", true)),
        LayerDirective::Way(way("aeroway", "taxiway", 7.0, 0.07, "highway", true)),
        area("landuse", "cemetery", 0.012, "cemetery"),
        area("natural", "beach", 0.012, "beach"),
        building("building", None, 4.5, false),
        tower("man_made", "tower"),
        tower("amenity", "tower"),
        building("man_made", Some("tower"), 25.0, true),
        LayerDirective::Way(way("barrier", "wall", 0.3, 3.0, "wall", true)),
        object("power_source", "wind", "windpower", 1.5, 1),
        object("amenity", "post_box", "postbox", 0.1, 1),
        object("natural", "tree", "tree", 0.2, 6),
        forest("natural", "wood", 0.00011, "forest"),
        forest("landuse", "forest", 0.00011, "forest"),
        forest("leisure", "park", 0.00012, "greenplace"),
        area("landuse", "village_green", 0.00012, "greenplace"),
        area("landuse", "allotments", 0.00012, "greenplace"),
        area("landuse", "industrial", 0.00009, "landuse_industrial"),
        area("landuse", "residential", 0.00009, "landuse_residential"),
        LayerDirective::Way(way("waterway", "stream", 1.0, 0.00013, "river", true)),
        LayerDirective::Way(way("waterway", "canal", 2.5, 0.00013, "river", true)),
        LayerDirective::Way(way("waterway", "river", 5.0, 0.00013, "river", true)),
        area("waterway", "riverbank", 0.00013, "river"),
        area("natural", "water", 0.00013, "river"),
        area("landuse", "reservoir", 0.00013, "river"),
    ]
}
