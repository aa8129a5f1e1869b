//! osm2scene - Convert OpenStreetMap data into a 3D scene of triangles, boxes and sprites

pub mod config;
pub mod diagnostics;
pub mod domain;
pub mod error;
pub mod geometry;
pub mod layers;
pub mod mesh;
pub mod osm;
