pub mod builder;
pub mod pov;
pub mod scatter;
pub mod triangulation;

pub use builder::{SceneBuilder, SceneCommand, SceneStats, segment_angle};
pub use pov::{PovWriter, write_pov};
pub use scatter::{ScatterParams, ScatterPoint, scatter};
pub use triangulation::{Triangle, triangulate};
