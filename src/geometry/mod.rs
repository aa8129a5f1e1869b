pub mod clip;
pub mod multipolygon;
pub mod occupancy;
pub mod point;
pub mod projection;
pub mod ring;
pub mod scaling;

pub use clip::clip_ring;
pub use multipolygon::MultiPolygon;
pub use occupancy::OccupancyIndex;
pub use point::{Point2D, PointArena, orient, signed_area};
pub use projection::Projector;
pub use ring::{Fragment, Ring, RingAssembly, assemble_rings};
pub use scaling::{Bounds, Scaler};
