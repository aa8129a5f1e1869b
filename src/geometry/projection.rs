use super::Point2D;

/// Length of one degree of latitude, and of longitude on the equator
const METERS_PER_DEGREE: f64 = 111_320.0;

/// Maps WGS84 coordinates onto the scene plane.
///
/// The scene plane is measured in meters with its origin at the centre of the
/// area bounds: `x` grows to the east and `y` to the north. The mapping is
/// equirectangular, with longitudes shrunk by the cosine of the centre
/// latitude. That is close enough for areas the size of a city:
///
/// - `x = (lon - origin_lon) * cos(origin_lat) * 111320`
/// - `y = (lat - origin_lat) * 111320`
///
/// Everything downstream of the parser works in these meters until the scaler
/// fits the area into scene units, after which the POV-Ray writer places `y`
/// on its `z` axis.
#[derive(Debug, Clone)]
pub struct Projector {
    origin_lat: f64,
    origin_lon: f64,
    lon_scale: f64,
}

impl Projector {
    /// Projector with its origin at `origin`, given as `(lat, lon)`
    pub fn new(origin: (f64, f64)) -> Self {
        let (lat, lon) = origin;
        Self {
            origin_lat: lat,
            origin_lon: lon,
            lon_scale: lat.to_radians().cos() * METERS_PER_DEGREE,
        }
    }

    pub fn project(&self, lat: f64, lon: f64) -> Point2D {
        Point2D::new(
            (lon - self.origin_lon) * self.lon_scale,
            (lat - self.origin_lat) * METERS_PER_DEGREE,
        )
    }
}
