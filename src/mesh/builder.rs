use crate::geometry::Point2D;

/// One primitive of the output scene, in local plane meters.
///
/// Heights and elevations are meters above ground; angles are degrees around
/// the vertical axis.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneCommand {
    Comment(String),
    /// Flat triangles at a fixed elevation
    Triangles {
        style: String,
        elevation: f64,
        triangles: Vec<[Point2D; 3]>,
    },
    /// Box of `length` along its rotated x axis, anchored at `origin`
    Box {
        origin: Point2D,
        width: f64,
        height: f64,
        length: f64,
        angle: f64,
        style: String,
    },
    /// Vertical quad along the segment `from -> to`
    Wall {
        from: Point2D,
        to: Point2D,
        bottom: f64,
        top: f64,
        style: String,
    },
    Cylinder {
        center: Point2D,
        radius: f64,
        height: f64,
        style: String,
    },
    /// Billboard object; the style name is suffixed with the variant number
    Sprite {
        position: Point2D,
        style: String,
        variant: usize,
        scale: f64,
    },
}

/// Per-kind primitive counts for run summaries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SceneStats {
    pub triangles: usize,
    pub boxes: usize,
    pub walls: usize,
    pub cylinders: usize,
    pub sprites: usize,
}

/// Accumulator for scene commands
#[derive(Debug, Default)]
pub struct SceneBuilder {
    commands: Vec<SceneCommand>,
    stats: SceneStats,
}

impl SceneBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn comment(&mut self, text: impl Into<String>) {
        self.commands.push(SceneCommand::Comment(text.into()));
    }

    /// Add a triangle batch; empty batches are skipped
    pub fn add_triangles(&mut self, style: &str, elevation: f64, triangles: Vec<[Point2D; 3]>) {
        if triangles.is_empty() {
            return;
        }
        self.stats.triangles += triangles.len();
        self.commands.push(SceneCommand::Triangles {
            style: style.to_string(),
            elevation,
            triangles,
        });
    }

    /// Box spanning the segment `from -> to`, anchored at `to`
    pub fn add_segment_box(&mut self, from: Point2D, to: Point2D, width: f64, height: f64, style: &str) {
        let dx = to.x - from.x;
        let dy = to.y - from.y;
        self.stats.boxes += 1;
        self.commands.push(SceneCommand::Box {
            origin: to,
            width,
            height,
            length: dx.hypot(dy),
            angle: segment_angle(dx, dy),
            style: style.to_string(),
        });
    }

    pub fn add_wall(&mut self, from: Point2D, to: Point2D, bottom: f64, top: f64, style: &str) {
        self.stats.walls += 1;
        self.commands.push(SceneCommand::Wall {
            from,
            to,
            bottom,
            top,
            style: style.to_string(),
        });
    }

    pub fn add_cylinder(&mut self, center: Point2D, radius: f64, height: f64, style: &str) {
        self.stats.cylinders += 1;
        self.commands.push(SceneCommand::Cylinder {
            center,
            radius,
            height,
            style: style.to_string(),
        });
    }

    pub fn add_sprite(&mut self, position: Point2D, style: &str, variant: usize, scale: f64) {
        self.stats.sprites += 1;
        self.commands.push(SceneCommand::Sprite {
            position,
            style: style.to_string(),
            variant,
            scale,
        });
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn stats(&self) -> SceneStats {
        self.stats
    }

    pub fn commands(&self) -> &[SceneCommand] {
        &self.commands
    }

    pub fn finish(self) -> Vec<SceneCommand> {
        self.commands
    }
}

/// Rotation (degrees) turning a box's x axis from a segment's end back
/// towards its start, for a segment heading `(dx, dy)`.
pub fn segment_angle(dx: f64, dy: f64) -> f64 {
    180.0 - dy.atan2(dx).to_degrees()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scene_builder() {
        let mut builder = SceneBuilder::new();
        builder.comment("way 5");
        builder.add_triangles("forest", 0.0, vec![[Point2D::new(0.0, 0.0); 3]]);
        builder.add_triangles("forest", 0.0, vec![]);
        builder.add_cylinder(Point2D::new(1.0, 1.0), 0.5, 30.0, "tower");
        builder.add_wall(Point2D::new(0.0, 0.0), Point2D::new(1.0, 0.0), 0.0, 3.0, "building");

        assert_eq!(builder.len(), 4);
        assert_eq!(
            builder.stats(),
            SceneStats {
                triangles: 1,
                walls: 1,
                cylinders: 1,
                ..Default::default()
            }
        );
        assert_eq!(builder.finish()[0], SceneCommand::Comment("way 5".to_string()));
    }

    #[test]
    fn test_segment_box() {
        let mut builder = SceneBuilder::new();
        builder.add_segment_box(Point2D::new(0.0, 0.0), Point2D::new(3.0, 4.0), 6.0, 0.1, "road");

        let SceneCommand::Box {
            origin,
            length,
            width,
            ..
        } = &builder.commands()[0]
        else {
            panic!("expected a box");
        };
        assert_eq!(*origin, Point2D::new(3.0, 4.0));
        assert!((length - 5.0).abs() < 1e-12);
        assert_eq!(*width, 6.0);
    }

    #[test]
    fn test_segment_angle() {
        assert!((segment_angle(1.0, 0.0) - 180.0).abs() < 1e-9);
        assert!((segment_angle(0.0, 1.0) - 90.0).abs() < 1e-9);
        assert!((segment_angle(-1.0, 0.0) - 0.0).abs() < 1e-9);
        assert!((segment_angle(0.0, -1.0) - 270.0).abs() < 1e-9);
    }
}
