use super::{Converter, compute_way_width, layer_offset, tag_label};
use crate::config::WayLayer;
use crate::domain::{Tagged, Way};
use crate::error::GeometryError;
use crate::geometry::{MultiPolygon, Point2D};

/// Height added to areas drawn from `area=yes` ways
const AREA_LIFT: f64 = 0.0001;
/// Border boxes sit this much below the way surface
const BORDER_DROP: f64 = 0.0011;

/// How one polyline pass is drawn
struct Stroke<'a> {
    width: f64,
    height: f64,
    style: &'a str,
    links: bool,
    /// Joints at the first and last node too
    end_links: bool,
    /// Occupancy radius, or `None` to leave the index alone
    clearance: Option<f64>,
}

impl Converter<'_> {
    /// Ways drawn as boxes along their segments
    pub fn draw_ways(&mut self, layer: &WayLayer) -> Result<(), GeometryError> {
        let store = self.store;
        let label = tag_label(&layer.key, layer.value.as_deref());

        for way in store.ways_with(&layer.key, layer.value.as_deref()) {
            if let Some(area_style) = &layer.area_style
                && way.is_closed()
                && way.has_attribute("area", Some("yes"))
            {
                self.draw_way_area(way, area_style, layer.height + AREA_LIFT, &label)?;
                continue;
            }

            let is_tunnel =
                layer.tunnel_style.is_some() && way.has_attribute("tunnel", Some("yes"));
            let extra = layer_offset(way.attribute("layer"));
            if extra < 0.0 && !is_tunnel {
                continue;
            }
            let height = if is_tunnel {
                layer.height / 2.0
            } else {
                layer.height
            };

            let points = store.way_points(way);
            let width = compute_way_width(way, layer.width);
            let clearance = (width + layer.margin) * 2.0;
            let style = match (&layer.tunnel_style, is_tunnel) {
                (Some(tunnel_style), true) => tunnel_style.as_str(),
                _ => layer.style.as_str(),
            };

            match &layer.border {
                Some(border) => {
                    self.scene.comment(format!(
                        "Way {} with border ({}, width: {}m)",
                        way.id, label, width
                    ));
                    self.draw_stroke(
                        &points,
                        &Stroke {
                            width,
                            height: height - BORDER_DROP + extra,
                            style: &border.style,
                            links: true,
                            end_links: extra == 0.0,
                            clearance: Some(clearance),
                        },
                    );
                    self.draw_stroke(
                        &points,
                        &Stroke {
                            width: width - border.percent * width / 100.0 * 2.0,
                            height: height + extra,
                            style,
                            links: true,
                            end_links: true,
                            clearance: None,
                        },
                    );
                }
                None => {
                    self.scene
                        .comment(format!("Way {} ({}, width: {}m)", way.id, label, width));
                    self.draw_stroke(
                        &points,
                        &Stroke {
                            width,
                            height: height + extra,
                            style,
                            links: layer.links,
                            end_links: true,
                            clearance: Some(clearance),
                        },
                    );
                }
            }
        }
        Ok(())
    }

    fn draw_way_area(
        &mut self,
        way: &Way,
        style: &str,
        elevation: f64,
        label: &str,
    ) -> Result<(), GeometryError> {
        self.scene.comment(format!(
            "Area (closed way with area=yes) {} ({})",
            way.id, label
        ));
        let store = self.store;
        let Some(polygon) = MultiPolygon::assemble(
            None,
            vec![way],
            vec![],
            store,
            self.interest.as_ref(),
            &mut self.diag,
        ) else {
            return Ok(());
        };
        let triangles = self.triangles_of(&polygon)?;
        self.scene.add_triangles(style, elevation, triangles);
        Ok(())
    }

    /// One box per segment, anchored at the segment end, with optional
    /// round joints; the polyline is registered as occupied
    fn draw_stroke(&mut self, points: &[Point2D], stroke: &Stroke) {
        if let Some(clearance) = stroke.clearance {
            self.occupancy.add_polyline(points, clearance);
        }

        let last = points.len().saturating_sub(1);
        for (i, &p) in points.iter().enumerate() {
            if i > 0 {
                self.scene
                    .add_segment_box(points[i - 1], p, stroke.width, stroke.height, stroke.style);
            }
            if stroke.links && (stroke.end_links || (i > 0 && i < last)) {
                self.scene
                    .add_cylinder(p, stroke.width / 2.0, stroke.height, stroke.style);
            }
        }
    }
}
