//! Tool radius compensation.
//!
//! Circles and rectangles are offset arithmetically. Polygons go through
//! `cavalier_contours`, which may round outside corners (bulge vertices) or
//! split a narrow polygon into several loops.

use cavalier_contours::polyline::{PlineSource, PlineSourceMut, PlineVertex, Polyline};
use tracing::debug;

use crate::error::{ToolpathError, ToolpathResult};
use crate::geometry::{Bounds, Point};
use crate::settings::OffsetSide;

/// Vertex tolerance for duplicate detection in mm
const DUPLICATE_TOLERANCE: f64 = 0.01;

/// A loop vertex; `bulge` describes the segment to the next vertex
/// (0 = straight, `tan(sweep / 4)` otherwise, positive = counter-clockwise).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContourVertex {
    pub point: Point,
    pub bulge: f64,
}

impl ContourVertex {
    pub fn new(x: f64, y: f64, bulge: f64) -> Self {
        Self {
            point: Point::new(x, y),
            bulge,
        }
    }
}

/// A closed tool-center path
#[derive(Debug, Clone, PartialEq)]
pub enum Contour {
    Circle { center: Point, radius: f64 },
    Loop(Vec<ContourVertex>),
}

impl Contour {
    /// Start point of the cut
    pub fn start(&self) -> Option<Point> {
        match self {
            Contour::Circle { center, radius } => Some(Point::new(center.x + radius, center.y)),
            Contour::Loop(vertices) => vertices.first().map(|v| v.point),
        }
    }

    /// The same loop walked the other way, starting at the same vertex
    pub fn reversed(&self) -> Contour {
        match self {
            Contour::Circle { .. } => self.clone(),
            Contour::Loop(vertices) => {
                let n = vertices.len();
                let reversed = (0..n)
                    .map(|k| {
                        let point = vertices[(n - k) % n].point;
                        let bulge = -vertices[(2 * n - k - 1) % n].bulge;
                        ContourVertex { point, bulge }
                    })
                    .collect();
                Contour::Loop(reversed)
            }
        }
    }
}

fn signed_offset(side: OffsetSide, tool_radius: f64) -> f64 {
    match side {
        OffsetSide::Inside => -tool_radius,
        OffsetSide::Outside => tool_radius,
        OffsetSide::None => 0.0,
    }
}

/// Offset a circle by the tool radius
pub fn offset_circle(
    center: Point,
    radius: f64,
    side: OffsetSide,
    tool_radius: f64,
) -> ToolpathResult<Contour> {
    let radius = radius.abs() + signed_offset(side, tool_radius);
    if radius <= 0.0 {
        return Err(ToolpathError::OffsetCollapsed {
            shape: "circle".to_string(),
            dimension: "diameter".to_string(),
            size: (radius + tool_radius) * 2.0,
            offset: tool_radius,
        });
    }
    Ok(Contour::Circle { center, radius })
}

/// Offset an axis-aligned rectangle by the tool radius.
///
/// Corner order is (x, y) → (x+w, y) → (x+w, y+h) → (x, y+h).
pub fn offset_rectangle(
    bounds: Bounds,
    shape: &str,
    side: OffsetSide,
    tool_radius: f64,
) -> ToolpathResult<Contour> {
    let (min_x, min_y, max_x, max_y) = bounds;
    let delta = signed_offset(side, tool_radius);

    let x = min_x - delta;
    let y = min_y - delta;
    let w = (max_x - min_x) + 2.0 * delta;
    let h = (max_y - min_y) + 2.0 * delta;

    for (dimension, size, nominal) in [("width", w, max_x - min_x), ("height", h, max_y - min_y)] {
        if size <= 0.0 && side == OffsetSide::Inside {
            return Err(ToolpathError::OffsetCollapsed {
                shape: shape.to_string(),
                dimension: dimension.to_string(),
                size: nominal,
                offset: tool_radius,
            });
        }
    }

    Ok(Contour::Loop(vec![
        ContourVertex::new(x, y, 0.0),
        ContourVertex::new(x + w, y, 0.0),
        ContourVertex::new(x + w, y + h, 0.0),
        ContourVertex::new(x, y + h, 0.0),
    ]))
}

/// Remove duplicate and closing vertices
fn clean_vertices(vertices: &[Point]) -> Vec<Point> {
    let mut clean: Vec<Point> = Vec::with_capacity(vertices.len());
    for p in vertices {
        match clean.last() {
            Some(last) if last.distance_to(p) <= DUPLICATE_TOLERANCE => {}
            _ => clean.push(*p),
        }
    }
    if clean.len() > 1 {
        if let (Some(first), Some(last)) = (clean.first(), clean.last()) {
            if first.distance_to(last) <= DUPLICATE_TOLERANCE {
                clean.pop();
            }
        }
    }
    clean
}

fn signed_area(vertices: &[Point]) -> f64 {
    let n = vertices.len();
    (0..n)
        .map(|i| {
            let p1 = vertices[i];
            let p2 = vertices[(i + 1) % n];
            p1.x * p2.y - p2.x * p1.y
        })
        .sum::<f64>()
        / 2.0
}

/// Offset a closed polygon by the tool radius.
///
/// The polygon is oriented clockwise before offsetting, so a negative
/// distance moves inward. Output loops keep the input's orientation.
pub fn offset_polygon(
    vertices: &[Point],
    side: OffsetSide,
    tool_radius: f64,
) -> ToolpathResult<Vec<Contour>> {
    let mut clean = clean_vertices(vertices);
    if clean.len() < 3 {
        return Err(ToolpathError::InvalidGeometry(format!(
            "polygon needs at least 3 distinct vertices, got {}",
            clean.len()
        )));
    }

    let counter_clockwise = signed_area(&clean) > 0.0;
    if counter_clockwise {
        clean[1..].reverse();
    }

    let mut polyline = Polyline::new();
    for p in &clean {
        polyline.add_vertex(PlineVertex::new(p.x, p.y, 0.0));
    }
    polyline.set_is_closed(true);

    let distance = signed_offset(side, tool_radius);
    let loops: Vec<Polyline> = if distance == 0.0 {
        vec![polyline]
    } else {
        polyline.parallel_offset(distance)
    };

    let contours: Vec<Contour> = loops
        .iter()
        .filter(|pline| pline.vertex_count() >= 2)
        .map(|pline| {
            let vertices = pline
                .vertex_data
                .iter()
                .map(|v| ContourVertex::new(v.x, v.y, v.bulge))
                .collect();
            let contour = Contour::Loop(vertices);
            if counter_clockwise {
                contour.reversed()
            } else {
                contour
            }
        })
        .collect();

    debug!(
        "Polygon offset {:.3}mm produced {} loop(s)",
        distance,
        contours.len()
    );

    if contours.is_empty() {
        return Err(ToolpathError::NoOffsetLoop {
            shape: "polygon".to_string(),
            offset: tool_radius,
        });
    }
    Ok(contours)
}
