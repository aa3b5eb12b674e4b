//! Part geometry accepted by the contour generator.

use serde::{Deserialize, Serialize};
use std::fmt;

/// 2D point in work coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Axis-aligned bounds as `(min_x, min_y, max_x, max_y)`
pub type Bounds = (f64, f64, f64, f64);

/// Primitive shapes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Geometry {
    Circle {
        center: Point,
        radius: f64,
    },
    /// Lower-left corner plus extent
    Rectangle {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    Path {
        points: Vec<Point>,
        #[serde(default)]
        closed: bool,
    },
    Ellipse {
        center: Point,
        radius_x: f64,
        radius_y: f64,
    },
    Line {
        start: Point,
        end: Point,
    },
}

impl Geometry {
    /// Short lowercase name used in messages and comments
    pub fn kind(&self) -> &'static str {
        match self {
            Geometry::Circle { .. } => "circle",
            Geometry::Rectangle { .. } => "rectangle",
            Geometry::Path { closed: true, .. } => "polygon",
            Geometry::Path { closed: false, .. } => "open path",
            Geometry::Ellipse { .. } => "ellipse",
            Geometry::Line { .. } => "line",
        }
    }

    /// Bounds of the nominal geometry; `None` for a path without points
    pub fn bounding_box(&self) -> Option<Bounds> {
        match self {
            Geometry::Circle { center, radius } => {
                let r = radius.abs();
                Some((center.x - r, center.y - r, center.x + r, center.y + r))
            }
            Geometry::Rectangle {
                x,
                y,
                width,
                height,
            } => {
                let (x2, y2) = (x + width, y + height);
                Some((x.min(x2), y.min(y2), x.max(x2), y.max(y2)))
            }
            Geometry::Path { points, .. } => bounds_of(points),
            Geometry::Ellipse {
                center,
                radius_x,
                radius_y,
            } => {
                let (rx, ry) = (radius_x.abs(), radius_y.abs());
                Some((center.x - rx, center.y - ry, center.x + rx, center.y + ry))
            }
            Geometry::Line { start, end } => bounds_of(&[*start, *end]),
        }
    }
}

impl fmt::Display for Geometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind())
    }
}

fn bounds_of(points: &[Point]) -> Option<Bounds> {
    let first = points.first()?;
    let init = (first.x, first.y, first.x, first.y);
    Some(points.iter().fold(init, |(x1, y1, x2, y2), p| {
        (x1.min(p.x), y1.min(p.y), x2.max(p.x), y2.max(p.y))
    }))
}

/// A shape to cut, with an optional depth of its own
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignElement {
    pub geometry: Geometry,
    /// Thickness of the feature; the cut never goes deeper than this
    #[serde(default)]
    pub depth: Option<f64>,
}

impl DesignElement {
    pub fn new(geometry: Geometry) -> Self {
        Self {
            geometry,
            depth: None,
        }
    }

    pub fn with_depth(mut self, depth: f64) -> Self {
        self.depth = Some(depth);
        self
    }
}

impl From<Geometry> for DesignElement {
    fn from(geometry: Geometry) -> Self {
        Self::new(geometry)
    }
}
