//! Toolpaths built from offset contours.

mod segment;

use cyclekit_core::MotionPrimitive;

use crate::geometry::Point;
use crate::offset::{Contour, ContourVertex};
use crate::settings::{CutDirection, ToolpathSettings};

pub use segment::{ToolpathSegment, ToolpathSegmentType};

/// Linear steps used to draw one arc in the preview
pub const ARC_PREVIEW_SEGMENTS: usize = 32;

/// Bulges smaller than this are cut as straight lines
const BULGE_EPSILON: f64 = 1e-9;

/// A complete toolpath made up of multiple segments.
#[derive(Debug, Clone, PartialEq)]
pub struct Toolpath {
    pub segments: Vec<ToolpathSegment>,
    pub tool_diameter: f64,
    /// Final (deepest) Z level
    pub depth: f64,
}

impl Toolpath {
    /// Creates a new empty toolpath.
    pub fn new(tool_diameter: f64, depth: f64) -> Self {
        Self {
            segments: Vec::new(),
            tool_diameter,
            depth,
        }
    }

    /// Adds a segment to the toolpath.
    pub fn add_segment(&mut self, segment: ToolpathSegment) {
        self.segments.push(segment);
    }

    /// Gets the total XY length of the toolpath.
    pub fn total_length(&self) -> f64 {
        self.segments.iter().map(ToolpathSegment::length).sum()
    }

    /// Build the passes for every contour at every Z level.
    ///
    /// Each pass rapids to the contour start at safe Z, plunges at the plunge
    /// rate, cuts the closed loop and retracts.
    pub fn from_contours(contours: &[Contour], levels: &[f64], settings: &ToolpathSettings) -> Self {
        let depth = levels.iter().copied().fold(0.0, f64::min);
        let mut toolpath = Toolpath::new(settings.tool_diameter, depth);
        let mut position = Point::default();

        for &level in levels {
            for contour in contours {
                let contour = match settings.direction {
                    CutDirection::Climb => contour.clone(),
                    CutDirection::Conventional => contour.reversed(),
                };
                let Some(start) = contour.start() else {
                    continue;
                };

                toolpath.add_segment(ToolpathSegment::new(
                    ToolpathSegmentType::RapidMove,
                    position,
                    start,
                    settings.feed_rate,
                    settings.safe_z,
                ));
                toolpath.add_segment(ToolpathSegment::new(
                    ToolpathSegmentType::Plunge,
                    start,
                    start,
                    settings.plunge_rate,
                    level,
                ));
                toolpath.add_cut(&contour, level, settings);
                toolpath.add_segment(ToolpathSegment::new(
                    ToolpathSegmentType::Retract,
                    start,
                    start,
                    settings.feed_rate,
                    settings.safe_z,
                ));
                position = start;
            }
        }
        toolpath
    }

    fn add_cut(&mut self, contour: &Contour, z: f64, settings: &ToolpathSettings) {
        let feed = settings.feed_rate;
        match contour {
            Contour::Circle { center, radius } => {
                let start = Point::new(center.x + radius, center.y);
                let arc_type = match settings.direction {
                    CutDirection::Climb => ToolpathSegmentType::ArcCW,
                    CutDirection::Conventional => ToolpathSegmentType::ArcCCW,
                };
                self.add_segment(ToolpathSegment::new_arc(
                    arc_type, start, start, *center, feed, z,
                ));
            }
            Contour::Loop(vertices) => {
                let n = vertices.len();
                for i in 0..n {
                    let from = vertices[i];
                    let to = vertices[(i + 1) % n].point;
                    self.add_segment(loop_segment(from, to, feed, z));
                }
            }
        }
    }

    /// Motion for 3D preview, arcs sampled into straight steps
    pub fn preview_points(&self) -> Vec<MotionPrimitive> {
        let mut points = Vec::new();
        for segment in &self.segments {
            let end = segment.end;
            match segment.segment_type {
                ToolpathSegmentType::RapidMove | ToolpathSegmentType::Retract => {
                    points.push(MotionPrimitive::rapid(end.x, end.y, segment.z));
                }
                ToolpathSegmentType::Plunge | ToolpathSegmentType::LinearMove => {
                    points.push(MotionPrimitive::linear(
                        end.x,
                        end.y,
                        segment.z,
                        Some(segment.feed_rate),
                    ));
                }
                ToolpathSegmentType::ArcCW | ToolpathSegmentType::ArcCCW => {
                    sample_arc(segment, &mut points);
                }
            }
        }
        points
    }
}

fn loop_segment(from: ContourVertex, to: Point, feed: f64, z: f64) -> ToolpathSegment {
    let bulge = from.bulge;
    if bulge.abs() < BULGE_EPSILON {
        return ToolpathSegment::new(ToolpathSegmentType::LinearMove, from.point, to, feed, z);
    }

    // Center lies on the chord bisector, (1 - b²) / 4b chord lengths from the midpoint.
    let start = from.point;
    let mid = Point::new((start.x + to.x) / 2.0, (start.y + to.y) / 2.0);
    let factor = (1.0 - bulge * bulge) / (4.0 * bulge);
    let center = Point::new(
        mid.x - (to.y - start.y) * factor,
        mid.y + (to.x - start.x) * factor,
    );
    let arc_type = if bulge > 0.0 {
        ToolpathSegmentType::ArcCCW
    } else {
        ToolpathSegmentType::ArcCW
    };
    ToolpathSegment::new_arc(arc_type, start, to, center, feed, z)
}

fn sample_arc(segment: &ToolpathSegment, points: &mut Vec<MotionPrimitive>) {
    let feed = Some(segment.feed_rate);
    let (Some(center), Some(sweep)) = (segment.center, segment.sweep_angle()) else {
        points.push(MotionPrimitive::linear(segment.end.x, segment.end.y, segment.z, feed));
        return;
    };

    let radius = center.distance_to(&segment.start);
    let a0 = (segment.start.y - center.y).atan2(segment.start.x - center.x);
    for step in 1..ARC_PREVIEW_SEGMENTS {
        let angle = a0 + sweep * step as f64 / ARC_PREVIEW_SEGMENTS as f64;
        points.push(MotionPrimitive::linear(
            center.x + radius * angle.cos(),
            center.y + radius * angle.sin(),
            segment.z,
            feed,
        ));
    }
    points.push(MotionPrimitive::linear(segment.end.x, segment.end.y, segment.z, feed));
}
