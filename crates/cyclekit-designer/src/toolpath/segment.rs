//! Toolpath segment types and data structures.

use crate::geometry::Point;

/// Types of toolpath segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolpathSegmentType {
    /// XY rapid at the current height
    RapidMove,
    /// Vertical feed move to the segment's Z
    Plunge,
    /// Vertical rapid up to the segment's Z
    Retract,
    LinearMove,
    ArcCW,
    ArcCCW,
}

/// A single segment of a toolpath.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToolpathSegment {
    pub segment_type: ToolpathSegmentType,
    pub start: Point,
    pub end: Point,
    pub center: Option<Point>,
    pub feed_rate: f64,
    /// Z height of the whole segment (target height for plunges and retracts)
    pub z: f64,
}

impl ToolpathSegment {
    /// Creates a new straight segment.
    pub fn new(
        segment_type: ToolpathSegmentType,
        start: Point,
        end: Point,
        feed_rate: f64,
        z: f64,
    ) -> Self {
        Self {
            segment_type,
            start,
            end,
            center: None,
            feed_rate,
            z,
        }
    }

    /// Creates a new arc segment.
    pub fn new_arc(
        segment_type: ToolpathSegmentType,
        start: Point,
        end: Point,
        center: Point,
        feed_rate: f64,
        z: f64,
    ) -> Self {
        Self {
            segment_type,
            start,
            end,
            center: Some(center),
            feed_rate,
            z,
        }
    }

    pub fn is_arc(&self) -> bool {
        matches!(
            self.segment_type,
            ToolpathSegmentType::ArcCW | ToolpathSegmentType::ArcCCW
        )
    }

    /// Signed sweep angle of an arc in radians (negative = clockwise).
    ///
    /// Coincident start and end points describe a full circle.
    pub fn sweep_angle(&self) -> Option<f64> {
        let center = self.center.filter(|_| self.is_arc())?;
        let a0 = (self.start.y - center.y).atan2(self.start.x - center.x);
        let a1 = (self.end.y - center.y).atan2(self.end.x - center.x);
        let tau = std::f64::consts::TAU;
        let full = self.start.distance_to(&self.end) < 1e-9;

        let sweep = if self.segment_type == ToolpathSegmentType::ArcCCW {
            if full {
                tau
            } else {
                (a1 - a0).rem_euclid(tau)
            }
        } else if full {
            -tau
        } else {
            -(a0 - a1).rem_euclid(tau)
        };
        Some(sweep)
    }

    /// Arc or line length in the XY plane
    pub fn length(&self) -> f64 {
        match (self.center, self.sweep_angle()) {
            (Some(center), Some(sweep)) => center.distance_to(&self.start) * sweep.abs(),
            _ => self.start.distance_to(&self.end),
        }
    }
}
