//! Geometry-to-toolpath generation.
//!
//! Dispatches on the element's shape:
//!
//! - **Circle**: arithmetic offset, one full-circle arc per Z level
//! - **Closed path**: polygon offset through `cavalier_contours`
//! - **Rectangle**: arithmetic offset of the four corners
//! - anything else: the bounding box is cut as a rectangle and the program is
//!   flagged as a fallback

use cyclekit_core::MotionPrimitive;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{ToolpathError, ToolpathResult};
use crate::gcode_gen::ToolpathToGcode;
use crate::geometry::{DesignElement, Geometry};
use crate::multipass::{effective_depth, z_levels};
use crate::offset::{offset_circle, offset_polygon, offset_rectangle, Contour};
use crate::settings::ToolpathSettings;
use crate::toolpath::Toolpath;

/// Generated program text plus the same motion as preview points
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolpathProgram {
    pub gcode: String,
    pub points: Vec<MotionPrimitive>,
    /// Why no motion was produced
    pub error: Option<String>,
    /// The bounding box was cut in place of an unsupported shape
    pub fallback: bool,
}

impl ToolpathProgram {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Contour toolpath generator
#[derive(Debug, Clone)]
pub struct ContourGenerator {
    settings: ToolpathSettings,
    line_numbers_enabled: bool,
    return_to_origin: bool,
}

impl ContourGenerator {
    pub fn new(settings: ToolpathSettings) -> Self {
        Self {
            settings,
            line_numbers_enabled: false,
            return_to_origin: true,
        }
    }

    pub fn with_line_numbers(mut self, enabled: bool) -> Self {
        self.line_numbers_enabled = enabled;
        self
    }

    pub fn with_return_to_origin(mut self, enabled: bool) -> Self {
        self.return_to_origin = enabled;
        self
    }

    pub fn settings(&self) -> &ToolpathSettings {
        &self.settings
    }

    fn gcode_generator(&self) -> ToolpathToGcode {
        ToolpathToGcode::new(self.settings.safe_z)
            .with_line_numbers(self.line_numbers_enabled)
            .with_return_to_origin(self.return_to_origin)
    }

    /// Generate the contour program for one element.
    ///
    /// Never fails: infeasible offsets and bad settings come back as
    /// [`ToolpathProgram::error`] with the message embedded as a comment.
    pub fn generate(&self, element: &DesignElement) -> ToolpathProgram {
        let geometry = &element.geometry;
        let fallback = !matches!(
            geometry,
            Geometry::Circle { .. } | Geometry::Rectangle { .. } | Geometry::Path { closed: true, .. }
        );
        if fallback {
            warn!("No dedicated contour for {}, cutting its bounding box", geometry);
        }

        match self.build_toolpath(element) {
            Ok(toolpath) => {
                let gcode = self.gcode_generator().generate(
                    &toolpath,
                    geometry.kind(),
                    self.settings.feed_rate,
                    self.settings.spindle_speed,
                );
                debug!(
                    "Contour for {}: {} segments, {:.3}mm",
                    geometry,
                    toolpath.segments.len(),
                    toolpath.total_length()
                );
                let mut points = toolpath.preview_points();
                if self.return_to_origin {
                    points.push(MotionPrimitive::rapid(0.0, 0.0, self.settings.safe_z));
                }
                ToolpathProgram {
                    gcode,
                    points,
                    error: None,
                    fallback,
                }
            }
            Err(e) => {
                warn!("Contour for {} not generated: {}", geometry, e);
                let depth = -effective_depth(self.settings.depth, element.depth);
                let mut gcode = self.gcode_generator().generate_comments(
                    geometry.kind(),
                    self.settings.feed_rate,
                    self.settings.tool_diameter,
                    depth,
                );
                gcode.push_str(&format!("; Error: {}\n", e));
                ToolpathProgram {
                    gcode,
                    points: Vec::new(),
                    error: Some(e.to_string()),
                    fallback,
                }
            }
        }
    }

    /// Offset the element and stack its passes
    pub fn build_toolpath(&self, element: &DesignElement) -> ToolpathResult<Toolpath> {
        self.settings.validate()?;
        let contours = self.contours(&element.geometry)?;
        let depth = effective_depth(self.settings.depth, element.depth);
        let levels = z_levels(depth, self.settings.stepdown);
        Ok(Toolpath::from_contours(&contours, &levels, &self.settings))
    }

    fn contours(&self, geometry: &Geometry) -> ToolpathResult<Vec<Contour>> {
        let side = self.settings.offset;
        let tool_radius = self.settings.tool_radius();
        match geometry {
            Geometry::Circle { center, radius } => {
                Ok(vec![offset_circle(*center, *radius, side, tool_radius)?])
            }
            Geometry::Path {
                points,
                closed: true,
            } => offset_polygon(points, side, tool_radius),
            other => {
                let bounds = other.bounding_box().ok_or_else(|| {
                    ToolpathError::InvalidGeometry(format!("{} has no points", other))
                })?;
                Ok(vec![offset_rectangle(bounds, other.kind(), side, tool_radius)?])
            }
        }
    }
}

/// Generate the contour program for one element
pub fn generate(element: &DesignElement, settings: &ToolpathSettings) -> ToolpathProgram {
    ContourGenerator::new(settings.clone()).generate(element)
}
