//! # CycleKit Designer
//!
//! Contour toolpaths from part geometry: tool radius offsets, Z level
//! stepping, cutting direction and G-code output with matching preview
//! points.

pub mod contour;
pub mod error;
pub mod gcode_gen;
pub mod geometry;
pub mod multipass;
pub mod offset;
pub mod settings;
pub mod toolpath;

pub use contour::{generate, ContourGenerator, ToolpathProgram};
pub use error::{ToolpathError, ToolpathResult};
pub use gcode_gen::ToolpathToGcode;
pub use geometry::{Bounds, DesignElement, Geometry, Point};
pub use multipass::{effective_depth, z_levels, MAX_Z_LEVELS};
pub use offset::{Contour, ContourVertex};
pub use settings::{CutDirection, OffsetSide, ToolpathSettings};
pub use toolpath::{Toolpath, ToolpathSegment, ToolpathSegmentType, ARC_PREVIEW_SEGMENTS};
