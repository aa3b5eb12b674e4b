//! Cutting parameters for contour toolpaths.

use serde::{Deserialize, Serialize};

use crate::error::{ToolpathError, ToolpathResult};

/// Which side of the nominal geometry the tool center runs on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OffsetSide {
    /// Shrink by the tool radius
    Inside,
    /// Grow by the tool radius
    #[default]
    Outside,
    /// Tool center on the line
    None,
}

/// Cutting direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CutDirection {
    /// Natural point order, clockwise circles (G2)
    #[default]
    Climb,
    /// Reversed point order, counter-clockwise circles (G3)
    Conventional,
}

/// Tool and feed settings for one contour job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolpathSettings {
    /// Tool diameter in mm
    pub tool_diameter: f64,
    /// Depth removed per Z level in mm
    pub stepdown: f64,
    /// Cutting feed in mm/min
    pub feed_rate: f64,
    /// Plunge feed in mm/min
    pub plunge_rate: f64,
    /// Spindle speed in RPM
    pub spindle_speed: u32,
    /// Requested total depth in mm (positive, cut downward from Z0)
    pub depth: f64,
    /// Clearance height for rapids between passes
    pub safe_z: f64,
    pub offset: OffsetSide,
    pub direction: CutDirection,
}

impl Default for ToolpathSettings {
    fn default() -> Self {
        Self {
            tool_diameter: 3.175,
            stepdown: 1.0,
            feed_rate: 600.0,
            plunge_rate: 200.0,
            spindle_speed: 12000,
            depth: 3.0,
            safe_z: 5.0,
            offset: OffsetSide::Outside,
            direction: CutDirection::Climb,
        }
    }
}

impl ToolpathSettings {
    pub fn tool_radius(&self) -> f64 {
        self.tool_diameter / 2.0
    }

    /// Check that every value can produce a program
    pub fn validate(&self) -> ToolpathResult<()> {
        let finite = [
            ("tool diameter", self.tool_diameter),
            ("stepdown", self.stepdown),
            ("feed rate", self.feed_rate),
            ("plunge rate", self.plunge_rate),
            ("depth", self.depth),
            ("safe Z", self.safe_z),
        ];
        if let Some((name, _)) = finite.iter().find(|(_, value)| !value.is_finite()) {
            return Err(ToolpathError::InvalidSettings(format!("{} must be finite", name)));
        }
        if self.tool_diameter <= 0.0 {
            return Err(ToolpathError::InvalidSettings(
                "tool diameter must be positive".to_string(),
            ));
        }
        if self.feed_rate <= 0.0 || self.plunge_rate <= 0.0 {
            return Err(ToolpathError::InvalidSettings(
                "feed and plunge rates must be positive".to_string(),
            ));
        }
        if self.safe_z <= 0.0 {
            return Err(ToolpathError::InvalidSettings(
                "safe Z must be above the stock surface".to_string(),
            ));
        }
        Ok(())
    }
}
