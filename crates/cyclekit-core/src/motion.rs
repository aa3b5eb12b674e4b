//! Motion primitives and per-line interpretation results.

use crate::cycle::{CycleParameters, CycleType};
use crate::data::{Position, WorkPlane};
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Kind of tool motion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MotionKind {
    Rapid,
    Linear,
    Dwell,
}

/// One step of a synthesized or interpreted path
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotionPrimitive {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub kind: MotionKind,
    pub feed_rate: Option<f64>,
    pub dwell_seconds: Option<f64>,
}

impl MotionPrimitive {
    /// Rapid positioning move
    pub fn rapid(x: f64, y: f64, z: f64) -> Self {
        Self {
            x,
            y,
            z,
            kind: MotionKind::Rapid,
            feed_rate: None,
            dwell_seconds: None,
        }
    }

    /// Feed move at an optional feed rate
    pub fn linear(x: f64, y: f64, z: f64, feed_rate: Option<f64>) -> Self {
        Self {
            x,
            y,
            z,
            kind: MotionKind::Linear,
            feed_rate,
            dwell_seconds: None,
        }
    }

    /// Pause in place
    pub fn dwell(x: f64, y: f64, z: f64, seconds: f64) -> Self {
        Self {
            x,
            y,
            z,
            kind: MotionKind::Dwell,
            feed_rate: None,
            dwell_seconds: Some(seconds),
        }
    }

    pub fn position(&self) -> Position {
        Position::new(self.x, self.y, self.z)
    }

    pub fn is_rapid(&self) -> bool {
        self.kind == MotionKind::Rapid
    }

    pub fn is_linear(&self) -> bool {
        self.kind == MotionKind::Linear
    }

    pub fn is_dwell(&self) -> bool {
        self.kind == MotionKind::Dwell
    }
}

/// Result of interpreting or generating one cycle invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleResult {
    /// Cycle that produced the points; `None` when no cycle was active
    pub cycle_type: Option<CycleType>,
    /// Merged parameters with resolved X/Y and the effective Z and R
    pub params: CycleParameters,
    /// Line the result was produced from
    pub source_text: String,
    pub points: Vec<MotionPrimitive>,
    pub valid: bool,
    pub error: Option<String>,
    /// An unrecognized cycle code was interpreted with the Drilling shape
    pub fallback: bool,
    /// Work plane active when the result was produced
    pub plane: WorkPlane,
}

impl CycleResult {
    /// A successfully generated cycle invocation
    pub fn generated(
        cycle_type: CycleType,
        params: CycleParameters,
        source_text: impl Into<String>,
        points: Vec<MotionPrimitive>,
        plane: WorkPlane,
    ) -> Self {
        Self {
            cycle_type: Some(cycle_type),
            params,
            source_text: source_text.into(),
            points,
            valid: true,
            error: None,
            fallback: false,
            plane,
        }
    }

    /// A recoverable failure: no points, an explanatory message
    pub fn invalid(source_text: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            cycle_type: None,
            params: CycleParameters::default(),
            source_text: source_text.into(),
            points: Vec::new(),
            valid: false,
            error: Some(error.into()),
            fallback: false,
            plane: WorkPlane::default(),
        }
    }

    /// Mark that the Drilling shape was substituted for an unknown code
    pub fn with_fallback(mut self, fallback: bool) -> Self {
        self.fallback = fallback;
        self
    }

    /// Serialize as pretty JSON for export
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitive_constructors() {
        let rapid = MotionPrimitive::rapid(1.0, 2.0, 3.0);
        assert!(rapid.is_rapid());
        assert_eq!(rapid.feed_rate, None);

        let linear = MotionPrimitive::linear(1.0, 2.0, -3.0, Some(150.0));
        assert!(linear.is_linear());
        assert_eq!(linear.feed_rate, Some(150.0));

        let dwell = MotionPrimitive::dwell(1.0, 2.0, -3.0, 0.5);
        assert!(dwell.is_dwell());
        assert_eq!(dwell.dwell_seconds, Some(0.5));
        assert_eq!(dwell.position(), Position::new(1.0, 2.0, -3.0));
    }

    #[test]
    fn test_invalid_result() {
        let result = CycleResult::invalid("X10 Y10", "No active cycle");
        assert!(!result.valid);
        assert!(result.points.is_empty());
        assert_eq!(result.error.as_deref(), Some("No active cycle"));
        assert!(result.cycle_type.is_none());
    }

    #[test]
    fn test_result_serializes() {
        let result = CycleResult::generated(
            CycleType::Drilling,
            CycleParameters::default(),
            "G81 X0 Y0 Z-1 R1",
            vec![MotionPrimitive::rapid(0.0, 0.0, 1.0)],
            WorkPlane::XY,
        );
        let json = result.to_json().unwrap();
        assert!(json.contains("\"Drilling\""));
        assert!(json.contains("\"Rapid\""));
    }
}
