//! Machine position and plane types.

use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Three-axis machine position in program units
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    /// X-axis position
    pub x: f64,
    /// Y-axis position
    pub y: f64,
    /// Z-axis position
    pub z: f64,
}

impl Position {
    /// Create a new position with X, Y, Z coordinates
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Machine origin
    pub fn origin() -> Self {
        Self::default()
    }

    /// Euclidean distance to another position
    pub fn distance_to(&self, other: &Position) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "X{:.3} Y{:.3} Z{:.3}", self.x, self.y, self.z)
    }
}

/// Active work plane (modal group 2)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WorkPlane {
    /// G17
    #[default]
    XY,
    /// G18
    ZX,
    /// G19
    YZ,
}

impl WorkPlane {
    /// Map a plane-select code (17, 18, 19) to a plane
    pub fn from_code(code: u32) -> Result<Self> {
        match code {
            17 => Ok(Self::XY),
            18 => Ok(Self::ZX),
            19 => Ok(Self::YZ),
            other => Err(CoreError::InvalidPlane(other)),
        }
    }

    /// The G-code word that selects this plane
    pub fn gcode(&self) -> &'static str {
        match self {
            Self::XY => "G17",
            Self::ZX => "G18",
            Self::YZ => "G19",
        }
    }
}

impl fmt::Display for WorkPlane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::XY => write!(f, "XY plane (G17)"),
            Self::ZX => write!(f, "ZX plane (G18)"),
            Self::YZ => write!(f, "YZ plane (G19)"),
        }
    }
}
