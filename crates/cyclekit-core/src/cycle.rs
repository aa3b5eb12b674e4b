//! Canned-cycle types and their parameter records.

use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Every parameter letter a cycle record can hold, in record order.
pub const CYCLE_FIELDS: [char; 12] = ['X', 'Y', 'Z', 'R', 'Q', 'P', 'F', 'L', 'S', 'I', 'J', 'K'];

const DRILLING_FIELDS: &[char] = &['X', 'Y', 'Z', 'R', 'Q', 'P', 'F', 'L'];
const TAPPING_FIELDS: &[char] = &['X', 'Y', 'Z', 'R', 'Q', 'P', 'F', 'L', 'S'];
const BORING_FIELDS: &[char] = &['X', 'Y', 'Z', 'R', 'Q', 'P', 'F', 'L', 'K'];
const BACK_BORING_FIELDS: &[char] = &['X', 'Y', 'Z', 'R', 'Q', 'P', 'F', 'L', 'I', 'J', 'K'];

/// Canned cycle type
///
/// Each standard variant maps 1:1 to a canonical G-code. Canned-cycle codes
/// without a dedicated variant are kept as `Custom` with their number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CycleType {
    /// G81
    Drilling,
    /// G82
    DrillingDwell,
    /// G83
    PeckDrilling,
    /// G84
    RightTapping,
    /// G74
    LeftTapping,
    /// G85
    Boring,
    /// G86
    BoringDwell,
    /// G87
    BackBoring,
    /// G89
    BoringWithRetract,
    /// Any other G73-G89 code
    Custom(u16),
}

/// Parameter family a cycle type belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleFamily {
    Drilling,
    Tapping,
    Boring,
    BackBoring,
}

impl CycleFamily {
    /// Letters a record of this family may carry
    pub fn supported_fields(&self) -> &'static [char] {
        match self {
            CycleFamily::Drilling => DRILLING_FIELDS,
            CycleFamily::Tapping => TAPPING_FIELDS,
            CycleFamily::Boring => BORING_FIELDS,
            CycleFamily::BackBoring => BACK_BORING_FIELDS,
        }
    }
}

impl CycleType {
    /// The nine cycle types with a canonical code.
    pub const STANDARD: [CycleType; 9] = [
        CycleType::Drilling,
        CycleType::DrillingDwell,
        CycleType::PeckDrilling,
        CycleType::RightTapping,
        CycleType::LeftTapping,
        CycleType::Boring,
        CycleType::BoringDwell,
        CycleType::BackBoring,
        CycleType::BoringWithRetract,
    ];

    /// Map a G-code number to a cycle type.
    ///
    /// G80 is the cancel code and never a cycle.
    pub fn from_code(code: u32) -> Result<Self> {
        match code {
            81 => Ok(Self::Drilling),
            82 => Ok(Self::DrillingDwell),
            83 => Ok(Self::PeckDrilling),
            84 => Ok(Self::RightTapping),
            74 => Ok(Self::LeftTapping),
            85 => Ok(Self::Boring),
            86 => Ok(Self::BoringDwell),
            87 => Ok(Self::BackBoring),
            89 => Ok(Self::BoringWithRetract),
            80 => Err(CoreError::NotACycle(code)),
            73..=89 => Ok(Self::Custom(code as u16)),
            other => Err(CoreError::NotACycle(other)),
        }
    }

    /// Numeric G-code for this cycle
    pub fn code_number(&self) -> u16 {
        match self {
            Self::Drilling => 81,
            Self::DrillingDwell => 82,
            Self::PeckDrilling => 83,
            Self::RightTapping => 84,
            Self::LeftTapping => 74,
            Self::Boring => 85,
            Self::BoringDwell => 86,
            Self::BackBoring => 87,
            Self::BoringWithRetract => 89,
            Self::Custom(code) => *code,
        }
    }

    /// Canonical operation word, e.g. `"G81"`
    pub fn gcode(&self) -> String {
        format!("G{}", self.code_number())
    }

    pub fn family(&self) -> CycleFamily {
        match self {
            Self::Drilling | Self::DrillingDwell | Self::PeckDrilling | Self::Custom(_) => {
                CycleFamily::Drilling
            }
            Self::RightTapping | Self::LeftTapping => CycleFamily::Tapping,
            Self::Boring | Self::BoringDwell | Self::BoringWithRetract => CycleFamily::Boring,
            Self::BackBoring => CycleFamily::BackBoring,
        }
    }

    /// Letters this cycle's parameter record may carry
    pub fn supported_fields(&self) -> &'static [char] {
        self.family().supported_fields()
    }

    pub fn is_tapping(&self) -> bool {
        self.family() == CycleFamily::Tapping
    }

    /// Human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Drilling => "Drilling",
            Self::DrillingDwell => "Drilling with dwell",
            Self::PeckDrilling => "Peck drilling",
            Self::RightTapping => "Right-hand tapping",
            Self::LeftTapping => "Left-hand tapping",
            Self::Boring => "Boring",
            Self::BoringDwell => "Boring with dwell",
            Self::BackBoring => "Back boring",
            Self::BoringWithRetract => "Boring with retract",
            Self::Custom(_) => "Custom cycle",
        }
    }
}

impl fmt::Display for CycleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.gcode())
    }
}

impl FromStr for CycleType {
    type Err = CoreError;

    /// Accepts a G-code word (`"G83"`) or a kebab/snake-case name (`"peck-drilling"`).
    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_lowercase().replace('_', "-");
        if let Some(digits) = normalized.strip_prefix('g') {
            return digits
                .parse::<u32>()
                .map_err(|_| CoreError::UnknownCycleName(s.to_string()))
                .and_then(Self::from_code);
        }
        match normalized.as_str() {
            "drilling" | "drill" => Ok(Self::Drilling),
            "drilling-dwell" | "dwell-drilling" => Ok(Self::DrillingDwell),
            "peck-drilling" | "peck" => Ok(Self::PeckDrilling),
            "right-tapping" | "tapping" => Ok(Self::RightTapping),
            "left-tapping" => Ok(Self::LeftTapping),
            "boring" => Ok(Self::Boring),
            "boring-dwell" => Ok(Self::BoringDwell),
            "back-boring" => Ok(Self::BackBoring),
            "boring-with-retract" | "boring-retract" => Ok(Self::BoringWithRetract),
            _ => Err(CoreError::UnknownCycleName(s.to_string())),
        }
    }
}

/// Sparse cycle parameter record
///
/// Fields not supplied stay `None`. A continuation line overwrites only the
/// fields it carries (see [`CycleParameters::merge`]).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CycleParameters {
    pub x: Option<f64>,
    pub y: Option<f64>,
    /// Final depth
    pub z: Option<f64>,
    /// Reference (retract) plane
    pub r: Option<f64>,
    /// Peck increment
    pub q: Option<f64>,
    /// Dwell in seconds
    pub p: Option<f64>,
    /// Feed rate
    pub f: Option<f64>,
    /// Repeat count
    pub l: Option<f64>,
    /// Spindle speed (tapping)
    pub s: Option<f64>,
    /// Lateral offsets (back boring)
    pub i: Option<f64>,
    pub j: Option<f64>,
    /// Safety distance / depth offset (boring variants)
    pub k: Option<f64>,
}

impl CycleParameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a record from word pairs, keeping only the letters `cycle_type` supports.
    pub fn from_words<I>(cycle_type: CycleType, words: I) -> Self
    where
        I: IntoIterator<Item = (char, f64)>,
    {
        let mut params = Self::default();
        let supported = cycle_type.supported_fields();
        for (letter, value) in words {
            if supported.contains(&letter) {
                params.set(letter, value);
            } else if CYCLE_FIELDS.contains(&letter) {
                debug!("Dropping {}{} unsupported by {}", letter, value, cycle_type);
            }
        }
        params
    }

    /// Read a field by its letter
    pub fn get(&self, letter: char) -> Option<f64> {
        match letter.to_ascii_uppercase() {
            'X' => self.x,
            'Y' => self.y,
            'Z' => self.z,
            'R' => self.r,
            'Q' => self.q,
            'P' => self.p,
            'F' => self.f,
            'L' => self.l,
            'S' => self.s,
            'I' => self.i,
            'J' => self.j,
            'K' => self.k,
            _ => None,
        }
    }

    /// Write a field by its letter. Returns false for letters that are not cycle fields.
    pub fn set(&mut self, letter: char, value: f64) -> bool {
        let slot = match letter.to_ascii_uppercase() {
            'X' => &mut self.x,
            'Y' => &mut self.y,
            'Z' => &mut self.z,
            'R' => &mut self.r,
            'Q' => &mut self.q,
            'P' => &mut self.p,
            'F' => &mut self.f,
            'L' => &mut self.l,
            'S' => &mut self.s,
            'I' => &mut self.i,
            'J' => &mut self.j,
            'K' => &mut self.k,
            _ => return false,
        };
        *slot = Some(value);
        true
    }

    /// Overwrite every field present in `other`, keeping the rest.
    pub fn merge(&mut self, other: &CycleParameters) {
        for letter in CYCLE_FIELDS {
            if let Some(value) = other.get(letter) {
                self.set(letter, value);
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        CYCLE_FIELDS.iter().all(|letter| self.get(*letter).is_none())
    }

    /// Present fields as `(letter, value)` pairs in record order
    pub fn fields(&self) -> Vec<(char, f64)> {
        CYCLE_FIELDS
            .iter()
            .filter_map(|letter| self.get(*letter).map(|value| (*letter, value)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_codes_round_trip() {
        for cycle_type in CycleType::STANDARD {
            let code = cycle_type.code_number() as u32;
            assert_eq!(CycleType::from_code(code).unwrap(), cycle_type);
        }
    }

    #[test]
    fn test_custom_and_cancel_codes() {
        assert_eq!(CycleType::from_code(73).unwrap(), CycleType::Custom(73));
        assert_eq!(CycleType::from_code(88).unwrap().gcode(), "G88");
        assert!(CycleType::from_code(80).is_err());
        assert!(CycleType::from_code(1).is_err());
    }

    #[test]
    fn test_parse_cycle_names() {
        assert_eq!("G83".parse::<CycleType>().unwrap(), CycleType::PeckDrilling);
        assert_eq!(
            "back_boring".parse::<CycleType>().unwrap(),
            CycleType::BackBoring
        );
        assert!("spiral".parse::<CycleType>().is_err());
    }

    #[test]
    fn test_supported_fields_by_family() {
        assert!(CycleType::RightTapping.supported_fields().contains(&'S'));
        assert!(!CycleType::Drilling.supported_fields().contains(&'S'));
        assert!(CycleType::BackBoring.supported_fields().contains(&'I'));
        assert!(CycleType::Boring.supported_fields().contains(&'K'));
        assert!(!CycleType::Boring.supported_fields().contains(&'J'));
    }

    #[test]
    fn test_from_words_filters_unsupported() {
        let params = CycleParameters::from_words(
            CycleType::Drilling,
            [('X', 1.0), ('S', 1200.0), ('Z', -3.0), ('M', 3.0)],
        );
        assert_eq!(params.x, Some(1.0));
        assert_eq!(params.z, Some(-3.0));
        assert_eq!(params.s, None);
    }

    #[test]
    fn test_merge_overwrites_present_fields_only() {
        let mut base = CycleParameters {
            x: Some(0.0),
            z: Some(-10.0),
            r: Some(2.0),
            ..Default::default()
        };
        let update = CycleParameters {
            x: Some(20.0),
            ..Default::default()
        };
        base.merge(&update);
        assert_eq!(base.x, Some(20.0));
        assert_eq!(base.z, Some(-10.0));
        assert_eq!(base.r, Some(2.0));
        assert!(!base.is_empty());
        assert!(CycleParameters::new().is_empty());
    }
}
