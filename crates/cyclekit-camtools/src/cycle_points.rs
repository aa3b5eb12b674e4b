use cyclekit_core::{CycleParameters, CycleResult, CycleType, MotionPrimitive, WorkPlane};
use tracing::{debug, warn};

use crate::error::{ParameterError, ParameterResult};

/// Dwell at the bottom of a tapping cycle while the spindle reverses (seconds)
pub const TAP_REVERSAL_DWELL: f64 = 0.1;

/// Peck increment used by G83 when no Q word was given
pub const DEFAULT_PECK_INCREMENT: f64 = 5.0;

/// Upper bound on intermediate pecks in one G83 invocation
pub const MAX_PECK_ITERATIONS: usize = 10_000;

/// Peck depths within this distance of the final depth are merged into the final plunge
pub const PECK_DEPTH_TOLERANCE: f64 = 1e-9;

/// Generator for canned-cycle motion
///
/// Expands one cycle invocation at a resolved hole location into the motion
/// the tool performs. Every call returns a fresh, fully built sequence.
pub struct CyclePointGenerator<'a> {
    cycle_type: CycleType,
    x: f64,
    y: f64,
    z: f64,
    r: f64,
    params: &'a CycleParameters,
}

impl<'a> CyclePointGenerator<'a> {
    /// Create a generator for a hole at (x, y), drilled from `r` down to `z`
    pub fn new(
        cycle_type: CycleType,
        x: f64,
        y: f64,
        z: f64,
        r: f64,
        params: &'a CycleParameters,
    ) -> Self {
        Self {
            cycle_type,
            x,
            y,
            z,
            r,
            params,
        }
    }

    /// True when this cycle has no motion of its own and borrows the Drilling shape
    pub fn uses_fallback_shape(&self) -> bool {
        matches!(self.cycle_type, CycleType::Custom(_))
    }

    /// Generate the motion for this invocation
    pub fn generate(&self) -> Vec<MotionPrimitive> {
        let mut points = Vec::new();
        match self.cycle_type {
            CycleType::Drilling => self.generate_drilling(&mut points),
            CycleType::DrillingDwell => self.generate_drilling_dwell(&mut points),
            CycleType::PeckDrilling => self.generate_peck_drilling(&mut points),
            CycleType::RightTapping | CycleType::LeftTapping => self.generate_tapping(&mut points),
            CycleType::Boring
            | CycleType::BoringDwell
            | CycleType::BackBoring
            | CycleType::BoringWithRetract => self.generate_drilling(&mut points),
            CycleType::Custom(code) => {
                warn!("No motion defined for G{}, using drilling shape", code);
                self.generate_drilling(&mut points);
            }
        }
        points
    }

    fn generate_drilling(&self, points: &mut Vec<MotionPrimitive>) {
        points.push(MotionPrimitive::rapid(self.x, self.y, self.r));
        points.push(MotionPrimitive::linear(self.x, self.y, self.z, self.params.f));
        points.push(MotionPrimitive::rapid(self.x, self.y, self.r));
    }

    fn generate_drilling_dwell(&self, points: &mut Vec<MotionPrimitive>) {
        let dwell = self.params.p.unwrap_or(0.0);
        points.push(MotionPrimitive::rapid(self.x, self.y, self.r));
        points.push(MotionPrimitive::linear(self.x, self.y, self.z, self.params.f));
        points.push(MotionPrimitive::dwell(self.x, self.y, self.z, dwell));
        points.push(MotionPrimitive::rapid(self.x, self.y, self.r));
    }

    fn generate_peck_drilling(&self, points: &mut Vec<MotionPrimitive>) {
        let peck = self.params.q.unwrap_or(DEFAULT_PECK_INCREMENT);
        let feed = self.params.f;

        points.push(MotionPrimitive::rapid(self.x, self.y, self.r));

        if peck > 0.0 {
            let mut pecks = 0;
            loop {
                let depth = self.r - peck * (pecks + 1) as f64;
                if depth <= self.z + PECK_DEPTH_TOLERANCE {
                    break;
                }
                if pecks == MAX_PECK_ITERATIONS {
                    warn!(
                        "Peck limit of {} reached at Z{:.3}, finishing with a single plunge",
                        MAX_PECK_ITERATIONS, depth
                    );
                    break;
                }
                points.push(MotionPrimitive::linear(self.x, self.y, depth, feed));
                points.push(MotionPrimitive::rapid(self.x, self.y, self.r));
                points.push(MotionPrimitive::rapid(self.x, self.y, depth));
                pecks += 1;
            }
            debug!("Peck drilling: {} intermediate pecks", pecks);
        } else {
            debug!("Peck increment {} <= 0, drilling in a single pass", peck);
        }

        points.push(MotionPrimitive::linear(self.x, self.y, self.z, feed));
        points.push(MotionPrimitive::rapid(self.x, self.y, self.r));
    }

    // Retract at cutting feed, never rapid.
    fn generate_tapping(&self, points: &mut Vec<MotionPrimitive>) {
        let feed = self.params.f;
        points.push(MotionPrimitive::rapid(self.x, self.y, self.r));
        points.push(MotionPrimitive::linear(self.x, self.y, self.z, feed));
        points.push(MotionPrimitive::dwell(
            self.x,
            self.y,
            self.z,
            TAP_REVERSAL_DWELL,
        ));
        points.push(MotionPrimitive::linear(self.x, self.y, self.r, feed));
    }
}

/// Generate the motion for one cycle invocation
pub fn generate(
    cycle_type: CycleType,
    x: f64,
    y: f64,
    z: f64,
    r: f64,
    params: &CycleParameters,
) -> Vec<MotionPrimitive> {
    CyclePointGenerator::new(cycle_type, x, y, z, r, params).generate()
}

/// Check that a record carries the values generation needs
pub fn validate_resolved(params: &CycleParameters) -> ParameterResult<(f64, f64, f64, f64)> {
    let z = params.z.ok_or_else(|| ParameterError::Missing("Z".to_string()))?;
    let r = params.r.ok_or_else(|| ParameterError::Missing("R".to_string()))?;
    let x = params.x.unwrap_or(0.0);
    let y = params.y.unwrap_or(0.0);
    for (name, value) in [("X", x), ("Y", y), ("Z", z), ("R", r)] {
        if !value.is_finite() {
            return Err(ParameterError::InvalidValue {
                name: name.to_string(),
                reason: format!("must be finite, got {}", value),
            });
        }
    }
    Ok((x, y, z, r))
}

/// Generate a full [`CycleResult`] for the active cycle, if any.
///
/// `params` must hold the resolved X/Y and effective Z/R. With no active
/// cycle, or a record missing Z or R, the result is invalid and carries no
/// points.
pub fn generate_result(
    active_cycle: Option<CycleType>,
    params: &CycleParameters,
    source_text: &str,
    plane: WorkPlane,
) -> CycleResult {
    let Some(cycle_type) = active_cycle else {
        return CycleResult::invalid(source_text, "No active canned cycle to generate");
    };

    let (x, y, z, r) = match validate_resolved(params) {
        Ok(values) => values,
        Err(e) => {
            return CycleResult {
                cycle_type: Some(cycle_type),
                ..CycleResult::invalid(source_text, e.to_string())
            }
        }
    };

    let generator = CyclePointGenerator::new(cycle_type, x, y, z, r, params);
    let points = generator.generate();
    CycleResult::generated(cycle_type, *params, source_text, points, plane)
        .with_fallback(generator.uses_fallback_shape())
}
