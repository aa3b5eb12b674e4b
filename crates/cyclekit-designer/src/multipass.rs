//! Multiple pass depth control for deep cuts.
//!
//! Splits a total depth into Z levels no deeper than the stepdown, with the
//! last level landing exactly on the target.

use tracing::warn;

/// Upper bound on Z levels for one contour
pub const MAX_Z_LEVELS: usize = 10_000;

/// Effective cut depth: the requested depth limited by the element's own depth
pub fn effective_depth(requested: f64, intrinsic: Option<f64>) -> f64 {
    let requested = requested.abs();
    match intrinsic {
        Some(depth) if depth.is_finite() => requested.min(depth.abs()),
        _ => requested,
    }
}

/// Z levels from the surface down to `-depth`.
///
/// Levels are negative and strictly decreasing. A stepdown of zero or less
/// gives a single level at the target.
pub fn z_levels(depth: f64, stepdown: f64) -> Vec<f64> {
    let depth = depth.abs();
    if depth == 0.0 {
        return vec![0.0];
    }
    if stepdown <= 0.0 || !stepdown.is_finite() {
        return vec![-depth];
    }

    let mut levels = Vec::new();
    let mut cut = 0.0;
    while cut < depth {
        if levels.len() + 1 == MAX_Z_LEVELS {
            warn!(
                "Z level limit of {} reached at {:.3}mm, finishing at full depth",
                MAX_Z_LEVELS, cut
            );
            break;
        }
        cut = (cut + stepdown).min(depth);
        levels.push(-cut);
    }
    if levels.last() != Some(&-depth) {
        levels.push(-depth);
    }
    levels
}
