//! G-code synthesis for canned cycles.
//!
//! Turns a cycle type and parameter record back into the canonical text
//! line. Words are written in a fixed order: X Y Z R Q P F, then S for
//! tapping or I J K for back boring. Q and P are written only when strictly
//! positive; zero means "not used" in this dialect. F and S are whole
//! numbers, with halves rounded away from zero.

use cyclekit_core::{CycleFamily, CycleParameters, CycleType, Position};
use tracing::debug;

use crate::error::{CamToolError, CamToolResult, ParameterError};

/// Letters written for every cycle type, in output order
const COMMON_ORDER: [char; 7] = ['X', 'Y', 'Z', 'R', 'Q', 'P', 'F'];

/// Synthesize the canonical text line for one cycle invocation
pub fn synthesize(cycle_type: CycleType, params: &CycleParameters) -> String {
    let mut line = cycle_type.gcode();

    for letter in COMMON_ORDER {
        push_word(&mut line, letter, params.get(letter));
    }

    match cycle_type.family() {
        CycleFamily::Tapping => push_word(&mut line, 'S', params.s),
        CycleFamily::BackBoring => {
            for letter in ['I', 'J', 'K'] {
                push_word(&mut line, letter, params.get(letter));
            }
        }
        CycleFamily::Drilling | CycleFamily::Boring => {}
    }

    line
}

/// Synthesize a complete cycle block over several hole locations.
///
/// The first hole gets the full cycle line, later holes are bare `X.. Y..`
/// continuations that inherit the rest, and the block ends with `G80`.
pub fn synthesize_program(
    cycle_type: CycleType,
    holes: &[Position],
    params: &CycleParameters,
) -> CamToolResult<String> {
    let (first, rest) = holes.split_first().ok_or_else(|| {
        CamToolError::InvalidParameters("at least one hole location is required".to_string())
    })?;
    for (index, hole) in holes.iter().enumerate() {
        if !hole.x.is_finite() || !hole.y.is_finite() {
            return Err(ParameterError::InvalidValue {
                name: format!("hole {}", index + 1),
                reason: format!("must be finite, got X{} Y{}", hole.x, hole.y),
            }
            .into());
        }
    }

    let mut gcode = String::new();
    gcode.push_str(&format!("; {} at {} locations\n", cycle_type.name(), holes.len()));
    gcode.push_str("G90 ; Absolute positioning\n");
    gcode.push_str("G17 ; XY plane\n");

    let mut first_params = *params;
    first_params.x = Some(first.x);
    first_params.y = Some(first.y);
    gcode.push_str(&synthesize(cycle_type, &first_params));
    gcode.push('\n');

    for hole in rest {
        gcode.push_str(&format!("X{:.3} Y{:.3}\n", hole.x, hole.y));
    }

    gcode.push_str("G80 ; Cancel canned cycle\n");
    debug!("Synthesized {} block for {} holes", cycle_type.gcode(), holes.len());
    Ok(gcode)
}

fn push_word(line: &mut String, letter: char, value: Option<f64>) {
    let Some(value) = value else {
        return;
    };
    match letter {
        'Q' | 'P' if value <= 0.0 => {}
        'F' | 'S' => line.push_str(&format!(" {}{:.0}", letter, value.round())),
        _ => line.push_str(&format!(" {}{:.3}", letter, value)),
    }
}
