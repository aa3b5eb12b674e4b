//! Modal state tracking for canned cycles
//!
//! A [`ModalStateTracker`] consumes commands one line at a time, keeps the
//! modal context (plane, distance mode, active cycle and its parameters) and
//! emits a [`CycleResult`] for every line that starts or continues a cycle.

use cyclekit_camtools::generate_result;
use cyclekit_core::{CycleParameters, CycleResult, CycleType, Position, WorkPlane};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::command::{tokenize, Command};

/// Height above the current Z used as the reference plane when a cycle omits `R`
pub const DEFAULT_REFERENCE_CLEARANCE: f64 = 5.0;

/// Modal machine state
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MachineState {
    pub last_position: Position,
    pub work_plane: WorkPlane,
    /// G91 active
    pub incremental_mode: bool,
    pub active_cycle: Option<CycleType>,
    pub active_cycle_params: CycleParameters,
}

/// How a G word affects the tracker
#[derive(Debug, Clone, Copy, PartialEq)]
enum ModalWord {
    Plane(WorkPlane),
    Distance { incremental: bool },
    Cancel,
    Motion(u32),
    Cycle(CycleType),
    Unsupported(u32),
}

impl ModalWord {
    fn classify(code: u32) -> Self {
        match code {
            17..=19 => WorkPlane::from_code(code)
                .map(ModalWord::Plane)
                .unwrap_or(ModalWord::Unsupported(code)),
            90 => ModalWord::Distance { incremental: false },
            91 => ModalWord::Distance { incremental: true },
            80 => ModalWord::Cancel,
            0..=3 => ModalWord::Motion(code),
            _ => CycleType::from_code(code)
                .map(ModalWord::Cycle)
                .unwrap_or(ModalWord::Unsupported(code)),
        }
    }
}

/// Canned-cycle interpreter
///
/// One tracker per program or session. Lines carrying several G words (for
/// example `G90 G81 ...`) apply their plane, distance and cancel words first,
/// in line order, then act on the last motion or cycle word.
#[derive(Debug, Clone, Default)]
pub struct ModalStateTracker {
    state: MachineState,
    reference_default: Option<f64>,
}

impl ModalStateTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current modal state
    pub fn state(&self) -> &MachineState {
        &self.state
    }

    /// Forget all modal state, as at program start
    pub fn reset(&mut self) {
        self.state = MachineState::default();
        self.reference_default = None;
    }

    /// Tokenize and process one line
    pub fn interpret_line(&mut self, line: &str) -> Option<CycleResult> {
        let command = tokenize(line);
        self.process(&command)
    }

    /// Process a whole program, collecting one result per cycle line.
    ///
    /// Blank lines and lines starting with `;` are skipped.
    pub fn interpret_program(&mut self, text: &str) -> Vec<CycleResult> {
        text.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with(';'))
            .filter_map(|line| self.interpret_line(line))
            .collect()
    }

    /// Process one command, returning a result when it starts or continues a cycle
    pub fn process(&mut self, command: &Command) -> Option<CycleResult> {
        let codes = command.code_numbers();
        let mut action = None;

        for code in &codes {
            match ModalWord::classify(*code) {
                ModalWord::Plane(plane) => {
                    debug!("Work plane set to {}", plane);
                    self.state.work_plane = plane;
                }
                ModalWord::Distance { incremental } => {
                    debug!(
                        "Distance mode set to {}",
                        if incremental { "incremental" } else { "absolute" }
                    );
                    self.state.incremental_mode = incremental;
                }
                ModalWord::Cancel => {
                    self.cancel_cycle();
                    action = None;
                }
                word @ (ModalWord::Motion(_) | ModalWord::Cycle(_)) => action = Some(word),
                ModalWord::Unsupported(code) => {
                    trace!("Ignoring G{} in '{}'", code, command.source);
                }
            }
        }

        match action {
            Some(ModalWord::Cycle(cycle_type)) => Some(self.start_cycle(cycle_type, command)),
            Some(ModalWord::Motion(code)) => {
                if self.state.active_cycle.is_some() {
                    if code <= 1 && command.has_xy() {
                        return Some(self.continue_cycle(command));
                    }
                    trace!("G{} without X/Y while a cycle is active, ignored", code);
                    None
                } else {
                    self.ordinary_motion(command);
                    None
                }
            }
            _ if codes.is_empty() && self.state.active_cycle.is_some() && command.has_xy() => {
                Some(self.continue_cycle(command))
            }
            _ => None,
        }
    }

    /// Regenerate the active cycle at the current position
    pub fn generate_active(&self) -> CycleResult {
        self.current_result(&self.state.active_cycle_params, "")
    }

    fn start_cycle(&mut self, cycle_type: CycleType, command: &Command) -> CycleResult {
        let words = command.parameters.iter().map(|(letter, value)| (*letter, *value));
        self.state.active_cycle = Some(cycle_type);
        self.state.active_cycle_params = CycleParameters::from_words(cycle_type, words);
        self.reference_default = Some(self.state.last_position.z + DEFAULT_REFERENCE_CLEARANCE);

        debug!("Cycle {} started from '{}'", cycle_type, command.source);
        self.move_to_hole(command);
        self.current_result(&self.state.active_cycle_params, &command.source)
    }

    fn continue_cycle(&mut self, command: &Command) -> CycleResult {
        let Some(cycle_type) = self.state.active_cycle else {
            return CycleResult::invalid(command.source.as_str(), "No active canned cycle");
        };
        let words = command.parameters.iter().map(|(letter, value)| (*letter, *value));
        let update = CycleParameters::from_words(cycle_type, words);
        self.state.active_cycle_params.merge(&update);

        trace!("Cycle {} continued by '{}'", cycle_type, command.source);
        self.move_to_hole(command);
        self.current_result(&self.state.active_cycle_params, &command.source)
    }

    fn cancel_cycle(&mut self) {
        if let Some(cycle_type) = self.state.active_cycle.take() {
            debug!("Cycle {} cancelled", cycle_type);
        }
        self.state.active_cycle_params = CycleParameters::default();
        self.reference_default = None;
    }

    fn ordinary_motion(&mut self, command: &Command) {
        let last = self.state.last_position;
        self.state.last_position = Position::new(
            self.resolve_axis(last.x, command.get('X')),
            self.resolve_axis(last.y, command.get('Y')),
            self.resolve_axis(last.z, command.get('Z')),
        );
    }

    /// Resolve the hole location and store it as both the position and the cycle's X/Y
    fn move_to_hole(&mut self, command: &Command) {
        let last = self.state.last_position;
        let x = self.resolve_axis(last.x, command.get('X'));
        let y = self.resolve_axis(last.y, command.get('Y'));
        self.state.last_position.x = x;
        self.state.last_position.y = y;
        self.state.active_cycle_params.x = Some(x);
        self.state.active_cycle_params.y = Some(y);
    }

    fn resolve_axis(&self, last: f64, supplied: Option<f64>) -> f64 {
        match supplied {
            Some(delta) if self.state.incremental_mode => last + delta,
            Some(value) => value,
            None => last,
        }
    }

    fn current_result(&self, params: &CycleParameters, source: &str) -> CycleResult {
        let mut resolved = *params;
        let last = self.state.last_position;
        resolved.x = Some(resolved.x.unwrap_or(last.x));
        resolved.y = Some(resolved.y.unwrap_or(last.y));
        if resolved.z.is_none() && self.state.active_cycle.is_some() {
            warn!("Cycle without Z depth, using current Z{:.3}", last.z);
            resolved.z = Some(last.z);
        }
        if resolved.r.is_none() {
            resolved.r = Some(
                self.reference_default
                    .unwrap_or(last.z + DEFAULT_REFERENCE_CLEARANCE),
            );
        }
        generate_result(
            self.state.active_cycle,
            &resolved,
            source,
            self.state.work_plane,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plane_and_mode_words() {
        let mut tracker = ModalStateTracker::new();
        assert!(tracker.interpret_line("G18").is_none());
        assert_eq!(tracker.state().work_plane, WorkPlane::ZX);
        assert!(tracker.interpret_line("G91").is_none());
        assert!(tracker.state().incremental_mode);
        assert!(tracker.interpret_line("G90").is_none());
        assert!(!tracker.state().incremental_mode);
    }

    #[test]
    fn test_cycle_start_result() {
        let mut tracker = ModalStateTracker::new();
        let result = tracker
            .interpret_line("G81 X1 Y2 Z-3 R1 F100")
            .expect("cycle start emits a result");
        assert!(result.valid);
        assert_eq!(result.cycle_type, Some(CycleType::Drilling));
        assert_eq!(result.points.len(), 3);
        assert_eq!(result.params.x, Some(1.0));
        assert_eq!(result.params.z, Some(-3.0));
        assert_eq!(tracker.state().last_position, Position::new(1.0, 2.0, 0.0));
    }

    #[test]
    fn test_default_reference_plane() {
        let mut tracker = ModalStateTracker::new();
        tracker.interpret_line("G0 Z3");
        let result = tracker.interpret_line("G81 X0 Y0 Z-2").unwrap();
        assert_eq!(result.params.r, Some(3.0 + DEFAULT_REFERENCE_CLEARANCE));
        assert_eq!(result.points[0].z, 8.0);
        // Stored record keeps R absent
        assert_eq!(tracker.state().active_cycle_params.r, None);
    }

    #[test]
    fn test_missing_depth_uses_current_z() {
        let mut tracker = ModalStateTracker::new();
        tracker.interpret_line("G0 Z1");
        let result = tracker.interpret_line("G81 X0 Y0 R2").unwrap();
        assert!(result.valid);
        assert_eq!(result.points[1].z, 1.0);
    }

    #[test]
    fn test_cycle_start_replaces_parameters() {
        let mut tracker = ModalStateTracker::new();
        tracker.interpret_line("G83 X0 Y0 Z-10 R2 Q3 F90");
        let result = tracker.interpret_line("G81 X5 Y5 Z-4 R1").unwrap();
        assert_eq!(result.params.q, None);
        assert_eq!(result.params.f, None);
    }

    #[test]
    fn test_unsupported_fields_are_dropped() {
        let mut tracker = ModalStateTracker::new();
        let result = tracker.interpret_line("G81 X0 Y0 Z-1 R1 S900 K2").unwrap();
        assert_eq!(result.params.s, None);
        assert_eq!(result.params.k, None);

        let result = tracker.interpret_line("G84 X0 Y0 Z-1 R1 F50 S900").unwrap();
        assert_eq!(result.params.s, Some(900.0));
    }

    #[test]
    fn test_continuation_requires_xy() {
        let mut tracker = ModalStateTracker::new();
        tracker.interpret_line("G81 X0 Y0 Z-1 R1");
        assert!(tracker.interpret_line("F200").is_none());
        assert!(tracker.interpret_line("G1 Z-5").is_none());
        assert!(tracker.interpret_line("G1 X4").is_some());
        assert!(tracker.interpret_line("G0 Y4").is_some());
    }

    #[test]
    fn test_arcs_do_not_continue_cycles() {
        let mut tracker = ModalStateTracker::new();
        tracker.interpret_line("G81 X0 Y0 Z-1 R1");
        assert!(tracker.interpret_line("G2 X4 Y4 I2 J2").is_none());
        assert_eq!(tracker.state().last_position.x, 0.0);
    }

    #[test]
    fn test_ordinary_motion_tracks_position() {
        let mut tracker = ModalStateTracker::new();
        tracker.interpret_line("G0 X10 Y5 Z2");
        tracker.interpret_line("G91");
        tracker.interpret_line("G1 X1 Z-1");
        assert_eq!(tracker.state().last_position, Position::new(11.0, 5.0, 1.0));
        // Bare words are not motion outside a cycle
        tracker.interpret_line("X100");
        assert_eq!(tracker.state().last_position.x, 11.0);
    }

    #[test]
    fn test_combined_modal_words() {
        let mut tracker = ModalStateTracker::new();
        let result = tracker.interpret_line("G17 G90 G83 X1 Y1 Z-6 R2 Q2").unwrap();
        assert_eq!(result.cycle_type, Some(CycleType::PeckDrilling));

        let result = tracker.interpret_line("G80 G81 X2 Y2 Z-1 R1").unwrap();
        assert_eq!(result.cycle_type, Some(CycleType::Drilling));

        assert!(tracker.interpret_line("G81 X3 Y3 Z-1 R1 G80").is_none());
        assert!(tracker.state().active_cycle.is_none());
    }

    #[test]
    fn test_custom_cycle_code() {
        let mut tracker = ModalStateTracker::new();
        let result = tracker.interpret_line("G73 X0 Y0 Z-2 R1").unwrap();
        assert_eq!(result.cycle_type, Some(CycleType::Custom(73)));
        assert!(result.fallback);
        assert!(result.valid);
    }

    #[test]
    fn test_unknown_codes_are_ignored() {
        let mut tracker = ModalStateTracker::new();
        assert!(tracker.interpret_line("G54 X3").is_none());
        assert!(tracker.interpret_line("G28").is_none());
        assert_eq!(tracker.state(), &MachineState::default());
    }

    #[test]
    fn test_generate_active() {
        let mut tracker = ModalStateTracker::new();
        let idle = tracker.generate_active();
        assert!(!idle.valid);
        assert!(idle.points.is_empty());
        assert!(idle.error.is_some());

        tracker.interpret_line("G82 X3 Y4 Z-2 R1 P0.5");
        let active = tracker.generate_active();
        assert!(active.valid);
        assert_eq!(active.cycle_type, Some(CycleType::DrillingDwell));
        assert_eq!(active.points[2].dwell_seconds, Some(0.5));
    }

    #[test]
    fn test_reset() {
        let mut tracker = ModalStateTracker::new();
        tracker.interpret_line("G91");
        tracker.interpret_line("G81 X1 Y1 Z-1 R1");
        tracker.reset();
        assert_eq!(tracker.state(), &MachineState::default());
        assert!(tracker.interpret_line("X1 Y1").is_none());
    }

    #[test]
    fn test_interpret_program_skips_comment_lines() {
        let program = "; header\n\nG90\nG81 X0 Y0 Z-5 R2 F100\nX10\n  X20 Y5\nG80\nX30\n";
        let mut tracker = ModalStateTracker::new();
        let results = tracker.interpret_program(program);
        assert_eq!(results.len(), 3);
        assert_eq!(results[1].params.x, Some(10.0));
        assert_eq!(results[1].params.y, Some(0.0));
        assert_eq!(results[2].params.y, Some(5.0));
    }
}
