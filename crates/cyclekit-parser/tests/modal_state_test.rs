use cyclekit_camtools::synthesize;
use cyclekit_core::{CycleParameters, CycleType, MotionKind, Position};
use cyclekit_parser::{tokenize, ModalStateTracker};
use proptest::prelude::*;

fn assert_close(actual: Option<f64>, expected: f64) {
    let actual = actual.expect("field should be present");
    assert!(
        (actual - expected).abs() < 1e-3,
        "expected {}, got {}",
        expected,
        actual
    );
}

#[test]
fn test_continuation_inherits_parameters() {
    let mut tracker = ModalStateTracker::new();
    let first = tracker.interpret_line("G81 X0 Y0 Z-10 R2 F100").unwrap();
    assert!(first.valid);

    let second = tracker.interpret_line("X20 Y0").unwrap();
    assert!(second.valid);
    assert_eq!(second.cycle_type, Some(CycleType::Drilling));
    assert_eq!(second.params.x, Some(20.0));
    assert_eq!(second.params.z, Some(-10.0));
    assert_eq!(second.params.r, Some(2.0));
    assert_eq!(second.params.f, Some(100.0));
    assert!(second.points.iter().all(|p| p.x == 20.0 && p.y == 0.0));
}

#[test]
fn test_continuation_overrides_supplied_fields() {
    let mut tracker = ModalStateTracker::new();
    tracker.interpret_line("G83 X0 Y0 Z-10 R2 Q4 F100");
    let result = tracker.interpret_line("X5 Z-12 Q6").unwrap();
    assert_eq!(result.params.z, Some(-12.0));
    assert_eq!(result.params.q, Some(6.0));
    assert_eq!(result.params.f, Some(100.0));
}

#[test]
fn test_incremental_continuation() {
    let mut tracker = ModalStateTracker::new();
    tracker.interpret_line("G81 X10 Y0 Z-3 R1");
    assert_eq!(tracker.state().last_position, Position::new(10.0, 0.0, 0.0));

    tracker.interpret_line("G91");
    let result = tracker.interpret_line("X5").unwrap();
    assert_eq!(result.params.x, Some(15.0));
    assert_eq!(result.params.y, Some(0.0));
    // Depth and reference plane are not offset in incremental mode
    assert_eq!(result.params.z, Some(-3.0));
    assert_eq!(result.params.r, Some(1.0));
}

#[test]
fn test_incremental_cycle_start() {
    let mut tracker = ModalStateTracker::new();
    tracker.interpret_line("G0 X10 Y10");
    tracker.interpret_line("G91");
    let result = tracker.interpret_line("G81 X2 Y-3 Z-4 R1").unwrap();
    assert_eq!(result.params.x, Some(12.0));
    assert_eq!(result.params.y, Some(7.0));
}

#[test]
fn test_cancel_stops_continuations() {
    let mut tracker = ModalStateTracker::new();
    tracker.interpret_line("G81 X0 Y0 Z-10 R2 F100");
    assert!(tracker.interpret_line("G80").is_none());
    assert!(tracker.state().active_cycle.is_none());
    assert!(tracker.state().active_cycle_params.is_empty());
    assert!(tracker.interpret_line("X10 Y10").is_none());
}

#[test]
fn test_reference_plane_captured_at_cycle_start() {
    let mut tracker = ModalStateTracker::new();
    tracker.interpret_line("G0 Z10");
    tracker.interpret_line("G81 X0 Y0 Z-1");
    let result = tracker.interpret_line("X4").unwrap();
    assert_eq!(result.params.r, Some(15.0));
}

#[test]
fn test_tapping_program() {
    let program = "\
G90 G17
G0 X0 Y0 Z5
G84 X10 Y10 Z-8 R2 F125 S500 (M6 tap)
X20
G80
M30";
    let mut tracker = ModalStateTracker::new();
    let results = tracker.interpret_program(program);
    assert_eq!(results.len(), 2);
    for result in &results {
        assert_eq!(result.cycle_type, Some(CycleType::RightTapping));
        assert_eq!(result.params.s, Some(500.0));
        let retract = result.points.last().unwrap();
        assert_eq!(retract.kind, MotionKind::Linear);
        assert_eq!(retract.feed_rate, Some(125.0));
    }
    assert_eq!(results[1].points[0].x, 20.0);
}

#[test]
fn test_round_trip_every_cycle_type() {
    let mut types: Vec<CycleType> = CycleType::STANDARD.to_vec();
    types.push(CycleType::Custom(73));
    types.push(CycleType::Custom(88));

    for cycle_type in types {
        let params = CycleParameters {
            x: Some(12.5),
            y: Some(-7.25),
            z: Some(-15.125),
            r: Some(2.5),
            f: Some(200.0),
            ..Default::default()
        };
        let line = synthesize(cycle_type, &params);

        let mut tracker = ModalStateTracker::new();
        let result = tracker
            .interpret_line(&line)
            .unwrap_or_else(|| panic!("no result for '{}'", line));

        assert!(result.valid, "invalid result for '{}'", line);
        assert_eq!(result.cycle_type, Some(cycle_type), "line '{}'", line);
        assert_close(result.params.x, 12.5);
        assert_close(result.params.y, -7.25);
        assert_close(result.params.z, -15.125);
        assert_close(result.params.r, 2.5);
    }
}

#[test]
fn test_round_trip_family_specific_words() {
    let back_boring = CycleParameters {
        x: Some(4.0),
        y: Some(6.0),
        z: Some(-9.0),
        r: Some(1.5),
        f: Some(80.0),
        i: Some(0.5),
        j: Some(-0.75),
        k: Some(3.25),
        ..Default::default()
    };
    let line = synthesize(CycleType::BackBoring, &back_boring);
    let result = ModalStateTracker::new()
        .interpret_line(&line)
        .unwrap_or_else(|| panic!("no result for '{}'", line));
    assert!(result.valid);
    assert_close(result.params.i, 0.5);
    assert_close(result.params.j, -0.75);
    assert_close(result.params.k, 3.25);
    assert_close(result.params.f, 80.0);

    let tapping = CycleParameters {
        x: Some(10.0),
        y: Some(0.0),
        z: Some(-6.0),
        r: Some(2.0),
        f: Some(125.0),
        s: Some(800.0),
        ..Default::default()
    };
    for cycle_type in [CycleType::RightTapping, CycleType::LeftTapping] {
        let line = synthesize(cycle_type, &tapping);
        let result = ModalStateTracker::new()
            .interpret_line(&line)
            .unwrap_or_else(|| panic!("no result for '{}'", line));
        assert!(result.valid);
        assert_eq!(result.cycle_type, Some(cycle_type));
        assert_close(result.params.s, 800.0);
        assert_close(result.params.f, 125.0);
        assert_eq!(result.params.i, None);
    }
}

proptest! {
    #[test]
    fn prop_tokenize_never_panics(line in "\\PC{0,80}") {
        let _ = tokenize(&line);
    }

    #[test]
    fn prop_tracker_never_panics(lines in proptest::collection::vec("[GXYZRQPF0-9 .+-]{0,24}", 0..20)) {
        let mut tracker = ModalStateTracker::new();
        for line in &lines {
            if let Some(result) = tracker.interpret_line(line) {
                prop_assert!(result.valid || result.points.is_empty());
            }
        }
    }

    #[test]
    fn prop_parameter_values_survive(x in -1000.0f64..1000.0, z in -100.0f64..0.0) {
        let cmd = tokenize(&format!("G81 X{:.3} Z{:.3}", x, z));
        let parsed_x = cmd.get('X').unwrap();
        let parsed_z = cmd.get('Z').unwrap();
        prop_assert!((parsed_x - x).abs() < 1e-3);
        prop_assert!((parsed_z - z).abs() < 1e-3);
    }
}
