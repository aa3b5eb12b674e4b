use cyclekit_core::MotionKind;
use cyclekit_designer::{
    generate, ContourGenerator, CutDirection, DesignElement, Geometry, OffsetSide, Point,
    ToolpathError, ToolpathSettings,
};
use proptest::prelude::*;

fn settings(offset: OffsetSide, tool_diameter: f64) -> ToolpathSettings {
    ToolpathSettings {
        tool_diameter,
        stepdown: 1.0,
        feed_rate: 500.0,
        plunge_rate: 150.0,
        spindle_speed: 10000,
        depth: 2.5,
        safe_z: 5.0,
        offset,
        direction: CutDirection::Climb,
    }
}

#[test]
fn test_narrow_rectangle_inside_offset_is_reported() {
    let element = DesignElement::new(Geometry::Rectangle {
        x: 0.0,
        y: 0.0,
        width: 2.0,
        height: 20.0,
    });
    let program = generate(&element, &settings(OffsetSide::Inside, 5.0));

    let error = program.error.as_deref().expect("offset should be infeasible");
    assert!(error.contains("collapses rectangle width"));
    assert!(program.gcode.contains(&format!("; Error: {}", error)));
    assert!(program.points.is_empty());
    assert!(!program.gcode.contains("G01"));
    assert!(!program.fallback);

    let err = ContourGenerator::new(settings(OffsetSide::Inside, 5.0))
        .build_toolpath(&element)
        .unwrap_err();
    assert!(matches!(err, ToolpathError::OffsetCollapsed { .. }));
}

#[test]
fn test_circle_program() {
    let element = DesignElement::new(Geometry::Circle {
        center: Point::new(10.0, 10.0),
        radius: 5.0,
    });
    let program = generate(&element, &settings(OffsetSide::Outside, 2.0));
    assert!(program.is_ok());

    // Offset radius 6: starts at (16, 10), I is center minus start
    let arcs: Vec<&str> = program
        .gcode
        .lines()
        .filter(|line| line.starts_with("G02"))
        .collect();
    assert_eq!(arcs.len(), 3);
    assert!(arcs
        .iter()
        .all(|line| *line == "G02 X16.000 Y10.000 I-6.000 J0.000 F500"));

    let plunges: Vec<&str> = program
        .gcode
        .lines()
        .filter(|line| line.starts_with("G01 Z"))
        .collect();
    assert_eq!(
        plunges,
        vec!["G01 Z-1.000 F150", "G01 Z-2.000 F150", "G01 Z-2.500 F150"]
    );
}

#[test]
fn test_conventional_circle_uses_ccw_arc() {
    let element = DesignElement::new(Geometry::Circle {
        center: Point::new(0.0, 0.0),
        radius: 5.0,
    });
    let mut conventional = settings(OffsetSide::None, 2.0);
    conventional.direction = CutDirection::Conventional;
    let program = generate(&element, &conventional);
    assert!(program.gcode.contains("G03 X5.000 Y0.000 I-5.000 J0.000"));
    assert!(!program.gcode.contains("G02 "));
}

#[test]
fn test_rectangle_walk_order() {
    let element = DesignElement::new(Geometry::Rectangle {
        x: 0.0,
        y: 0.0,
        width: 20.0,
        height: 10.0,
    });
    let mut single = settings(OffsetSide::Inside, 2.0);
    single.depth = 1.0;

    let climb = generate(&element, &single);
    let cuts: Vec<&str> = climb
        .gcode
        .lines()
        .filter(|line| line.starts_with("G01 X"))
        .collect();
    assert_eq!(
        cuts,
        vec![
            "G01 X19.000 Y1.000 F500",
            "G01 X19.000 Y9.000 F500",
            "G01 X1.000 Y9.000 F500",
            "G01 X1.000 Y1.000 F500",
        ]
    );

    single.direction = CutDirection::Conventional;
    let conventional = generate(&element, &single);
    let cuts: Vec<&str> = conventional
        .gcode
        .lines()
        .filter(|line| line.starts_with("G01 X"))
        .collect();
    assert_eq!(cuts[0], "G01 X1.000 Y9.000 F500");
    assert_eq!(cuts[3], "G01 X1.000 Y1.000 F500");
}

#[test]
fn test_intrinsic_depth_limits_cut() {
    let element = DesignElement::new(Geometry::Rectangle {
        x: 0.0,
        y: 0.0,
        width: 10.0,
        height: 10.0,
    })
    .with_depth(1.5);
    let program = generate(&element, &settings(OffsetSide::Outside, 3.0));
    let deepest = program
        .points
        .iter()
        .map(|p| p.z)
        .fold(f64::INFINITY, f64::min);
    assert_eq!(deepest, -1.5);
}

#[test]
fn test_open_path_falls_back_to_bounding_box() {
    let element = DesignElement::new(Geometry::Path {
        points: vec![Point::new(0.0, 0.0), Point::new(8.0, 3.0), Point::new(4.0, 6.0)],
        closed: false,
    });
    let program = generate(&element, &settings(OffsetSide::None, 3.0));
    assert!(program.is_ok());
    assert!(program.fallback);
    assert!(program.gcode.contains("G01 X8.000 Y0.000"));
    assert!(program.gcode.contains("G01 X8.000 Y6.000"));
}

#[test]
fn test_polygon_program() {
    let element = DesignElement::new(Geometry::Path {
        points: vec![
            Point::new(0.0, 0.0),
            Point::new(30.0, 0.0),
            Point::new(30.0, 20.0),
            Point::new(0.0, 20.0),
        ],
        closed: true,
    });
    let program = generate(&element, &settings(OffsetSide::Inside, 4.0));
    assert!(program.is_ok());
    assert!(!program.fallback);

    let cut_points: Vec<_> = program
        .points
        .iter()
        .filter(|p| p.kind == MotionKind::Linear && p.z < 0.0)
        .collect();
    assert!(!cut_points.is_empty());
    for p in cut_points {
        assert!(p.x >= 2.0 - 1e-6 && p.x <= 28.0 + 1e-6);
        assert!(p.y >= 2.0 - 1e-6 && p.y <= 18.0 + 1e-6);
    }
}

#[test]
fn test_points_match_program_levels() {
    let element = DesignElement::new(Geometry::Circle {
        center: Point::new(0.0, 0.0),
        radius: 4.0,
    });
    let program = generate(&element, &settings(OffsetSide::Inside, 2.0));
    let mut levels: Vec<f64> = program
        .points
        .iter()
        .filter(|p| p.kind == MotionKind::Linear)
        .map(|p| p.z)
        .collect();
    levels.dedup();
    assert_eq!(levels, vec![-1.0, -2.0, -2.5]);
}

proptest! {
    #[test]
    fn prop_rectangles_never_cut_negative_size(
        width in 0.0f64..20.0,
        height in 0.0f64..20.0,
        tool in 0.1f64..10.0,
    ) {
        let element = DesignElement::new(Geometry::Rectangle { x: 0.0, y: 0.0, width, height });
        let program = generate(&element, &settings(OffsetSide::Inside, tool));
        if width <= tool || height <= tool {
            prop_assert!(program.error.is_some());
            prop_assert!(program.points.is_empty());
        } else {
            prop_assert!(program.is_ok());
            for p in &program.points {
                prop_assert!(p.x >= 0.0 && p.x <= width);
                prop_assert!(p.y >= 0.0 && p.y <= height);
            }
        }
    }
}

#[test]
fn test_points_end_at_origin_when_program_does() {
    let element = DesignElement::new(Geometry::Rectangle {
        x: 10.0,
        y: 10.0,
        width: 20.0,
        height: 10.0,
    });

    let program = ContourGenerator::new(settings(OffsetSide::Outside, 2.0)).generate(&element);
    assert!(program.gcode.contains("G00 X0 Y0"));
    let last = program.points[program.points.len() - 1];
    assert_eq!(last.kind, MotionKind::Rapid);
    assert_eq!((last.x, last.y, last.z), (0.0, 0.0, 5.0));

    let program = ContourGenerator::new(settings(OffsetSide::Outside, 2.0))
        .with_return_to_origin(false)
        .generate(&element);
    assert!(!program.gcode.contains("G00 X0 Y0"));
    let last = program.points[program.points.len() - 1];
    assert_eq!(last.kind, MotionKind::Rapid);
    assert_ne!((last.x, last.y), (0.0, 0.0));
}
