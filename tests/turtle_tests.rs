use glam::Vec3;
use symbios_flora::{
    FLOWER_TAG, InterpreterError, LEAF_TAG, TurtleConfig, TurtleInterpreter, TurtleOp, TurtlePose,
};

const EPS: f32 = 1e-4;

fn close(a: Vec3, b: Vec3) -> bool {
    a.distance(b) < EPS
}

#[test]
fn test_forward_only_polyline() {
    let interpreter = TurtleInterpreter::default();
    let skeleton = interpreter.interpret("FFFFF", 1.5, 30.0).unwrap();

    assert_eq!(skeleton.branches.len(), 5);
    for (i, branch) in skeleton.branches.iter().enumerate() {
        assert!((branch.length() - 1.5).abs() < EPS);
        if i > 0 {
            assert_eq!(branch.start, skeleton.branches[i - 1].end, "polyline broken at {i}");
        }
    }
    assert!(close(skeleton.branches[4].end, Vec3::new(0.0, 0.0, 7.5)));
}

#[test]
fn test_rotations_accumulate_in_local_frame() {
    let interpreter = TurtleInterpreter::default();

    // Yaw around up: forward +Z turns to +X.
    let s = interpreter.interpret("F+F", 1.0, 90.0).unwrap();
    assert!(close(s.branches[1].end, Vec3::new(1.0, 0.0, 1.0)));

    // Pitch around left: forward +Z pitches to -Y.
    let s = interpreter.interpret("&F", 1.0, 90.0).unwrap();
    assert!(close(s.branches[0].end, Vec3::new(0.0, -1.0, 0.0)));

    // Roll leaves forward alone but changes what the next yaw does.
    let s = interpreter.interpret("\\F", 1.0, 90.0).unwrap();
    assert!(close(s.branches[0].end, Vec3::Z));
    let s = interpreter.interpret("\\+F", 1.0, 90.0).unwrap();
    assert!(close(s.branches[0].end, Vec3::Y));

    // Two quarter turns compose into a U-turn, same as `|`.
    let a = interpreter.interpret("++F", 1.0, 90.0).unwrap();
    let b = interpreter.interpret("|F", 1.0, 90.0).unwrap();
    assert!(close(a.branches[0].end, Vec3::new(0.0, 0.0, -1.0)));
    assert!(close(a.branches[0].end, b.branches[0].end));
}

#[test]
fn test_push_pop_restores_pose() {
    let interpreter = TurtleInterpreter::default();
    let s = interpreter.interpret("F+[&F/F-F]F", 1.0, 90.0).unwrap();

    assert_eq!(s.branches.len(), 5);
    // The branch after `]` starts where the one before `[` ended and follows the
    // heading set by `+`.
    let before = s.branches[0];
    let after = s.branches[4];
    assert!(close(after.start, before.end));
    assert!(close(after.end, before.end + Vec3::X));
}

#[test]
fn test_unmatched_pop_aborts() {
    let interpreter = TurtleInterpreter::default();
    let err = interpreter.interpret("F[F]]F", 1.0, 25.0).unwrap_err();
    assert_eq!(err, InterpreterError::UnmatchedPop { index: 4 });
}

#[test]
fn test_unclosed_push_policy() {
    let strict = TurtleInterpreter::default();
    assert_eq!(
        strict.interpret("F[[F]", 1.0, 25.0).unwrap_err(),
        InterpreterError::UnclosedPush { open: 1 }
    );

    let mut lenient = TurtleInterpreter::new(TurtleConfig {
        require_balanced: false,
        ..Default::default()
    });
    lenient.populate_standard_symbols();
    let s = lenient.interpret("F[[F]", 1.0, 25.0).unwrap();
    assert_eq!(s.branches.len(), 2);
}

#[test]
fn test_stack_depth_limit() {
    let mut interpreter = TurtleInterpreter::new(TurtleConfig {
        max_stack_depth: 2,
        ..Default::default()
    });
    interpreter.populate_standard_symbols();

    assert!(interpreter.interpret("[[F]]", 1.0, 25.0).is_ok());
    assert_eq!(
        interpreter.interpret("[[[F]]]", 1.0, 25.0).unwrap_err(),
        InterpreterError::StackOverflow {
            index: 2,
            max_depth: 2
        }
    );
}

#[test]
fn test_markers_do_not_move_turtle() {
    let interpreter = TurtleInterpreter::default();
    let s = interpreter.interpret("F!FX!F", 1.0, 25.0).unwrap();

    assert_eq!(s.branches.len(), 3);
    assert_eq!(s.markers.len(), 3);
    assert_eq!(s.markers[0].tag, FLOWER_TAG);
    assert_eq!(s.markers[1].tag, LEAF_TAG);
    assert_eq!(s.markers[2].tag, FLOWER_TAG);
    assert!(close(s.markers[0].position, Vec3::Z));
    assert!(close(s.markers[1].position, Vec3::Z * 2.0));
    assert_eq!(s.markers[1].position, s.markers[2].position);
    assert_eq!(s.markers_tagged(FLOWER_TAG).count(), 2);
    assert!(close(s.branches[2].end, Vec3::Z * 3.0));
}

#[test]
fn test_move_without_branch_and_ignored_symbols() {
    let interpreter = TurtleInterpreter::default();
    let s = interpreter.interpret("fAF{L}SfF", 1.0, 25.0).unwrap();
    assert_eq!(s.branches.len(), 2);
    assert!(close(s.branches[0].start, Vec3::Z));
    assert!(close(s.branches[1].start, Vec3::Z * 3.0));
}

#[test]
fn test_custom_op_map() {
    let mut interpreter = TurtleInterpreter::new(TurtleConfig::default());
    interpreter.set_op('G', TurtleOp::Draw);
    interpreter.set_op('*', TurtleOp::Marker('*'));

    // Standard symbols are unmapped here.
    assert_eq!(interpreter.op('F'), TurtleOp::Ignore);
    let s = interpreter.interpret("FG*G", 1.0, 25.0).unwrap();
    assert_eq!(s.branches.len(), 2);
    assert_eq!(s.markers[0].tag, '*');
}

#[test]
fn test_compile_resolves_once() {
    let interpreter = TurtleInterpreter::default();
    let program = interpreter.compile("F[+!]∧A");
    assert_eq!(
        program,
        vec![
            TurtleOp::Draw,
            TurtleOp::Push,
            TurtleOp::Yaw(1.0),
            TurtleOp::Marker('!'),
            TurtleOp::Pop,
            TurtleOp::Pitch(-1.0),
            TurtleOp::Ignore,
        ]
    );
    let s = interpreter.run(&program, 1.0, 25.0).unwrap();
    assert_eq!(s.branches.len(), 1);
    assert_eq!(s.markers.len(), 1);
}

#[test]
fn test_frame_stays_orthonormal() {
    let mut pose = TurtlePose::default();
    for i in 0..10_000 {
        let a = 0.37 + i as f32 * 1e-3;
        pose.yaw(a);
        pose.pitch(-a * 0.5);
        pose.roll(a * 1.3);
    }

    let (f, u, l) = (pose.forward(), pose.up(), pose.left());
    for v in [f, u, l] {
        assert!((v.length() - 1.0).abs() < 1e-4);
    }
    assert!(f.dot(u).abs() < 1e-4);
    assert!(f.dot(l).abs() < 1e-4);
    assert!(u.dot(l).abs() < 1e-4);
}

#[test]
fn test_config_deserializes_with_defaults() {
    let config: TurtleConfig = serde_json::from_str(r#"{ "max_stack_depth": 16 }"#).unwrap();
    assert_eq!(config.max_stack_depth, 16);
    assert!(config.require_balanced);
}
