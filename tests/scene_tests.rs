use glam::Vec3;
use symbios_flora::presets::{self, BLOSSOM, BUSH};
use symbios_flora::{
    AssetError, BaseMesh, ConfigError, Face, FloraError, Grammar, InterpreterError,
    MarkerMeshBuilder, PlantParams, PlantScene, Rule, TurtleInterpreter,
};

fn make_triangle() -> BaseMesh {
    BaseMesh::new(
        vec![
            Vec3::new(0.1, 0.0, 0.0),
            Vec3::new(0.0, 0.1, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
        ],
        vec![Vec3::X],
        vec![Face::new([1, 2, 3], [1, 1, 1])],
    )
    .unwrap()
}

fn blossom_scene(seed: u64) -> PlantScene {
    PlantScene::new(BLOSSOM.grammar().unwrap())
        .with_branch_mesh(make_triangle())
        .with_marker_mesh(make_triangle())
        .with_params(shallow(BLOSSOM.params(seed), 3))
}

// The tuned depths are slow to bake in tests.
fn shallow(params: PlantParams, iterations: u32) -> PlantParams {
    PlantParams {
        iterations,
        ..params
    }
}

#[test]
fn test_full_pipeline() {
    let mut scene = blossom_scene(3);
    let geometry = scene.regenerate().unwrap();

    let branches = geometry.branches.as_ref().unwrap();
    assert_eq!(branches.triangle_count(), geometry.skeleton.branches.len());
    let markers = geometry.markers.as_ref().unwrap();
    assert!(markers.triangle_count() <= geometry.skeleton.markers_tagged('!').count());
    assert!(scene.geometry().is_some());
    assert_eq!(scene.grammar().current(), BLOSSOM.grammar().unwrap().rewrite(3));
}

#[test]
fn test_regenerate_is_idempotent_for_a_seed() {
    let mut a = blossom_scene(11);
    let mut b = blossom_scene(11);
    let ga = a.regenerate().unwrap().clone();
    let gb = b.regenerate().unwrap().clone();
    assert_eq!(ga.skeleton, gb.skeleton);
    assert_eq!(ga.branches, gb.branches);
    assert_eq!(ga.markers, gb.markers);

    // Running again on the same scene rebuilds the same buffers.
    let again = a.regenerate().unwrap();
    assert_eq!(again.markers, ga.markers);
}

#[test]
fn test_all_markers_kept_in_scene() {
    let mut scene = blossom_scene(0)
        .with_marker_builder(MarkerMeshBuilder::new().with_keep_percent(100));
    let geometry = scene.regenerate().unwrap();
    assert_eq!(
        geometry.markers.as_ref().unwrap().triangle_count(),
        geometry.skeleton.markers_tagged('!').count()
    );
}

#[test]
fn test_missing_mesh_only_fails_its_bake() {
    let mut scene = PlantScene::new(BLOSSOM.grammar().unwrap())
        .with_branch_mesh(make_triangle())
        .with_params(shallow(BLOSSOM.params(0), 2));
    let geometry = scene.regenerate().unwrap();

    assert!(geometry.branches.is_ok());
    assert_eq!(
        geometry.markers.clone().unwrap_err(),
        AssetError::NotLoaded("marker")
    );
}

#[test]
fn test_invalid_params_abort() {
    let mut scene = blossom_scene(0);
    scene.regenerate().unwrap();

    scene.set_params(PlantParams {
        step: 0.0,
        ..Default::default()
    });
    assert!(matches!(
        scene.regenerate(),
        Err(FloraError::Config(ConfigError::InvalidParameter { name: "step", .. }))
    ));
    assert!(scene.geometry().is_none(), "stale geometry kept after failure");

    scene.set_params(PlantParams {
        iterations: 9,
        ..Default::default()
    });
    assert!(matches!(
        scene.regenerate(),
        Err(FloraError::Config(ConfigError::InvalidParameter { name: "iterations", .. }))
    ));

    scene.set_params(PlantParams {
        angle: f32::NAN,
        ..Default::default()
    });
    assert!(scene.regenerate().is_err());
}

#[test]
fn test_unbalanced_grammar_reports_interpreter_error() {
    let grammar = Grammar::load(vec![Rule::new('A', "F]A")]).unwrap();
    let mut scene = PlantScene::new(grammar)
        .with_interpreter(TurtleInterpreter::default())
        .with_branch_mesh(make_triangle())
        .with_params(PlantParams {
            iterations: 2,
            ..Default::default()
        });
    assert_eq!(
        scene.regenerate().unwrap_err(),
        FloraError::Interpreter(InterpreterError::UnmatchedPop { index: 1 })
    );
}

#[test]
fn test_scene_params_follow_grammar_defaults() {
    let scene = PlantScene::new(BUSH.grammar().unwrap());
    assert_eq!(scene.params().step, 1.0);
    assert_eq!(scene.params().angle, 30.0);
}

#[test]
fn test_presets_interpret_cleanly() {
    let interpreter = TurtleInterpreter::default();
    for preset in presets::ALL {
        let grammar = preset.grammar().unwrap();
        let symbols = grammar.rewrite(preset.iterations.min(3));
        let skeleton = interpreter
            .interpret(&symbols, grammar.default_step(), grammar.default_angle())
            .unwrap_or_else(|e| panic!("preset {} failed: {e}", preset.name));
        assert!(!skeleton.branches.is_empty(), "preset {} drew nothing", preset.name);
    }
    assert_eq!(presets::by_name("blossom").unwrap().iterations, 7);
    assert!(presets::by_name("cactus").is_none());
}

#[test]
fn test_params_deserialize_with_defaults() {
    let params: PlantParams = serde_json::from_str(r#"{ "iterations": 4, "seed": 9 }"#).unwrap();
    assert_eq!(params.iterations, 4);
    assert_eq!(params.seed, 9);
    assert_eq!(params.step, 2.0);
    assert_eq!(params.angle, 22.5);
    assert!(params.validate().is_ok());
}
