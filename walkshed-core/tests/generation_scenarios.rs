//! end-to-end generation scenarios: seeded walkable-graph discovery over
//! composed environments, followed by pathfinding over the result.

use walkshed_core::algorithm::generator::{generate_graph, GeneratorConfig};
use walkshed_core::algorithm::search::shortest_path;
use walkshed_core::model::geometry::{Scene, Vec3};
use walkshed_core::testing;

/// two levels two meters apart, joined by a 30 degree ramp. slope limits
/// of 35 degrees let the walk use the ramp and nothing else.
#[test]
fn test_two_levels_joined_by_ramp() {
    testing::init_test_logging();
    let ramp_run = 2.0 * 3.0f32.sqrt(); // rise 2 at 30 degrees
    let ramp_start = 0.4;
    let ramp_end = ramp_start + ramp_run;
    let lower = testing::ramp_mesh(-4.4, ramp_start, 0.0, 0.0, -2.4, 2.4);
    let ramp = testing::ramp_mesh(ramp_start, ramp_end, 0.0, 2.0, -2.4, 2.4);
    let upper = testing::ramp_mesh(ramp_end, 8.4, 2.0, 2.0, -2.4, 2.4);
    let scene = Scene::new(vec![lower, ramp, upper]).unwrap();

    let config = GeneratorConfig {
        start: Vec3::new(-2.0, 0.0, 1.0),
        spacing: Vec3::new(1.0, 1.0, 1.0),
        up_step: 0.7,
        down_step: 0.7,
        up_slope: 35.0,
        down_slope: 35.0,
        ..GeneratorConfig::default()
    };
    let graph = generate_graph(&scene, &config, None).unwrap();

    // the graph spans both levels
    let lowest = graph
        .nodes()
        .iter()
        .map(|n| n.position.z)
        .fold(f32::INFINITY, f32::min);
    let highest = graph
        .nodes()
        .iter()
        .map(|n| n.position.z)
        .fold(f32::NEG_INFINITY, f32::max);
    assert!(lowest.abs() < 1e-3, "lower level missing: {}", lowest);
    assert!((highest - 2.0).abs() < 1e-3, "upper level missing: {}", highest);

    // a route from the lower level to the upper level follows the ramp
    let start = graph
        .id_from_point(&Vec3::new(-4.0, 0.0, 0.0))
        .expect("node on the lower level");
    let end = graph
        .nodes()
        .iter()
        .find(|n| (n.position.z - 2.0).abs() < 1e-3 && n.position.x > 7.0)
        .expect("node deep on the upper level")
        .id;
    let path = shortest_path(&graph, start, end, "")
        .unwrap()
        .expect("levels are connected via the ramp");
    let on_ramp = path
        .node_ids()
        .filter(|id| {
            let z = graph.node_from_id(*id).unwrap().position.z;
            z > 0.2 && z < 1.8
        })
        .count();
    assert!(on_ramp >= 2, "route should climb the ramp, got {} ramp nodes", on_ramp);
}

/// a staircase with 0.15 m risers: a 0.2 m step limit climbs it, a 0.1 m
/// limit strands the walk on the first tread
#[test]
fn test_staircase_step_height_gate() {
    testing::init_test_logging();
    let scene = Scene::from_mesh(testing::staircase_mesh(6, 1.0, 0.15, -1.4, 1.4)).unwrap();
    let base_config = GeneratorConfig {
        start: Vec3::new(0.5, 0.0, 1.0),
        spacing: Vec3::new(1.0, 1.0, 1.0),
        up_slope: 45.0,
        down_slope: 45.0,
        ..GeneratorConfig::default()
    };

    // up_step above the riser height: every tread is reached
    let climbing = GeneratorConfig {
        up_step: 0.2,
        down_step: 0.2,
        ..base_config.clone()
    };
    let graph = generate_graph(&scene, &climbing, None).unwrap();
    let top = graph
        .nodes()
        .iter()
        .map(|n| n.position.z)
        .fold(f32::NEG_INFINITY, f32::max);
    assert!((top - 0.75).abs() < 1e-3, "top tread not reached: {}", top);

    let bottom = graph.id_from_point(&Vec3::new(0.5, 0.0, 0.0)).unwrap();
    let summit = graph.id_from_point(&Vec3::new(5.5, 0.0, 0.75)).unwrap();
    let path = shortest_path(&graph, bottom, summit, "").unwrap();
    assert!(path.is_some(), "staircase should be walkable end to end");

    // up_step below the riser height: no vertical edges at all
    let stranded = GeneratorConfig {
        up_step: 0.1,
        down_step: 0.1,
        ..base_config
    };
    let graph = generate_graph(&scene, &stranded, None).unwrap();
    for node in graph.nodes() {
        assert!(
            node.position.z.abs() < 1e-3,
            "node {} climbed a riser it should not step over",
            node
        );
    }
}

/// the generator only accepts seeds with ground below them
#[test]
fn test_seed_over_void_is_no_ground() {
    use walkshed_core::algorithm::generator::GeneratorError;
    let scene = Scene::from_mesh(testing::plane_mesh(-5.0, 5.0, 0.0)).unwrap();
    let config = GeneratorConfig {
        start: Vec3::new(0.0, 0.0, -1.0), // below the plane, nothing underneath
        ..GeneratorConfig::default()
    };
    assert!(matches!(
        generate_graph(&scene, &config, None),
        Err(GeneratorError::NoGround(_))
    ));
}
