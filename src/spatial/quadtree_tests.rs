use approx::assert_relative_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use crate::models::{BodyId, PointMass, Vector2};
use crate::spatial::{NodeKind, QuadTree, Quadrant, Rect};
use crate::utils::{SimulationError, MAX_TREE_DEPTH_LIMIT};

fn scattered_bodies(count: u64, seed: u64, extent: f64) -> Vec<PointMass> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|i| PointMass {
            id: BodyId(i),
            position: Vector2::new(rng.random_range(-extent..extent), rng.random_range(-extent..extent)),
            mass: rng.random_range(0.5..5.0),
        })
        .collect()
}

fn assert_node_invariants(tree: &QuadTree, index: usize) -> (f64, usize) {
    let node = tree.node(index).expect("node index in range");
    let (mass, count) = match node.kind() {
        NodeKind::Leaf { bodies } => {
            for body in bodies {
                assert!(node.boundary().contains(body.position), "body outside its leaf boundary");
            }
            (bodies.iter().map(|b| b.mass).sum::<f64>(), bodies.len())
        }
        NodeKind::Internal { children } => {
            for (quadrant, &child) in Quadrant::ALL.iter().zip(children.iter()) {
                let child_node = tree.node(child).unwrap();
                assert_eq!(child_node.boundary(), node.boundary().child(*quadrant));
                assert_eq!(child_node.depth(), node.depth() + 1);
            }
            children.iter().fold((0.0, 0), |(m, c), &child| {
                let (child_mass, child_count) = assert_node_invariants(tree, child);
                (m + child_mass, c + child_count)
            })
        }
    };
    assert_relative_eq!(node.mass(), mass, max_relative = 1e-12);
    (mass, count)
}

#[test]
fn test_rect_quadrants() {
    let rect = Rect::new(-1.0, -1.0, 2.0, 2.0);
    assert_eq!(rect.quadrant_of(Vector2::new(0.5, 0.5)), Quadrant::NorthEast);
    assert_eq!(rect.quadrant_of(Vector2::new(-0.5, 0.5)), Quadrant::NorthWest);
    assert_eq!(rect.quadrant_of(Vector2::new(0.5, -0.5)), Quadrant::SouthEast);
    assert_eq!(rect.quadrant_of(Vector2::new(-0.5, -0.5)), Quadrant::SouthWest);
    // The center lines belong to the north-east side.
    assert_eq!(rect.quadrant_of(Vector2::ZERO), Quadrant::NorthEast);
    assert!(rect.child(Quadrant::NorthEast).contains(Vector2::ZERO));
}

#[test]
fn test_bounding_square() {
    assert!(Rect::bounding_square(Vec::new(), 0.1).is_none());
    assert!(Rect::bounding_square(vec![Vector2::new(f64::NAN, 0.0)], 0.1).is_none());

    let lone = Rect::bounding_square(vec![Vector2::new(3.0, 4.0)], 0.1).unwrap();
    assert!(lone.width > 0.0);
    assert!(lone.contains(Vector2::new(3.0, 4.0)));
}

#[test]
fn test_zero_capacity_is_rejected() {
    let result = QuadTree::new(Rect::new(0.0, 0.0, 1.0, 1.0), 0);
    assert!(matches!(result, Err(SimulationError::InvalidCapacity)));
}

#[test]
fn test_insert_outside_boundary_fails() {
    let mut tree = QuadTree::new(Rect::new(0.0, 0.0, 10.0, 10.0), 4).unwrap();
    let outside = PointMass { id: BodyId(0), position: Vector2::new(11.0, 5.0), mass: 1.0 };
    let nan = PointMass { id: BodyId(1), position: Vector2::new(f64::NAN, 5.0), mass: 1.0 };
    assert!(!tree.insert(outside));
    assert!(!tree.insert(nan));
    assert_eq!(tree.body_count(), 0);
    assert_eq!(tree.total_mass(), 0.0);
}

#[test]
fn test_leaf_splits_on_capacity_overflow() {
    let mut tree = QuadTree::new(Rect::new(0.0, 0.0, 4.0, 4.0), 4).unwrap();
    let corners = [(1.0, 1.0), (3.0, 1.0), (1.0, 3.0), (3.0, 3.0)];
    for (i, (x, y)) in corners.iter().enumerate() {
        assert!(tree.insert(PointMass { id: BodyId(i as u64), position: Vector2::new(*x, *y), mass: 1.0 }));
    }
    assert!(tree.root().is_leaf(), "four bodies fit in one leaf");
    assert_eq!(tree.root().bodies().len(), 4);

    assert!(tree.insert(PointMass { id: BodyId(4), position: Vector2::new(3.5, 3.5), mass: 1.0 }));
    assert!(!tree.root().is_leaf(), "the fifth body splits the root");
    assert!(tree.root().bodies().is_empty());
    assert_eq!(tree.node_count(), 5);

    let north_east = tree.node(tree.root().children().unwrap()[Quadrant::NorthEast.index()]).unwrap();
    assert_eq!(north_east.bodies().len(), 2);
    assert_relative_eq!(north_east.center_of_mass().x, 3.25);
}

#[test]
fn test_mass_conservation() {
    let bodies = scattered_bodies(200, 7, 500.0);
    let expected: f64 = bodies.iter().map(|b| b.mass).sum();
    let tree = QuadTree::build(Rect::new(-500.0, -500.0, 1000.0, 1000.0), 4, &bodies).unwrap();

    assert_eq!(tree.body_count(), 200);
    assert_relative_eq!(tree.total_mass(), expected, max_relative = 1e-12);
    let (mass, count) = assert_node_invariants(&tree, 0);
    assert_eq!(count, 200);
    assert_relative_eq!(mass, expected, max_relative = 1e-12);
}

#[test]
fn test_center_of_mass() {
    let bodies = [
        PointMass { id: BodyId(0), position: Vector2::new(-10.0, 0.0), mass: 1.0 },
        PointMass { id: BodyId(1), position: Vector2::new(10.0, 0.0), mass: 3.0 },
        PointMass { id: BodyId(2), position: Vector2::new(0.0, 8.0), mass: 4.0 },
    ];
    let tree = QuadTree::build(Rect::new(-16.0, -16.0, 32.0, 32.0), 1, &bodies).unwrap();
    let com = tree.center_of_mass();
    assert_relative_eq!(com.x, 20.0 / 8.0, max_relative = 1e-12);
    assert_relative_eq!(com.y, 32.0 / 8.0, max_relative = 1e-12);
}

#[test]
fn test_coincident_bodies_stop_at_max_depth() {
    let mut tree = QuadTree::with_max_depth(Rect::new(0.0, 0.0, 1.0, 1.0), 1, 6).unwrap();
    for i in 0..20 {
        assert!(tree.insert(PointMass { id: BodyId(i), position: Vector2::new(0.3, 0.3), mass: 1.0 }));
    }
    assert_eq!(tree.depth(), 6);
    assert_eq!(tree.body_count(), 20);
    assert_relative_eq!(tree.total_mass(), 20.0);
    assert_node_invariants(&tree, 0);
}

#[test]
fn test_rebuild_reuses_tree() {
    let mut tree = QuadTree::new(Rect::new(0.0, 0.0, 1.0, 1.0), 4).unwrap();
    let first = scattered_bodies(50, 1, 100.0);
    let rejected = tree.rebuild(Rect::new(-100.0, -100.0, 200.0, 200.0), &first);
    assert_eq!(rejected, 0);
    assert_eq!(tree.body_count(), 50);

    let second = scattered_bodies(3, 2, 1.0);
    let rejected = tree.rebuild(Rect::new(-0.5, -0.5, 1.0, 1.0), &second);
    assert_eq!(tree.body_count() + rejected, 3);
    assert_eq!(tree.boundary(), Rect::new(-0.5, -0.5, 1.0, 1.0));
    assert!(tree.root().is_leaf());
}

#[test]
fn test_far_cluster_is_approximated_closely() {
    // A tight cluster seen from far away behaves like a point mass.
    let mut bodies = scattered_bodies(20, 11, 5.0);
    let far_point = Vector2::new(1000.0, 0.0);
    let observer = PointMass { id: BodyId(99), position: far_point, mass: 1.0 };
    bodies.push(observer);
    let tree = QuadTree::build(Rect::bounding_square(bodies.iter().map(|b| b.position), 0.05).unwrap(), 4, &bodies).unwrap();

    let exact = tree.acceleration_at(far_point, Some(&observer), 0.0, 1.0, 0.0);
    let approximate = tree.acceleration_at(far_point, Some(&observer), 0.5, 1.0, 0.0);
    assert_relative_eq!(approximate.x, exact.x, max_relative = 1e-2);
    assert!((approximate.y - exact.y).abs() < 1e-2 * exact.magnitude());
}

#[test]
fn test_excluded_body_exerts_no_force() {
    let bodies = [PointMass { id: BodyId(0), position: Vector2::new(1.0, 1.0), mass: 10.0 }];
    let tree = QuadTree::build(Rect::new(0.0, 0.0, 2.0, 2.0), 4, &bodies).unwrap();
    let on_self = tree.acceleration_at(Vector2::new(1.0, 1.0), Some(&bodies[0]), 0.5, 1.0, 0.1);
    assert_eq!(on_self, Vector2::ZERO);
    let on_other = tree.acceleration_at(Vector2::new(0.0, 1.0), None, 0.5, 1.0, 0.0);
    assert_relative_eq!(on_other.x, 10.0, max_relative = 1e-12);
}

#[test]
fn test_depth_above_limit_is_rejected() {
    let boundary = Rect::new(0.0, 0.0, 1.0, 1.0);
    assert_eq!(
        QuadTree::with_max_depth(boundary, 4, MAX_TREE_DEPTH_LIMIT + 1).err(),
        Some(SimulationError::InvalidTreeDepth)
    );
    assert!(QuadTree::with_max_depth(boundary, 4, MAX_TREE_DEPTH_LIMIT).is_ok());
}

#[test]
fn test_query_through_deepest_tree() {
    let bodies = [
        PointMass { id: BodyId(0), position: Vector2::new(0.3, 0.3), mass: 2.0 },
        PointMass { id: BodyId(1), position: Vector2::new(0.3, 0.3), mass: 3.0 },
        PointMass { id: BodyId(2), position: Vector2::new(0.7, 0.2), mass: 1.0 },
    ];
    let mut tree = QuadTree::with_max_depth(Rect::new(0.0, 0.0, 1.0, 1.0), 1, MAX_TREE_DEPTH_LIMIT).unwrap();
    assert_eq!(tree.rebuild(Rect::new(0.0, 0.0, 1.0, 1.0), &bodies), 0);
    assert_eq!(tree.depth(), MAX_TREE_DEPTH_LIMIT);

    let point = Vector2::new(0.9, 0.9);
    let expected = bodies.iter().fold(Vector2::ZERO, |sum, body| {
        sum + crate::forces::point_mass_acceleration(point, body.position, body.mass, 1.0, 0.0)
    });
    let walked = tree.acceleration_at(point, None, 0.0, 1.0, 0.0);
    assert_relative_eq!(walked.x, expected.x, max_relative = 1e-12);
    assert_relative_eq!(walked.y, expected.y, max_relative = 1e-12);
}

#[test]
fn test_cell_of_excluded_body_is_opened_from_afar() {
    // A Runge-Kutta stage can move the query point far from the body's own
    // cell. That cell must still be opened so the body does not pull itself.
    let subject = PointMass { id: BodyId(0), position: Vector2::new(50.0, 50.0), mass: 1.0e6 };
    let mut bodies = vec![subject];
    let neighbours = [(49.0, 49.0), (51.0, 49.0), (49.0, 51.0), (51.0, 51.0), (50.0, 48.0), (48.0, 50.0), (52.0, 50.0)];
    for (i, (x, y)) in neighbours.into_iter().enumerate() {
        bodies.push(PointMass { id: BodyId(i as u64 + 1), position: Vector2::new(x, y), mass: 1.0 });
    }
    let tree = QuadTree::build(Rect::new(-100.0, -100.0, 200.0, 200.0), 1, &bodies).unwrap();

    let point = Vector2::new(-90.0, -90.0);
    let exact = tree.acceleration_at(point, Some(&subject), 0.0, 1.0, 0.0);
    let coarse = tree.acceleration_at(point, Some(&subject), 1.0, 1.0, 0.0);
    assert_relative_eq!(coarse.x, exact.x, max_relative = 1e-2);
    assert_relative_eq!(coarse.y, exact.y, max_relative = 1e-2);
    // Only the seven unit masses, about 200 units away.
    assert!(coarse.magnitude() < 1e-3, "subject pulled on itself: {:?}", coarse);
}
