use crate::utils;

/// Gravitational constant in simulation units. Two bodies of mass `2e30`
/// placed 200 units apart circle their barycenter at a speed of 30.
pub const GRAVITATIONAL_CONSTANT: f64 = 1.8e-25;

/// Deepest subdivision a quadtree accepts. Queries walk the tree with a stack
/// sized from this bound.
pub const MAX_TREE_DEPTH_LIMIT: u32 = 64;

pub const DEFAULT_SIMULATION_CONFIG: utils::SimulationConfig = utils::SimulationConfig {
    gravitational_constant: GRAVITATIONAL_CONSTANT,
    softening: 5.0,
    theta: 0.5,
    time_scale: 1.0,
    substeps: 4,
    dt: 0.016,
    tree_threshold: 10,
    leaf_capacity: 4,
    max_tree_depth: 24,
    trail_capacity: 100,
    parallel_threshold: 64,
};
