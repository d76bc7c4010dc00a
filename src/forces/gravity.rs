// src/forces/gravity.rs

use crate::models::{Body, PointMass, Vector2};
use crate::spatial::QuadTree;
use crate::utils::SimulationConfig;

/// How the acceleration on a body is evaluated.
#[derive(Debug, Clone, Copy)]
pub enum ForceMode<'a> {
    /// Exact pairwise sum over every other body, O(n) per body.
    Direct,
    /// Barnes-Hut query against a tree built from the same snapshot.
    TreeApproximate(&'a QuadTree),
}

impl ForceMode<'_> {
    pub fn is_tree(&self) -> bool {
        matches!(self, ForceMode::TreeApproximate(_))
    }
}

/// Softened acceleration at `point` caused by a mass `mass` located at `source`.
///
/// The separation is `dist = sqrt(dx² + dy² + ε²)`; the magnitude `G·m / dist²`
/// is applied along `(source - point) / dist`. A zero separation with zero
/// softening has no direction and contributes nothing.
///
/// # Examples
///
/// ```
/// use rs_nbody::forces::point_mass_acceleration;
/// use rs_nbody::models::Vector2;
///
/// let a = point_mass_acceleration(Vector2::ZERO, Vector2::new(2.0, 0.0), 8.0, 1.0, 0.0);
/// assert_eq!(a, Vector2::new(2.0, 0.0));
///
/// // Softening weakens the pull at short range.
/// let softened = point_mass_acceleration(Vector2::ZERO, Vector2::new(2.0, 0.0), 8.0, 1.0, 1.0);
/// assert!(softened.x < a.x);
/// ```
pub fn point_mass_acceleration(point: Vector2, source: Vector2, mass: f64, gravitational_constant: f64, softening: f64) -> Vector2 {
    let delta = source - point;
    let dist_sq = delta.magnitude_squared() + softening * softening;
    if dist_sq == 0.0 {
        return Vector2::ZERO;
    }
    let dist = dist_sq.sqrt();
    let magnitude = gravitational_constant * mass / dist_sq;
    delta * (magnitude / dist)
}

/// Gravitational acceleration on `subject` when it sits at `position`.
///
/// `bodies` is the snapshot of the current substep and `subject` is the
/// subject's own entry in it. The subject is skipped by id, so `position` may
/// differ from its snapshot position (as it does for the intermediate
/// Runge-Kutta stages).
///
/// # Arguments
/// * `subject` - Snapshot entry of the body the acceleration acts on
/// * `position` - Where to evaluate the field
/// * `bodies` - Snapshot of every body, including `id`
/// * `mode` - Direct summation or a Barnes-Hut tree over `bodies`
/// * `config` - Supplies `G`, `ε` and `θ`
///
/// # Example
/// ```
/// use rs_nbody::forces::{acceleration_on, ForceMode};
/// use rs_nbody::models::{BodyId, PointMass, Vector2};
/// use rs_nbody::utils::SimulationConfig;
///
/// let config = SimulationConfig { gravitational_constant: 1.0, softening: 0.0, ..Default::default() };
/// let bodies = [
///     PointMass { id: BodyId(0), position: Vector2::new(0.0, 0.0), mass: 1.0 },
///     PointMass { id: BodyId(1), position: Vector2::new(0.0, 3.0), mass: 9.0 },
/// ];
/// let a = acceleration_on(&bodies[0], bodies[0].position, &bodies, &ForceMode::Direct, &config);
/// assert!((a.y - 1.0).abs() < 1e-12);
/// assert_eq!(a.x, 0.0);
/// ```
pub fn acceleration_on(subject: &PointMass, position: Vector2, bodies: &[PointMass], mode: &ForceMode, config: &SimulationConfig) -> Vector2 {
    match mode {
        ForceMode::Direct => bodies
            .iter()
            .filter(|other| other.id != subject.id)
            .fold(Vector2::ZERO, |acceleration, other| {
                acceleration + point_mass_acceleration(position, other.position, other.mass, config.gravitational_constant, config.softening)
            }),
        ForceMode::TreeApproximate(tree) => {
            tree.acceleration_at(position, Some(subject), config.theta, config.gravitational_constant, config.softening)
        }
    }
}

/// Total kinetic energy `Σ ½·m·|v|²`.
pub fn kinetic_energy(bodies: &[Body]) -> f64 {
    bodies.iter().map(Body::kinetic_energy).sum()
}

/// Total potential energy `Σ -G·m₁·m₂ / dist` over unique pairs, using the same
/// softened distance as the force so the pair stays consistent.
///
/// # Example
/// ```
/// use rs_nbody::forces::potential_energy;
/// use rs_nbody::models::{Body, BodyParams, Vector2};
///
/// let a = Body::new(0, BodyParams::new(Vector2::new(0.0, 0.0), Vector2::ZERO, 2.0, 1.0), 0).unwrap();
/// let b = Body::new(1, BodyParams::new(Vector2::new(4.0, 0.0), Vector2::ZERO, 3.0, 1.0), 0).unwrap();
/// assert_eq!(potential_energy(&[a, b], 1.0, 0.0), -1.5);
/// ```
pub fn potential_energy(bodies: &[Body], gravitational_constant: f64, softening: f64) -> f64 {
    let mut energy = 0.0;
    for (i, first) in bodies.iter().enumerate() {
        for second in &bodies[i + 1..] {
            let dist = (first.position.distance_squared(&second.position) + softening * softening).sqrt();
            if dist > 0.0 {
                energy -= gravitational_constant * first.mass() * second.mass() / dist;
            }
        }
    }
    energy
}
