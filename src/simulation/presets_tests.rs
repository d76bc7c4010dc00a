use approx::{assert_abs_diff_eq, assert_relative_eq};
use crate::forces::{acceleration_on, ForceMode};
use crate::models::{BodyId, PointMass, Vector2};
use crate::simulation::Preset;
use crate::utils::{SimulationConfig, SimulationError};

fn point_masses(preset: Preset, config: &SimulationConfig) -> Vec<PointMass> {
    preset
        .bodies(config)
        .iter()
        .enumerate()
        .map(|(i, params)| PointMass { id: BodyId(i as u64), position: params.position, mass: params.mass })
        .collect()
}

#[test]
fn test_every_preset_parses_from_its_key() {
    for preset in Preset::ALL {
        assert_eq!(preset.key().parse::<Preset>().unwrap(), preset);
        assert_eq!(preset.to_string().to_uppercase().parse::<Preset>().unwrap(), preset);
    }
}

#[test]
fn test_aliases() {
    assert_eq!("two-body".parse::<Preset>().unwrap(), Preset::Binary);
    assert_eq!("three_body".parse::<Preset>().unwrap(), Preset::FigureEight);
    assert_eq!("  Galaxy ".parse::<Preset>().unwrap(), Preset::Spiral);
    assert_eq!("symmetric ring".parse::<Preset>().unwrap(), Preset::Ring);
}

#[test]
fn test_unknown_preset_keeps_the_name() {
    assert_eq!("pinwheel".parse::<Preset>(), Err(SimulationError::UnknownPreset("pinwheel".to_string())));
}

#[test]
fn test_every_preset_is_valid_and_deterministic() {
    let config = SimulationConfig::default();
    for preset in Preset::ALL {
        let first = preset.bodies(&config);
        assert!(!first.is_empty(), "{} is empty", preset);
        assert!(first.iter().all(|params| params.validate().is_ok()), "{} has an invalid body", preset);
        assert_eq!(first, preset.bodies(&config), "{} is not deterministic", preset);
    }
}

#[test]
fn test_binary_seed() {
    let bodies = Preset::Binary.bodies(&SimulationConfig::default());
    assert_eq!(bodies.len(), 2);
    assert_eq!(bodies[0].position, Vector2::new(-100.0, 0.0));
    assert_eq!(bodies[1].position, Vector2::new(100.0, 0.0));
    assert_eq!(bodies[0].velocity.magnitude(), 30.0);
    assert_eq!(bodies[1].velocity.magnitude(), 30.0);
    assert_eq!(bodies[0].velocity, -bodies[1].velocity);
    assert_eq!(bodies.iter().map(|b| b.mass).sum::<f64>(), 4.0e30);
}

#[test]
fn test_binary_speed_balances_gravity_at_default_g() {
    let config = SimulationConfig::default();
    let bodies = Preset::Binary.bodies(&config);
    // Each body circles the barycenter at radius 100 under the pull of the other at 200.
    let pull = config.gravitational_constant * bodies[1].mass / (200.0 * 200.0);
    assert_relative_eq!(bodies[0].velocity.magnitude_squared() / 100.0, pull, max_relative = 1e-12);
}

#[test]
fn test_figure_eight_has_no_net_momentum() {
    let bodies = Preset::FigureEight.bodies(&SimulationConfig::default());
    assert_eq!(bodies.len(), 3);
    let momentum = bodies.iter().fold(Vector2::ZERO, |sum, b| sum + b.velocity * b.mass);
    let scale = bodies[2].velocity.magnitude() * bodies[2].mass;
    assert_abs_diff_eq!(momentum.magnitude() / scale, 0.0, epsilon = 1e-12);
}

#[test]
fn test_solar_planets_on_circular_orbits() {
    let config = SimulationConfig::default();
    let bodies = Preset::Solar.bodies(&config);
    let star = bodies[0];
    for planet in &bodies[1..] {
        let radius = planet.position.magnitude();
        let expected = (config.gravitational_constant * star.mass / radius).sqrt();
        assert_relative_eq!(planet.velocity.magnitude(), expected, max_relative = 1e-12);
        assert_abs_diff_eq!(planet.velocity.dot(&planet.position), 0.0, epsilon = 1e-6);
    }
}

#[test]
fn test_ring_members_feel_their_centripetal_acceleration() {
    let config = SimulationConfig { softening: 0.0, ..Default::default() };
    let seeds = Preset::Ring.bodies(&config);
    let masses = point_masses(Preset::Ring, &config);
    assert_eq!(seeds.len(), 13);

    for (i, member) in seeds.iter().enumerate().skip(1) {
        let acceleration = acceleration_on(&masses[i], member.position, &masses, &ForceMode::Direct, &config);
        let radius = member.position.magnitude();
        let centripetal = member.velocity.magnitude_squared() / radius;
        assert_relative_eq!(acceleration.magnitude(), centripetal, max_relative = 1e-9);
        // Pointing at the center.
        assert_relative_eq!(acceleration.normalize().dot(&member.position.normalize()), -1.0, max_relative = 1e-9);
    }
}

#[test]
fn test_spiral_arms() {
    let bodies = Preset::Spiral.bodies(&SimulationConfig::default());
    assert_eq!(bodies.len(), 201);
    for arm_body in &bodies[1..] {
        let radius = arm_body.position.magnitude();
        assert!((40.0..=300.0).contains(&radius), "radius {} outside the disc", radius);
        assert!(arm_body.mass < bodies[0].mass);
    }
}
