use std::f64::consts::{PI, TAU};
use std::fmt;
use std::str::FromStr;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use crate::models::{BodyParams, Color, Vector2};
use crate::utils::{SimulationConfig, SimulationError};

/// Named initial configurations. Every preset is deterministic: loading the
/// same preset under the same configuration always produces the same bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Preset {
    /// Two equal stars on a circular orbit about their barycenter.
    Binary,
    /// Three equal masses chasing each other along a figure-eight.
    FigureEight,
    /// A central star with planets on circular orbits.
    Solar,
    /// Equal masses evenly spaced on a circle around a central mass.
    Ring,
    /// A central mass surrounded by a two-armed spiral of light bodies.
    Spiral,
}

const BINARY_MASS: f64 = 2.0e30;
const STAR_MASS: f64 = 2.0e31;
const SPIRAL_SEED: u64 = 0x5EED_CAFE;
const SPIRAL_BODIES: usize = 200;
const RING_BODIES: usize = 12;

impl Preset {
    pub const ALL: [Preset; 5] = [Preset::Binary, Preset::FigureEight, Preset::Solar, Preset::Ring, Preset::Spiral];

    /// Canonical lookup key.
    pub fn key(&self) -> &'static str {
        match self {
            Preset::Binary => "binary",
            Preset::FigureEight => "figure-eight",
            Preset::Solar => "solar",
            Preset::Ring => "ring",
            Preset::Spiral => "spiral",
        }
    }

    /// Initial bodies of the preset. Orbital speeds are derived from the
    /// gravitational constant of `config`, except for the binary whose
    /// velocities are fixed.
    pub fn bodies(&self, config: &SimulationConfig) -> Vec<BodyParams> {
        let g = config.gravitational_constant;
        match self {
            Preset::Binary => binary(),
            Preset::FigureEight => figure_eight(g),
            Preset::Solar => solar(g),
            Preset::Ring => ring(g),
            Preset::Spiral => spiral(g),
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Preset {
    type Err = SimulationError;

    /// Case-insensitive; spaces and underscores are read as dashes.
    ///
    /// ```
    /// use rs_nbody::simulation::Preset;
    ///
    /// assert_eq!("Figure Eight".parse::<Preset>().unwrap(), Preset::FigureEight);
    /// assert_eq!("star_with_planets".parse::<Preset>().unwrap(), Preset::Solar);
    /// assert!("pinwheel".parse::<Preset>().is_err());
    /// ```
    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let key: String = name
            .trim()
            .chars()
            .map(|c| if c == ' ' || c == '_' { '-' } else { c.to_ascii_lowercase() })
            .collect();
        match key.as_str() {
            "binary" | "two-body" | "binary-star" => Ok(Preset::Binary),
            "figure-eight" | "figure8" | "figure-8" | "three-body" => Ok(Preset::FigureEight),
            "solar" | "solar-system" | "star-with-planets" => Ok(Preset::Solar),
            "ring" | "symmetric-ring" => Ok(Preset::Ring),
            "spiral" | "spiral-arms" | "galaxy" => Ok(Preset::Spiral),
            _ => Err(SimulationError::UnknownPreset(name.to_string())),
        }
    }
}

/// Velocity of a circular orbit of radius `|offset|` around `mass`.
fn circular_velocity(offset: Vector2, central_gm: f64) -> Vector2 {
    let radius = offset.magnitude();
    if radius == 0.0 {
        return Vector2::ZERO;
    }
    offset.normalize().perpendicular() * (central_gm / radius).sqrt()
}

fn binary() -> Vec<BodyParams> {
    vec![
        BodyParams::new(Vector2::new(-100.0, 0.0), Vector2::new(0.0, -30.0), BINARY_MASS, 12.0).with_color(Color::SUN),
        BodyParams::new(Vector2::new(100.0, 0.0), Vector2::new(0.0, 30.0), BINARY_MASS, 12.0).with_color(Color::BLUE),
    ]
}

// Chenciner-Montgomery initial conditions, scaled to a length of 100.
fn figure_eight(g: f64) -> Vec<BodyParams> {
    let scale = 100.0;
    let v_scale = (g * BINARY_MASS / scale).sqrt();
    let outer = Vector2::new(0.97000436, -0.24308753) * scale;
    let center_velocity = Vector2::new(-0.93240737, -0.86473146) * v_scale;
    let outer_velocity = center_velocity * -0.5;
    vec![
        BodyParams::new(outer, outer_velocity, BINARY_MASS, 10.0).with_color(Color::RED),
        BodyParams::new(-outer, outer_velocity, BINARY_MASS, 10.0).with_color(Color::GREEN),
        BodyParams::new(Vector2::ZERO, center_velocity, BINARY_MASS, 10.0).with_color(Color::BLUE),
    ]
}

fn solar(g: f64) -> Vec<BodyParams> {
    let planets = [
        (60.0, 3.0e26, 4.0, Color::RED),
        (110.0, 2.0e27, 6.0, Color::GREEN),
        (170.0, 3.0e27, 6.0, Color::BLUE),
        (240.0, 8.0e27, 9.0, Color::VIOLET),
        (320.0, 5.0e27, 8.0, Color::WHITE),
    ];
    let mut bodies = vec![BodyParams::new(Vector2::ZERO, Vector2::ZERO, STAR_MASS, 20.0).with_color(Color::SUN)];
    for (index, (radius, mass, size, color)) in planets.into_iter().enumerate() {
        let angle = index as f64 * 1.3;
        let offset = Vector2::new(angle.cos(), angle.sin()) * radius;
        let velocity = circular_velocity(offset, g * STAR_MASS);
        bodies.push(BodyParams::new(offset, velocity, mass, size).with_color(color));
    }
    bodies
}

// The speed balances the central mass and the pull of every other ring member,
// so the unsoftened ring rotates rigidly.
fn ring(g: f64) -> Vec<BodyParams> {
    let radius = 200.0;
    let central_mass = 1.0e31;
    let member_mass = 1.0e28;
    let n = RING_BODIES as f64;
    let neighbours: f64 = (1..RING_BODIES).map(|k| 1.0 / (4.0 * (PI * k as f64 / n).sin())).sum();
    let speed = (g * central_mass / radius + g * member_mass / radius * neighbours).sqrt();

    let mut bodies = vec![BodyParams::new(Vector2::ZERO, Vector2::ZERO, central_mass, 16.0).with_color(Color::SUN)];
    for k in 0..RING_BODIES {
        let angle = TAU * k as f64 / n;
        let direction = Vector2::new(angle.cos(), angle.sin());
        bodies.push(BodyParams::new(direction * radius, direction.perpendicular() * speed, member_mass, 5.0).with_color(Color::BLUE));
    }
    bodies
}

fn spiral(g: f64) -> Vec<BodyParams> {
    let mut rng = StdRng::seed_from_u64(SPIRAL_SEED);
    let inner = 40.0;
    let outer = 300.0;
    let winding = 2.5;

    let mut bodies = vec![BodyParams::new(Vector2::ZERO, Vector2::ZERO, STAR_MASS, 18.0).with_color(Color::SUN)];
    for index in 0..SPIRAL_BODIES {
        let arm = (index % 2) as f64;
        let radius = inner + (outer - inner) * rng.random_range(0.0..1.0_f64).sqrt();
        let angle = arm * PI + winding * (radius / inner).ln() + rng.random_range(-0.25..0.25);
        let offset = Vector2::new(angle.cos(), angle.sin()) * radius;
        let velocity = circular_velocity(offset, g * STAR_MASS) * rng.random_range(0.97..1.03);
        let mass = rng.random_range(5.0e26..2.0e27);
        let color = if arm == 0.0 { Color::BLUE } else { Color::VIOLET };
        bodies.push(BodyParams::new(offset, velocity, mass, 2.5).with_color(color));
    }
    bodies
}
