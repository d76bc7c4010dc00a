use std::collections::VecDeque;
use std::fmt;
use crate::models::Vector2;
use crate::utils::SimulationError;

/// Opaque identity of a body, unique for the lifetime of a simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId(pub u64);

impl BodyId {
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Display color tag, packed as `0xRRGGBB`. Never read by the physics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color(pub u32);

impl Color {
    pub const WHITE: Color = Color(0xFFFFFF);
    pub const SUN: Color = Color(0xFFD34E);
    pub const BLUE: Color = Color(0x4EA8FF);
    pub const RED: Color = Color(0xFF5E4E);
    pub const GREEN: Color = Color(0x6EE07A);
    pub const VIOLET: Color = Color(0xB27CFF);

    /// # Example
    /// ```
    /// use rs_nbody::models::Color;
    ///
    /// assert_eq!(Color(0x4EA8FF).rgb(), (0x4E, 0xA8, 0xFF));
    /// ```
    pub fn rgb(&self) -> (u8, u8, u8) {
        (((self.0 >> 16) & 0xFF) as u8, ((self.0 >> 8) & 0xFF) as u8, (self.0 & 0xFF) as u8)
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::WHITE
    }
}

/// Bounded history of past positions. The oldest entry is evicted once the
/// trail is full.
///
/// # Example
/// ```
/// use rs_nbody::models::{Trail, Vector2};
///
/// let mut trail = Trail::new(2);
/// trail.push(Vector2::new(0.0, 0.0));
/// trail.push(Vector2::new(1.0, 0.0));
/// trail.push(Vector2::new(2.0, 0.0));
///
/// assert_eq!(trail.len(), 2);
/// assert_eq!(trail.iter().next(), Some(&Vector2::new(1.0, 0.0)));
/// assert_eq!(trail.latest(), Some(&Vector2::new(2.0, 0.0)));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Trail {
    points: VecDeque<Vector2>,
    capacity: usize,
}

impl Trail {
    pub fn new(capacity: usize) -> Self {
        Trail {
            points: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, point: Vector2) {
        if self.capacity == 0 {
            return;
        }
        while self.points.len() >= self.capacity {
            self.points.pop_front();
        }
        self.points.push_back(point);
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Iterates from the oldest to the newest recorded position.
    pub fn iter(&self) -> impl Iterator<Item = &Vector2> + '_ {
        self.points.iter()
    }

    pub fn latest(&self) -> Option<&Vector2> {
        self.points.back()
    }
}

/// The mass-carrying data force evaluation needs about a body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointMass {
    pub id: BodyId,
    pub position: Vector2,
    pub mass: f64,
}

/// Initial state of a body to be added to a simulation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyParams {
    pub position: Vector2,
    pub velocity: Vector2,
    pub mass: f64,
    pub radius: f64,
    pub color: Color,
}

impl BodyParams {
    pub fn new(position: Vector2, velocity: Vector2, mass: f64, radius: f64) -> Self {
        BodyParams { position, velocity, mass, radius, color: Color::default() }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Rejects non-positive masses and radii and non-finite vectors.
    pub fn validate(&self) -> Result<(), SimulationError> {
        if !self.mass.is_finite() || self.mass <= 0.0 {
            return Err(SimulationError::InvalidMass);
        }
        if !self.radius.is_finite() || self.radius <= 0.0 {
            return Err(SimulationError::InvalidRadius);
        }
        if !self.position.is_finite() {
            return Err(SimulationError::NonFiniteVector(format!("position {:?}", self.position)));
        }
        if !self.velocity.is_finite() {
            return Err(SimulationError::NonFiniteVector(format!("velocity {:?}", self.velocity)));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    id: BodyId,
    pub position: Vector2,
    pub velocity: Vector2,
    mass: f64,
    radius: f64,
    pub color: Color,
    pub trail: Trail,
}

impl Body {
    /// Creates a new body.
    ///
    /// # Errors
    ///
    /// Returns an error if `mass` or `radius` is not strictly positive, or if
    /// the position or velocity is not finite.
    ///
    /// # Examples
    ///
    /// ```
    /// use rs_nbody::models::{Body, BodyParams, Vector2};
    /// use rs_nbody::utils::SimulationError;
    ///
    /// let params = BodyParams::new(Vector2::new(1.0, 0.0), Vector2::new(0.0, 2.0), 4.0, 1.0);
    /// let body = Body::new(0, params, 16).expect("valid body");
    /// assert_eq!(body.kinetic_energy(), 8.0);
    ///
    /// let massless = BodyParams { mass: 0.0, ..params };
    /// assert_eq!(Body::new(1, massless, 16), Err(SimulationError::InvalidMass));
    /// ```
    pub fn new(id: u64, params: BodyParams, trail_capacity: usize) -> Result<Self, SimulationError> {
        params.validate()?;
        Ok(Body {
            id: BodyId(id),
            position: params.position,
            velocity: params.velocity,
            mass: params.mass,
            radius: params.radius,
            color: params.color,
            trail: Trail::new(trail_capacity),
        })
    }

    pub fn id(&self) -> BodyId {
        self.id
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// `½·m·|v|²`
    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.mass * self.velocity.magnitude_squared()
    }

    pub fn momentum(&self) -> Vector2 {
        self.velocity * self.mass
    }

    pub fn point_mass(&self) -> PointMass {
        PointMass { id: self.id, position: self.position, mass: self.mass }
    }

    /// Whether `point` lies within the body's display radius.
    pub fn contains_point(&self, point: Vector2) -> bool {
        self.position.distance_squared(&point) <= self.radius * self.radius
    }
}
