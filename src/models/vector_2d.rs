use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

pub trait FromCoordinates <T> {
    /// Creates a new instance of the struct from the given coordinates.
    /// # Arguments
    /// * `position` - The coordinates to create the struct from.
    /// # Returns
    /// A new instance of the struct.
    /// # Example
    /// ```
    /// use rs_nbody::models::{FromCoordinates, Vector2};
    ///
    /// let v = Vector2::from_coord((1.0, 2.0));
    /// assert_eq!(v.x, 1.0);
    /// assert_eq!(v.y, 2.0);
    /// ```
    fn from_coord(position: T) -> Self;
}

pub trait ToCoordinates <T> {
    /// Converts the struct to a tuple of coordinates.
    /// # Example
    /// ```
    /// use rs_nbody::models::{ToCoordinates, Vector2};
    ///
    /// let coordinates = Vector2::new(1.0, 2.0).to_coord();
    /// assert_eq!(coordinates, (1.0, 2.0));
    /// ```
    fn to_coord(&self) -> T;
}

/// A 2D vector used for positions, velocities and accelerations.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector2 {
    pub x: f64,
    pub y: f64,
}

impl Vector2 {
    pub const ZERO: Vector2 = Vector2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Vector2 { x, y }
    }

    /// Length of the vector.
    ///
    /// # Example
    /// ```
    /// use rs_nbody::models::Vector2;
    ///
    /// assert_eq!(Vector2::new(3.0, 4.0).magnitude(), 5.0);
    /// ```
    pub fn magnitude(&self) -> f64 {
        self.magnitude_squared().sqrt()
    }

    pub fn magnitude_squared(&self) -> f64 {
        self.x * self.x + self.y * self.y
    }

    /// Returns the unit vector pointing in the same direction.
    /// The zero vector normalizes to itself.
    ///
    /// # Example
    /// ```
    /// use rs_nbody::models::Vector2;
    ///
    /// let unit = Vector2::new(0.0, -2.0).normalize();
    /// assert_eq!(unit, Vector2::new(0.0, -1.0));
    /// assert_eq!(Vector2::ZERO.normalize(), Vector2::ZERO);
    /// ```
    pub fn normalize(&self) -> Vector2 {
        let magnitude = self.magnitude();
        if magnitude == 0.0 {
            return Vector2::ZERO;
        }
        Vector2::new(self.x / magnitude, self.y / magnitude)
    }

    pub fn dot(&self, other: &Vector2) -> f64 {
        self.x * other.x + self.y * other.y
    }

    pub fn distance(&self, other: &Vector2) -> f64 {
        self.distance_squared(other).sqrt()
    }

    pub fn distance_squared(&self, other: &Vector2) -> f64 {
        (*other - *self).magnitude_squared()
    }

    /// The vector rotated a quarter turn counter-clockwise.
    ///
    /// # Example
    /// ```
    /// use rs_nbody::models::Vector2;
    ///
    /// assert_eq!(Vector2::new(1.0, 0.0).perpendicular(), Vector2::new(0.0, 1.0));
    /// ```
    pub fn perpendicular(&self) -> Vector2 {
        Vector2::new(-self.y, self.x)
    }

    pub fn scale(&self, factor: f64) -> Vector2 {
        Vector2::new(self.x * factor, self.y * factor)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl FromCoordinates<(f64, f64)> for Vector2 {
    fn from_coord(position: (f64, f64)) -> Self {
        Vector2 {
            x: position.0,
            y: position.1,
        }
    }
}

impl ToCoordinates<(f64, f64)> for Vector2 {
    fn to_coord(&self) -> (f64, f64) {
        (self.x, self.y)
    }
}

impl Add for Vector2 {
    type Output = Vector2;

    fn add(self, rhs: Vector2) -> Vector2 {
        Vector2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vector2 {
    type Output = Vector2;

    fn sub(self, rhs: Vector2) -> Vector2 {
        Vector2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Vector2 {
    type Output = Vector2;

    fn mul(self, rhs: f64) -> Vector2 {
        self.scale(rhs)
    }
}

impl Mul<Vector2> for f64 {
    type Output = Vector2;

    fn mul(self, rhs: Vector2) -> Vector2 {
        rhs.scale(self)
    }
}

impl Div<f64> for Vector2 {
    type Output = Vector2;

    fn div(self, rhs: f64) -> Vector2 {
        Vector2::new(self.x / rhs, self.y / rhs)
    }
}

impl Neg for Vector2 {
    type Output = Vector2;

    fn neg(self) -> Vector2 {
        Vector2::new(-self.x, -self.y)
    }
}

impl AddAssign for Vector2 {
    fn add_assign(&mut self, rhs: Vector2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl SubAssign for Vector2 {
    fn sub_assign(&mut self, rhs: Vector2) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}
