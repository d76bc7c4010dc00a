//! Classical fourth-order Runge-Kutta stepping.
//!
//! The integrator knows nothing about physics. A state type describes how it is
//! advanced along a derivative through [`OdeState`], and the caller supplies the
//! derivative function. The same [`rk4_step`] drives gravitational bodies, scalar
//! test equations, or anything else that implements the trait.
//!
//! # Example
//!
//! ```
//! use rs_nbody::integrators::rk4_step;
//!
//! // dy/dt = -y, y(0) = 1
//! let mut y = 1.0_f64;
//! let mut t = 0.0;
//! let dt = 0.1;
//! for _ in 0..10 {
//!     y = rk4_step(|_t, y: &f64| -*y, t, &y, dt);
//!     t += dt;
//! }
//! assert!((y - (-1.0_f64).exp()).abs() < 1e-6);
//! ```
use std::ops::{Add, Mul};
use crate::models::Vector2;

/// A state that can be moved along a derivative by a step `h`.
pub trait OdeState: Sized {
    /// The time derivative of the state. Stages are combined through `Add` and
    /// `Mul<f64>`, so the derivative must be a linear quantity.
    type Derivative: Copy + Add<Output = Self::Derivative> + Mul<f64, Output = Self::Derivative>;

    /// Returns `self + derivative * h`.
    fn advanced(&self, derivative: &Self::Derivative, h: f64) -> Self;
}

impl OdeState for f64 {
    type Derivative = f64;

    fn advanced(&self, derivative: &f64, h: f64) -> f64 {
        self + derivative * h
    }
}

/// Position and velocity of a single body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseState {
    pub position: Vector2,
    pub velocity: Vector2,
}

/// Time derivative of a [`PhaseState`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseDerivative {
    pub velocity: Vector2,
    pub acceleration: Vector2,
}

impl Add for PhaseDerivative {
    type Output = PhaseDerivative;

    fn add(self, rhs: PhaseDerivative) -> PhaseDerivative {
        PhaseDerivative {
            velocity: self.velocity + rhs.velocity,
            acceleration: self.acceleration + rhs.acceleration,
        }
    }
}

impl Mul<f64> for PhaseDerivative {
    type Output = PhaseDerivative;

    fn mul(self, rhs: f64) -> PhaseDerivative {
        PhaseDerivative {
            velocity: self.velocity * rhs,
            acceleration: self.acceleration * rhs,
        }
    }
}

impl OdeState for PhaseState {
    type Derivative = PhaseDerivative;

    fn advanced(&self, derivative: &PhaseDerivative, h: f64) -> PhaseState {
        PhaseState {
            position: self.position + derivative.velocity * h,
            velocity: self.velocity + derivative.acceleration * h,
        }
    }
}

/// Advances `state` from `t` to `t + dt` with one classical RK4 step.
///
/// The four stages are evaluated at `t`, `t + dt/2` (twice) and `t + dt`, and
/// combined with the weights `(1, 2, 2, 1) / 6`. The operation order is fixed,
/// so identical inputs always produce bit-identical outputs.
///
/// # Arguments
///
/// * `derivative` - Evaluates the time derivative for a given time and state
/// * `t` - Time at the start of the step
/// * `state` - State at the start of the step
/// * `dt` - Step size
///
/// # Examples
///
/// ```
/// use rs_nbody::integrators::{rk4_step, PhaseDerivative, PhaseState};
/// use rs_nbody::models::Vector2;
///
/// // Free motion under constant acceleration is integrated exactly.
/// let start = PhaseState { position: Vector2::ZERO, velocity: Vector2::new(1.0, 0.0) };
/// let gravity = Vector2::new(0.0, -2.0);
/// let end = rk4_step(
///     |_t, s: &PhaseState| PhaseDerivative { velocity: s.velocity, acceleration: gravity },
///     0.0,
///     &start,
///     1.0,
/// );
/// assert!((end.position.x - 1.0).abs() < 1e-12);
/// assert!((end.position.y + 1.0).abs() < 1e-12);
/// assert!((end.velocity.y + 2.0).abs() < 1e-12);
/// ```
pub fn rk4_step<S, F>(derivative: F, t: f64, state: &S, dt: f64) -> S
where
    S: OdeState,
    F: Fn(f64, &S) -> S::Derivative,
{
    let half_dt = 0.5 * dt;

    let k1 = derivative(t, state);
    let k2 = derivative(t + half_dt, &state.advanced(&k1, half_dt));
    let k3 = derivative(t + half_dt, &state.advanced(&k2, half_dt));
    let k4 = derivative(t + dt, &state.advanced(&k3, dt));

    let weighted = (k1 + k2 * 2.0 + k3 * 2.0 + k4) * (1.0 / 6.0);
    state.advanced(&weighted, dt)
}
