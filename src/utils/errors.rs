use std::fmt;
use std::error::Error;

/// Represents errors that can occur while configuring or mutating a simulation.
#[derive(Debug, Clone, PartialEq)]
pub enum SimulationError {
    /// Indicates an invalid mass value (zero, negative or non-finite).
    InvalidMass,
    /// Indicates an invalid body radius (zero, negative or non-finite).
    InvalidRadius,
    /// Indicates a negative or non-finite softening length.
    InvalidSoftening,
    /// Indicates a Barnes-Hut opening angle outside of `[0, 1]`.
    InvalidTheta,
    /// Indicates a negative or non-finite time-scale multiplier.
    InvalidTimeScale,
    /// Indicates a substep count of zero.
    InvalidSubsteps,
    /// Indicates a negative or non-finite gravitational constant.
    InvalidGravitationalConstant,
    /// Indicates a nominal step size that is not strictly positive.
    InvalidTimeStep,
    /// Indicates a tree leaf capacity of zero.
    InvalidCapacity,
    /// Tree depth limit above [`crate::utils::MAX_TREE_DEPTH_LIMIT`].
    InvalidTreeDepth,
    /// A position or velocity with a NaN or infinite component.
    NonFiniteVector(String),
    /// No preset is registered under the given name.
    UnknownPreset(String),
    /// No tunable parameter is registered under the given name.
    UnknownParameter(String),
}

impl fmt::Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SimulationError::InvalidMass => write!(f, "Invalid mass value"),
            SimulationError::InvalidRadius => write!(f, "Invalid radius value"),
            SimulationError::InvalidSoftening => write!(f, "Invalid softening length"),
            SimulationError::InvalidTheta => write!(f, "Invalid opening angle (theta must be within [0, 1])"),
            SimulationError::InvalidTimeScale => write!(f, "Invalid time scale"),
            SimulationError::InvalidSubsteps => write!(f, "Invalid substep count (must be at least 1)"),
            SimulationError::InvalidGravitationalConstant => write!(f, "Invalid gravitational constant"),
            SimulationError::InvalidTimeStep => write!(f, "Invalid time step"),
            SimulationError::InvalidCapacity => write!(f, "Invalid leaf capacity (must be at least 1)"),
            SimulationError::InvalidTreeDepth => write!(f, "Invalid tree depth (must be at most {})", crate::utils::MAX_TREE_DEPTH_LIMIT),
            SimulationError::NonFiniteVector(what) => write!(f, "Non-finite vector: {}", what),
            SimulationError::UnknownPreset(name) => write!(f, "Unknown preset: {}", name),
            SimulationError::UnknownParameter(name) => write!(f, "Unknown parameter: {}", name),
        }
    }
}


impl Error for SimulationError {}
