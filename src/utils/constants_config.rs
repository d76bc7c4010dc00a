// src/utils/constants_config.rs
use crate::utils::{
    DEFAULT_SIMULATION_CONFIG,
    MAX_TREE_DEPTH_LIMIT,
    errors::SimulationError
};

/// Global parameters of a simulation.
///
/// Owned by [`Simulation`](crate::simulation::Simulation) and handed by reference
/// to the force model and the spatial tree; nothing reads it ambiently.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationConfig {
    /// Gravitational constant `G`; scales every force linearly.
    pub gravitational_constant: f64,
    /// Softening length `ε` added to every separation.
    pub softening: f64,
    /// Barnes-Hut opening angle `θ`.
    pub theta: f64,
    /// Multiplier applied to `dt` for every rendered frame.
    pub time_scale: f64,
    /// Integration substeps per rendered frame.
    pub substeps: u32,
    /// Fixed nominal step size per rendered frame.
    pub dt: f64,
    /// The tree is used once the body count exceeds this value.
    pub tree_threshold: usize,
    /// Bodies held by a leaf before it subdivides.
    pub leaf_capacity: usize,
    /// Depth at which leaves stop subdividing and overflow instead.
    pub max_tree_depth: u32,
    /// Number of past positions kept per body.
    pub trail_capacity: usize,
    /// Minimum body count for fork-join force evaluation.
    pub parallel_threshold: usize,
}


impl Default for SimulationConfig {
    fn default() -> Self {
        DEFAULT_SIMULATION_CONFIG
    }
}

impl SimulationConfig {
    /// Creates a configuration from the user-facing parameters, falling back to
    /// the defaults for every `None`.
    ///
    /// # Errors
    /// Returns an error if the resulting configuration fails [`validate`](Self::validate).
    ///
    /// # Example
    /// ```
    /// use rs_nbody::utils::SimulationConfig;
    ///
    /// let config = SimulationConfig::new(Some(1.0), None, Some(0.3), None, Some(8)).unwrap();
    /// assert_eq!(config.gravitational_constant, 1.0);
    /// assert_eq!(config.theta, 0.3);
    /// assert_eq!(config.substeps, 8);
    /// assert_eq!(config.softening, SimulationConfig::default().softening);
    ///
    /// assert!(SimulationConfig::new(None, Some(-1.0), None, None, None).is_err());
    /// ```
    pub fn new(
        gravitational_constant: Option<f64>,
        softening: Option<f64>,
        theta: Option<f64>,
        time_scale: Option<f64>,
        substeps: Option<u32>,
    ) -> Result<Self, SimulationError> {
        let default = DEFAULT_SIMULATION_CONFIG;
        let config = Self {
            gravitational_constant: gravitational_constant.unwrap_or(default.gravitational_constant),
            softening: softening.unwrap_or(default.softening),
            theta: theta.unwrap_or(default.theta),
            time_scale: time_scale.unwrap_or(default.time_scale),
            substeps: substeps.unwrap_or(default.substeps),
            ..default
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks every field against its admissible range.
    pub fn validate(&self) -> Result<(), SimulationError> {
        Self::check_gravitational_constant(self.gravitational_constant)?;
        Self::check_softening(self.softening)?;
        Self::check_theta(self.theta)?;
        Self::check_time_scale(self.time_scale)?;
        Self::check_substeps(self.substeps)?;
        if !self.dt.is_finite() || self.dt <= 0.0 { return Err(SimulationError::InvalidTimeStep); }
        if self.leaf_capacity == 0 { return Err(SimulationError::InvalidCapacity); }
        if self.max_tree_depth > MAX_TREE_DEPTH_LIMIT { return Err(SimulationError::InvalidTreeDepth); }
        Ok(())
    }

    /// Step size of a single substep: `dt * time_scale / substeps`.
    ///
    /// # Example
    /// ```
    /// use rs_nbody::utils::SimulationConfig;
    ///
    /// let config = SimulationConfig { dt: 0.02, time_scale: 2.0, substeps: 4, ..Default::default() };
    /// assert!((config.effective_dt() - 0.01).abs() < 1e-12);
    /// ```
    pub fn effective_dt(&self) -> f64 {
        self.dt * self.time_scale / self.substeps as f64
    }

    /// Whether `body_count` bodies should be evaluated against a Barnes-Hut tree.
    pub fn uses_tree(&self, body_count: usize) -> bool {
        body_count > self.tree_threshold
    }

    pub(crate) fn check_gravitational_constant(value: f64) -> Result<(), SimulationError> {
        if !value.is_finite() || value < 0.0 { return Err(SimulationError::InvalidGravitationalConstant); }
        Ok(())
    }

    pub(crate) fn check_softening(value: f64) -> Result<(), SimulationError> {
        if !value.is_finite() || value < 0.0 { return Err(SimulationError::InvalidSoftening); }
        Ok(())
    }

    pub(crate) fn check_theta(value: f64) -> Result<(), SimulationError> {
        if !(0.0..=1.0).contains(&value) { return Err(SimulationError::InvalidTheta); }
        Ok(())
    }

    pub(crate) fn check_time_scale(value: f64) -> Result<(), SimulationError> {
        if !value.is_finite() || value < 0.0 { return Err(SimulationError::InvalidTimeScale); }
        Ok(())
    }

    pub(crate) fn check_substeps(value: u32) -> Result<(), SimulationError> {
        if value == 0 { return Err(SimulationError::InvalidSubsteps); }
        Ok(())
    }
}
