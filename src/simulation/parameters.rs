use std::fmt;
use crate::forces::{kinetic_energy, potential_energy};
use crate::models::Body;
use crate::utils::{SimulationConfig, SimulationError};

/// Whether frame ticks advance the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunState {
    #[default]
    Paused,
    Running,
}

/// A user-tunable parameter together with its new value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Parameter {
    /// `G`, must be finite and non-negative.
    GravitationalConstant(f64),
    /// `ε`, must be finite and non-negative.
    Softening(f64),
    /// `θ`, must lie within `[0, 1]`.
    Theta(f64),
    /// Virtual time per frame multiplier, must be finite and non-negative.
    TimeScale(f64),
    /// Integration substeps per frame, at least 1.
    Substeps(u32),
}

impl Parameter {
    /// Parses a parameter from its name, as used by control panels.
    ///
    /// # Examples
    ///
    /// ```
    /// use rs_nbody::simulation::Parameter;
    ///
    /// assert_eq!(Parameter::from_name("theta", 0.7).unwrap(), Parameter::Theta(0.7));
    /// assert_eq!(Parameter::from_name("substeps", 8.0).unwrap(), Parameter::Substeps(8));
    /// assert!(Parameter::from_name("substeps", 2.5).is_err());
    /// assert!(Parameter::from_name("friction", 1.0).is_err());
    /// ```
    pub fn from_name(name: &str, value: f64) -> Result<Self, SimulationError> {
        match name.trim().to_ascii_lowercase().as_str() {
            "g" | "gravity" | "gravitational_constant" => Ok(Parameter::GravitationalConstant(value)),
            "softening" | "epsilon" | "eps" => Ok(Parameter::Softening(value)),
            "theta" => Ok(Parameter::Theta(value)),
            "timescale" | "time_scale" | "speed" => Ok(Parameter::TimeScale(value)),
            "substeps" => {
                if !value.is_finite() || value < 1.0 || value.fract() != 0.0 || value > u32::MAX as f64 {
                    return Err(SimulationError::InvalidSubsteps);
                }
                Ok(Parameter::Substeps(value as u32))
            }
            other => Err(SimulationError::UnknownParameter(other.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Parameter::GravitationalConstant(_) => "G",
            Parameter::Softening(_) => "softening",
            Parameter::Theta(_) => "theta",
            Parameter::TimeScale(_) => "timeScale",
            Parameter::Substeps(_) => "substeps",
        }
    }

    /// Checks the value and writes it into `config`. `config` is left untouched
    /// on error.
    pub fn apply(&self, config: &mut SimulationConfig) -> Result<(), SimulationError> {
        match *self {
            Parameter::GravitationalConstant(value) => {
                SimulationConfig::check_gravitational_constant(value)?;
                config.gravitational_constant = value;
            }
            Parameter::Softening(value) => {
                SimulationConfig::check_softening(value)?;
                config.softening = value;
            }
            Parameter::Theta(value) => {
                SimulationConfig::check_theta(value)?;
                config.theta = value;
            }
            Parameter::TimeScale(value) => {
                SimulationConfig::check_time_scale(value)?;
                config.time_scale = value;
            }
            Parameter::Substeps(value) => {
                SimulationConfig::check_substeps(value)?;
                config.substeps = value;
            }
        }
        Ok(())
    }

    /// Whether changing this parameter changes the potential energy of a
    /// fixed configuration.
    pub(crate) fn affects_energy(&self) -> bool {
        matches!(self, Parameter::GravitationalConstant(_) | Parameter::Softening(_))
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Parameter::GravitationalConstant(value)
            | Parameter::Softening(value)
            | Parameter::Theta(value)
            | Parameter::TimeScale(value) => write!(f, "{} = {}", self.name(), value),
            Parameter::Substeps(value) => write!(f, "{} = {}", self.name(), value),
        }
    }
}

/// Energy readout of the current body set.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EnergyReport {
    pub kinetic: f64,
    pub potential: f64,
    pub total: f64,
}

impl EnergyReport {
    /// Measures the kinetic and softened potential energy of `bodies`.
    pub fn measure(bodies: &[Body], config: &SimulationConfig) -> Self {
        let kinetic = kinetic_energy(bodies);
        let potential = potential_energy(bodies, config.gravitational_constant, config.softening);
        EnergyReport {
            kinetic,
            potential,
            total: kinetic + potential,
        }
    }

    /// Relative change of the total energy against `baseline`. A zero baseline
    /// reports the absolute change instead.
    ///
    /// # Examples
    ///
    /// ```
    /// use rs_nbody::simulation::EnergyReport;
    ///
    /// let report = EnergyReport { kinetic: 1.0, potential: -3.0, total: -2.0 };
    /// assert!((report.drift_from(-2.5) - 0.2).abs() < 1e-12);
    /// ```
    pub fn drift_from(&self, baseline: f64) -> f64 {
        if baseline == 0.0 {
            return self.total;
        }
        (self.total - baseline) / baseline.abs()
    }
}
