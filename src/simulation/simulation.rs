// src/simulation/simulation.rs

use log::{debug, info, trace, warn};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use crate::forces::{acceleration_on, ForceMode};
use crate::integrators::{rk4_step, PhaseDerivative, PhaseState};
use crate::models::{Body, BodyId, BodyParams, PointMass, Vector2};
use crate::simulation::{EnergyReport, Parameter, Preset, RunState};
use crate::spatial::{QuadTree, Rect};
use crate::utils::{SimulationConfig, SimulationError};

/// Padding added around the bodies when sizing the tree root.
const TREE_PADDING: f64 = 0.05;

/// Which evaluation the last substep used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForceEvaluation {
    Direct,
    Tree,
}

/// Owns the bodies and the parameters and advances them frame by frame.
///
/// A host loop calls [`Simulation::update`] once per display refresh. While
/// running, each frame splits `dt * time_scale` into `substeps` RK4 steps.
/// Every substep integrates all bodies against the same snapshot and commits
/// the results together.
///
/// # Example
///
/// ```
/// use rs_nbody::simulation::{RunState, Simulation};
///
/// let mut sim = Simulation::new();
/// assert_eq!(sim.load_preset("binary").unwrap(), 2);
/// assert_eq!(sim.run_state(), RunState::Paused);
///
/// sim.start();
/// for _ in 0..60 {
///     sim.update();
/// }
/// assert!(sim.elapsed_time() > 0.9);
/// assert!(sim.energy_drift().abs() < 1e-2);
/// ```
#[derive(Debug, Clone)]
pub struct Simulation {
    config: SimulationConfig,
    bodies: Vec<Body>,
    next_id: u64,
    run_state: RunState,
    time: f64,
    energy: EnergyReport,
    initial_energy: f64,
    tree: QuadTree,
    last_evaluation: ForceEvaluation,
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new()
    }
}

impl Simulation {
    /// Creates an empty, paused simulation with the default configuration.
    pub fn new() -> Self {
        Simulation {
            config: SimulationConfig::default(),
            bodies: Vec::new(),
            next_id: 0,
            run_state: RunState::Paused,
            time: 0.0,
            energy: EnergyReport::default(),
            initial_energy: 0.0,
            tree: QuadTree::default(),
            last_evaluation: ForceEvaluation::Direct,
        }
    }

    /// Creates an empty, paused simulation.
    ///
    /// # Errors
    ///
    /// Returns the first invalid field reported by [`SimulationConfig::validate`].
    pub fn with_config(config: SimulationConfig) -> Result<Self, SimulationError> {
        config.validate()?;
        let tree = QuadTree::with_max_depth(Rect::new(0.0, 0.0, 1.0, 1.0), config.leaf_capacity, config.max_tree_depth)?;
        Ok(Simulation { config, tree, ..Self::new() })
    }

    /// Adds a body and returns its id. Ids are never reused.
    ///
    /// # Errors
    ///
    /// Returns an error, and leaves the simulation untouched, if the mass or
    /// radius is not strictly positive or a vector is not finite.
    pub fn add_body(&mut self, params: BodyParams) -> Result<BodyId, SimulationError> {
        let body = match Body::new(self.next_id, params, self.config.trail_capacity) {
            Ok(body) => body,
            Err(e) => {
                warn!("Rejected body: {}", e);
                return Err(e);
            }
        };
        let id = body.id();
        self.next_id += 1;
        self.bodies.push(body);
        debug!("Added body {} (mass {:e}), {} bodies", id, params.mass, self.bodies.len());
        self.rebaseline_energy();
        Ok(id)
    }

    /// Removes a body and returns it, or `None` if no body has that id.
    pub fn remove_body(&mut self, id: BodyId) -> Option<Body> {
        match self.bodies.iter().position(|body| body.id() == id) {
            Some(index) => {
                let body = self.bodies.remove(index);
                debug!("Removed body {}, {} bodies", id, self.bodies.len());
                self.rebaseline_energy();
                Some(body)
            }
            None => {
                warn!("No body with id {}, nothing removed.", id);
                None
            }
        }
    }

    /// Replaces the bodies with a named preset and returns how many were
    /// loaded. Elapsed time and trails start over; the run state is kept.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::UnknownPreset`] and leaves the simulation
    /// untouched if the name matches no preset.
    pub fn load_preset(&mut self, name: &str) -> Result<usize, SimulationError> {
        let preset: Preset = name.parse()?;
        self.load(preset)
    }

    /// Replaces the bodies with `preset`.
    pub fn load(&mut self, preset: Preset) -> Result<usize, SimulationError> {
        let seeds = preset.bodies(&self.config);
        let mut bodies = Vec::with_capacity(seeds.len());
        for (offset, params) in seeds.into_iter().enumerate() {
            bodies.push(Body::new(self.next_id + offset as u64, params, self.config.trail_capacity)?);
        }
        self.next_id += bodies.len() as u64;
        self.bodies = bodies;
        self.time = 0.0;
        self.rebaseline_energy();
        info!("Loaded preset '{}' with {} bodies", preset, self.bodies.len());
        Ok(self.bodies.len())
    }

    /// Changes one parameter. Invalid values are rejected and the previous
    /// value is kept.
    ///
    /// # Example
    ///
    /// ```
    /// use rs_nbody::simulation::{Parameter, Simulation};
    ///
    /// let mut sim = Simulation::new();
    /// sim.set_parameter(Parameter::Theta(0.8)).unwrap();
    /// assert!(sim.set_parameter(Parameter::Theta(1.5)).is_err());
    /// assert_eq!(sim.config().theta, 0.8);
    /// ```
    pub fn set_parameter(&mut self, parameter: Parameter) -> Result<(), SimulationError> {
        if let Err(e) = parameter.apply(&mut self.config) {
            warn!("Rejected {}: {}", parameter, e);
            return Err(e);
        }
        debug!("Set {}", parameter);
        if parameter.affects_energy() {
            self.rebaseline_energy();
        }
        Ok(())
    }

    pub fn start(&mut self) {
        if self.run_state != RunState::Running {
            info!("Simulation started at t = {:.3}", self.time);
        }
        self.run_state = RunState::Running;
    }

    pub fn pause(&mut self) {
        if self.run_state != RunState::Paused {
            info!("Simulation paused at t = {:.3}", self.time);
        }
        self.run_state = RunState::Paused;
    }

    /// Removes every body, zeroes the clock and pauses. Parameters are kept.
    pub fn reset(&mut self) {
        self.bodies.clear();
        self.time = 0.0;
        self.run_state = RunState::Paused;
        self.energy = EnergyReport::default();
        self.initial_energy = 0.0;
        self.last_evaluation = ForceEvaluation::Direct;
        info!("Simulation reset");
    }

    /// Advances one frame if running. Returns whether anything moved.
    pub fn update(&mut self) -> bool {
        if self.run_state != RunState::Running {
            return false;
        }
        self.advance_frame();
        true
    }

    /// Advances one frame regardless of the run state.
    ///
    /// Runs `substeps` substeps of `effective_dt`, then appends every body's
    /// position to its trail and measures the energy. A body whose state has
    /// become non-finite pauses the simulation.
    pub fn advance_frame(&mut self) {
        let dt = self.config.effective_dt();
        for _ in 0..self.config.substeps {
            self.substep(dt);
        }
        for body in &mut self.bodies {
            body.trail.push(body.position);
        }
        self.energy = EnergyReport::measure(&self.bodies, &self.config);
        trace!(
            "t = {:.4}, {} bodies, {:?}, E = {:e}",
            self.time,
            self.bodies.len(),
            self.last_evaluation,
            self.energy.total
        );

        if let Some(body) = self.bodies.iter().find(|b| !b.position.is_finite() || !b.velocity.is_finite()) {
            warn!("Body {} left the finite range at t = {:.4}, pausing.", body.id(), self.time);
            self.run_state = RunState::Paused;
        }
    }

    fn substep(&mut self, dt: f64) {
        if !self.bodies.is_empty() {
            let snapshot: Vec<PointMass> = self.bodies.iter().map(Body::point_mass).collect();
            let use_tree = self.config.uses_tree(snapshot.len()) && self.rebuild_tree(&snapshot);
            let mode = if use_tree { ForceMode::TreeApproximate(&self.tree) } else { ForceMode::Direct };

            let evaluation = if mode.is_tree() { ForceEvaluation::Tree } else { ForceEvaluation::Direct };
            if evaluation != self.last_evaluation {
                debug!("Switched to {:?} evaluation with {} bodies", evaluation, snapshot.len());
                self.last_evaluation = evaluation;
            }
            let states = integrate(&self.bodies, &snapshot, &mode, &self.config, self.time, dt);
            for (body, state) in self.bodies.iter_mut().zip(states) {
                body.position = state.position;
                body.velocity = state.velocity;
            }
        }
        self.time += dt;
    }

    /// Rebuilds the tree over the snapshot. Returns `false` when the tree can
    /// not hold every body, in which case the substep is evaluated directly.
    fn rebuild_tree(&mut self, snapshot: &[PointMass]) -> bool {
        let boundary = match Rect::bounding_square(snapshot.iter().map(|body| body.position), TREE_PADDING) {
            Some(boundary) => boundary,
            None => {
                warn!("Bodies have non-finite positions, using direct summation.");
                return false;
            }
        };
        let rejected = self.tree.rebuild(boundary, snapshot);
        if rejected > 0 {
            warn!("{} bodies fell outside the tree root, using direct summation.", rejected);
            return false;
        }
        true
    }

    fn rebaseline_energy(&mut self) {
        self.energy = EnergyReport::measure(&self.bodies, &self.config);
        self.initial_energy = self.energy.total;
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn body(&self, id: BodyId) -> Option<&Body> {
        self.bodies.iter().find(|body| body.id() == id)
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// The topmost body whose display radius covers `point`. Later bodies are
    /// drawn over earlier ones.
    pub fn find_body_at(&self, point: Vector2) -> Option<BodyId> {
        self.bodies.iter().rev().find(|body| body.contains_point(point)).map(Body::id)
    }

    pub fn total_mass(&self) -> f64 {
        self.bodies.iter().map(Body::mass).sum()
    }

    /// Mass-weighted mean position, or `None` without bodies.
    pub fn center_of_mass(&self) -> Option<Vector2> {
        let total_mass = self.total_mass();
        if total_mass <= 0.0 {
            return None;
        }
        let weighted = self.bodies.iter().fold(Vector2::ZERO, |sum, body| sum + body.position * body.mass());
        Some(weighted / total_mass)
    }

    pub fn total_momentum(&self) -> Vector2 {
        self.bodies.iter().fold(Vector2::ZERO, |sum, body| sum + body.momentum())
    }

    pub fn elapsed_time(&self) -> f64 {
        self.time
    }

    pub fn run_state(&self) -> RunState {
        self.run_state
    }

    pub fn is_running(&self) -> bool {
        self.run_state == RunState::Running
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Energy measured after the last frame or body-set change.
    pub fn energy(&self) -> EnergyReport {
        self.energy
    }

    /// Total energy when the current body set was loaded.
    pub fn initial_energy(&self) -> f64 {
        self.initial_energy
    }

    /// Relative change of the total energy since the body set was loaded.
    pub fn energy_drift(&self) -> f64 {
        self.energy.drift_from(self.initial_energy)
    }

    /// The evaluation the most recent substep used.
    pub fn force_evaluation(&self) -> ForceEvaluation {
        self.last_evaluation
    }

    pub fn presets() -> &'static [Preset] {
        &Preset::ALL
    }
}

/// Runs one RK4 step per body against the read-only snapshot.
fn integrate(
    bodies: &[Body],
    snapshot: &[PointMass],
    mode: &ForceMode,
    config: &SimulationConfig,
    time: f64,
    dt: f64,
) -> Vec<PhaseState> {
    let step = |body: &Body| {
        let subject = body.point_mass();
        let start = PhaseState { position: body.position, velocity: body.velocity };
        rk4_step(
            |_t, state: &PhaseState| PhaseDerivative {
                velocity: state.velocity,
                acceleration: acceleration_on(&subject, state.position, snapshot, mode, config),
            },
            time,
            &start,
            dt,
        )
    };

    #[cfg(feature = "parallel")]
    {
        if bodies.len() >= config.parallel_threshold {
            return bodies.par_iter().map(&step).collect();
        }
    }
    bodies.iter().map(&step).collect()
}
