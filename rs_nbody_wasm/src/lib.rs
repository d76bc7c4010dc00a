// rs_nbody_wasm/src/lib.rs
// Browser bindings for the simulation core. The page's render loop calls
// `update` once per animation frame and reads the flat buffers back.

use wasm_bindgen::prelude::*;
use rs_nbody::models::{BodyId, BodyParams, Color, FromCoordinates, ToCoordinates, Vector2};
use rs_nbody::simulation::{Parameter, Simulation};
use rs_nbody::utils::SimulationError;

fn to_js(error: SimulationError) -> JsValue {
    web_sys::console::warn_1(&JsValue::from_str(&error.to_string()));
    JsValue::from_str(&error.to_string())
}

#[wasm_bindgen]
pub struct WasmSimulation {
    simulation: Simulation,
}

#[wasm_bindgen]
impl WasmSimulation {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            simulation: Simulation::new(),
        }
    }

    /// Names accepted by `load_preset`.
    #[wasm_bindgen]
    pub fn presets() -> js_sys::Array {
        Simulation::presets().iter().map(|preset| JsValue::from_str(preset.key())).collect()
    }

    #[wasm_bindgen]
    pub fn load_preset(&mut self, name: &str) -> Result<usize, JsValue> {
        self.simulation.load_preset(name).map_err(to_js)
    }

    /// Returns the new body's id.
    #[wasm_bindgen]
    pub fn add_body(&mut self, x: f64, y: f64, vx: f64, vy: f64, mass: f64, radius: f64, color: u32) -> Result<f64, JsValue> {
        let params = BodyParams::new(Vector2::from_coord((x, y)), Vector2::from_coord((vx, vy)), mass, radius)
            .with_color(Color(color));
        self.simulation.add_body(params).map(|id| id.value() as f64).map_err(to_js)
    }

    #[wasm_bindgen]
    pub fn remove_body(&mut self, id: f64) -> bool {
        self.simulation.remove_body(BodyId(id as u64)).is_some()
    }

    /// Accepts `G`, `softening`, `theta`, `timeScale` and `substeps`.
    #[wasm_bindgen]
    pub fn set_parameter(&mut self, name: &str, value: f64) -> Result<(), JsValue> {
        let parameter = Parameter::from_name(name, value).map_err(to_js)?;
        self.simulation.set_parameter(parameter).map_err(to_js)
    }

    #[wasm_bindgen]
    pub fn start(&mut self) {
        self.simulation.start();
    }

    #[wasm_bindgen]
    pub fn pause(&mut self) {
        self.simulation.pause();
    }

    #[wasm_bindgen]
    pub fn reset(&mut self) {
        self.simulation.reset();
    }

    #[wasm_bindgen]
    pub fn update(&mut self) -> bool {
        self.simulation.update()
    }

    #[wasm_bindgen]
    pub fn is_running(&self) -> bool {
        self.simulation.is_running()
    }

    #[wasm_bindgen]
    pub fn body_count(&self) -> usize {
        self.simulation.body_count()
    }

    /// `[id, x, y, vx, vy, mass, radius]` per body.
    #[wasm_bindgen]
    pub fn bodies(&self) -> Vec<f64> {
        self.simulation
            .bodies()
            .iter()
            .flat_map(|body| {
                let (x, y) = body.position.to_coord();
                let (vx, vy) = body.velocity.to_coord();
                [body.id().value() as f64, x, y, vx, vy, body.mass(), body.radius()]
            })
            .collect()
    }

    #[wasm_bindgen]
    pub fn colors(&self) -> Vec<u32> {
        self.simulation.bodies().iter().map(|body| body.color.0).collect()
    }

    /// `[x, y]` pairs from the oldest to the newest trail point.
    #[wasm_bindgen]
    pub fn trail(&self, id: f64) -> Vec<f64> {
        self.simulation
            .body(BodyId(id as u64))
            .map(|body| body.trail.iter().map(|point| point.to_coord()).flat_map(|(x, y)| [x, y]).collect())
            .unwrap_or_default()
    }

    #[wasm_bindgen]
    pub fn find_body_at(&self, x: f64, y: f64) -> Option<f64> {
        self.simulation.find_body_at(Vector2::from_coord((x, y))).map(|id| id.value() as f64)
    }

    #[wasm_bindgen]
    pub fn kinetic_energy(&self) -> f64 {
        self.simulation.energy().kinetic
    }

    #[wasm_bindgen]
    pub fn potential_energy(&self) -> f64 {
        self.simulation.energy().potential
    }

    #[wasm_bindgen]
    pub fn total_energy(&self) -> f64 {
        self.simulation.energy().total
    }

    #[wasm_bindgen]
    pub fn energy_drift(&self) -> f64 {
        self.simulation.energy_drift()
    }

    #[wasm_bindgen]
    pub fn elapsed_time(&self) -> f64 {
        self.simulation.elapsed_time()
    }
}

impl Default for WasmSimulation {
    fn default() -> Self {
        Self::new()
    }
}
