// demos/orbit_demo.rs
// Runs a preset headless and prints the energy readout once per simulated
// second. `RUST_LOG=debug cargo run --example orbit_demo -- spiral`

use rs_nbody::simulation::{Parameter, Simulation};
use rs_nbody::utils::SimulationError;

fn main() -> Result<(), SimulationError> {
    env_logger::init();

    let preset = std::env::args().nth(1).unwrap_or_else(|| "binary".to_string());
    let mut sim = Simulation::new();
    let count = sim.load_preset(&preset)?;
    sim.set_parameter(Parameter::Substeps(8))?;
    println!("Loaded '{}' with {} bodies, total mass {:e}", preset, count, sim.total_mass());

    let frames_per_second = (1.0 / sim.config().dt).round() as usize;
    sim.start();
    for second in 1..=30 {
        for _ in 0..frames_per_second {
            sim.update();
        }
        if !sim.is_running() {
            println!("Stopped after {:.2} time units", sim.elapsed_time());
            break;
        }
        let energy = sim.energy();
        println!(
            "{:>3}s  t = {:>7.3}  kinetic = {:>12.5e}  potential = {:>12.5e}  drift = {:>+.3e}",
            second,
            sim.elapsed_time(),
            energy.kinetic,
            energy.potential,
            sim.energy_drift()
        );
    }

    if let Some(center) = sim.center_of_mass() {
        println!("Center of mass: ({:.3}, {:.3})", center.x, center.y);
    }
    Ok(())
}
