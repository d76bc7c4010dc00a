mod parameters;
mod presets;
mod simulation;

pub use parameters::*;
pub use presets::*;
pub use simulation::*;

#[cfg(test)]
mod presets_tests;
