mod rk4;

pub use rk4::*;
