pub mod clock;
pub mod integrator;
pub mod runner;

pub use clock::{ElapsedTime, SimulationClock};
pub use integrator::rk4_step;
pub use runner::{RunState, SimulationContext};
