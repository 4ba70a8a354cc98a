pub mod config;
pub mod dynamics;
pub mod error;
mod gnc_mod;
pub mod io;
pub mod physics;
pub mod sim;

// The gnc module: expose gnc_mod as `gnc` publicly
pub mod gnc {
    pub use crate::gnc_mod::*;
}

pub mod types {
    pub use crate::config::SimConfig;
    pub use crate::dynamics::state::{distance, Body, Deriv, RocketState, Vec2};
    pub use crate::error::{ConfigError, SimError};
}

pub use sim::{RunState, SimulationContext};
