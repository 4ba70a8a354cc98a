//! Scenario configuration.
//!
//! Every key is optional; anything missing falls back to the built-in
//! Earth/Moon scenario. A complete file looks like:
//!
//! ```yaml
//! primary:   { position: [-1050.0, 0.0], mass: 100.0 }
//! satellite: { position: [1300.0, 0.0],  mass: 50.0 }
//! g: 5.0
//! softening: 5.0
//! dt: 0.01
//! controller:
//!   enabled: true
//!   deadband: 200.0
//!   correction_divisor: 50000.0
//! trajectory:
//!   horizontal_scale: 2200.0
//!   vertical_scale: 650.0
//!   right_loop_scale: 0.6
//!   x_offset: 380.0
//!   points: 500
//! substeps: 2
//! batch: { default: 250, min: 100, max: 1000 }
//! start: { position: [350.0, 150.0], velocity: [0.0, 0.0] }
//! ticks_per_month: 140000
//! ```

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::Deserialize;

use crate::dynamics::state::{Body, RocketState, Vec2};
use crate::error::ConfigError;
use crate::gnc::{validate_gains, TrajectoryShape};
use crate::physics::GravityModel;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BodyConfig {
    pub position: [f64; 2],
    pub mass: f64,
}

impl BodyConfig {
    pub fn to_body(&self) -> Body {
        Body::new(Vec2::new(self.position[0], self.position[1]), self.mass)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    pub enabled: bool,
    pub deadband: f64,           // distance below which no correction is applied
    pub correction_divisor: f64, // larger = gentler nudge
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self { enabled: true, deadband: 200.0, correction_divisor: 50_000.0 }
    }
}

/// Updates executed per rendered frame, and the range the shell may pick from.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    pub default: u32,
    pub min: u32,
    pub max: u32,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self { default: 250, min: 100, max: 1000 }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StartConfig {
    pub position: [f64; 2],
    pub velocity: [f64; 2],
}

impl Default for StartConfig {
    fn default() -> Self {
        Self { position: [350.0, 150.0], velocity: [0.0, 0.0] }
    }
}

impl StartConfig {
    pub fn to_state(&self) -> RocketState {
        RocketState::new(
            Vec2::new(self.position[0], self.position[1]),
            Vec2::new(self.velocity[0], self.velocity[1]),
        )
    }
}

// ---------------------------------------------------------------------------
// Top-level scenario
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub primary: BodyConfig,
    pub satellite: BodyConfig,
    pub g: f64,
    pub softening: f64,
    pub dt: f64,
    pub controller: ControllerConfig,
    pub trajectory: TrajectoryShape,
    /// RK4 steps per update call.
    pub substeps: u32,
    pub batch: BatchConfig,
    pub start: StartConfig,
    pub ticks_per_month: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            primary: BodyConfig { position: [-1050.0, 0.0], mass: 100.0 },
            satellite: BodyConfig { position: [1300.0, 0.0], mass: 50.0 },
            g: 5.0,
            softening: 5.0,
            dt: 0.01,
            controller: ControllerConfig::default(),
            trajectory: TrajectoryShape::default(),
            substeps: 2,
            batch: BatchConfig::default(),
            start: StartConfig::default(),
            // 280 frames x 250 updates x 2 steps
            ticks_per_month: 140_000,
        }
    }
}

impl SimConfig {
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = serde_yaml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let reader = BufReader::new(File::open(path)?);
        let config: SimConfig = serde_yaml::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations that would let the run go non-finite.
    ///
    /// Checks the whole scenario: gravity constants and bodies, guidance gains,
    /// trajectory shape, timing and batch bounds, start state.
    pub fn validate(&self) -> Result<(), ConfigError> {
        GravityModel::new(self.primary.to_body(), self.satellite.to_body(), self.g, self.softening)?;
        if !(self.dt > 0.0 && self.dt.is_finite()) {
            return Err(ConfigError::NonPositiveTimestep(self.dt));
        }
        self.trajectory.validate()?;
        validate_gains(self.controller.deadband, self.controller.correction_divisor)?;
        if self.substeps == 0 {
            return Err(invalid("substeps", "at least 1", 0.0));
        }
        if self.ticks_per_month == 0 {
            return Err(invalid("ticks_per_month", "at least 1", 0.0));
        }
        let b = &self.batch;
        if b.min == 0 || b.min > b.max {
            return Err(invalid("batch.min", "between 1 and batch.max", b.min as f64));
        }
        if b.default < b.min || b.default > b.max {
            return Err(ConfigError::BatchSizeOutOfRange { value: b.default, min: b.min, max: b.max });
        }
        let start = self.start.position.iter().chain(self.start.velocity.iter());
        if let Some(v) = start.copied().find(|v| !v.is_finite()) {
            return Err(invalid("start state", "finite", v));
        }
        Ok(())
    }
}

fn invalid(name: &'static str, requirement: &'static str, value: f64) -> ConfigError {
    ConfigError::Invalid { name, requirement, value }
}
