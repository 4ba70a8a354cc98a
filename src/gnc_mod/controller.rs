use std::sync::Arc;

use crate::dynamics::state::Vec2;
use crate::error::ConfigError;
use super::trajectory::Trajectory;

/// Trait for guidance laws.
///
/// A controller maps a rocket position to a corrective acceleration. The
/// integrator queries it at every RK4 stage point, so implementations must be
/// pure with respect to position.
pub trait Controller {
    /// Corrective acceleration for a rocket at `pos`.
    fn accel(&self, pos: &Vec2) -> Vec2;

    /// Human-readable name for logging/display.
    fn name(&self) -> &str {
        "unnamed"
    }
}

/// Guidance switched off: the rocket coasts on gravity alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoControl;

impl Controller for NoControl {
    fn accel(&self, _pos: &Vec2) -> Vec2 {
        Vec2::zeros()
    }

    fn name(&self) -> &str {
        "none"
    }
}

// ---------------------------------------------------------------------------
// Nearest-waypoint tracking with a deadband
// ---------------------------------------------------------------------------

/// One evaluation of the tracking law.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackingCommand {
    pub waypoint: usize,
    pub distance: f64,
    pub accel: Vec2,
}

impl TrackingCommand {
    pub fn thrusting(&self) -> bool {
        self.accel != Vec2::zeros()
    }
}

/// Deadband must be non-negative, divisor positive, both finite.
pub fn validate_gains(deadband: f64, correction_divisor: f64) -> Result<(), ConfigError> {
    if !(deadband >= 0.0 && deadband.is_finite()) {
        return Err(ConfigError::Invalid {
            name: "deadband",
            requirement: "non-negative and finite",
            value: deadband,
        });
    }
    if !(correction_divisor > 0.0 && correction_divisor.is_finite()) {
        return Err(ConfigError::Invalid {
            name: "correction divisor",
            requirement: "positive and finite",
            value: correction_divisor,
        });
    }
    Ok(())
}

/// Proportional position feedback toward the nearest waypoint.
///
/// Inside the deadband the controller is silent and the rocket coasts; outside
/// it the full correction `(waypoint - pos) / correction_divisor` is applied.
/// There is no velocity or integral term.
#[derive(Debug, Clone)]
pub struct TrackingController {
    trajectory: Arc<Trajectory>,
    pub deadband: f64,
    pub correction_divisor: f64,
}

impl TrackingController {
    pub fn new(
        trajectory: Arc<Trajectory>,
        deadband: f64,
        correction_divisor: f64,
    ) -> Result<Self, ConfigError> {
        validate_gains(deadband, correction_divisor)?;
        Ok(Self { trajectory, deadband, correction_divisor })
    }

    pub fn trajectory(&self) -> &Trajectory {
        &self.trajectory
    }

    pub fn command(&self, pos: &Vec2) -> TrackingCommand {
        let (waypoint, distance) = self.trajectory.nearest(pos);
        let accel = if distance > self.deadband {
            let target = self.trajectory.waypoints()[waypoint].position;
            (target - pos) / self.correction_divisor
        } else {
            Vec2::zeros()
        };
        TrackingCommand { waypoint, distance, accel }
    }
}

impl Controller for TrackingController {
    fn accel(&self, pos: &Vec2) -> Vec2 {
        self.command(pos).accel
    }

    fn name(&self) -> &str {
        "nearest-waypoint"
    }
}
