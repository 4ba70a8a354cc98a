pub mod state;

use crate::gnc::Controller;
use crate::physics::gravity::GravityModel;
use state::{Deriv, RocketState, Vec2};

// ---------------------------------------------------------------------------
// Combined acceleration field: gravity + guidance
// ---------------------------------------------------------------------------

/// Acceleration felt by the rocket at a position: the two-body gravity field
/// plus whatever correction the controller emits there.
pub struct AccelField<'a> {
    pub gravity: &'a GravityModel,
    pub controller: &'a dyn Controller,
}

impl<'a> AccelField<'a> {
    pub fn new(gravity: &'a GravityModel, controller: &'a dyn Controller) -> Self {
        Self { gravity, controller }
    }

    pub fn accel(&self, pos: &Vec2) -> Vec2 {
        self.gravity.accel(pos) + self.controller.accel(pos)
    }
}

/// Equations of motion: d(pos)/dt = vel, d(vel)/dt = field(pos).
pub fn derivatives(state: &RocketState, field: &AccelField) -> Deriv {
    Deriv {
        dpos: state.vel,
        dvel: field.accel(&state.pos),
    }
}
